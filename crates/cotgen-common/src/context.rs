//! Execution context.


#[cfg(any(test, feature = "test-utils"))]
pub use test::test_context;

use core::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{io::Channel, Counter, PartyId, SessionId};

/// An error for [`Context`].
#[derive(Debug, thiserror::Error)]
#[error("context error: {kind}")]
pub struct ContextError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ContextError {
    pub(crate) fn new<E: Into<Box<dyn std::error::Error + Send + Sync>>>(
        kind: ErrorKind,
        source: E,
    ) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    fn io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::BrokenPipe => {
                Self::new(ErrorKind::Closed, err)
            }
            _ => Self::new(ErrorKind::Io, err),
        }
    }

    fn codec(err: bincode::Error) -> Self {
        Self::new(ErrorKind::Codec, err)
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// The kind of a [`ContextError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The underlying channel failed.
    Io,
    /// The peer closed the channel.
    Closed,
    /// A message could not be encoded or decoded.
    Codec,
    /// A message was received out of order or with the wrong address.
    UnexpectedMessage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Io => write!(f, "io error"),
            ErrorKind::Closed => write!(f, "channel closed"),
            ErrorKind::Codec => write!(f, "codec error"),
            ErrorKind::UnexpectedMessage => write!(f, "unexpected message"),
        }
    }
}

/// The address of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Session the message belongs to.
    pub session: SessionId,
    /// Position of the message in the session transcript.
    pub step: u64,
    /// Sending party.
    pub sender: PartyId,
    /// Receiving party.
    pub receiver: PartyId,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    header: Header,
    payload: Vec<u8>,
}

/// A two-party execution context.
///
/// Messages are exchanged over a [`Channel`] in strict request/response
/// order. Both parties count every message of the session, in either
/// direction, so each message is addressed by the session, its step and the
/// sending and receiving party. A received message with any other address is
/// rejected.
pub struct Context {
    session: SessionId,
    party: PartyId,
    peer: PartyId,
    step: Counter,
    io: Box<dyn Channel>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("session", &self.session)
            .field("party", &self.party)
            .field("peer", &self.peer)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context.
    ///
    /// # Arguments
    ///
    /// * `session` - Session identifier, shared by both parties.
    /// * `party` - This party's identifier.
    /// * `peer` - The peer's identifier.
    /// * `io` - Channel connected to the peer.
    pub fn new(
        session: SessionId,
        party: PartyId,
        peer: PartyId,
        io: impl Channel + 'static,
    ) -> Self {
        Self {
            session,
            party,
            peer,
            step: Counter::default(),
            io: Box::new(io),
        }
    }

    /// Returns the session identifier.
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    /// Returns this party's identifier.
    pub fn party_id(&self) -> PartyId {
        self.party
    }

    /// Returns the peer's identifier.
    pub fn peer_id(&self) -> PartyId {
        self.peer
    }

    /// Returns the number of messages exchanged so far.
    pub fn step(&self) -> u64 {
        self.step.current()
    }

    /// Sends a message to the peer.
    pub fn send<T: Serialize>(&mut self, msg: T) -> Result<(), ContextError> {
        let payload = bincode::serialize(&msg).map_err(ContextError::codec)?;
        let header = Header {
            session: self.session,
            step: self.step.next(),
            sender: self.party,
            receiver: self.peer,
        };

        let frame = bincode::serialize(&Envelope { header, payload }).map_err(ContextError::codec)?;

        tracing::trace!(step = header.step, len = frame.len(), "sending message");

        self.io.send(frame).map_err(ContextError::io)
    }

    /// Blocks until the next message is received from the peer.
    pub fn expect_next<T: DeserializeOwned>(&mut self) -> Result<T, ContextError> {
        let expected = Header {
            session: self.session,
            step: self.step.next(),
            sender: self.peer,
            receiver: self.party,
        };

        let frame = self.io.recv().map_err(ContextError::io)?;

        tracing::trace!(step = expected.step, len = frame.len(), "received message");

        let Envelope { header, payload } =
            bincode::deserialize(&frame).map_err(ContextError::codec)?;

        if header != expected {
            return Err(ContextError::new(
                ErrorKind::UnexpectedMessage,
                format!("expected message {expected:?}, got {header:?}"),
            ));
        }

        bincode::deserialize(&payload).map_err(ContextError::codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::duplex;

    #[test]
    fn test_context_round_trip() {
        let (mut alice, mut bob) = test_context(8);

        std::thread::scope(|s| {
            s.spawn(|| {
                alice.send((1u32, vec![true, false])).unwrap();
                let reply: String = alice.expect_next().unwrap();
                assert_eq!(reply, "ack");
            });

            let msg: (u32, Vec<bool>) = bob.expect_next().unwrap();
            assert_eq!(msg, (1, vec![true, false]));
            bob.send("ack".to_string()).unwrap();
        });

        assert_eq!(alice.step(), 2);
        assert_eq!(bob.step(), 2);
    }

    #[test]
    fn test_context_rejects_wrong_session() {
        let (io_0, io_1) = duplex(8);
        let mut alice = Context::new(SessionId::new(0), PartyId::new(0), PartyId::new(1), io_0);
        let mut bob = Context::new(SessionId::new(1), PartyId::new(1), PartyId::new(0), io_1);

        alice.send(0u8).unwrap();
        let err = bob.expect_next::<u8>().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnexpectedMessage);
    }

    #[test]
    fn test_context_rejects_out_of_order() {
        let (mut alice, mut bob) = test_context(8);

        // Both parties send at the same step, so neither message is a reply.
        alice.send(0u8).unwrap();
        bob.send(1u8).unwrap();

        let err = alice.expect_next::<u8>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedMessage);
    }

    #[test]
    fn test_context_codec_error() {
        let (mut alice, mut bob) = test_context(8);

        alice.send(0u8).unwrap();
        let err = bob.expect_next::<[u64; 4]>().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Codec);
    }

    #[test]
    fn test_context_closed() {
        let (mut alice, bob) = test_context(8);
        drop(bob);

        let err = alice.expect_next::<u8>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
    }
}
