//! I/O types.
//!
//! A [`Channel`] carries opaque byte frames between two parties, in order and
//! without loss. Framing and addressing of protocol messages is handled by
//! [`Context`](crate::Context).

use std::io::{self, Read, Write};

use crossbeam_channel::{Receiver, Sender};

/// Maximum accepted frame length in bytes.
pub const MAX_FRAME_LENGTH: usize = 1 << 30;

/// A blocking, ordered and reliable duplex channel of byte frames.
pub trait Channel: Send {
    /// Sends a frame.
    fn send(&mut self, frame: Vec<u8>) -> io::Result<()>;

    /// Blocks until the next frame is received.
    fn recv(&mut self) -> io::Result<Vec<u8>>;
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn send(&mut self, frame: Vec<u8>) -> io::Result<()> {
        (**self).send(frame)
    }

    fn recv(&mut self) -> io::Result<Vec<u8>> {
        (**self).recv()
    }
}

/// Creates a pair of connected in-memory channels.
///
/// # Arguments
///
/// * `buffer` - Number of frames which can be in flight in each direction.
pub fn duplex(buffer: usize) -> (MemoryChannel, MemoryChannel) {
    let (tx_0, rx_0) = crossbeam_channel::bounded(buffer);
    let (tx_1, rx_1) = crossbeam_channel::bounded(buffer);

    (
        MemoryChannel { tx: tx_0, rx: rx_1 },
        MemoryChannel { tx: tx_1, rx: rx_0 },
    )
}

/// An in-memory channel.
#[derive(Debug)]
pub struct MemoryChannel {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl Channel for MemoryChannel {
    fn send(&mut self, frame: Vec<u8>) -> io::Result<()> {
        self.tx
            .send(frame)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer channel closed"))
    }

    fn recv(&mut self) -> io::Result<Vec<u8>> {
        self.rx
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "peer channel closed"))
    }
}

/// A channel over a byte stream, eg. a TCP connection.
///
/// Each frame is prefixed with its length as a big-endian `u32`.
#[derive(Debug)]
pub struct StreamChannel<T> {
    io: T,
}

impl<T> StreamChannel<T> {
    /// Creates a new stream channel.
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Returns the inner stream.
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Read + Write + Send> Channel for StreamChannel<T> {
    fn send(&mut self, frame: Vec<u8>) -> io::Result<()> {
        if frame.len() > MAX_FRAME_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("frame length {} exceeds maximum", frame.len()),
            ));
        }

        self.io.write_all(&(frame.len() as u32).to_be_bytes())?;
        self.io.write_all(&frame)?;
        self.io.flush()
    }

    fn recv(&mut self) -> io::Result<Vec<u8>> {
        let mut len = [0u8; 4];
        self.io.read_exact(&mut len)?;

        let len = u32::from_be_bytes(len) as usize;
        if len > MAX_FRAME_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame length {len} exceeds maximum"),
            ));
        }

        let mut frame = vec![0u8; len];
        self.io.read_exact(&mut frame)?;

        Ok(frame)
    }
}
