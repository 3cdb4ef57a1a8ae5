//! Ideal correlated OT engines.
//!
//! Both engines must be driven from separate threads, as every call blocks
//! until the peer makes the matching call.

use std::sync::{Arc, Mutex};

use cotgen_common::{
    ideal::{call_sync, CallSync},
    Context,
};
use cotgen_core::Block;
use cotgen_ot_core::{ideal::IdealCot, CotReceiverOutput, CotSenderOutput};

use crate::{ClassifyError, CotReceiver, CotSender, ErrorKind};

#[derive(Debug, Default)]
struct Request {
    sender: Option<usize>,
    receiver: Option<usize>,
}

#[derive(Debug)]
struct Inner {
    cot: IdealCot,
    request: Request,
    sender: Option<CotSenderOutput>,
    receiver: Option<CotReceiverOutput>,
}

impl Inner {
    /// Serves the pending request if both parties asked for the same count.
    fn serve(&mut self) {
        let request = std::mem::take(&mut self.request);
        if let (Some(sender), Some(receiver)) = (request.sender, request.receiver) {
            if sender == receiver {
                let (sender, receiver) = self.cot.random(sender);
                self.sender = Some(sender);
                self.receiver = Some(receiver);
            }
        }
    }
}

/// Returns a pair of ideal COT engines sharing a functionality seeded with
/// `seed`.
pub fn ideal_cot(seed: [u8; 16]) -> (IdealCotSender, IdealCotReceiver) {
    let inner = Arc::new(Mutex::new(Inner {
        cot: IdealCot::new_with_seed(seed),
        request: Request::default(),
        sender: None,
        receiver: None,
    }));
    let (sync_sender, sync_receiver) = call_sync();

    (
        IdealCotSender {
            inner: Arc::clone(&inner),
            sync: sync_sender,
        },
        IdealCotReceiver {
            inner,
            sync: sync_receiver,
        },
    )
}

/// Ideal COT sender.
#[derive(Debug)]
pub struct IdealCotSender {
    inner: Arc<Mutex<Inner>>,
    sync: CallSync,
}

impl CotSender for IdealCotSender {
    type Error = IdealCotError;

    fn setup(&mut self, _ctx: &mut Context) -> Result<(), Self::Error> {
        Ok(())
    }

    fn delta(&self) -> Option<Block> {
        Some(self.inner.lock().unwrap().cot.delta())
    }

    fn send_cot(
        &mut self,
        _ctx: &mut Context,
        count: usize,
    ) -> Result<CotSenderOutput, Self::Error> {
        if count == 0 {
            return Err(IdealCotError::InvalidCount);
        }

        self.inner.lock().unwrap().request.sender = Some(count);
        self.sync.call(|| self.inner.lock().unwrap().serve());

        self.inner
            .lock()
            .unwrap()
            .sender
            .take()
            .ok_or(IdealCotError::CountMismatch)
    }
}

/// Ideal COT receiver.
#[derive(Debug)]
pub struct IdealCotReceiver {
    inner: Arc<Mutex<Inner>>,
    sync: CallSync,
}

impl CotReceiver for IdealCotReceiver {
    type Error = IdealCotError;

    fn setup(&mut self, _ctx: &mut Context) -> Result<(), Self::Error> {
        Ok(())
    }

    fn receive_cot(
        &mut self,
        _ctx: &mut Context,
        count: usize,
    ) -> Result<CotReceiverOutput, Self::Error> {
        if count == 0 {
            return Err(IdealCotError::InvalidCount);
        }

        self.inner.lock().unwrap().request.receiver = Some(count);
        self.sync.call(|| self.inner.lock().unwrap().serve());

        self.inner
            .lock()
            .unwrap()
            .receiver
            .take()
            .ok_or(IdealCotError::CountMismatch)
    }
}

/// Ideal COT error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum IdealCotError {
    #[error("invalid count, must be greater than zero")]
    InvalidCount,
    #[error("sender and receiver requested a different number of COTs")]
    CountMismatch,
}

impl ClassifyError for IdealCotError {
    fn kind(&self) -> ErrorKind {
        match self {
            IdealCotError::InvalidCount => ErrorKind::Parameter,
            IdealCotError::CountMismatch => ErrorKind::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::test_cot;

    use cotgen_common::context::test_context;

    #[test]
    fn test_ideal_cot() {
        let (sender, receiver) = ideal_cot([0u8; 16]);

        test_cot(sender, receiver, 3);
    }

    #[test]
    fn test_ideal_cot_count_mismatch() {
        let (mut sender, mut receiver) = ideal_cot([0u8; 16]);
        let (mut ctx_sender, mut ctx_receiver) = test_context(8);

        let (sender_err, receiver_err) = std::thread::scope(|s| {
            let handle = s.spawn(|| sender.send_cot(&mut ctx_sender, 10).unwrap_err());
            let receiver_err = receiver.receive_cot(&mut ctx_receiver, 11).unwrap_err();
            (handle.join().unwrap(), receiver_err)
        });

        assert_eq!(sender_err.kind(), ErrorKind::Abort);
        assert_eq!(receiver_err.kind(), ErrorKind::Abort);
    }
}
