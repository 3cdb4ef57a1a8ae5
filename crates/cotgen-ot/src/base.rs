//! Networked base oblivious transfer.

mod receiver;
mod sender;

pub use receiver::{Receiver, ReceiverError};
pub use sender::{Sender, SenderError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    use cotgen_common::context::test_context;
    use cotgen_ot_core::test::assert_base_ot;
    use rand::Rng;
    use rand_chacha::ChaCha12Rng;
    use rand_core::SeedableRng;
    use rstest::*;

    #[fixture]
    fn choices() -> Vec<bool> {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        (0..1000).map(|_| rng.gen()).collect()
    }

    fn init() -> (Sender, Receiver) {
        let mut sender = Sender::new_with_seed([0u8; 32]);
        let mut receiver = Receiver::new_with_seed([1u8; 32]);
        sender.init().unwrap();
        receiver.init().unwrap();
        (sender, receiver)
    }

    #[rstest]
    fn test_base_ot(choices: Vec<bool>) {
        let (mut sender, mut receiver) = init();
        let (mut ctx_sender, mut ctx_receiver) = test_context(8);

        for _ in 0..2 {
            let (sender_output, receiver_output) = std::thread::scope(|s| {
                let sender_output =
                    s.spawn(|| sender.send(&mut ctx_sender, choices.len()).unwrap());
                let receiver_output = receiver.receive(&mut ctx_receiver, &choices).unwrap();
                (sender_output.join().unwrap(), receiver_output)
            });

            assert_eq!(sender_output.id, receiver_output.id);
            assert_base_ot(&choices, &sender_output.keys, &receiver_output.keys);
        }
    }

    #[test]
    fn test_base_ot_not_initialized() {
        let (mut ctx_sender, mut ctx_receiver) = test_context(8);

        let err = Sender::new().send(&mut ctx_sender, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let err = Receiver::new()
            .receive(&mut ctx_receiver, &[true])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        // Nothing was sent.
        assert_eq!(ctx_sender.step(), 0);
        assert_eq!(ctx_receiver.step(), 0);
    }

    #[test]
    fn test_base_ot_reinit() {
        let (mut sender, mut receiver) = init();

        assert_eq!(sender.init().unwrap_err().kind(), ErrorKind::State);
        assert_eq!(receiver.init().unwrap_err().kind(), ErrorKind::State);
    }

    #[test]
    fn test_base_ot_zero_count() {
        let (mut sender, mut receiver) = init();
        let (mut ctx_sender, mut ctx_receiver) = test_context(8);

        let err = sender.send(&mut ctx_sender, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parameter);

        let err = receiver.receive(&mut ctx_receiver, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parameter);

        assert_eq!(ctx_sender.step(), 0);
        assert_eq!(ctx_receiver.step(), 0);

        // The engines are still usable.
        let choices = vec![true, false, true];
        let (sender_output, receiver_output) = std::thread::scope(|s| {
            let sender_output = s.spawn(|| sender.send(&mut ctx_sender, 3).unwrap());
            let receiver_output = receiver.receive(&mut ctx_receiver, &choices).unwrap();
            (sender_output.join().unwrap(), receiver_output)
        });
        assert_base_ot(&choices, &sender_output.keys, &receiver_output.keys);
    }

    #[rstest]
    fn test_base_ot_count_mismatch_aborts(choices: Vec<bool>) {
        let (mut sender, mut receiver) = init();
        let (mut ctx_sender, mut ctx_receiver) = test_context(8);

        let err = std::thread::scope(|s| {
            let handle = s.spawn(|| receiver.receive(&mut ctx_receiver, &choices[..999]));
            let err = sender.send(&mut ctx_sender, choices.len()).unwrap_err();
            handle.join().unwrap().unwrap();
            err
        });
        assert_eq!(err.kind(), ErrorKind::Abort);

        // The sender is left in an error state.
        let err = sender.send(&mut ctx_sender, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
