//! Base oblivious transfer based on the "simplest OT" protocol of
//! [`CO15`](https://eprint.iacr.org/2015/267.pdf), instantiated over the
//! Ristretto group.
//!
//! The sender publishes `S = y·G` once per session. For each transfer the
//! receiver sends `R = x·G + c·S` for its choice bit `c`, and both parties
//! derive their keys by hashing a shared point together with a unique index.

mod error;
pub mod msgs;
mod receiver;
mod sender;

pub use error::{ReceiverError, SenderError};
pub use receiver::{state as receiver_state, Receiver};
pub use sender::{state as sender_state, Sender};

use blake3::Hasher;
use cotgen_core::Block;
use curve25519_dalek::ristretto::RistrettoPoint;
use serde::{Deserialize, Serialize};

use crate::TransferId;

/// Output of a base OT sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseOtSenderOutput {
    /// Transfer id.
    pub id: TransferId,
    /// Key pairs `(r0, r1)`, one per instance.
    pub keys: Vec<[Block; 2]>,
}

/// Output of a base OT receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseOtReceiverOutput {
    /// Transfer id.
    pub id: TransferId,
    /// Choice bits, one per instance.
    pub choices: Vec<bool>,
    /// Chosen keys `r_b`, one per instance.
    pub keys: Vec<Block>,
}

/// Derives a key `H(i, P)` from an instance index and a point, taking the first
/// 16 bytes of `blake3(i || enc(P))`.
pub(crate) fn hash_point(point: &RistrettoPoint, tweak: u128) -> Block {
    let mut h = Hasher::new();
    h.update(&tweak.to_be_bytes());
    h.update(point.compress().as_bytes());
    let digest = h.finalize();

    let mut block = [0u8; 16];
    block.copy_from_slice(&digest.as_bytes()[..16]);
    block.into()
}

#[cfg(test)]
mod tests {
    use super::{msgs::ReceiverPayload, *};
    use crate::test::assert_base_ot;

    use rand::Rng;
    use rand_chacha::ChaCha12Rng;
    use rand_core::SeedableRng;
    use rstest::*;

    const SENDER_SEED: [u8; 32] = [0u8; 32];
    const RECEIVER_SEED: [u8; 32] = [1u8; 32];

    #[fixture]
    fn choices() -> Vec<bool> {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        (0..1000).map(|_| rng.gen()).collect()
    }

    fn setup() -> (Sender<sender_state::Setup>, Receiver<receiver_state::Setup>) {
        let sender = Sender::new_with_seed(SENDER_SEED);
        let receiver = Receiver::new_with_seed(RECEIVER_SEED);

        let (sender_setup, sender) = sender.setup();
        let receiver = receiver.setup(sender_setup).unwrap();

        (sender, receiver)
    }

    #[rstest]
    fn test_base_ot_pass(choices: Vec<bool>) {
        let (mut sender, mut receiver) = setup();

        let (payload, receiver_output) = receiver.receive(&choices).unwrap();
        let sender_output = sender.send(choices.len(), payload).unwrap();

        assert_eq!(sender_output.id, receiver_output.id);
        assert_eq!(receiver_output.choices, choices);
        assert_base_ot(&choices, &sender_output.keys, &receiver_output.keys);
    }

    #[rstest]
    fn test_base_ot_unchosen_key_differs(choices: Vec<bool>) {
        let (mut sender, mut receiver) = setup();

        let (payload, receiver_output) = receiver.receive(&choices).unwrap();
        let sender_output = sender.send(choices.len(), payload).unwrap();

        for ((c, keys), key) in choices
            .iter()
            .zip(&sender_output.keys)
            .zip(&receiver_output.keys)
        {
            assert_ne!(keys[!*c as usize], *key);
        }
    }

    #[rstest]
    fn test_base_ot_multiple_batches(choices: Vec<bool>) {
        let (mut sender, mut receiver) = setup();

        let (payload, first_receiver) = receiver.receive(&choices).unwrap();
        let first_sender = sender.send(choices.len(), payload).unwrap();

        let (payload, second_receiver) = receiver.receive(&choices).unwrap();
        let second_sender = sender.send(choices.len(), payload).unwrap();

        assert_base_ot(&choices, &second_sender.keys, &second_receiver.keys);
        assert_ne!(first_sender.id, second_sender.id);
        assert_eq!(second_sender.id, second_receiver.id);

        // The index offset keeps keys of different batches independent.
        assert_ne!(first_sender.keys, second_sender.keys);
        assert_ne!(first_receiver.keys, second_receiver.keys);
    }

    #[rstest]
    fn test_base_ot_count_mismatch(choices: Vec<bool>) {
        let (mut sender, mut receiver) = setup();

        let (ReceiverPayload { mut blinded_choices }, _) = receiver.receive(&choices).unwrap();
        blinded_choices.pop();

        let err = sender
            .send(choices.len(), ReceiverPayload { blinded_choices })
            .unwrap_err();

        assert!(matches!(
            err,
            SenderError::CountMismatch {
                expected: 1000,
                actual: 999
            }
        ));
    }

    #[rstest]
    fn test_base_ot_invalid_point(choices: Vec<bool>) {
        let (mut sender, mut receiver) = setup();

        let (ReceiverPayload { mut blinded_choices }, _) = receiver.receive(&choices).unwrap();
        // Not a canonical encoding of any point.
        blinded_choices[3] = curve25519_dalek::ristretto::CompressedRistretto([0xff; 32]);

        let err = sender
            .send(choices.len(), ReceiverPayload { blinded_choices })
            .unwrap_err();

        assert!(matches!(err, SenderError::InvalidPoint(3)));
    }

    #[test]
    fn test_base_ot_zero_count() {
        let (mut sender, mut receiver) = setup();

        assert!(matches!(
            receiver.receive(&[]),
            Err(ReceiverError::InvalidCount)
        ));
        assert!(matches!(
            sender.send(
                0,
                ReceiverPayload {
                    blinded_choices: Vec::new()
                }
            ),
            Err(SenderError::InvalidCount)
        ));
    }
}
