//! Test utilities.

use cotgen_core::Block;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::{BaseOtReceiverOutput, BaseOtSenderOutput, TransferId};

/// Asserts the correctness of correlated oblivious transfer.
pub fn assert_cot(delta: Block, choices: &[bool], keys: &[Block], msgs: &[Block]) {
    assert_eq!(choices.len(), keys.len());
    assert_eq!(keys.len(), msgs.len());
    assert!(choices.iter().zip(keys.iter().zip(msgs)).all(
        |(&choice, (&key, &msg))| {
            if choice {
                msg == key ^ delta
            } else {
                msg == key
            }
        }
    ));
}

/// Asserts the correctness of base oblivious transfer.
pub fn assert_base_ot(choices: &[bool], sender_keys: &[[Block; 2]], receiver_keys: &[Block]) {
    assert_eq!(choices.len(), sender_keys.len());
    assert_eq!(sender_keys.len(), receiver_keys.len());
    assert!(choices
        .iter()
        .zip(sender_keys.iter().zip(receiver_keys))
        .all(|(&choice, (keys, key))| keys[choice as usize] == *key));
}

/// Returns ideal base OT outputs suitable for setting up an extension, with the
/// base OT receiver's choices set to the bits of `delta`.
pub fn base_ot_outputs(delta: Block, seed: u64) -> (BaseOtSenderOutput, BaseOtReceiverOutput) {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);

    let keys: Vec<[Block; 2]> = (0..crate::alsz::CSP)
        .map(|_| [rng.gen(), rng.gen()])
        .collect();
    let choices = delta.to_lsb0_vec();
    let chosen = keys
        .iter()
        .zip(&choices)
        .map(|(keys, &choice)| keys[choice as usize])
        .collect();

    (
        BaseOtSenderOutput {
            id: TransferId::default(),
            keys,
        },
        BaseOtReceiverOutput {
            id: TransferId::default(),
            choices,
            keys: chosen,
        },
    )
}
