//! Correlated OT outputs.
//!
//! For every index `i` the outputs satisfy the Δ-correlation
//!
//! `msgs[i] = keys[i] ⊕ choices[i]·Δ`
//!
//! Both outputs implement [`Buffer`] so they can be accumulated over several
//! extensions and consumed in arbitrary batch sizes. Applying the same buffer
//! operations on both sides preserves the correlation.

use cotgen_core::{
    buffer::{check_length, Buffer, BufferError},
    Block,
};
use serde::{Deserialize, Serialize};

/// Output of a COT sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CotSenderOutput {
    /// Global correlation `Δ`.
    pub delta: Block,
    /// Keys `r0[i]`.
    pub keys: Vec<Block>,
}

impl CotSenderOutput {
    /// Creates an empty output for the given `Δ`.
    pub fn new(delta: Block) -> Self {
        Self {
            delta,
            keys: Vec::new(),
        }
    }

    /// Returns the key pair `(r0[i], r0[i] ⊕ Δ)` at `index`.
    pub fn key_pair(&self, index: usize) -> Option<[Block; 2]> {
        self.keys.get(index).map(|key| [*key, *key ^ self.delta])
    }
}

impl Buffer for CotSenderOutput {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn merge(&mut self, other: Self) -> Result<(), BufferError> {
        if self.delta != other.delta {
            return Err(BufferError::Mismatch(
                "sender outputs have different deltas".to_string(),
            ));
        }

        self.keys.extend(other.keys);

        Ok(())
    }

    fn split(&mut self, length: usize) -> Result<Self, BufferError> {
        check_length(length, self.keys.len())?;

        Ok(Self {
            delta: self.delta,
            keys: self.keys.split_off(self.keys.len() - length),
        })
    }

    fn reduce(&mut self, length: usize) -> Result<(), BufferError> {
        check_length(length, self.keys.len())?;
        self.keys.drain(..self.keys.len() - length);

        Ok(())
    }
}

/// Output of a COT receiver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CotReceiverOutput {
    /// Choice bits `choice[i]`.
    pub choices: Vec<bool>,
    /// Chosen messages `rb[i]`.
    pub msgs: Vec<Block>,
}

impl Buffer for CotReceiverOutput {
    fn len(&self) -> usize {
        self.msgs.len()
    }

    fn merge(&mut self, other: Self) -> Result<(), BufferError> {
        self.choices.extend(other.choices);
        self.msgs.extend(other.msgs);

        Ok(())
    }

    fn split(&mut self, length: usize) -> Result<Self, BufferError> {
        check_length(length, self.msgs.len())?;

        let at = self.msgs.len() - length;
        Ok(Self {
            choices: self.choices.split_off(at),
            msgs: self.msgs.split_off(at),
        })
    }

    fn reduce(&mut self, length: usize) -> Result<(), BufferError> {
        check_length(length, self.msgs.len())?;

        let at = self.msgs.len() - length;
        self.choices.drain(..at);
        self.msgs.drain(..at);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ideal::IdealCot, test::assert_cot};

    use rstest::*;

    #[fixture]
    fn outputs() -> (CotSenderOutput, CotReceiverOutput) {
        IdealCot::new_with_seed([0u8; 16]).random(100)
    }

    #[rstest]
    fn test_split_merge_inverse(outputs: (CotSenderOutput, CotReceiverOutput)) {
        let (sender, receiver) = outputs;

        for k in [1, 37, 99] {
            let mut sender_head = sender.clone();
            let mut receiver_head = receiver.clone();

            let sender_tail = sender_head.split(k).unwrap();
            let receiver_tail = receiver_head.split(k).unwrap();

            assert_eq!(sender_tail.len(), k);
            assert_eq!(sender_head.len(), 100 - k);
            assert_cot(
                sender.delta,
                &receiver_tail.choices,
                &sender_tail.keys,
                &receiver_tail.msgs,
            );

            sender_head.merge(sender_tail).unwrap();
            receiver_head.merge(receiver_tail).unwrap();

            assert_eq!(sender_head, sender);
            assert_eq!(receiver_head, receiver);
        }
    }

    #[rstest]
    fn test_reduce_idempotent(outputs: (CotSenderOutput, CotReceiverOutput)) {
        let (mut sender, mut receiver) = outputs;
        let expected_keys = sender.keys[60..].to_vec();

        sender.reduce(40).unwrap();
        receiver.reduce(40).unwrap();
        let (sender_once, receiver_once) = (sender.clone(), receiver.clone());

        sender.reduce(40).unwrap();
        receiver.reduce(40).unwrap();

        assert_eq!(sender, sender_once);
        assert_eq!(receiver, receiver_once);
        assert_eq!(sender.keys, expected_keys);
        assert_cot(sender.delta, &receiver.choices, &sender.keys, &receiver.msgs);
    }

    #[rstest]
    fn test_take_preserves_correlation(outputs: (CotSenderOutput, CotReceiverOutput)) {
        let (mut sender, mut receiver) = outputs;
        let expected = sender.keys[..30].to_vec();

        let sender_head = sender.take(30).unwrap();
        let receiver_head = receiver.take(30).unwrap();

        assert_eq!(sender_head.keys, expected);
        assert_eq!(sender.len(), 70);
        assert_cot(
            sender.delta,
            &receiver_head.choices,
            &sender_head.keys,
            &receiver_head.msgs,
        );
        assert_cot(sender.delta, &receiver.choices, &sender.keys, &receiver.msgs);
    }

    #[rstest]
    fn test_invalid_length(outputs: (CotSenderOutput, CotReceiverOutput)) {
        let (mut sender, mut receiver) = outputs;

        assert!(sender.split(0).is_err());
        assert!(sender.split(101).is_err());
        assert!(receiver.reduce(0).is_err());
        assert!(receiver.reduce(101).is_err());

        assert_eq!(sender.len(), 100);
        assert_eq!(receiver.len(), 100);
    }

    #[test]
    fn test_merge_delta_mismatch() {
        let (mut a, _) = IdealCot::new_with_seed([0u8; 16]).random(10);
        let (b, _) = IdealCot::new_with_seed([1u8; 16]).random(10);

        assert!(matches!(a.merge(b), Err(BufferError::Mismatch(_))));
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_key_pair() {
        let (sender, receiver) = IdealCot::new_with_seed([2u8; 16]).random(10);

        for (i, (choice, msg)) in receiver.choices.iter().zip(&receiver.msgs).enumerate() {
            let pair = sender.key_pair(i).unwrap();
            assert_eq!(pair[*choice as usize], *msg);
        }
        assert_eq!(sender.key_pair(10), None);
    }
}
