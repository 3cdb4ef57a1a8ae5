//! Ideal correlated OT functionality.

use cotgen_core::{prg::Prg, Block};
use rand::Rng;

use crate::correlated::{CotReceiverOutput, CotSenderOutput};

/// Ideal COT functionality.
///
/// Produces Δ-correlated outputs for both parties directly from a PRG.
#[derive(Debug, Clone)]
pub struct IdealCot {
    delta: Block,
    prg: Prg,
}

impl IdealCot {
    /// Creates a new ideal COT functionality.
    ///
    /// # Arguments
    ///
    /// * `delta` - Global correlation.
    /// * `seed` - PRG seed.
    pub fn new(delta: Block, seed: [u8; 16]) -> Self {
        Self {
            delta,
            prg: Prg::new_with_seed(seed),
        }
    }

    /// Creates a new ideal COT functionality with `Δ` sampled from the seed.
    pub fn new_with_seed(seed: [u8; 16]) -> Self {
        let mut prg = Prg::new_with_seed(seed);
        let delta = prg.gen();

        Self { delta, prg }
    }

    /// Returns the global correlation.
    pub fn delta(&self) -> Block {
        self.delta
    }

    /// Returns `count` COTs with random choice bits.
    pub fn random(&mut self, count: usize) -> (CotSenderOutput, CotReceiverOutput) {
        let choices: Vec<bool> = (0..count).map(|_| self.prg.gen()).collect();
        self.chosen(&choices)
    }

    /// Returns one COT per choice bit.
    pub fn chosen(&mut self, choices: &[bool]) -> (CotSenderOutput, CotReceiverOutput) {
        let keys: Vec<Block> = (0..choices.len()).map(|_| self.prg.gen()).collect();
        let msgs = keys
            .iter()
            .zip(choices)
            .map(|(key, choice)| if *choice { *key ^ self.delta } else { *key })
            .collect();

        (
            CotSenderOutput {
                delta: self.delta,
                keys,
            },
            CotReceiverOutput {
                choices: choices.to_vec(),
                msgs,
            },
        )
    }
}

impl Default for IdealCot {
    fn default() -> Self {
        Self::new_with_seed(rand::random())
    }
}
