//! Ideal triple generator.

use cotgen_common::Context;
use cotgen_core::prg::Prg;
use cotgen_triple_core::{bitvec::BitVec, TripleError, Z2Triple};
use rand_core::RngCore;

use crate::{ClassifyError, ErrorKind, Role, TripleGenerator};

/// Returns a pair of ideal triple generators, one per role, sharing a PRG
/// seeded with `seed`.
pub fn ideal_triple_generator(seed: [u8; 16]) -> (IdealTripleGenerator, IdealTripleGenerator) {
    (
        IdealTripleGenerator::new(Role::Leader, seed),
        IdealTripleGenerator::new(Role::Follower, seed),
    )
}

/// Ideal triple generator.
///
/// Both parties sample the shares of both parties from identical PRGs and
/// keep their own, so the pair stays consistent as long as both make the same
/// sequence of calls. No communication takes place.
#[derive(Debug)]
pub struct IdealTripleGenerator {
    role: Role,
    prg: Prg,
    initialized: bool,
}

impl IdealTripleGenerator {
    fn new(role: Role, seed: [u8; 16]) -> Self {
        Self {
            role,
            prg: Prg::new_with_seed(seed),
            initialized: false,
        }
    }

    fn random_bits(&mut self, num: usize) -> BitVec {
        let mut bytes = vec![0u8; num.div_ceil(8)];
        self.prg.fill_bytes(&mut bytes);

        let mut bits = BitVec::from_vec(bytes);
        bits.truncate(num);
        bits
    }
}

impl TripleGenerator for IdealTripleGenerator {
    type Error = IdealGeneratorError;

    fn init(&mut self, _ctx: &mut Context, expected_total: usize) -> Result<(), Self::Error> {
        if self.initialized {
            return Err(IdealGeneratorError::AlreadyInitialized);
        }

        if expected_total == 0 {
            return Err(IdealGeneratorError::InvalidCount);
        }

        self.initialized = true;

        Ok(())
    }

    fn generate(&mut self, _ctx: &mut Context, num: usize) -> Result<Z2Triple, Self::Error> {
        if num == 0 {
            return Err(IdealGeneratorError::InvalidCount);
        }

        if !self.initialized {
            return Err(IdealGeneratorError::NotInitialized);
        }

        let a_0 = self.random_bits(num);
        let b_0 = self.random_bits(num);
        let c_0 = self.random_bits(num);
        let a_1 = self.random_bits(num);
        let b_1 = self.random_bits(num);

        let triple = match self.role {
            Role::Leader => Z2Triple::new(a_0, b_0, c_0)?,
            Role::Follower => {
                let c_1 = (0..num)
                    .map(|i| ((a_0[i] ^ a_1[i]) & (b_0[i] ^ b_1[i])) ^ c_0[i])
                    .collect();
                Z2Triple::new(a_1, b_1, c_1)?
            }
        };

        Ok(triple)
    }
}

/// Ideal triple generator error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum IdealGeneratorError {
    #[error("invalid count, must be greater than zero")]
    InvalidCount,
    #[error("generator is not initialized")]
    NotInitialized,
    #[error("generator is already initialized")]
    AlreadyInitialized,
    #[error("triple error: {0}")]
    Triple(#[from] TripleError),
}

impl ClassifyError for IdealGeneratorError {
    fn kind(&self) -> ErrorKind {
        match self {
            IdealGeneratorError::InvalidCount => ErrorKind::Parameter,
            IdealGeneratorError::NotInitialized | IdealGeneratorError::AlreadyInitialized => {
                ErrorKind::State
            }
            IdealGeneratorError::Triple(_) => ErrorKind::Abort,
        }
    }
}
