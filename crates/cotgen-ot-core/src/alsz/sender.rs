use crate::{
    alsz::{column_bytes, transpose_rows, Extend, SenderConfig, SenderError, CSP},
    base::BaseOtReceiverOutput,
    correlated::CotSenderOutput,
    TransferId,
};

use cotgen_core::{prg::Prg, Block};
use rand::SeedableRng;
use rand_core::RngCore;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// ALSZ sender.
#[derive(Debug, Default)]
pub struct Sender<T: state::State = state::Initialized> {
    config: SenderConfig,
    transfer_id: TransferId,
    state: T,
}

impl<T> Sender<T>
where
    T: state::State,
{
    /// Returns the sender's configuration.
    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Returns the id of the next extension.
    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }
}

impl Sender {
    /// Creates a new sender.
    ///
    /// # Arguments
    ///
    /// * `config` - The sender's configuration.
    pub fn new(config: SenderConfig) -> Self {
        Sender {
            config,
            transfer_id: TransferId::default(),
            state: state::Initialized {},
        }
    }

    /// Completes the setup phase of the protocol.
    ///
    /// The sender's choice bits in the base OTs, in LSB0 order, are the global
    /// correlation `Δ`.
    ///
    /// # Arguments
    ///
    /// * `base_output` - The output of `CSP` base OTs in which the sender acted
    ///   as the receiver.
    pub fn setup(
        self,
        base_output: BaseOtReceiverOutput,
    ) -> Result<Sender<state::Extension>, SenderError> {
        let BaseOtReceiverOutput { choices, keys, .. } = base_output;

        if keys.len() != CSP || choices.len() != CSP {
            return Err(SenderError::InsufficientSetup {
                expected: CSP,
                actual: keys.len().min(choices.len()),
            });
        }

        let delta = Block::from_lsb0_iter(choices.iter().copied()).ok_or(
            SenderError::InsufficientSetup {
                expected: CSP,
                actual: choices.len(),
            },
        )?;

        Ok(Sender {
            config: self.config,
            transfer_id: self.transfer_id,
            state: state::Extension {
                delta,
                choices,
                rngs: keys.into_iter().map(Prg::from_seed).collect(),
            },
        })
    }
}

impl Sender<state::Extension> {
    /// Returns the global correlation `Δ`.
    pub fn delta(&self) -> Block {
        self.state.delta
    }

    /// Completes an extension of `count` COTs.
    ///
    /// The message is validated in full before any PRG output is consumed.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of COTs the sender expects.
    /// * `extend` - The receiver's extend message.
    pub fn extend(&mut self, count: usize, extend: Extend) -> Result<CotSenderOutput, SenderError> {
        let max = self.config.max_count();
        if count == 0 || count > max {
            return Err(SenderError::InvalidCount { count, max });
        }

        let Extend {
            id,
            count: actual,
            columns,
        } = extend;

        if id != self.transfer_id {
            return Err(SenderError::IdMismatch(self.transfer_id, id));
        }

        if actual != count {
            return Err(SenderError::CountMismatch {
                expected: count,
                actual,
            });
        }

        if columns.len() != CSP {
            return Err(SenderError::ColumnCountMismatch {
                expected: CSP,
                actual: columns.len(),
            });
        }

        let row_width = column_bytes(count);
        if let Some((column, u)) = columns
            .iter()
            .enumerate()
            .find(|(_, u)| u.len() != row_width)
        {
            return Err(SenderError::ColumnLengthMismatch {
                column,
                expected: row_width,
                actual: u.len(),
            });
        }

        self.transfer_id.next();

        let state::Extension {
            delta,
            choices,
            rngs,
        } = &mut self.state;

        let mut qs = vec![0u8; CSP * row_width];

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                let iter = rngs
                    .par_iter_mut()
                    .zip(choices.par_iter())
                    .zip(qs.par_chunks_exact_mut(row_width))
                    .zip(columns.par_iter());
            } else {
                let iter = rngs
                    .iter_mut()
                    .zip(choices.iter())
                    .zip(qs.chunks_exact_mut(row_width))
                    .zip(columns.iter());
            }
        }

        iter.for_each(|(((rng, s), q), u)| {
            // q_j = G(k_{s_j}) ⊕ s_j·u_j
            rng.fill_bytes(q);
            if *s {
                q.iter_mut().zip(u.iter()).for_each(|(q, u)| *q ^= *u);
            }
        });

        Ok(CotSenderOutput {
            delta: *delta,
            keys: transpose_rows(qs, count),
        })
    }
}

/// The sender's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    #[derive(Default)]
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The sender's state after base OT setup, ready to extend.
    pub struct Extension {
        /// Global correlation.
        pub(super) delta: Block,
        /// Bits of `Δ`, the sender's base OT choices.
        pub(super) choices: Vec<bool>,
        /// Column PRGs seeded with the chosen base OT keys.
        pub(super) rngs: Vec<Prg>,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
