use crate::{
    alsz::{column_bytes, transpose_rows, Extend, ReceiverConfig, ReceiverError, CSP},
    base::BaseOtSenderOutput,
    correlated::CotReceiverOutput,
    TransferId,
};

use cotgen_core::prg::Prg;
use itybity::FromBitIterator;
use rand::{Rng, SeedableRng};
use rand_core::RngCore;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// ALSZ receiver.
#[derive(Debug, Default)]
pub struct Receiver<T: state::State = state::Initialized> {
    config: ReceiverConfig,
    transfer_id: TransferId,
    state: T,
}

impl<T> Receiver<T>
where
    T: state::State,
{
    /// Returns the receiver's configuration.
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Returns the id of the next extension.
    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }
}

impl Receiver {
    /// Creates a new receiver.
    ///
    /// # Arguments
    ///
    /// * `config` - The receiver's configuration.
    pub fn new(config: ReceiverConfig) -> Self {
        Receiver {
            config,
            transfer_id: TransferId::default(),
            state: state::Initialized {},
        }
    }

    /// Completes the setup phase of the protocol.
    ///
    /// # Arguments
    ///
    /// * `base_output` - The output of `CSP` base OTs in which the receiver
    ///   acted as the sender.
    pub fn setup(
        self,
        base_output: BaseOtSenderOutput,
    ) -> Result<Receiver<state::Extension>, ReceiverError> {
        let BaseOtSenderOutput { keys, .. } = base_output;

        if keys.len() != CSP {
            return Err(ReceiverError::InsufficientSetup {
                expected: CSP,
                actual: keys.len(),
            });
        }

        Ok(Receiver {
            config: self.config,
            transfer_id: self.transfer_id,
            state: state::Extension {
                rngs: keys
                    .into_iter()
                    .map(|seeds| seeds.map(Prg::from_seed))
                    .collect(),
            },
        })
    }
}

impl Receiver<state::Extension> {
    /// Extends `count` COTs with random choice bits.
    ///
    /// Returns the message for the sender together with the receiver's output.
    ///
    /// # Arguments
    ///
    /// * `rng` - RNG used to sample the choice bits.
    /// * `count` - Number of COTs.
    pub fn extend<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
    ) -> Result<(Extend, CotReceiverOutput), ReceiverError> {
        self.check_count(count)?;

        let choices: Vec<bool> = (0..count).map(|_| rng.gen()).collect();

        Ok(self.extend_unchecked(choices))
    }

    /// Extends one COT per provided choice bit.
    ///
    /// Returns the message for the sender together with the receiver's output.
    ///
    /// # Arguments
    ///
    /// * `choices` - The receiver's choice bits.
    pub fn extend_with_choices(
        &mut self,
        choices: &[bool],
    ) -> Result<(Extend, CotReceiverOutput), ReceiverError> {
        self.check_count(choices.len())?;

        Ok(self.extend_unchecked(choices.to_vec()))
    }

    fn check_count(&self, count: usize) -> Result<(), ReceiverError> {
        let max = self.config.max_count();
        if count == 0 || count > max {
            return Err(ReceiverError::InvalidCount { count, max });
        }

        Ok(())
    }

    fn extend_unchecked(&mut self, choices: Vec<bool>) -> (Extend, CotReceiverOutput) {
        let count = choices.len();
        let row_width = column_bytes(count);

        // Packed choice vector `r`.
        let mut r = Vec::<u8>::from_lsb0_iter(choices.iter().copied());
        r.resize(row_width, 0);

        let mut ts = vec![0u8; CSP * row_width];
        let mut columns = vec![vec![0u8; row_width]; CSP];

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                let iter = self.state.rngs
                    .par_iter_mut()
                    .zip(ts.par_chunks_exact_mut(row_width))
                    .zip(columns.par_iter_mut());
            } else {
                let iter = self.state.rngs
                    .iter_mut()
                    .zip(ts.chunks_exact_mut(row_width))
                    .zip(columns.iter_mut());
            }
        }

        iter.for_each(|((rngs, t), u)| {
            // t_j = G(k0_j)
            rngs[0].fill_bytes(t);
            // u_j = t_j ⊕ G(k1_j) ⊕ r
            rngs[1].fill_bytes(u);
            u.iter_mut()
                .zip(t.iter())
                .zip(&r)
                .for_each(|((u, t), r)| *u ^= *t ^ *r);
        });

        let msgs = transpose_rows(ts, count);

        (
            Extend {
                id: self.transfer_id.next(),
                count,
                columns,
            },
            CotReceiverOutput { choices, msgs },
        )
    }
}

/// The receiver's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    #[derive(Default)]
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The receiver's state after base OT setup, ready to extend.
    pub struct Extension {
        /// Column PRGs seeded with both base OT keys.
        pub(super) rngs: Vec<[Prg; 2]>,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
