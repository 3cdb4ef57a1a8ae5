use crate::{
    base::{
        hash_point,
        msgs::{ReceiverPayload, SenderSetup},
        BaseOtReceiverOutput, ReceiverError,
    },
    TransferId,
};

use cotgen_core::Block;
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE,
    ristretto::{CompressedRistretto, RistrettoBasepointTable, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

#[cfg(feature = "rayon")]
use rayon::prelude::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

type Error = ReceiverError;
type Result<T, E = Error> = core::result::Result<T, E>;

/// A base OT receiver.
#[derive(Debug, Default)]
pub struct Receiver<T: state::State = state::Initialized> {
    state: T,
}

impl Receiver {
    /// Creates a new receiver.
    pub fn new() -> Self {
        Self {
            state: state::Initialized::default(),
        }
    }

    /// Creates a new receiver with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed used to generate the receiver's keys.
    pub fn new_with_seed(seed: [u8; 32]) -> Self {
        Self {
            state: state::Initialized {
                rng: ChaCha20Rng::from_seed(seed),
            },
        }
    }

    /// Sets up the receiver.
    ///
    /// # Arguments
    ///
    /// * `sender_setup` - The sender's setup message.
    pub fn setup(self, sender_setup: SenderSetup) -> Result<Receiver<state::Setup>> {
        let state::Initialized { rng } = self.state;

        let public_key = sender_setup
            .public_key
            .decompress()
            .ok_or(ReceiverError::InvalidPoint)?;

        Ok(Receiver {
            state: state::Setup {
                rng,
                public_key,
                sender_base_table: RistrettoBasepointTable::create(&public_key),
                transfer_id: TransferId::default(),
                counter: 0,
            },
        })
    }
}

impl Receiver<state::Setup> {
    /// Returns the number of OTs received so far.
    pub fn counter(&self) -> usize {
        self.state.counter
    }

    /// Blinds the choices and derives the chosen keys.
    ///
    /// Returns the payload for the sender together with the receiver's
    /// output.
    ///
    /// # Arguments
    ///
    /// * `choices` - The receiver's choice bits.
    pub fn receive(&mut self, choices: &[bool]) -> Result<(ReceiverPayload, BaseOtReceiverOutput)> {
        let state::Setup {
            rng,
            public_key,
            sender_base_table,
            transfer_id,
            counter,
        } = &mut self.state;

        if choices.is_empty() {
            return Err(ReceiverError::InvalidCount);
        }

        let private_keys = (0..choices.len())
            .map(|_| Scalar::random(rng))
            .collect::<Vec<_>>();

        let (blinded_choices, keys) = compute_keys(
            public_key,
            sender_base_table,
            &private_keys,
            choices,
            *counter,
        );

        *counter += choices.len();

        Ok((
            ReceiverPayload { blinded_choices },
            BaseOtReceiverOutput {
                id: transfer_id.next(),
                choices: choices.to_vec(),
                keys,
            },
        ))
    }
}

/// Computes the blinded choices `R = x·G + c·S` and the keys `H(i, x·S)`.
///
/// # Arguments
///
/// * `public_key` - The sender's public key `S`.
/// * `base_table` - A basepoint table for `S`.
/// * `private_keys` - The receiver's private keys `x`.
/// * `choices` - The receiver's choice bits.
/// * `offset` - The number of OTs already received, used as the index offset.
fn compute_keys(
    public_key: &RistrettoPoint,
    base_table: &RistrettoBasepointTable,
    private_keys: &[Scalar],
    choices: &[bool],
    offset: usize,
) -> (Vec<CompressedRistretto>, Vec<Block>) {
    let identity = RistrettoPoint::identity();

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = private_keys.par_iter().zip(choices.par_iter()).enumerate();
        } else {
            let iter = private_keys.iter().zip(choices.iter()).enumerate();
        }
    }

    iter.map(|(i, (x, c))| {
        // A point is added for either choice to avoid branching on the
        // computation.
        let offset_point = if *c { public_key } else { &identity };
        let blinded_choice = x * RISTRETTO_BASEPOINT_TABLE + offset_point;

        let key = hash_point(&(x * base_table), (offset + i) as u128);

        (blinded_choice.compress(), key)
    })
    .unzip()
}

/// The receiver's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Setup {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    pub struct Initialized {
        pub(super) rng: ChaCha20Rng,
    }

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    impl Default for Initialized {
        fn default() -> Self {
            Self {
                rng: ChaCha20Rng::from_entropy(),
            }
        }
    }

    /// The receiver's state after setup.
    pub struct Setup {
        pub(super) rng: ChaCha20Rng,
        /// The sender's public key `S`.
        pub(super) public_key: RistrettoPoint,
        /// A basepoint table for `S`.
        pub(super) sender_base_table: RistrettoBasepointTable,
        /// Current transfer id.
        pub(super) transfer_id: TransferId,
        /// Number of OTs received so far.
        pub(super) counter: usize,
    }

    impl State for Setup {}

    opaque_debug::implement!(Setup);
}
