use crate::{
    base::{
        hash_point,
        msgs::{ReceiverPayload, SenderSetup},
        BaseOtSenderOutput, SenderError,
    },
    TransferId,
};

use cotgen_core::Block;
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[cfg(feature = "rayon")]
use rayon::prelude::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

type Error = SenderError;
type Result<T, E = Error> = core::result::Result<T, E>;

/// A base OT sender.
#[derive(Debug, Default)]
pub struct Sender<T: state::State = state::Initialized> {
    state: T,
}

impl Sender {
    /// Creates a new sender.
    pub fn new() -> Self {
        Self {
            state: state::Initialized::default(),
        }
    }

    /// Creates a new sender with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed used to generate the sender's keys.
    pub fn new_with_seed(seed: [u8; 32]) -> Self {
        let mut rng = ChaCha20Rng::from_seed(seed);

        Self {
            state: state::Initialized::from_private_key(Scalar::random(&mut rng)),
        }
    }

    /// Returns the setup message to be sent to the receiver.
    pub fn setup(self) -> (SenderSetup, Sender<state::Setup>) {
        let state::Initialized {
            private_key,
            public_key,
        } = self.state;

        (
            SenderSetup {
                public_key: public_key.compress(),
            },
            Sender {
                state: state::Setup {
                    private_key,
                    // T = y·S
                    shared: private_key * public_key,
                    transfer_id: TransferId::default(),
                    counter: 0,
                },
            },
        )
    }
}

impl Sender<state::Setup> {
    /// Returns the number of OTs sent so far.
    pub fn counter(&self) -> usize {
        self.state.counter
    }

    /// Computes the key pairs for the receiver's blinded choices.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of OTs the sender expects.
    /// * `payload` - The receiver's blinded choices.
    pub fn send(&mut self, count: usize, payload: ReceiverPayload) -> Result<BaseOtSenderOutput> {
        let state::Setup {
            private_key,
            shared,
            transfer_id,
            counter,
        } = &mut self.state;

        if count == 0 {
            return Err(SenderError::InvalidCount);
        }

        let ReceiverPayload { blinded_choices } = payload;
        if blinded_choices.len() != count {
            return Err(SenderError::CountMismatch {
                expected: count,
                actual: blinded_choices.len(),
            });
        }

        let keys = compute_keys(private_key, shared, &blinded_choices, *counter)?;

        *counter += count;

        Ok(BaseOtSenderOutput {
            id: transfer_id.next(),
            keys,
        })
    }
}

/// Computes the key pairs `(H(i, y·R), H(i, y·R − T))`.
///
/// # Arguments
///
/// * `private_key` - The sender's private key `y`.
/// * `shared` - `T = y·S`.
/// * `blinded_choices` - The receiver's blinded choices `R`.
/// * `offset` - The number of OTs already sent, used as the index offset.
fn compute_keys(
    private_key: &Scalar,
    shared: &RistrettoPoint,
    blinded_choices: &[CompressedRistretto],
    offset: usize,
) -> Result<Vec<[Block; 2]>> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = blinded_choices.par_iter().enumerate();
        } else {
            let iter = blinded_choices.iter().enumerate();
        }
    }

    iter.map(|(i, blinded_choice)| {
        let blinded_choice = blinded_choice
            .decompress()
            .ok_or(SenderError::InvalidPoint(i))?;

        let tweak = (offset + i) as u128;
        let k = private_key * blinded_choice;
        let k0 = hash_point(&k, tweak);
        let k1 = hash_point(&(k - shared), tweak);

        Ok([k0, k1])
    })
    .collect()
}

/// The sender's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Setup {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    pub struct Initialized {
        /// The private key `y`.
        pub(super) private_key: Scalar,
        /// The public key `S = y·G`.
        pub(super) public_key: RistrettoPoint,
    }

    impl Initialized {
        pub(super) fn from_private_key(private_key: Scalar) -> Self {
            Self {
                private_key,
                public_key: &private_key * RISTRETTO_BASEPOINT_TABLE,
            }
        }
    }

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    impl Default for Initialized {
        fn default() -> Self {
            Self::from_private_key(Scalar::random(&mut ChaCha20Rng::from_entropy()))
        }
    }

    /// The sender's state after the setup message is sent.
    pub struct Setup {
        /// The private key `y`.
        pub(super) private_key: Scalar,
        /// `T = y·S`.
        pub(super) shared: RistrettoPoint,
        /// Current transfer id.
        pub(super) transfer_id: TransferId,
        /// Number of OTs sent so far.
        pub(super) counter: usize,
    }

    impl State for Setup {}

    opaque_debug::implement!(Setup);
}
