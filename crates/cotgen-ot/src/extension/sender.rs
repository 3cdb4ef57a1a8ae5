use cotgen_common::{Context, ContextError};
use cotgen_core::Block;
use cotgen_ot_core::{
    alsz::{
        sender_state as state, Extend, Sender as Core, SenderConfig, SenderError as CoreError, CSP,
    },
    BaseOtReceiverOutput, CotSenderOutput,
};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rand_core::SeedableRng;

use crate::{base, ClassifyError, CotSender, ErrorKind};

type Error = SenderError;

#[derive(Debug)]
enum State {
    Initialized {
        sender: Core<state::Initialized>,
        delta: Block,
    },
    Extension(Core<state::Extension>),
    Error,
}

impl State {
    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Error)
    }
}

/// COT extension sender.
///
/// Holds the global correlation `Δ` for the lifetime of the session.
#[derive(Debug)]
pub struct Sender {
    state: State,
    rng: ChaCha12Rng,
}

impl Sender {
    /// Creates a new sender.
    ///
    /// # Arguments
    ///
    /// * `config` - The sender's configuration.
    /// * `delta` - Global COT correlation.
    pub fn new(config: SenderConfig, delta: Block) -> Self {
        Self::with_rng(config, delta, ChaCha12Rng::from_entropy())
    }

    /// Creates a new sender whose base OTs are seeded with `seed`.
    pub fn new_with_seed(config: SenderConfig, delta: Block, seed: [u8; 32]) -> Self {
        Self::with_rng(config, delta, ChaCha12Rng::from_seed(seed))
    }

    fn with_rng(config: SenderConfig, delta: Block, rng: ChaCha12Rng) -> Self {
        Self {
            state: State::Initialized {
                sender: Core::new(config),
                delta,
            },
            rng,
        }
    }

    /// Returns the global correlation `Δ`.
    pub fn delta(&self) -> Option<Block> {
        match &self.state {
            State::Initialized { delta, .. } => Some(*delta),
            State::Extension(sender) => Some(sender.delta()),
            State::Error => None,
        }
    }

    /// Initializes the sender with the output of externally executed base
    /// OTs.
    ///
    /// The base OT choice bits must be the bits of `Δ`.
    ///
    /// # Arguments
    ///
    /// * `base_output` - The output of `CSP` base OTs in which the sender
    ///   acted as the receiver.
    pub fn init(&mut self, base_output: BaseOtReceiverOutput) -> Result<(), Error> {
        let State::Initialized { delta, .. } = &self.state else {
            return Err(Error::state("sender is already set up"));
        };

        if base_output.keys.len() != CSP
            || Block::from_lsb0_iter(base_output.choices.iter().copied()) != Some(*delta)
        {
            return Err(Error::from(ErrorRepr::InvalidBase));
        }

        let State::Initialized { sender, .. } = self.state.take() else {
            return Err(Error::state("sender is already set up"));
        };

        self.state = State::Extension(sender.setup(base_output)?);

        Ok(())
    }

    /// Performs the base OTs with the peer and initializes the sender.
    #[tracing::instrument(level = "debug", skip_all, err)]
    pub fn setup(&mut self, ctx: &mut Context) -> Result<(), Error> {
        let State::Initialized { delta, .. } = &self.state else {
            return Err(Error::state("sender is already set up"));
        };

        let choices = delta.to_lsb0_vec();

        let mut base = base::Receiver::new_with_seed(self.rng.gen());
        base.init()?;
        let base_output = match base.receive(ctx, &choices) {
            Ok(output) => output,
            Err(err) => {
                self.state = State::Error;
                return Err(err.into());
            }
        };

        tracing::debug!(id = %base_output.id, "base OTs complete");

        self.init(base_output)
    }

    /// Executes an extension of `num` COTs.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `num` - Number of COTs.
    #[tracing::instrument(level = "debug", skip_all, fields(num = num), err)]
    pub fn execute(&mut self, ctx: &mut Context, num: usize) -> Result<CotSenderOutput, Error> {
        match &self.state {
            State::Extension(sender) => {
                let max = sender.config().max_count();
                if num == 0 || num > max {
                    return Err(Error::from(CoreError::InvalidCount { count: num, max }));
                }
            }
            State::Initialized { .. } => return Err(Error::state("sender is not set up")),
            State::Error => return Err(Error::state("sender is in an error state")),
        }

        let State::Extension(mut sender) = self.state.take() else {
            return Err(Error::state("sender is not set up"));
        };

        let extend: Extend = ctx.expect_next()?;
        let output = sender.extend(num, extend)?;

        tracing::debug!(id = %sender.transfer_id(), "extension complete");

        self.state = State::Extension(sender);

        Ok(output)
    }
}

impl CotSender for Sender {
    type Error = Error;

    fn setup(&mut self, ctx: &mut Context) -> Result<(), Error> {
        Sender::setup(self, ctx)
    }

    fn delta(&self) -> Option<Block> {
        Sender::delta(self)
    }

    fn send_cot(&mut self, ctx: &mut Context, count: usize) -> Result<CotSenderOutput, Error> {
        self.execute(ctx, count)
    }
}

/// Error for [`Sender`].
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct SenderError(#[from] ErrorRepr);

impl SenderError {
    fn state(msg: impl Into<String>) -> Self {
        Self(ErrorRepr::State(msg.into()))
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            ErrorRepr::Core(CoreError::InvalidCount { .. }) | ErrorRepr::InvalidBase => {
                ErrorKind::Parameter
            }
            ErrorRepr::Core(_) | ErrorRepr::BaseOt(_) | ErrorRepr::Context(_) => ErrorKind::Abort,
            ErrorRepr::State(_) => ErrorKind::State,
        }
    }
}

impl ClassifyError for SenderError {
    fn kind(&self) -> ErrorKind {
        SenderError::kind(self)
    }
}

impl From<CoreError> for SenderError {
    fn from(err: CoreError) -> Self {
        Self(ErrorRepr::Core(err))
    }
}

impl From<base::ReceiverError> for SenderError {
    fn from(err: base::ReceiverError) -> Self {
        Self(ErrorRepr::BaseOt(err))
    }
}

impl From<ContextError> for SenderError {
    fn from(err: ContextError) -> Self {
        Self(ErrorRepr::Context(err))
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("core error: {0}")]
    Core(CoreError),
    #[error("base OT error: {0}")]
    BaseOt(base::ReceiverError),
    #[error("base OT output does not match delta")]
    InvalidBase,
    #[error("state error: {0}")]
    State(String),
    #[error("context error: {0}")]
    Context(ContextError),
}
