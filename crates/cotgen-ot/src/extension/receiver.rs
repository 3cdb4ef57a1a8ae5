use cotgen_common::{Context, ContextError};
use cotgen_ot_core::{
    alsz::{
        receiver_state as state, Receiver as Core, ReceiverConfig, ReceiverError as CoreError,
        CSP,
    },
    BaseOtSenderOutput, CotReceiverOutput,
};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rand_core::SeedableRng;

use crate::{base, ClassifyError, CotReceiver, ErrorKind};

type Error = ReceiverError;

#[derive(Debug)]
enum State {
    Initialized(Core<state::Initialized>),
    Extension(Core<state::Extension>),
    Error,
}

impl State {
    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Error)
    }
}

/// COT extension receiver.
#[derive(Debug)]
pub struct Receiver {
    state: State,
    rng: ChaCha12Rng,
}

impl Receiver {
    /// Creates a new receiver.
    ///
    /// # Arguments
    ///
    /// * `config` - The receiver's configuration.
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            state: State::Initialized(Core::new(config)),
            rng: ChaCha12Rng::from_entropy(),
        }
    }

    /// Creates a new receiver whose base OTs and choice bits are sampled from
    /// `seed`.
    pub fn new_with_seed(config: ReceiverConfig, seed: [u8; 32]) -> Self {
        Self {
            state: State::Initialized(Core::new(config)),
            rng: ChaCha12Rng::from_seed(seed),
        }
    }

    /// Initializes the receiver with the output of externally executed base
    /// OTs.
    ///
    /// # Arguments
    ///
    /// * `base_output` - The output of `CSP` base OTs in which the receiver
    ///   acted as the sender.
    pub fn init(&mut self, base_output: BaseOtSenderOutput) -> Result<(), Error> {
        if !matches!(self.state, State::Initialized(_)) {
            return Err(Error::state("receiver is already set up"));
        }

        if base_output.keys.len() != CSP {
            return Err(Error::from(CoreError::InsufficientSetup {
                expected: CSP,
                actual: base_output.keys.len(),
            }));
        }

        let State::Initialized(receiver) = self.state.take() else {
            return Err(Error::state("receiver is already set up"));
        };

        self.state = State::Extension(receiver.setup(base_output)?);

        Ok(())
    }

    /// Performs the base OTs with the peer and initializes the receiver.
    #[tracing::instrument(level = "debug", skip_all, err)]
    pub fn setup(&mut self, ctx: &mut Context) -> Result<(), Error> {
        if !matches!(self.state, State::Initialized(_)) {
            return Err(Error::state("receiver is already set up"));
        }

        let mut base = base::Sender::new_with_seed(self.rng.gen());
        base.init()?;
        let base_output = match base.send(ctx, CSP) {
            Ok(output) => output,
            Err(err) => {
                self.state = State::Error;
                return Err(err.into());
            }
        };

        tracing::debug!(id = %base_output.id, "base OTs complete");

        self.init(base_output)
    }

    /// Executes an extension of `num` COTs with random choice bits.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `num` - Number of COTs.
    #[tracing::instrument(level = "debug", skip_all, fields(num = num), err)]
    pub fn execute(&mut self, ctx: &mut Context, num: usize) -> Result<CotReceiverOutput, Error> {
        let mut receiver = self.take_ready(num)?;

        let (extend, output) = receiver.extend(&mut self.rng, num)?;
        ctx.send(extend)?;

        tracing::debug!(id = %receiver.transfer_id(), "extension complete");

        self.state = State::Extension(receiver);

        Ok(output)
    }

    /// Executes an extension of one COT per provided choice bit.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `choices` - The receiver's choice bits.
    #[tracing::instrument(level = "debug", skip_all, fields(num = choices.len()), err)]
    pub fn execute_with_choices(
        &mut self,
        ctx: &mut Context,
        choices: &[bool],
    ) -> Result<CotReceiverOutput, Error> {
        let mut receiver = self.take_ready(choices.len())?;

        let (extend, output) = receiver.extend_with_choices(choices)?;
        ctx.send(extend)?;

        self.state = State::Extension(receiver);

        Ok(output)
    }

    /// Checks the request before taking the receiver out of its state.
    fn take_ready(&mut self, num: usize) -> Result<Core<state::Extension>, Error> {
        match &self.state {
            State::Extension(receiver) => {
                let max = receiver.config().max_count();
                if num == 0 || num > max {
                    return Err(Error::from(CoreError::InvalidCount { count: num, max }));
                }
            }
            State::Initialized(_) => return Err(Error::state("receiver is not set up")),
            State::Error => return Err(Error::state("receiver is in an error state")),
        }

        match self.state.take() {
            State::Extension(receiver) => Ok(receiver),
            _ => Err(Error::state("receiver is not set up")),
        }
    }
}

impl CotReceiver for Receiver {
    type Error = Error;

    fn setup(&mut self, ctx: &mut Context) -> Result<(), Error> {
        Receiver::setup(self, ctx)
    }

    fn receive_cot(&mut self, ctx: &mut Context, count: usize) -> Result<CotReceiverOutput, Error> {
        self.execute(ctx, count)
    }
}

/// Error for [`Receiver`].
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReceiverError(#[from] ErrorRepr);

impl ReceiverError {
    fn state(msg: impl Into<String>) -> Self {
        Self(ErrorRepr::State(msg.into()))
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            ErrorRepr::Core(_) => ErrorKind::Parameter,
            ErrorRepr::BaseOt(_) | ErrorRepr::Context(_) => ErrorKind::Abort,
            ErrorRepr::State(_) => ErrorKind::State,
        }
    }
}

impl ClassifyError for ReceiverError {
    fn kind(&self) -> ErrorKind {
        ReceiverError::kind(self)
    }
}

impl From<CoreError> for ReceiverError {
    fn from(err: CoreError) -> Self {
        Self(ErrorRepr::Core(err))
    }
}

impl From<base::SenderError> for ReceiverError {
    fn from(err: base::SenderError) -> Self {
        Self(ErrorRepr::BaseOt(err))
    }
}

impl From<ContextError> for ReceiverError {
    fn from(err: ContextError) -> Self {
        Self(ErrorRepr::Context(err))
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("core error: {0}")]
    Core(CoreError),
    #[error("base OT error: {0}")]
    BaseOt(base::SenderError),
    #[error("state error: {0}")]
    State(String),
    #[error("context error: {0}")]
    Context(ContextError),
}
