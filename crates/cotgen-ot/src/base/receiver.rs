use cotgen_common::{Context, ContextError};
use cotgen_ot_core::base::{
    msgs::SenderSetup, receiver_state as state, BaseOtReceiverOutput, Receiver as Core,
    ReceiverError as CoreError,
};

use crate::{ClassifyError, ErrorKind};

type Error = ReceiverError;

#[derive(Debug)]
enum State {
    Created { seed: Option<[u8; 32]> },
    Initialized(Core<state::Initialized>),
    Setup(Core<state::Setup>),
    Error,
}

impl State {
    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Error)
    }
}

/// Base OT receiver.
#[derive(Debug)]
pub struct Receiver {
    state: State,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    /// Creates a new receiver.
    pub fn new() -> Self {
        Self {
            state: State::Created { seed: None },
        }
    }

    /// Creates a new receiver with the provided RNG seed.
    pub fn new_with_seed(seed: [u8; 32]) -> Self {
        Self {
            state: State::Created { seed: Some(seed) },
        }
    }

    /// Initializes the receiver.
    pub fn init(&mut self) -> Result<(), Error> {
        let State::Created { seed } = &self.state else {
            return Err(Error::state("receiver is already initialized"));
        };

        let core = match seed {
            Some(seed) => Core::new_with_seed(*seed),
            None => Core::new(),
        };

        self.state = State::Initialized(core);

        Ok(())
    }

    /// Obliviously receives one key per choice bit.
    ///
    /// The first call also receives the sender's setup message.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `choices` - The receiver's choice bits.
    #[tracing::instrument(level = "debug", skip_all, fields(num = choices.len()), err)]
    pub fn receive(
        &mut self,
        ctx: &mut Context,
        choices: &[bool],
    ) -> Result<BaseOtReceiverOutput, Error> {
        if choices.is_empty() {
            return Err(Error::from(CoreError::InvalidCount));
        }

        let mut receiver = match self.state.take() {
            State::Initialized(receiver) => {
                let setup: SenderSetup = ctx.expect_next()?;
                tracing::debug!("received setup");
                receiver.setup(setup)?
            }
            State::Setup(receiver) => receiver,
            state @ State::Created { .. } => {
                self.state = state;
                return Err(Error::state("receiver is not initialized"));
            }
            State::Error => return Err(Error::state("receiver is in an error state")),
        };

        let (payload, output) = receiver.receive(choices)?;
        ctx.send(payload)?;

        tracing::debug!(id = %output.id, "received base OTs");

        self.state = State::Setup(receiver);

        Ok(output)
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
            ErrorRepr::Core(CoreError::InvalidCount) => ErrorKind::Parameter,
            ErrorRepr::Core(_) | ErrorRepr::Context(_) => ErrorKind::Abort,
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

impl From<ContextError> for ReceiverError {
    fn from(err: ContextError) -> Self {
        Self(ErrorRepr::Context(err))
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("core error: {0}")]
    Core(CoreError),
    #[error("state error: {0}")]
    State(String),
    #[error("context error: {0}")]
    Context(ContextError),
}
