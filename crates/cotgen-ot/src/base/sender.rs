use cotgen_common::{Context, ContextError};
use cotgen_ot_core::base::{
    msgs::ReceiverPayload, sender_state as state, BaseOtSenderOutput, Sender as Core,
    SenderError as CoreError,
};

use crate::{ClassifyError, ErrorKind};

type Error = SenderError;

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

/// Base OT sender.
#[derive(Debug)]
pub struct Sender {
    state: State,
}

impl Default for Sender {
    fn default() -> Self {
        Self::new()
    }
}

impl Sender {
    /// Creates a new sender.
    pub fn new() -> Self {
        Self {
            state: State::Created { seed: None },
        }
    }

    /// Creates a new sender with the provided RNG seed.
    pub fn new_with_seed(seed: [u8; 32]) -> Self {
        Self {
            state: State::Created { seed: Some(seed) },
        }
    }

    /// Initializes the sender.
    ///
    /// This samples the sender's key pair and does not communicate with the
    /// receiver.
    pub fn init(&mut self) -> Result<(), Error> {
        let State::Created { seed } = &self.state else {
            return Err(Error::state("sender is already initialized"));
        };

        let core = match seed {
            Some(seed) => Core::new_with_seed(*seed),
            None => Core::new(),
        };

        self.state = State::Initialized(core);

        Ok(())
    }

    /// Obliviously sends `num` random key pairs.
    ///
    /// The first call also sends the setup message.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `num` - Number of OTs.
    #[tracing::instrument(level = "debug", skip_all, fields(num = num), err)]
    pub fn send(&mut self, ctx: &mut Context, num: usize) -> Result<BaseOtSenderOutput, Error> {
        if num == 0 {
            return Err(Error::from(CoreError::InvalidCount));
        }

        let mut sender = match self.state.take() {
            State::Initialized(sender) => {
                let (setup, sender) = sender.setup();
                ctx.send(setup)?;
                tracing::debug!("sent setup");
                sender
            }
            State::Setup(sender) => sender,
            state @ State::Created { .. } => {
                self.state = state;
                return Err(Error::state("sender is not initialized"));
            }
            State::Error => return Err(Error::state("sender is in an error state")),
        };

        let payload: ReceiverPayload = ctx.expect_next()?;
        let output = sender.send(num, payload)?;

        tracing::debug!(id = %output.id, "sent base OTs");

        self.state = State::Setup(sender);

        Ok(output)
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
            ErrorRepr::Core(CoreError::InvalidCount) => ErrorKind::Parameter,
            ErrorRepr::Core(_) | ErrorRepr::Context(_) => ErrorKind::Abort,
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

impl From<ContextError> for SenderError {
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
