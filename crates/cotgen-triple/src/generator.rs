use cotgen_common::Context;
use cotgen_core::{
    buffer::{Buffer, BufferError},
    Block,
};
use cotgen_ot::{extension, ClassifyError, CotReceiver, CotSender, ErrorKind};
use cotgen_triple_core::{combine, receiver_half, sender_half, TripleError, Z2Triple};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rand_core::SeedableRng;

use crate::{GeneratorConfig, TripleGenerator};

type Error = GeneratorError;

/// The role of a party in triple generation.
///
/// The two parties must take different roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// COT sender in the first execution of each round.
    Leader,
    /// COT receiver in the first execution of each round.
    Follower,
}

#[derive(Debug)]
enum State<S, R> {
    Created { sender: S, receiver: R },
    Ready(Ready<S, R>),
    Error,
}

impl<S, R> State<S, R> {
    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Error)
    }
}

#[derive(Debug)]
struct Ready<S, R> {
    sender: S,
    receiver: R,
    /// Number of triples per round.
    each_num: usize,
    round: u64,
    buffer: Z2Triple,
}

impl<S, R> Ready<S, R>
where
    S: CotSender,
    R: CotReceiver,
{
    /// Runs both executions of a round and buffers the derived triples.
    ///
    /// A failure of the second execution is an abort, as the first one
    /// already consumed correlated randomness with the peer.
    fn round(&mut self, ctx: &mut Context, role: Role) -> Result<(), Error> {
        let count = self.each_num;

        let (sender_output, receiver_output) = match role {
            Role::Leader => {
                let sender_output = self.sender.send_cot(ctx, count).map_err(Error::cot)?;
                let receiver_output = self
                    .receiver
                    .receive_cot(ctx, count)
                    .map_err(Error::interrupted)?;
                (sender_output, receiver_output)
            }
            Role::Follower => {
                let receiver_output = self.receiver.receive_cot(ctx, count).map_err(Error::cot)?;
                let sender_output = self
                    .sender
                    .send_cot(ctx, count)
                    .map_err(Error::interrupted)?;
                (sender_output, receiver_output)
            }
        };

        let triple = combine(
            sender_half(self.round, &sender_output),
            receiver_half(self.round, &receiver_output),
        )?;

        tracing::debug!(round = self.round, num = count, "generated round");

        self.round += 1;
        self.buffer.merge(triple)?;

        Ok(())
    }
}

/// Boolean triple generator built from a pair of COT engines.
#[derive(Debug)]
pub struct Generator<S, R> {
    config: GeneratorConfig,
    role: Role,
    state: State<S, R>,
}

impl<S, R> Generator<S, R>
where
    S: CotSender,
    R: CotReceiver,
{
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `config` - Generator configuration.
    /// * `role` - The party's role.
    /// * `sender` - COT sender, paired with the peer's receiver.
    /// * `receiver` - COT receiver, paired with the peer's sender.
    pub fn new(config: GeneratorConfig, role: Role, sender: S, receiver: R) -> Self {
        Self {
            config,
            role,
            state: State::Created { sender, receiver },
        }
    }

    /// Returns the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the party's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the number of buffered triples.
    pub fn available(&self) -> usize {
        match &self.state {
            State::Ready(ready) => ready.buffer.len(),
            State::Created { .. } | State::Error => 0,
        }
    }

    /// Sets up both COT engines with the peer.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `expected_total` - Expected number of triples, which caps the size
    ///   of each round below the configured maximum.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(role = ?self.role, expected_total = expected_total),
        err
    )]
    pub fn init(&mut self, ctx: &mut Context, expected_total: usize) -> Result<(), Error> {
        if !matches!(self.state, State::Created { .. }) {
            return Err(Error::state("generator is already initialized"));
        }

        if expected_total == 0 {
            return Err(Error::parameter("expected total must be greater than zero"));
        }

        if self.config.max_round() == 0 {
            return Err(Error::parameter("max round must be greater than zero"));
        }

        let State::Created {
            mut sender,
            mut receiver,
        } = self.state.take()
        else {
            return Err(Error::state("generator is already initialized"));
        };

        match self.role {
            Role::Leader => {
                sender.setup(ctx).map_err(Error::cot)?;
                receiver.setup(ctx).map_err(Error::cot)?;
            }
            Role::Follower => {
                receiver.setup(ctx).map_err(Error::cot)?;
                sender.setup(ctx).map_err(Error::cot)?;
            }
        }

        let each_num = self.config.max_round().min(expected_total);

        tracing::debug!(each_num, "initialized");

        self.state = State::Ready(Ready {
            sender,
            receiver,
            each_num,
            round: 0,
            buffer: Z2Triple::default(),
        });

        Ok(())
    }

    /// Generates shares of exactly `num` triples.
    ///
    /// Rounds are run until enough triples are buffered. The excess is kept
    /// for later calls unless `carry_over` is disabled.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `num` - Number of triples.
    #[tracing::instrument(level = "debug", skip_all, fields(role = ?self.role, num = num), err)]
    pub fn generate(&mut self, ctx: &mut Context, num: usize) -> Result<Z2Triple, Error> {
        if num == 0 {
            return Err(Error::parameter("number of triples must be greater than zero"));
        }

        match &self.state {
            State::Ready(_) => {}
            State::Created { .. } => return Err(Error::state("generator is not initialized")),
            State::Error => return Err(Error::state("generator is in an error state")),
        }

        let State::Ready(mut ready) = self.state.take() else {
            return Err(Error::state("generator is not initialized"));
        };

        while ready.buffer.len() < num {
            if let Err(err) = ready.round(ctx, self.role) {
                // Rejected by a COT engine before anything was sent.
                if err.kind() != ErrorKind::Abort {
                    self.state = State::Ready(ready);
                }
                return Err(err);
            }
        }

        let triple = if self.config.carry_over() {
            ready.buffer.take(num)?
        } else {
            ready.buffer.reduce(num)?;
            std::mem::take(&mut ready.buffer)
        };

        self.state = State::Ready(ready);

        Ok(triple)
    }
}

impl<S, R> TripleGenerator for Generator<S, R>
where
    S: CotSender,
    R: CotReceiver,
{
    type Error = Error;

    fn init(&mut self, ctx: &mut Context, expected_total: usize) -> Result<(), Error> {
        Generator::init(self, ctx, expected_total)
    }

    fn generate(&mut self, ctx: &mut Context, num: usize) -> Result<Z2Triple, Error> {
        Generator::generate(self, ctx, num)
    }
}

/// Triple generator over ALSZ COT extension.
pub type AlszGenerator = Generator<extension::Sender, extension::Receiver>;

impl AlszGenerator {
    /// Creates a new generator over ALSZ engines.
    ///
    /// The global correlation and all engine randomness are sampled from
    /// the system's entropy source. The base OTs run during `init`.
    pub fn new_alsz(config: GeneratorConfig, role: Role) -> Self {
        Self::alsz_from_rng(config, role, ChaCha12Rng::from_entropy())
    }

    /// Creates a new generator over ALSZ engines with all randomness derived
    /// from `seed`.
    pub fn new_alsz_with_seed(config: GeneratorConfig, role: Role, seed: [u8; 32]) -> Self {
        Self::alsz_from_rng(config, role, ChaCha12Rng::from_seed(seed))
    }

    fn alsz_from_rng(config: GeneratorConfig, role: Role, mut rng: ChaCha12Rng) -> Self {
        let delta: Block = rng.gen();
        let sender =
            extension::Sender::new_with_seed(extension::SenderConfig::default(), delta, rng.gen());
        let receiver =
            extension::Receiver::new_with_seed(extension::ReceiverConfig::default(), rng.gen());

        Self::new(config, role, sender, receiver)
    }
}

/// Error for [`Generator`].
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct GeneratorError(#[from] ErrorRepr);

impl GeneratorError {
    fn cot<E: ClassifyError>(err: E) -> Self {
        Self(ErrorRepr::Cot(Box::new(err)))
    }

    fn interrupted<E: ClassifyError>(err: E) -> Self {
        Self(ErrorRepr::Interrupted(Box::new(err)))
    }

    fn parameter(msg: impl Into<String>) -> Self {
        Self(ErrorRepr::Parameter(msg.into()))
    }

    fn state(msg: impl Into<String>) -> Self {
        Self(ErrorRepr::State(msg.into()))
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            ErrorRepr::Cot(err) => err.kind(),
            ErrorRepr::Interrupted(_) | ErrorRepr::Triple(_) | ErrorRepr::Buffer(_) => {
                ErrorKind::Abort
            }
            ErrorRepr::Parameter(_) => ErrorKind::Parameter,
            ErrorRepr::State(_) => ErrorKind::State,
        }
    }
}

impl ClassifyError for GeneratorError {
    fn kind(&self) -> ErrorKind {
        GeneratorError::kind(self)
    }
}

impl From<TripleError> for GeneratorError {
    fn from(err: TripleError) -> Self {
        Self(ErrorRepr::Triple(err))
    }
}

impl From<BufferError> for GeneratorError {
    fn from(err: BufferError) -> Self {
        Self(ErrorRepr::Buffer(err))
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("cot error: {0}")]
    Cot(Box<dyn ClassifyError>),
    #[error("cot error within a round: {0}")]
    Interrupted(Box<dyn ClassifyError>),
    #[error("triple error: {0}")]
    Triple(TripleError),
    #[error("buffer error: {0}")]
    Buffer(BufferError),
    #[error("invalid argument: {0}")]
    Parameter(String),
    #[error("state error: {0}")]
    State(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::test_triple_generator;

    use cotgen_common::context::test_context;
    use cotgen_ot::ideal::{ideal_cot, IdealCotReceiver, IdealCotSender};
    use cotgen_triple_core::test::assert_triple;
    use rstest::*;

    type IdealGenerator = Generator<IdealCotSender, IdealCotReceiver>;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn ideal_generators(config: GeneratorConfig) -> (IdealGenerator, IdealGenerator) {
        let (sender_0, receiver_1) = ideal_cot([0u8; 16]);
        let (sender_1, receiver_0) = ideal_cot([1u8; 16]);

        (
            Generator::new(config.clone(), Role::Leader, sender_0, receiver_0),
            Generator::new(config, Role::Follower, sender_1, receiver_1),
        )
    }

    fn alsz_generators(config: GeneratorConfig) -> (AlszGenerator, AlszGenerator) {
        (
            AlszGenerator::new_alsz_with_seed(config.clone(), Role::Leader, [0u8; 32]),
            AlszGenerator::new_alsz_with_seed(config, Role::Follower, [1u8; 32]),
        )
    }

    fn config(max_round: usize, carry_over: bool) -> GeneratorConfig {
        GeneratorConfig::builder()
            .max_round(max_round)
            .carry_over(carry_over)
            .build()
            .unwrap()
    }

    #[test]
    fn test_alsz_generator() {
        init_tracing();

        let (mut gen_0, mut gen_1) = alsz_generators(config(300, true));

        test_triple_generator(&mut gen_0, &mut gen_1, 1000, &[1000, 1, 999, 2500]);
    }

    #[test]
    fn test_ideal_cot_generator() {
        let (mut gen_0, mut gen_1) = ideal_generators(GeneratorConfig::default());

        test_triple_generator(&mut gen_0, &mut gen_1, 5000, &[5000]);
    }

    #[rstest]
    #[case::ideal(false)]
    #[case::alsz(true)]
    fn test_round_batching_transparency(#[case] alsz: bool) {
        let config = config(256, true);

        let (split_0, split_1, once_0, once_1) = if alsz {
            let (mut gen_0, mut gen_1) = alsz_generators(config.clone());
            let (split_0, split_1) =
                test_triple_generator(&mut gen_0, &mut gen_1, 1150, &[700, 450]);

            let (mut gen_0, mut gen_1) = alsz_generators(config);
            let (once_0, once_1) =
                test_triple_generator(&mut gen_0, &mut gen_1, 1150, &[1150]);

            (split_0, split_1, once_0, once_1)
        } else {
            let (mut gen_0, mut gen_1) = ideal_generators(config.clone());
            let (split_0, split_1) =
                test_triple_generator(&mut gen_0, &mut gen_1, 1150, &[700, 450]);

            let (mut gen_0, mut gen_1) = ideal_generators(config);
            let (once_0, once_1) =
                test_triple_generator(&mut gen_0, &mut gen_1, 1150, &[1150]);

            (split_0, split_1, once_0, once_1)
        };

        assert_eq!(split_0, once_0);
        assert_eq!(split_1, once_1);
    }

    #[test]
    fn test_carry_over() {
        let (mut gen_0, mut gen_1) = ideal_generators(config(64, true));

        test_triple_generator(&mut gen_0, &mut gen_1, 100, &[100]);

        // Two rounds of 64 were generated.
        assert_eq!(gen_0.available(), 28);
        assert_eq!(gen_1.available(), 28);
    }

    #[test]
    fn test_no_carry_over() {
        let (mut gen_0, mut gen_1) = ideal_generators(config(64, false));

        test_triple_generator(&mut gen_0, &mut gen_1, 100, &[100, 10]);

        assert_eq!(gen_0.available(), 0);
        assert_eq!(gen_1.available(), 0);
    }

    #[test]
    fn test_generator_errors() {
        let (mut gen_0, mut gen_1) = ideal_generators(GeneratorConfig::default());
        let (mut ctx_0, mut ctx_1) = test_context(8);

        assert_eq!(
            gen_0.generate(&mut ctx_0, 10).unwrap_err().kind(),
            ErrorKind::State
        );
        assert_eq!(
            gen_0.init(&mut ctx_0, 0).unwrap_err().kind(),
            ErrorKind::Parameter
        );

        // Ideal COT setup does not communicate.
        gen_0.init(&mut ctx_0, 100).unwrap();
        gen_1.init(&mut ctx_1, 100).unwrap();

        assert_eq!(
            gen_0.init(&mut ctx_0, 100).unwrap_err().kind(),
            ErrorKind::State
        );
        assert_eq!(
            gen_0.init(&mut ctx_0, 0).unwrap_err().kind(),
            ErrorKind::State
        );
        assert_eq!(
            gen_0.generate(&mut ctx_0, 0).unwrap_err().kind(),
            ErrorKind::Parameter
        );

        let (triple_0, triple_1) = std::thread::scope(|s| {
            let handle = s.spawn(|| gen_0.generate(&mut ctx_0, 10).unwrap());
            let triple_1 = gen_1.generate(&mut ctx_1, 10).unwrap();
            (handle.join().unwrap(), triple_1)
        });
        assert_triple(&triple_0, &triple_1);
    }

    #[test]
    fn test_zero_max_round() {
        let (mut gen_0, _) = ideal_generators(config(0, true));
        let (mut ctx_0, _) = test_context(8);

        assert_eq!(
            gen_0.init(&mut ctx_0, 100).unwrap_err().kind(),
            ErrorKind::Parameter
        );

        // The generator is unchanged.
        assert_eq!(
            gen_0.generate(&mut ctx_0, 10).unwrap_err().kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn test_round_above_cot_limit() {
        let limited_generator = |role: Role, seed: u8| {
            let mut rng = ChaCha12Rng::from_seed([seed; 32]);
            let sender = extension::Sender::new_with_seed(
                extension::SenderConfig::builder()
                    .max_count(64)
                    .build()
                    .unwrap(),
                rng.gen(),
                rng.gen(),
            );
            let receiver = extension::Receiver::new_with_seed(
                extension::ReceiverConfig::builder()
                    .max_count(64)
                    .build()
                    .unwrap(),
                rng.gen(),
            );
            Generator::new(config(100, true), role, sender, receiver)
        };

        let mut gen_0 = limited_generator(Role::Leader, 0);
        let mut gen_1 = limited_generator(Role::Follower, 1);
        let (mut ctx_0, mut ctx_1) = test_context(8);

        std::thread::scope(|s| {
            let handle = s.spawn(|| gen_0.init(&mut ctx_0, 100).unwrap());
            gen_1.init(&mut ctx_1, 100).unwrap();
            handle.join().unwrap();
        });

        let (step_0, step_1) = (ctx_0.step(), ctx_1.step());

        // Rounds of 100 exceed the COT limit and are refused before sending.
        for _ in 0..2 {
            assert_eq!(
                gen_0.generate(&mut ctx_0, 10).unwrap_err().kind(),
                ErrorKind::Parameter
            );
            assert_eq!(
                gen_1.generate(&mut ctx_1, 10).unwrap_err().kind(),
                ErrorKind::Parameter
            );
        }

        assert_eq!(ctx_0.step(), step_0);
        assert_eq!(ctx_1.step(), step_1);
        assert_eq!(gen_0.available(), 0);
        assert_eq!(
            gen_0.init(&mut ctx_0, 100).unwrap_err().kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn test_abort() {
        let (mut gen_0, mut gen_1) = alsz_generators(GeneratorConfig::default());
        let (mut ctx_0, mut ctx_1) = test_context(8);

        std::thread::scope(|s| {
            let handle = s.spawn(|| gen_0.init(&mut ctx_0, 100).unwrap());
            gen_1.init(&mut ctx_1, 100).unwrap();
            handle.join().unwrap();
        });

        drop(ctx_1);

        let err = gen_0.generate(&mut ctx_0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Abort);

        let err = gen_0.generate(&mut ctx_0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(gen_0.available(), 0);
    }
}
