use cotgen_core::Block;
use cotgen_ot_core::{alsz, base};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

fn base_ot(c: &mut Criterion) {
    let mut group = c.benchmark_group("base_ot");
    for n in [128, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = ChaCha12Rng::seed_from_u64(0);
            let choices = (0..n).map(|_| rng.gen()).collect::<Vec<bool>>();
            b.iter(|| {
                let (sender_setup, mut sender) = base::Sender::new().setup();
                let mut receiver = base::Receiver::new().setup(sender_setup).unwrap();

                let (payload, receiver_output) = receiver.receive(&choices).unwrap();
                let sender_output = sender.send(n, payload).unwrap();

                black_box((sender_output, receiver_output))
            })
        });
    }
}

fn alsz(c: &mut Criterion) {
    let mut group = c.benchmark_group("alsz");
    for n in [1024, 262144] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = ChaCha12Rng::seed_from_u64(0);
            let delta = Block::random(&mut rng);

            let base_sender = base::BaseOtSenderOutput {
                id: Default::default(),
                keys: (0..alsz::CSP).map(|_| [rng.gen(), rng.gen()]).collect(),
            };
            let base_receiver = base::BaseOtReceiverOutput {
                id: Default::default(),
                choices: delta.to_lsb0_vec(),
                keys: base_sender
                    .keys
                    .iter()
                    .zip(delta.iter_lsb0())
                    .map(|(keys, choice)| keys[choice as usize])
                    .collect(),
            };

            b.iter(|| {
                let mut sender = alsz::Sender::new(alsz::SenderConfig::default())
                    .setup(base_receiver.clone())
                    .unwrap();
                let mut receiver = alsz::Receiver::new(alsz::ReceiverConfig::default())
                    .setup(base_sender.clone())
                    .unwrap();

                let (extend, receiver_output) = receiver.extend(&mut rng, n).unwrap();
                let sender_output = sender.extend(n, extend).unwrap();

                black_box((sender_output, receiver_output))
            })
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = base_ot, alsz
}
criterion_main!(benches);
