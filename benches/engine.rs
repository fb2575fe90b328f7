use std::sync::Barrier;
use std::thread;

use chrono::{DateTime, Duration, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scraps::{Command, Config, Engine, FakeClock};

/// Generates a repeating play session.
///
/// Pattern (repeating), with the clock moving `step` between commands:
/// 1. Sync
/// 2. Start a craft
/// 3. Claim it (fails until due)
/// 4. Cancel whatever is still running
///
/// Crafting is unlocked once, on the first command.
pub struct SessionGenerator {
    remaining: u32,
    step: u32,
    unlocked: bool,
}

impl SessionGenerator {
    pub fn new(count: u32) -> Self {
        Self {
            remaining: count,
            step: 0,
            unlocked: false,
        }
    }
}

impl Iterator for SessionGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let correlation_id = format!("cmd-{}", self.remaining);
        if !self.unlocked {
            self.unlocked = true;
            return Some(Command::UnlockCrafting { correlation_id });
        }

        let command = match self.step % 4 {
            0 => Command::SyncState { correlation_id },
            1 => Command::StartCraft { correlation_id },
            2 => Command::ClaimCraft { correlation_id },
            _ => Command::CancelCraft { correlation_id },
        };
        self.step += 1;
        Some(command)
    }
}

fn new_engine() -> (Engine<FakeClock>, FakeClock) {
    let start = DateTime::<Utc>::UNIX_EPOCH;
    let clock = FakeClock::new(start);
    // unlock is affordable from the first command on
    clock.advance(Duration::seconds(1_000));
    let engine = Engine::new(Config::default(), clock.clone(), start).unwrap();
    (engine, clock)
}

fn bench_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle");

    for step_ms in [100i64, 1_000, 60_000] {
        group.bench_with_input(BenchmarkId::from_parameter(step_ms), &step_ms, |b, &step_ms| {
            b.iter(|| {
                let (engine, clock) = new_engine();
                for _ in 0..10_000 {
                    clock.advance(Duration::milliseconds(step_ms));
                    black_box(engine.settle());
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for count in [10_000u32, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let (engine, clock) = new_engine();
                for command in SessionGenerator::new(count) {
                    clock.advance(Duration::milliseconds(2_500));
                    black_box(engine.execute(command));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    group.sample_size(10);

    for threads in [2usize, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let (engine, _clock) = new_engine();
                let barrier = Barrier::new(threads);
                thread::scope(|scope| {
                    for _ in 0..threads {
                        scope.spawn(|| {
                            barrier.wait();
                            for command in SessionGenerator::new(10_000) {
                                black_box(engine.execute(command));
                            }
                        });
                    }
                });
                engine
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_settle, bench_session, bench_contended);
criterion_main!(benches);
