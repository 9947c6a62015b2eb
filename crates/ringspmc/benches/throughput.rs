use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ringspmc_rs::{ReadStatus, RecvError, Ring};
use std::thread;

const MSGS: u64 = 1_000_000;
const PAYLOAD: [u8; 32] = [0x42; 32];

fn bench_publish_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_drain");
    group.throughput(Throughput::Elements(MSGS));

    // Single-threaded baseline: cost of the protocol itself, no cache
    // traffic from a second core.
    group.bench_function("same_thread", |b| {
        b.iter(|| {
            let ring = Ring::<4096>::new_boxed();
            let mut publisher = unsafe { ring.publisher() };
            let mut idx = 0u64;
            let mut buf = [0u8; 256];

            for seq in 0..MSGS {
                assert!(publisher.publish(seq as u32, &PAYLOAD, false));
                match ring.read(&mut idx, &mut buf) {
                    ReadStatus::Ok(size) => {
                        black_box(&buf[..size as usize]);
                    }
                    other => panic!("drain fell behind: {other:?}"),
                }
            }
        });
    });

    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");
    group.throughput(Throughput::Elements(MSGS));

    for subscribers in [1usize, 2] {
        group.bench_function(format!("{subscribers}_subscribers"), |b| {
            b.iter(|| {
                let ring = Ring::<4096>::new_boxed();

                thread::scope(|s| {
                    for _ in 0..subscribers {
                        // Attach before the publisher starts so a late
                        // subscriber thread still begins at the stream head.
                        let mut subscriber = ring.subscriber(false);
                        s.spawn(move || {
                            let mut buf = [0u8; 256];
                            loop {
                                match subscriber.recv(&mut buf) {
                                    Ok(msg) => {
                                        if msg.userdata == u32::MAX {
                                            break;
                                        }
                                        black_box(msg.payload);
                                    }
                                    Err(RecvError::Empty) => std::hint::spin_loop(),
                                    Err(RecvError::Lapped) => subscriber.resubscribe(true),
                                    Err(err) => panic!("unexpected error: {err}"),
                                }
                            }
                        });
                    }

                    s.spawn(|| {
                        let mut publisher = unsafe { ring.publisher() };
                        for seq in 0..MSGS {
                            assert!(publisher.publish(seq as u32, &PAYLOAD, false));
                        }
                        assert!(publisher.publish(u32::MAX, &[], true));
                    });
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_publish_drain, bench_broadcast);
criterion_main!(benches);
