//! Demo subscriber: tails one or more topics and prints every tick.
//!
//! ```bash
//! cargo run -p ringspmc-shm --bin sub_demo --release -- md.ticks md.trades
//! ```
//!
//! Attaches at each topic's last key message, polls round-robin, and
//! resubscribes whenever the publisher laps it.

use ringspmc_rs::RecvError;
use ringspmc_shm::messages::{Tick12, Tick2, Tick4, Tick8, TickMsg};
use ringspmc_shm::Topic;
use std::mem::size_of;
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, hint, process};

/// 64 KiB ring; must match pub_demo.
const BLK_CNT: usize = 1024;

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

fn print_tick<T: TickMsg>(topic: &str, payload: &[u8]) {
    if payload.len() != size_of::<T>() {
        eprintln!("topic: {topic} malformed tick of {} bytes", payload.len());
        return;
    }
    let tick: T = bytemuck::pod_read_unaligned(payload);
    let latency_us = now_nanos().saturating_sub(tick.ts()) / 1_000;
    println!(
        "topic: {topic} tid: {} seq: {} latency_us: {} val: {:?}",
        tick.tid(),
        tick.seq(),
        latency_us,
        tick.values()
    );
}

fn main() {
    let names: Vec<String> = env::args().skip(1).collect();
    if names.is_empty() {
        eprintln!("usage: sub_demo TOPIC1 [TOPIC2]...");
        process::exit(1);
    }

    let mut topics = Vec::with_capacity(names.len());
    for name in &names {
        match Topic::<BLK_CNT>::open(name) {
            Ok(topic) => topics.push(topic),
            Err(err) => {
                eprintln!("cannot open topic {name}: {err}");
                process::exit(1);
            }
        }
    }

    let mut subscribers: Vec<_> = topics.iter().map(|t| t.subscriber(true)).collect();
    let mut buf = [0u8; 1024];

    loop {
        for (topic, subscriber) in topics.iter().zip(subscribers.iter_mut()) {
            match subscriber.recv(&mut buf) {
                Ok(msg) => match msg.userdata {
                    Tick2::MSG_TYPE => print_tick::<Tick2>(topic.name(), msg.payload),
                    Tick4::MSG_TYPE => print_tick::<Tick4>(topic.name(), msg.payload),
                    Tick8::MSG_TYPE => print_tick::<Tick8>(topic.name(), msg.payload),
                    Tick12::MSG_TYPE => print_tick::<Tick12>(topic.name(), msg.payload),
                    other => eprintln!("topic: {} unknown tick type {other}", topic.name()),
                },
                Err(RecvError::Empty) => hint::spin_loop(),
                Err(RecvError::Lapped) => {
                    println!("topic: {} lapped, resubscribing", topic.name());
                    subscriber.resubscribe(true);
                }
                Err(RecvError::BufferTooShort { required }) => {
                    // The buffer covers every tick schema; a bigger record
                    // means a foreign publisher is on this topic.
                    eprintln!(
                        "topic: {} skipping oversized record of {required} bytes",
                        topic.name()
                    );
                    subscriber.resubscribe(false);
                }
            }
        }
    }
}
