//! Demo publisher: streams a random mix of tick messages to a topic.
//!
//! ```bash
//! cargo run -p ringspmc-shm --bin pub_demo --release -- md.ticks
//! ```
//!
//! Every message is published as a key message so a `sub_demo` started late
//! still has something to attach to. Run exactly one publisher per topic.

use rand::Rng;
use ringspmc_shm::messages::{Tick12, Tick2, Tick4, Tick8, TickMsg};
use ringspmc_shm::Topic;
use ringspmc_rs::Publisher;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{env, process, thread};

/// 64 KiB ring; must match sub_demo.
const BLK_CNT: usize = 1024;

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

fn send<T: TickMsg>(publisher: &mut Publisher<'_, BLK_CNT>, tid: u32, seq: u32) -> bool {
    let tick = T::sample(now_nanos(), tid, seq);
    publisher.publish(T::MSG_TYPE, bytemuck::bytes_of(&tick), true)
}

fn main() {
    let Some(name) = env::args().nth(1) else {
        eprintln!("usage: pub_demo TOPIC");
        process::exit(1);
    };

    let topic = match Topic::<BLK_CNT>::open(&name) {
        Ok(topic) => topic,
        Err(err) => {
            eprintln!("cannot open topic {name}: {err}");
            process::exit(1);
        }
    };

    // SAFETY: one pub_demo process per topic (see module docs).
    let mut publisher = unsafe { topic.publisher() };
    let tid = process::id();
    let mut rng = rand::thread_rng();

    println!("publishing to {} (Ctrl-C to stop)", topic.name());
    let mut seq = 1u32;
    loop {
        let sent = match rng.gen_range(1..=4) {
            1 => send::<Tick2>(&mut publisher, tid, seq),
            2 => send::<Tick4>(&mut publisher, tid, seq),
            3 => send::<Tick8>(&mut publisher, tid, seq),
            _ => send::<Tick12>(&mut publisher, tid, seq),
        };
        assert!(sent, "tick message too large for the ring");
        seq = seq.wrapping_add(1);
        thread::sleep(Duration::from_millis(100));
    }
}
