//! Criterion benchmark for the reachability loop.
//!
//! Run with: cargo bench -p tempo-zg

use criterion::{criterion_group, criterion_main, Criterion};
use tempo_dbm::{ClockConstraint, ClockReset, Ineq};
use tempo_mc::{run, Policy, ReachGraph};
use tempo_ta::{LabelSet, System, SystemBuilder};
use tempo_zg::{Extrapolation, Semantics, ZoneGraph};

/// A token ring of `n` timed processes. Process `i` holds the token in its
/// `token` location, must keep it at least one time unit and at most two,
/// then hands it to process `i + 1` through a synchronized event.
fn token_ring(n: usize) -> System {
    let mut b = SystemBuilder::new("token-ring");
    let events: Vec<_> = (0..n).map(|i| b.add_event(&format!("pass{}", i))).collect();
    for i in 0..n {
        let p = b.add_process(&format!("P{}", i));
        let x = b.add_clock(&format!("x{}", i));
        let idle = b.add_location(p, "idle").unwrap();
        let token = b.add_location(p, "token").unwrap();
        b.set_initial(if i == 0 { token } else { idle }).unwrap();
        b.add_invariant(token, ClockConstraint::upper(x, Ineq::Le, 2)).unwrap();

        let send = b.add_edge(p, token, idle, events[i]).unwrap();
        b.add_guard(send, ClockConstraint::lower(x, Ineq::Le, 1)).unwrap();
        let recv = b.add_edge(p, idle, token, events[(i + n - 1) % n]).unwrap();
        b.add_reset(recv, ClockReset::to_zero(x)).unwrap();
    }
    for i in 0..n {
        b.add_sync(&[(i, events[i]), ((i + 1) % n, events[i])]).unwrap();
    }
    b.build().unwrap()
}

fn bench_ring(c: &mut Criterion, name: &str, n: usize) {
    let system = token_ring(n);
    c.bench_function(name, |b| {
        b.iter(|| {
            let mut zg =
                ZoneGraph::new(&system, Semantics::Elapsed, Extrapolation::ExtraLuLocal).unwrap();
            let mut graph = ReachGraph::new();
            run(&mut zg, &mut graph, LabelSet::empty(), Policy::Fifo).unwrap()
        })
    });
}

fn benchmarks(c: &mut Criterion) {
    bench_ring(c, "token_ring_4", 4);
    bench_ring(c, "token_ring_8", 8);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
