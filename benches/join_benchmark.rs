use criterion::measurement::WallTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion, Throughput};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use zfx_seed::join::{Join, JoinPolicy};
use zfx_seed::message::NetworkAddress;
use zfx_seed::p2p::{HostSet, Hosts};

pub fn run_join_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_benchmark");
    let iterations = vec![100, 1000, 10000];

    signal_join_benchmark(&mut group, iterations.clone());
    chained_join_benchmark(&mut group, iterations.clone());
    concurrent_join_benchmark(&mut group, vec![4, 16]);

    group.finish();
}

pub fn run_hosts_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("hosts_benchmark");
    for i in [100u64, 1000u64, 10000u64].iter() {
        let addresses = create_n_addresses(*i);
        group.throughput(Throughput::Elements(*i));
        group.bench_with_input(BenchmarkId::new("insert", i), i, |b, _| {
            b.iter(|| {
                let hosts = Hosts::new(1000);
                for address in addresses.iter() {
                    hosts.insert(address.clone());
                }
                black_box(hosts.size())
            })
        });
    }
    group.finish();
}

fn signal_join_benchmark(group: &mut BenchmarkGroup<WallTime>, iterations: Vec<u64>) {
    for i in iterations.iter() {
        group.throughput(Throughput::Elements(*i));
        group.bench_with_input(BenchmarkId::new("signal", i), i, |b, i| {
            b.iter(|| {
                let fired = Arc::new(AtomicUsize::new(0));
                let counter = fired.clone();
                let join = Join::new("bench", *i as usize, JoinPolicy::FirstError, move |_| {
                    counter.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
                for _ in 0..*i {
                    join.signal(Ok(())).unwrap();
                }
                black_box(fired.load(Ordering::Relaxed))
            })
        });
    }
}

/// One single-signal join per item, each forwarding to a shared join, as a seeding session does.
fn chained_join_benchmark(group: &mut BenchmarkGroup<WallTime>, iterations: Vec<u64>) {
    for i in iterations.iter() {
        group.throughput(Throughput::Elements(*i));
        group.bench_with_input(BenchmarkId::new("chained", i), i, |b, i| {
            b.iter(|| {
                let all = Join::new("all", *i as usize, JoinPolicy::SuppressErrors, |r| {
                    black_box(r.is_ok());
                })
                .unwrap();
                for n in 0..*i {
                    let forward = all.clone();
                    let single = Join::new(n.to_string(), 1, JoinPolicy::FirstError, move |r| {
                        let _ = forward.signal(r);
                    })
                    .unwrap();
                    single.signal(Ok(())).unwrap();
                }
            })
        });
    }
}

fn concurrent_join_benchmark(group: &mut BenchmarkGroup<WallTime>, threads: Vec<u64>) {
    const SIGNALS_PER_THREAD: u64 = 1000;
    for t in threads.iter() {
        group.throughput(Throughput::Elements(*t * SIGNALS_PER_THREAD));
        group.bench_with_input(BenchmarkId::new("concurrent", t), t, |b, t| {
            b.iter(|| {
                let join =
                    Join::new("concurrent", (*t * SIGNALS_PER_THREAD) as usize, JoinPolicy::FirstError, |_| ())
                        .unwrap();
                let handles: Vec<_> = (0..*t)
                    .map(|_| {
                        let join = join.clone();
                        thread::spawn(move || {
                            for _ in 0..SIGNALS_PER_THREAD {
                                join.signal(Ok(())).unwrap();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                black_box(join.is_complete())
            })
        });
    }
}

fn create_n_addresses(n: u64) -> Vec<NetworkAddress> {
    (0..n)
        .map(|i| {
            let ip = format!("10.{}.{}.{}:8333", (i >> 16) & 0xff, (i >> 8) & 0xff, i & 0xff);
            NetworkAddress::new(ip.parse().unwrap(), 1)
        })
        .collect()
}

criterion_group!(benches, run_join_benchmark, run_hosts_benchmark);
criterion_main!(benches);
