// benches/throughput.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tinyactor::{message, ActorContext, ActorRef, Behavior, Message, Runtime};
use tokio::runtime::Runtime as TokioRuntime;

// --- Benchmarking Constants ---
const MESSAGE_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];
const RING_SIZE: usize = 100;

// One actor, many messages from one sender.
fn bench_single_actor(c: &mut Criterion) {
  let rt = TokioRuntime::new().expect("tokio runtime");
  let mut group = c.benchmark_group("single_actor");

  for &count in &MESSAGE_COUNTS {
    group.throughput(Throughput::Elements(count as u64));
    group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
      b.to_async(&rt).iter(|| async move {
        let runtime = Runtime::new().expect("runtime");
        let sink = runtime.create(Behavior::new(|_ctx, msg| {
          black_box(msg.get::<usize>(0));
        }));
        for i in 0..count {
          sink.send(message![i]);
        }
        runtime.wait().await;
        runtime.shutdown().await.expect("shutdown");
      });
    });
  }
  group.finish();
}

// A token passed around a ring of actors until its hop budget runs out.
fn bench_ring(c: &mut Criterion) {
  let rt = TokioRuntime::new().expect("tokio runtime");
  let mut group = c.benchmark_group("ring");

  for &hops in &MESSAGE_COUNTS {
    group.throughput(Throughput::Elements(hops as u64));
    group.bench_with_input(BenchmarkId::from_parameter(hops), &hops, |b, &hops| {
      b.to_async(&rt).iter(|| async move {
        let runtime = Runtime::new().expect("runtime");
        let members: Vec<ActorRef> = (0..RING_SIZE).map(|_| runtime.create(ring_member)).collect();
        let first = members[0].clone();
        // Each member learns its successor, then forwards tokens.
        for (index, member) in members.iter().enumerate() {
          member.send(message![members[(index + 1) % RING_SIZE].clone()]);
        }
        runtime.wait().await;
        first.send(message![hops]);
        runtime.wait().await;
        runtime.shutdown().await.expect("shutdown");
      });
    });
  }
  group.finish();
}

fn ring_member(ctx: &mut ActorContext, msg: Message) {
  if let Some(next) = msg.get::<ActorRef>(0) {
    let next = next.clone();
    ctx.become_behavior(move |_ctx: &mut ActorContext, msg: Message| {
      let remaining = *msg.get::<usize>(0).expect("hop budget");
      if remaining > 0 {
        next.send(message![remaining - 1]);
      }
    });
  }
}

criterion_group!(benches, bench_single_actor, bench_ring);
criterion_main!(benches);
