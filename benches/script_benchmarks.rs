//! Benchmarks for the compile and execute phases.
//!
//! Run with the `profile-with-puffin` feature to record per-function scopes:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tern::{CallContext, Engine, Value};

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

/// Initialize puffin profiler.
#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

fn engine() -> Engine {
    let mut engine = Engine::new();
    engine
        .register_fn("number add(number, number)", |ctx: &CallContext<'_>| {
            Value::Number(ctx.number(0).unwrap_or(0.0) + ctx.number(1).unwrap_or(0.0))
        })
        .unwrap();
    engine
}

/// A long straight-line script: many declarations and folded constants.
fn straight_line(statements: usize) -> String {
    let mut source = String::from("let acc = 0;\n");
    for i in 0..statements {
        source.push_str(&format!("acc = acc + {i} * 2 - (3 + 4) / 7;\n"));
    }
    source.push_str("acc\n");
    source
}

fn compile_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("compile");
    let engine = engine();

    let fibonacci = include_str!("../test_scripts/fibonacci.tern");
    group.throughput(Throughput::Bytes(fibonacci.len() as u64));
    group.bench_function("fibonacci", |b| {
        b.iter(|| {
            let program = engine.compile(black_box(fibonacci)).unwrap();
            end_profiling_frame();
            black_box(program.chunk().len())
        });
    });

    let large = straight_line(1000);
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("straight_line_1000", |b| {
        b.iter(|| {
            let program = engine.compile(black_box(&large)).unwrap();
            end_profiling_frame();
            black_box(program.chunk().len())
        });
    });

    group.finish();
}

fn execute_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("execute");
    let engine = engine();

    let fibonacci = engine
        .compile(include_str!("../test_scripts/fibonacci.tern"))
        .unwrap();
    group.bench_function("fibonacci", |b| {
        b.iter(|| {
            let result = engine.execute(black_box(&fibonacci)).unwrap();
            end_profiling_frame();
            black_box(result)
        });
    });

    let counting = engine
        .compile("let n = 0; for i in 0 -> 10000 { n = add(n, i); } n")
        .unwrap();
    group.bench_function("native_calls_10000", |b| {
        b.iter(|| black_box(engine.execute(black_box(&counting)).unwrap()));
    });

    let strings = engine
        .compile("let s = \"\"; for i in 0 -> 500 { s = s + \"ab\"; } s")
        .unwrap();
    group.bench_function("concat_500", |b| {
        b.iter(|| black_box(engine.execute(black_box(&strings)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, compile_benchmarks, execute_benchmarks);
criterion_main!(benches);
