//! Scanner benchmarks: cold scan (fresh engine) and warm rescan (all caches
//! populated).
//! Run with: cargo bench -p ctxscan-engine --bench scanner_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ctxscan_core::config::CtxscanConfig;
use ctxscan_core::events::ScanEventHandler;
use ctxscan_core::types::ScanMode;
use ctxscan_engine::ScanEngine;
use tempfile::TempDir;

struct NoOpHandler;
impl ScanEventHandler for NoOpHandler {}

/// N TypeScript files spread over directories of 100, plus an ignored
/// dependency tree and a root `.gitignore`.
fn create_test_files(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".gitignore"), "*.log\ngenerated/\n").unwrap();
    for i in 0..count {
        let subdir = dir.path().join(format!("dir_{:03}", i / 100));
        std::fs::create_dir_all(&subdir).ok();
        let content = format!("export function fn_{i}(x: number): number {{ return x * {i}; }}\n");
        std::fs::write(subdir.join(format!("f_{i:05}.ts")), &content).unwrap();
        if i % 10 == 0 {
            std::fs::write(subdir.join(format!("f_{i:05}.log")), "noise").unwrap();
        }
    }
    let deps = dir.path().join("node_modules/dep");
    std::fs::create_dir_all(&deps).unwrap();
    for i in 0..500 {
        std::fs::write(deps.join(format!("m{i}.js")), "module.exports = {};").unwrap();
    }
    dir
}

fn config(accurate_tokens: bool) -> CtxscanConfig {
    let mut config = CtxscanConfig::default();
    config.scan.accurate_token_count = Some(accurate_tokens);
    config
}

fn scanner_cold_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_cold");
    group.sample_size(10);

    for size in [1000, 5000] {
        let dir = create_test_files(size);
        for mode in [ScanMode::Automatic, ScanMode::Global] {
            group.bench_with_input(BenchmarkId::new(mode.as_str(), size), &size, |b, _| {
                b.iter(|| {
                    let engine = ScanEngine::new(config(false));
                    engine.scan(dir.path(), mode, &[], &NoOpHandler).unwrap();
                });
            });
        }
    }
    group.finish();
}

fn scanner_warm_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_warm");
    group.sample_size(10);

    let dir = create_test_files(5000);
    for accurate in [false, true] {
        let engine = ScanEngine::new(config(accurate));
        engine
            .scan(dir.path(), ScanMode::Automatic, &[], &NoOpHandler)
            .unwrap();
        let label = if accurate { "tokenizer" } else { "heuristic" };
        group.bench_function(BenchmarkId::new("rescan", label), |b| {
            b.iter(|| {
                engine
                    .scan(dir.path(), ScanMode::Automatic, &[], &NoOpHandler)
                    .unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, scanner_cold_scan, scanner_warm_scan);
criterion_main!(benches);
