// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use buildlens::{format_build_result, format_test_result};
use buildlens_parser::{BuildResult, parse_build_output};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::Path;

/// Parse a log carrying `count` warnings (half from dependencies) and failures
fn noisy_result(count: usize) -> BuildResult {
    let mut log = String::new();
    for i in 0..count {
        let dir = if i % 2 == 0 {
            "/Users/dev/App/Sources"
        } else {
            "/Users/dev/Library/Checkouts/Dep"
        };
        log.push_str(&format!(
            "{dir}/File{i}.swift:{}:3: warning: 'old()' is deprecated\n",
            i + 1
        ));
        if i % 5 == 0 {
            log.push_str(&format!(
                "/Users/dev/App/Sources/File{i}.swift:{}:1: error: missing return\n",
                i + 2
            ));
            log.push_str(&format!(
                "Test Case '-[AppTests.Suite test{i}]' failed (0.010 seconds).\n"
            ));
        }
    }
    parse_build_output(&log, None)
}

fn format_benchmarks(c: &mut Criterion) {
    let root = Path::new("/Users/dev/App");
    let mut group = c.benchmark_group("format_build_result");
    for count in [10usize, 100, 1_000] {
        let result = noisy_result(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &result, |b, result| {
            b.iter(|| format_build_result(black_box(result), Some(root)))
        });
    }
    group.finish();

    let result = noisy_result(100);
    c.bench_function("format_test_result", |b| {
        b.iter(|| format_test_result(black_box(&result)))
    });
}

criterion_group!(benches, format_benchmarks);
criterion_main!(benches);
