// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use buildlens_parser::{classify_line, parse_build_output};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Build a synthetic log mixing compile noise, diagnostics and test output
fn synthetic_log(cases: usize) -> String {
    let mut log = String::new();
    for i in 0..cases {
        log.push_str(&format!(
            "CompileSwift normal arm64 /src/Module{i}.swift (in target 'App' from project 'App')\n"
        ));
        if i % 10 == 0 {
            log.push_str(&format!(
                "/src/Module{i}.swift:{}:5: warning: variable 'x' was never used\n",
                i + 1
            ));
        }
        log.push_str(&format!(
            "Test Case '-[AppTests.SuiteTests test{i}]' passed (0.00{} seconds).\n",
            i % 10
        ));
    }
    log.push_str(&format!(
        "\t Executed {cases} tests, with 0 failures (0 unexpected) in 1.234 (1.300) seconds\n"
    ));
    log.push_str("** TEST SUCCEEDED ** [42.1 sec]\n");
    log
}

fn parse_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_build_output");
    for cases in [100usize, 1_000, 10_000] {
        let log = synthetic_log(cases);
        group.bench_with_input(BenchmarkId::from_parameter(cases), &log, |b, log| {
            b.iter(|| parse_build_output(black_box(log), None))
        });
    }
    group.finish();

    c.bench_function("classify_diagnostic_line", |b| {
        b.iter(|| {
            classify_line(black_box(
                "/Users/dev/App/Sources/View.swift:3:10: warning: variable 'x' was never used",
            ))
        })
    });

    c.bench_function("classify_noise_line", |b| {
        b.iter(|| classify_line(black_box("    cd /Users/dev/App")))
    });
}

criterion_group!(benches, parse_benchmarks);
criterion_main!(benches);
