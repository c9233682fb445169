//! Performance benchmarks for event stream decoding
//!
//! Measures the decoder and assembler on a realistic generation stream
//! delivered in chunks of different sizes.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use songstudio::sse::{EventAssembler, LineDecoder};

/// Build a stream of progress events followed by a done event
fn generate_stream(progress_events: usize) -> Vec<u8> {
    let mut body = String::from("event: status\ndata: {\"message\": \"Loading model\"}\n\n");
    for i in 0..progress_events {
        body.push_str(&format!(
            "event: progress\ndata: {{\"message\": \"Rendering 音楽 step {}\", \"progress\": {}}}\n\n",
            i,
            i as f64 / progress_events as f64
        ));
        if i % 10 == 0 {
            body.push_str(": keep-alive\n\n");
        }
    }
    body.push_str("event: done\ndata: {\"job_id\": \"j-1\", \"song_id\": \"s-1\"}\n\n");
    body.into_bytes()
}

fn decode_all(body: &[u8], chunk_size: usize) -> usize {
    let mut decoder = LineDecoder::new();
    let mut assembler = EventAssembler::new();
    let mut events = 0;
    for chunk in body.chunks(chunk_size) {
        for line in decoder.feed(chunk) {
            if let Ok(Some(_)) = assembler.feed_line(&line) {
                events += 1;
            }
        }
    }
    events
}

/// Benchmark decoding with different chunk sizes
fn bench_decode_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chunk_sizes");
    let body = generate_stream(500);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for chunk_size in [1, 7, 64, 1024, 16384].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_byte_chunks", chunk_size)),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| black_box(decode_all(black_box(&body), chunk_size)));
            },
        );
    }

    group.finish();
}

/// Benchmark stream length with a typical network chunk size
fn bench_decode_stream_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_stream_length");

    for events in [10, 100, 1000].iter() {
        let body = generate_stream(*events);
        group.throughput(Throughput::Elements(*events as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_events", events)),
            &body,
            |b, body| {
                b.iter(|| black_box(decode_all(black_box(body), 1024)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decode_chunk_sizes, bench_decode_stream_length);

criterion_main!(benches);
