//! Read Throughput Benchmark
//!
//! Compares single-byte and small-chunk reads against an unbuffered source
//! with the same reads through `BufReader` at several capacities. Every call
//! to the source is counted to show how many trips buffering saves.
use std::time::Instant;

use bufio_adapters::{BufReader, ByteSource, Fill, presets};

const DATA_SIZE: usize = 4 * 1024 * 1024;

/// Source counting every fill, simulating a syscall-per-read device
struct CountingSource {
    data: Vec<u8>,
    pos: usize,
    fills: u64,
}

impl CountingSource {
    fn new(size: usize) -> Self {
        Self {
            data: (0..size).map(|i| i as u8).collect(),
            pos: 0,
            fills: 0,
        }
    }
}

impl ByteSource for CountingSource {
    type Error = core::convert::Infallible;

    fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
        self.fills += 1;
        let remaining = self.data.len() - self.pos;
        if remaining == 0 {
            return Ok(Fill::EndOfStream);
        }
        let n = buf.len().min(remaining);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Fill::Count(n))
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn report(label: &str, bytes: usize, fills: u64, started: Instant) {
    let elapsed = started.elapsed();
    let mb_per_sec = bytes as f64 / (1024.0 * 1024.0) / elapsed.as_secs_f64();
    println!(
        "{:<32} {:>10.2} MB/s {:>10} fills {:>10.2?}",
        label, mb_per_sec, fills, elapsed
    );
}

fn unbuffered(chunk: usize) {
    let mut source = CountingSource::new(DATA_SIZE);
    let mut buf = vec![0u8; chunk];
    let mut total = 0;

    let started = Instant::now();
    while let Ok(Fill::Count(n)) = source.fill(&mut buf) {
        total += n;
    }
    report(&format!("unbuffered {}B", chunk), total, source.fills, started);
}

fn buffered(chunk: usize, capacity: usize) {
    let mut reader = BufReader::with_capacity(CountingSource::new(DATA_SIZE), capacity)
        .expect("non-zero capacity");
    let mut buf = vec![0u8; chunk];
    let mut total = 0;

    let started = Instant::now();
    while let Ok(Fill::Count(n)) = reader.read(&mut buf) {
        total += n;
    }
    report(
        &format!("buffered {}B / {}B buffer", chunk, capacity),
        total,
        reader.inner().fills,
        started,
    );
}

fn buffered_bytes(capacity: usize) {
    let mut reader = BufReader::with_capacity(CountingSource::new(DATA_SIZE), capacity)
        .expect("non-zero capacity");
    let mut total = 0;

    let started = Instant::now();
    while let Ok(Some(_)) = reader.read_byte() {
        total += 1;
    }
    report(
        &format!("read_byte / {}B buffer", capacity),
        total,
        reader.inner().fills,
        started,
    );
}

fn main() {
    println!("Reading {} MB", DATA_SIZE / (1024 * 1024));
    println!();

    for chunk in [1, 16, 128] {
        unbuffered(chunk);
        for capacity in [presets::BUF_512, presets::BUF_4K, presets::BUF_64K] {
            buffered(chunk, capacity);
        }
        println!();
    }

    for capacity in [presets::BUF_1K, presets::BUF_8K] {
        buffered_bytes(capacity);
    }
}
