//! Benchmark for `TJA` parsing and caption output.

use criterion::{Criterion, Throughput};
use tja_rs::tja::parse_tja;

struct TjaFile {
    name: String,
    source: String,
}

fn scan_tja_files() -> Vec<TjaFile> {
    let dir = "tests/files";

    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "tja"))
        .filter_map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(String::from)?;

            let source = std::fs::read_to_string(&path).expect("Failed to load test file");

            Some(TjaFile { name, source })
        })
        .collect()
}

/// A long chart with a lyric every measure, to weigh the timeline walk.
fn synthetic_chart(measures: usize) -> TjaFile {
    let mut source = String::from("TITLE:Bench\nBPM:160\nOFFSET:-1.25\nCOURSE:Oni\nLEVEL:10\n#START\n");
    for i in 0..measures {
        if i % 16 == 0 {
            source.push_str("#BPMCHANGE 180\n#MEASURE 7/8\n");
        }
        source.push_str(&format!("#LYRIC line {i}\n1020102010201020\n1011,\n"));
    }
    source.push_str("#END\n");
    TjaFile {
        name: format!("synthetic_{measures}"),
        source,
    }
}

fn bench_parse_tja(c: &mut Criterion) {
    let mut files = scan_tja_files();
    files.push(synthetic_chart(2000));
    let mut group = c.benchmark_group("parse_tja");

    for file in files.iter() {
        group.throughput(Throughput::Bytes(file.source.len() as u64));
        group.bench_function(&file.name, |b| {
            b.iter(|| parse_tja(std::hint::black_box(&file.source)));
        });
    }

    group.finish();
}

fn bench_lyrics_to_vtt(c: &mut Criterion) {
    let file = synthetic_chart(2000);
    let tja = parse_tja(&file.source);
    let mut group = c.benchmark_group("lyrics_to_vtt");

    group.throughput(Throughput::Bytes(file.source.len() as u64));
    group.bench_function(&file.name, |b| {
        b.iter(|| std::hint::black_box(&tja).lyrics_to_vtt());
    });

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_parse_tja(&mut criterion);
    bench_lyrics_to_vtt(&mut criterion);
}
