use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use criterion::{
    criterion_group,
    criterion_main,
    BenchmarkId,
    Criterion,
};
use geoprep::prelude::*;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;

const N_SAMPLES: usize = 60;
const N_PROBES: usize = 2_000;

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut expression = String::from("ID_REF,Sample,Value,Gene Symbol\n");
    for sample in 0..N_SAMPLES {
        for probe in 0..N_PROBES {
            let value: f64 = rng.gen_range(0.0..1000.0);
            writeln!(
                expression,
                "{probe}_at,GSM{sample},{value:.3},G{}",
                probe / 3
            )
            .unwrap();
        }
    }
    let mut metadata = String::from("geo_accession,Label\n");
    for sample in 0..N_SAMPLES {
        writeln!(metadata, "GSM{sample},{}", sample % 2).unwrap();
    }

    let expression_path = dir.join("expression.csv");
    let metadata_path = dir.join("metadata.csv");
    fs::write(&expression_path, expression).unwrap();
    fs::write(&metadata_path, metadata).unwrap();
    (expression_path, metadata_path)
}

fn merge_strategies(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let (expression, metadata_path) = write_inputs(dir.path());
    let metadata =
        MetadataTable::read(&metadata_path, &MetadataColumns::default(), b',').unwrap();

    let mut group = c.benchmark_group("merge");
    group.sample_size(10);
    group.bench_function("batch", |b| {
        let merger = BatchMerger::default();
        b.iter(|| merger.merge(&expression, &metadata).unwrap())
    });
    for chunk_size in [1_000, 10_000, 50_000] {
        group.bench_with_input(
            BenchmarkId::new("streaming", chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                let merger = StreamingMerger::default().with_chunk_size(chunk_size);
                b.iter(|| merger.merge(&expression, &metadata).unwrap())
            },
        );
    }
    group.finish();
}

criterion_group!(benches, merge_strategies);
criterion_main!(benches);
