mod common;

use std::fs;

use assert_approx_eq::assert_approx_eq;
use common::{
    read_lines,
    synthetic_study,
    Workspace,
};
use geoprep::prelude::*;
use rstest::rstest;
use statrs::statistics::Statistics;

#[test]
fn run_writes_all_outputs() -> anyhow::Result<()> {
    let (mut expression, metadata) = synthetic_study(20, 8, 500, 42);
    expression.push_str("x_at,GSM99,1.0,G00000,gene 0,0\n");
    let ws = Workspace::new(&expression, &metadata)?;

    let summary = Pipeline::new(ws.config()).run()?;

    assert_eq!(summary.n_merged, 1000);
    assert_eq!(summary.n_filtered, 1000);
    assert_eq!(summary.n_genes, 500);
    assert_eq!((summary.n_train, summary.n_test), (400, 100));
    assert!(summary.report.missing_in_metadata.contains("GSM99"));

    let paths = &summary.paths;
    assert_eq!(paths.x_train, ws.output_dir().join("GSE0_X_train.csv"));
    for path in paths.all() {
        assert!(path.is_file(), "{} was not written", path.display());
    }
    assert_eq!(read_lines(&paths.merged).len(), 1001);
    assert_eq!(read_lines(&paths.gene_table).len(), 501);

    let x_train = read_lines(&paths.x_train);
    let y_train = read_lines(&paths.y_train);
    assert_eq!(x_train[0], "NormalizedValue");
    assert_eq!(y_train[0], "Label");
    assert_eq!(x_train.len(), 401);
    assert_eq!(y_train.len(), 401);
    assert_eq!(read_lines(&paths.x_test).len(), 101);
    assert_eq!(read_lines(&paths.y_test).len(), 101);
    Ok(())
}

#[test]
fn merged_table_carries_canonical_keys() -> anyhow::Result<()> {
    let (expression, metadata) = synthetic_study(4, 2, 8, 1);
    let ws = Workspace::new(&expression, &metadata)?;
    let summary = Pipeline::new(ws.config()).run()?;

    let merged = read_lines(&summary.paths.merged);
    assert_eq!(
        merged[0],
        "ID_REF,Sample,Value,Gene Symbol,Gene Title,ENTREZ_GENE_ID,geo_accession,title,Label"
    );
    assert!(merged[1].starts_with("0_0_at,GSM0,"));
    Ok(())
}

#[test]
fn processed_genes_are_standardized_and_stratified() -> anyhow::Result<()> {
    let (expression, metadata) = synthetic_study(10, 3, 1000, 7);
    let ws = Workspace::new(&expression, &metadata)?;
    let output = Pipeline::new(ws.config()).process()?;

    let values: Vec<f64> = output.genes.iter().map(|g| g.normalized_value).collect();
    assert_approx_eq!(values.iter().mean(), 0.0, 1e-9);
    assert_approx_eq!(values.iter().population_std_dev(), 1.0, 1e-9);

    let overall = output.genes.iter().filter(|g| g.label() == 1).count() as f64
        / output.genes.len() as f64;
    for side in [&output.split.train, &output.split.test] {
        assert!((side.positive_ratio() - overall).abs() <= 0.05);
    }
    assert_eq!(output.split.train.len(), 800);

    // Nothing is written before `write`.
    assert!(!ws.output_dir().exists());
    Ok(())
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(333)]
fn strategies_write_identical_files(#[case] chunk_size: usize) -> anyhow::Result<()> {
    let (expression, metadata) = synthetic_study(12, 5, 300, 3);
    let ws = Workspace::new(&expression, &metadata)?;

    let batch = Pipeline::new(
        ws.config()
            .with_strategy(MergeStrategyKind::Batch)
            .with_output_dir(ws.dir.path().join("batch")),
    )
    .run()?;
    let streaming = Pipeline::new(
        ws.config()
            .with_strategy(MergeStrategyKind::Streaming)
            .with_chunk_size(chunk_size)
            .with_output_dir(ws.dir.path().join("streaming")),
    )
    .run()?;

    for (left, right) in batch.paths.all().into_iter().zip(streaming.paths.all()) {
        assert_eq!(fs::read_to_string(left)?, fs::read_to_string(right)?);
    }
    Ok(())
}

#[test]
fn same_seed_reproduces_split() -> anyhow::Result<()> {
    let (expression, metadata) = synthetic_study(10, 4, 200, 5);
    let ws = Workspace::new(&expression, &metadata)?;
    let config = ws.config().with_split(SplitConfig::default().with_seed(11));

    let first = Pipeline::new(config.clone()).process()?;
    let second = Pipeline::new(config).process()?;
    assert_eq!(first.split, second.split);
    Ok(())
}

#[test]
fn mixed_label_gene_takes_first_label() -> anyhow::Result<()> {
    let ws = Workspace::new(
        "Sample,Value,Gene Symbol\nGSM1,10,A\nGSM2,20,A\n",
        "geo_accession,Label\nGSM1,0\nGSM2,1\n",
    )?;
    let config = ws.config();
    let outcome = Pipeline::new(config.clone()).merge()?;
    let rows = MergedRow::from_frame(
        &outcome.frame,
        &config.expression_columns,
        &config.metadata_columns,
    )?;
    let (rows, _) = filter_missing(rows);
    let (genes, report) = GeneAggregator::new(LabelPolicy::FirstWins).aggregate(&rows)?;

    assert_eq!(genes.len(), 1);
    assert_eq!(genes[0].gene_symbol, "A");
    assert_approx_eq!(genes[0].mean_value, 15.0);
    assert_eq!(genes[0].label, 0);
    assert_eq!(report.heterogeneous, vec!["A".to_string()]);

    let strict = Pipeline::new(config.with_label_policy(LabelPolicy::RequireHomogeneous));
    assert!(matches!(
        strict.process(),
        Err(PrepError::HeterogeneousLabel { .. })
    ));
    Ok(())
}

#[test]
fn single_label_fails_without_outputs() -> anyhow::Result<()> {
    let (expression, _) = synthetic_study(6, 0, 60, 9);
    let metadata = "geo_accession,Label\nGSM0,1\nGSM1,1\nGSM2,1\nGSM3,1\nGSM4,1\nGSM5,1\n";
    let ws = Workspace::new(&expression, metadata)?;

    let err = Pipeline::new(ws.config()).run().unwrap_err();
    assert!(matches!(
        err,
        PrepError::InsufficientLabelDiversity { ref found } if found == &vec![1]
    ));
    assert!(!ws.output_dir().exists());
    Ok(())
}

#[test]
fn missing_input_fails_before_any_work() -> anyhow::Result<()> {
    let (expression, metadata) = synthetic_study(4, 2, 8, 1);
    let ws = Workspace::new(&expression, &metadata)?;
    let missing = ws.dir.path().join("nope.csv");

    let err = Pipeline::new(ws.config().with_metadata_path(missing.clone()))
        .run()
        .unwrap_err();
    match err {
        PrepError::MissingInput { path } => assert_eq!(path, missing),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!ws.output_dir().exists());
    Ok(())
}

#[test]
fn disjoint_tables_report_both_sides() -> anyhow::Result<()> {
    let ws = Workspace::new(
        "Sample,Value,Gene Symbol\nGSM9,1.0,A\n",
        "geo_accession,Label\nGSM1,0\n",
    )?;
    match Pipeline::new(ws.config()).run() {
        Err(PrepError::EmptyMerge { report }) => {
            assert!(report.missing_in_metadata.contains("GSM9"));
            assert!(report.missing_in_expression.contains("GSM1"));
        },
        other => panic!("unexpected result {other:?}"),
    }
    Ok(())
}

#[test]
fn constant_expression_is_degenerate() -> anyhow::Result<()> {
    let ws = Workspace::new(
        "Sample,Value,Gene Symbol\nGSM1,5.0,A\nGSM2,5.0,B\nGSM1,5.0,C\nGSM2,5.0,D\n",
        "geo_accession,Label\nGSM1,0\nGSM2,1\n",
    )?;
    assert!(matches!(
        Pipeline::new(ws.config()).process(),
        Err(PrepError::DegenerateStatistics { n_values: 4, .. })
    ));
    Ok(())
}

#[test]
fn config_file_drives_run() -> anyhow::Result<()> {
    let (expression, metadata) = synthetic_study(10, 5, 100, 2);
    let ws = Workspace::new(&expression, &metadata)?;
    let config_path = ws.dir.path().join("config.json");
    ws.config()
        .with_strategy(MergeStrategyKind::Streaming)
        .with_chunk_size(16)
        .with_split(SplitConfig::default().with_train_ratio(0.7))
        .to_json_file(&config_path)?;

    let summary = Pipeline::new(PipelineConfig::from_json_file(&config_path)?).run()?;
    assert_eq!((summary.n_train, summary.n_test), (70, 30));
    Ok(())
}
