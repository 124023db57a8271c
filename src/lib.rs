//! # geoprep
//!
//! `geoprep` is a Rust library and command-line tool that turns two
//! independently produced GEO tables (a per-probe expression table and a
//! per-sample metadata table) into a gene-level, z-score normalized, labeled
//! dataset, split into stratified training and test partitions.
//!
//! If you do not want to use geoprep as crate, check out the `geoprep-ci`
//! console tool in this workspace.
//!
//! ## Pipeline
//!
//! ```text
//! expression.csv ─┐
//!                 ├─ canonical keys ─ merge ─ filter ─ aggregate ─ normalize ─ split
//! metadata.csv  ──┘
//! ```
//!
//! * [`merge`]: sample key canonicalization and the inner join of both tables.
//!   Two interchangeable strategies implement [`Merger`]: [`BatchMerger`]
//!   loads the whole expression table, [`StreamingMerger`] reads it in fixed
//!   size chunks on a background thread. Both produce identical rows in
//!   identical order.
//! * [`tools`]: the row-level stages. Missing data filtering, per-gene
//!   aggregation with an explicit [`LabelPolicy`], z-score normalization and
//!   stratified train/test splitting driven by an injected random source.
//! * [`pipeline`]: wires the stages together according to a
//!   [`PipelineConfig`] and writes the output tables.
//! * [`io`]: delimited text reading and writing on top of `polars` and `csv`.
//!
//! Number of threads to be used can be configured with setting
//! `GEOPREP_NUM_THREADS` environment variable.
//!
//! ## Usage
//!
//! ```no_run
//! use geoprep::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default()
//!         .with_expression_path("GSE121239_enriched_expression_data.csv".into())
//!         .with_metadata_path("GSE121239_sample_metadata_with_labels.csv".into())
//!         .with_prefix("GSE121239".into())
//!         .with_strategy(MergeStrategyKind::Streaming);
//!
//!     let summary = Pipeline::new(config).run()?;
//!     println!(
//!         "{} genes, {} train / {} test rows",
//!         summary.n_genes, summary.n_train, summary.n_test
//!     );
//!     Ok(())
//! }
//! ```

#[ctor::ctor]
fn init() {
    if let Ok(n) = std::env::var("GEOPREP_NUM_THREADS") {
        std::env::set_var("POLARS_MAX_THREADS", n)
    }
}

pub mod config;
pub mod data_structs;
pub mod error;
pub mod io;
pub mod merge;
pub mod pipeline;
pub mod prelude;
pub mod tools;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
