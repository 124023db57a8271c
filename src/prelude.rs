pub use crate::config::{
    MergeStrategyKind,
    PipelineConfig,
    SplitConfig,
};
pub use crate::data_structs::{
    ExpressionColumns,
    GeneAggregateRow,
    Label,
    MergedRow,
    MetadataColumns,
    NormalizedRow,
};
pub use crate::error::{
    PrepError,
    PrepResult,
};
pub use crate::merge::{
    canonical_key,
    BatchMerger,
    KeyReport,
    MergeOutcome,
    Merger,
    MetadataTable,
    StreamingMerger,
};
pub use crate::pipeline::{
    OutputPaths,
    Pipeline,
    PipelineOutput,
    PipelineSummary,
};
pub use crate::tools::aggregate::{
    AggregateReport,
    GeneAggregator,
    LabelPolicy,
};
pub use crate::tools::filter::{
    filter_missing,
    FilterReport,
};
pub use crate::tools::normalize::{
    normalize,
    ZScore,
};
pub use crate::tools::split::{
    Partition,
    Split,
    SplitIndices,
    StratifiedSplitter,
};
