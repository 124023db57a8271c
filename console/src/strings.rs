macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod utils {
    define_strings! {
        VERBOSE =
            "Log debug messages, including per-chunk merge progress. \
            RUST_LOG overrides this level.";
        PROGRESS =
            "Display a spinner while the pipeline runs.";
        THREADS =
            "Number of threads for the join and table IO. Defaults to all \
            available cores.";
        FORCE =
            "Overwrite existing output files without asking.";
    }
}

pub mod input {
    define_strings! {
        EXPRESSION =
            "Enriched expression table: one row per probe and sample with \
            `Value`, `Sample` and `Gene Symbol` columns.";
        METADATA =
            "Sample metadata table with `geo_accession` and binary `Label` \
            columns.";
        OUTPUT =
            "Directory for the generated files. Created if missing.";
        PREFIX =
            "Dataset identifier prepended to every output file name, e.g. \
            GSE121239.";
        STRATEGY =
            "Merge strategy. `batch` loads the whole expression table, \
            `streaming` reads it in chunks of --chunk-size rows. Both give \
            identical results.";
        CHUNK_SIZE =
            "Expression rows per chunk of the streaming merge [default: 10000].";
        SEPARATOR =
            "Field delimiter of input and output tables.";
        CONFIG =
            "JSON file with pipeline settings. Command line options override \
            values from the file.";
    }
}

pub mod run {
    define_strings! {
        TRAIN_RATIO =
            "Share of genes assigned to the training partition, in (0, 1) \
            [default: 0.8].";
        SEED =
            "Seed of the random source driving the stratified split \
            [default: 42].";
        LABEL_POLICY =
            "Label of a gene whose probe rows disagree. `first-wins` keeps \
            the label of its first row, `require-homogeneous` fails the run.";
    }
}

pub mod label {
    define_strings! {
        INPUT =
            "Sample metadata table with a free-text title column.";
        OUTPUT =
            "Path of the labeled metadata table.";
        TITLE_COL =
            "Column holding the sample titles.";
        LABEL_COL =
            "Name of the generated label column.";
        HEALTHY =
            "Samples whose cleaned title contains this text get label 0, all \
            others label 1.";
    }
}
