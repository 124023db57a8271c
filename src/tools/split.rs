use std::collections::BTreeMap;

use log::info;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::data_structs::{
    Label,
    NormalizedRow,
    NORMALIZED_VALUE_COL,
};
use crate::error::{
    PrepError,
    PrepResult,
};

/// Smallest class size the splitter accepts: one row for each side.
const MIN_CLASS_MEMBERS: usize = 2;

/// Row positions assigned to each side of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

/// Feature values and labels of one side of a split, aligned by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition {
    pub features: Vec<f64>,
    pub labels:   Vec<Label>,
}

impl Partition {
    fn from_indices(
        rows: &[NormalizedRow],
        indices: &[usize],
    ) -> Self {
        Self {
            features: indices.iter().map(|&i| rows[i].normalized_value).collect(),
            labels:   indices.iter().map(|&i| rows[i].label()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Share of rows labeled `1`.
    pub fn positive_ratio(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l == 1).count() as f64 / self.labels.len() as f64
    }

    pub fn features_frame(&self) -> PrepResult<DataFrame> {
        Ok(DataFrame::new(vec![Column::new(
            NORMALIZED_VALUE_COL.into(),
            self.features.clone(),
        )])?)
    }

    pub fn labels_frame(
        &self,
        label_col: &str,
    ) -> PrepResult<DataFrame> {
        let labels: Vec<i32> = self.labels.iter().map(|&l| l as i32).collect();
        Ok(DataFrame::new(vec![Column::new(label_col.into(), labels)])?)
    }
}

/// Train and test partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Partition,
    pub test:  Partition,
}

/// Label-stratified train/test splitter.
///
/// The test side receives `ceil((1 - train_ratio) * n)` rows, the train side
/// the rest. Per-class train counts follow the largest remainder rule so the
/// class proportions of both sides stay as close as possible to the overall
/// ones. All randomness comes from the generator passed in.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedSplitter {
    train_ratio: f64,
}

impl Default for StratifiedSplitter {
    fn default() -> Self {
        Self { train_ratio: 0.8 }
    }
}

impl StratifiedSplitter {
    pub fn new(train_ratio: f64) -> Self {
        Self { train_ratio }
    }

    pub fn train_ratio(&self) -> f64 {
        self.train_ratio
    }

    /// Number of (train, test) rows for `n` rows.
    pub fn sizes(
        &self,
        n: usize,
    ) -> PrepResult<(usize, usize)> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(PrepError::InvalidConfig(format!(
                "train ratio must lie in (0, 1), got {}",
                self.train_ratio
            )));
        }
        // The epsilon keeps 0.2 * 10 from rounding up to 3.
        let n_test = ((1.0 - self.train_ratio) * n as f64 - 1e-9).ceil().max(0.0) as usize;
        let n_test = n_test.min(n);
        Ok((n - n_test, n_test))
    }

    pub fn split_indices<R: Rng + ?Sized>(
        &self,
        labels: &[Label],
        rng: &mut R,
    ) -> PrepResult<SplitIndices> {
        let mut classes: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in labels.iter().enumerate() {
            classes.entry(label).or_default().push(idx);
        }
        if classes.len() < 2 {
            return Err(PrepError::InsufficientLabelDiversity {
                found: classes.keys().copied().collect(),
            });
        }
        if let Some((&label, members)) = classes
            .iter()
            .find(|(_, members)| members.len() < MIN_CLASS_MEMBERS)
        {
            return Err(PrepError::ClassTooSmall {
                label,
                count: members.len(),
                required: MIN_CLASS_MEMBERS,
            });
        }

        let n = labels.len();
        let (n_train, n_test) = self.sizes(n)?;
        if n_train < classes.len() || n_test < classes.len() {
            return Err(PrepError::InvalidConfig(format!(
                "split of {} rows into {} train / {} test cannot hold all {} classes",
                n,
                n_train,
                n_test,
                classes.len()
            )));
        }

        let counts: Vec<usize> = classes.values().map(Vec::len).collect();
        let train_counts = allocate(&counts, n_train);

        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);
        for (mut members, n_class_train) in classes.into_values().zip(train_counts) {
            members.shuffle(rng);
            let rest = members.split_off(n_class_train);
            train.extend(members);
            test.extend(rest);
        }
        train.shuffle(rng);
        test.shuffle(rng);

        Ok(SplitIndices { train, test })
    }

    pub fn split<R: Rng + ?Sized>(
        &self,
        rows: &[NormalizedRow],
        rng: &mut R,
    ) -> PrepResult<Split> {
        let labels: Vec<Label> = rows.iter().map(NormalizedRow::label).collect();
        let indices = self.split_indices(&labels, rng)?;
        let split = Split {
            train: Partition::from_indices(rows, &indices.train),
            test:  Partition::from_indices(rows, &indices.test),
        };
        info!(
            "Split {} rows into {} train / {} test (label 1 share {:.3} / {:.3})",
            rows.len(),
            split.train.len(),
            split.test.len(),
            split.train.positive_ratio(),
            split.test.positive_ratio()
        );
        Ok(split)
    }
}

/// Distributes `total` draws over classes proportionally to `counts`:
/// floors first, then one extra draw for the largest fractional parts
/// (earlier classes first on ties).
fn allocate(
    counts: &[usize],
    total: usize,
) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| total as f64 * c as f64 / n as f64)
        .collect();
    let mut alloc: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let assigned: usize = alloc.iter().sum();
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = exact[a] - exact[a].floor();
        let frac_b = exact[b] - exact[b].floor();
        frac_b.total_cmp(&frac_a).then(a.cmp(&b))
    });
    for &class in order.iter().take(total.saturating_sub(assigned)) {
        alloc[class] = (alloc[class] + 1).min(counts[class]);
    }
    alloc
}
