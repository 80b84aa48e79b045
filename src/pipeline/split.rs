//! Seeded train/test partitioning

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::{PipelineError, Result};

/// Immutable (train, test) pair produced once per run
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    train: DataFrame,
    test: DataFrame,
}

impl DatasetSplit {
    pub fn train(&self) -> &DataFrame {
        &self.train
    }

    pub fn test(&self) -> &DataFrame {
        &self.test
    }

    pub fn into_parts(self) -> (DataFrame, DataFrame) {
        (self.train, self.test)
    }
}

/// Partition rows into train and test subsets.
///
/// Rows are permuted with a `StdRng` seeded from `seed`; the first
/// `ceil(n * test_fraction)` positions of the permutation form the test set
/// and the rest the training set. The same input and seed always give the
/// same membership and order.
pub fn train_test_split(df: &DataFrame, test_fraction: f64, seed: u64) -> Result<DatasetSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::Value(format!(
            "test_fraction must be strictly between 0 and 1, got {}",
            test_fraction
        )));
    }

    let n = df.height();
    if n < 2 {
        return Err(PipelineError::Shape(format!(
            "Need at least 2 rows to split into train and test, got {}",
            n
        )));
    }

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.clamp(1, n - 1);

    let mut indices: Vec<IdxSize> = (0..n as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_idx = IdxCa::from_vec("test".into(), indices[..n_test].to_vec());
    let train_idx = IdxCa::from_vec("train".into(), indices[n_test..].to_vec());

    let split = DatasetSplit {
        train: df.take(&train_idx)?,
        test: df.take(&test_idx)?,
    };

    tracing::info!(
        seed,
        train_rows = split.train.height(),
        test_rows = split.test.height(),
        "split dataset"
    );

    Ok(split)
}
