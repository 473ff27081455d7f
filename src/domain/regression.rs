//! Rate predictor: standardized ridge regression on moving-average features.
//!
//! Training follows the usual split / scale / fit / evaluate sequence. The
//! fitted [`RidgeModel`] carries its own scaler, so callers hand it raw
//! features.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::FxTraderError;
use super::signal::Features;
use crate::ports::predictor_port::Predictor;

const N_FEATURES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub features: Features,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub ridge_alpha: f64,
    pub test_fraction: f64,
    pub split_seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            ridge_alpha: 1.0,
            test_fraction: 0.2,
            split_seed: 42,
        }
    }
}

/// Per-feature standardization: (x - mean) / std.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; N_FEATURES],
    scale: [f64; N_FEATURES],
}

impl StandardScaler {
    pub fn fit(rows: &[TrainingRow]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; N_FEATURES];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row.features.as_array()) {
                *m += x / n;
            }
        }

        let mut var = [0.0; N_FEATURES];
        for row in rows {
            for (j, x) in row.features.as_array().iter().enumerate() {
                var[j] += (x - mean[j]).powi(2) / n;
            }
        }

        // Constant columns keep their centred value instead of dividing by zero.
        let scale = var.map(|v| if v > 0.0 { v.sqrt() } else { 1.0 });
        StandardScaler { mean, scale }
    }

    pub fn transform(&self, features: &Features) -> [f64; N_FEATURES] {
        let raw = features.as_array();
        std::array::from_fn(|j| (raw[j] - self.mean[j]) / self.scale[j])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RidgeModel {
    scaler: StandardScaler,
    intercept: f64,
    coefficients: [f64; N_FEATURES],
}

impl RidgeModel {
    /// Fit on raw rows. The intercept is not penalized.
    pub fn fit(rows: &[TrainingRow], alpha: f64) -> Result<Self, FxTraderError> {
        if rows.len() < 2 {
            return Err(FxTraderError::Model {
                reason: format!("need at least 2 training rows, got {}", rows.len()),
            });
        }

        let scaler = StandardScaler::fit(rows);
        let n = rows.len() as f64;
        let y_mean = rows.iter().map(|r| r.rate).sum::<f64>() / n;

        // Scaled features are centred, so the intercept is the target mean and
        // the coefficients solve (X'X + alpha*I) w = X'(y - y_mean).
        let mut xtx = [[0.0; N_FEATURES]; N_FEATURES];
        let mut xty = [0.0; N_FEATURES];
        for row in rows {
            let x = scaler.transform(&row.features);
            let y = row.rate - y_mean;
            for i in 0..N_FEATURES {
                xty[i] += x[i] * y;
                for j in 0..N_FEATURES {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }
        for (i, row) in xtx.iter_mut().enumerate() {
            row[i] += alpha;
        }

        let coefficients = solve(xtx, xty).ok_or_else(|| FxTraderError::Model {
            reason: "singular normal equations; try a positive ridge_alpha".into(),
        })?;

        Ok(RidgeModel {
            scaler,
            intercept: y_mean,
            coefficients,
        })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> [f64; N_FEATURES] {
        self.coefficients
    }
}

impl Predictor for RidgeModel {
    fn predict(&self, features: &Features) -> f64 {
        let x = self.scaler.transform(features);
        self.intercept
            + x.iter()
                .zip(self.coefficients.iter())
                .map(|(a, b)| a * b)
                .sum::<f64>()
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(
    mut a: [[f64; N_FEATURES]; N_FEATURES],
    mut b: [f64; N_FEATURES],
) -> Option<[f64; N_FEATURES]> {
    for col in 0..N_FEATURES {
        let pivot = (col..N_FEATURES).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..N_FEATURES {
            let factor = a[row][col] / a[col][col];
            for k in col..N_FEATURES {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N_FEATURES];
    for row in (0..N_FEATURES).rev() {
        let tail: f64 = (row + 1..N_FEATURES).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Shuffle with a fixed seed and split off `test_fraction` of the rows.
pub fn train_test_split(
    rows: &[TrainingRow],
    test_fraction: f64,
    seed: u64,
) -> (Vec<TrainingRow>, Vec<TrainingRow>) {
    let mut shuffled = rows.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
    let n_test = (rows.len() as f64 * test_fraction).ceil() as usize;
    let n_test = n_test.min(rows.len().saturating_sub(2));
    let train = shuffled.split_off(n_test);
    (train, shuffled)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

pub fn evaluate(model: &dyn Predictor, rows: &[TrainingRow]) -> (f64, f64, f64) {
    if rows.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let n = rows.len() as f64;
    let mean = rows.iter().map(|r| r.rate).sum::<f64>() / n;

    let mut sse = 0.0;
    let mut sae = 0.0;
    let mut sst = 0.0;
    for row in rows {
        let err = row.rate - model.predict(&row.features);
        sse += err * err;
        sae += err.abs();
        sst += (row.rate - mean).powi(2);
    }

    let r2 = if sst > 0.0 { 1.0 - sse / sst } else { 0.0 };
    (sse / n, sae / n, r2)
}

/// Split, fit on the training part and score on the held-out part. When the
/// held-out part is empty the model is scored on its own training rows.
pub fn train(
    rows: &[TrainingRow],
    config: &TrainingConfig,
) -> Result<(RidgeModel, Evaluation), FxTraderError> {
    let (train_rows, test_rows) = train_test_split(rows, config.test_fraction, config.split_seed);
    let model = RidgeModel::fit(&train_rows, config.ridge_alpha)?;

    let scored = if test_rows.is_empty() { &train_rows } else { &test_rows };
    let (mse, mae, r2) = evaluate(&model, scored);

    Ok((
        model,
        Evaluation {
            mse,
            mae,
            r2,
            train_rows: train_rows.len(),
            test_rows: test_rows.len(),
        },
    ))
}
