//! Binary logistic regression
//!
//! Minimizes `C * sum_i w_i * logloss_i + 0.5 * ||beta||^2` with Newton steps
//! and a backtracking line search. The intercept is not penalized. Sample
//! weights come from the class weights, so a "balanced" model weights each
//! class by `n / (2 * n_class)`.

use faer::prelude::SpSolver;
use faer::{Mat, Side};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::ClassifierParams;
use super::error::{PipelineError, Result};
use super::loader::column_as_f64;

/// Largest number of step halvings tried per Newton iteration
const MAX_LINE_SEARCH_STEPS: usize = 30;

/// Keeps the unpenalized intercept row of the Hessian positive definite
const INTERCEPT_RIDGE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Per-class sample weight as (weight for `false`, weight for `true`)
    pub class_weights: (f64, f64),
    pub params: ClassifierParams,
    /// Newton iterations used before convergence
    pub n_iter: usize,
    pub converged: bool,
}

impl LogisticRegression {
    /// Fit on a standardized feature matrix (rows are samples).
    pub fn fit(x: &Mat<f64>, y: &[bool], params: &ClassifierParams) -> Result<Self> {
        let n = x.nrows();
        let p = x.ncols();
        if n == 0 || p == 0 {
            return Err(PipelineError::Shape(format!(
                "Cannot fit on a {}x{} feature matrix",
                n, p
            )));
        }
        if y.len() != n {
            return Err(PipelineError::Shape(format!(
                "Feature rows ({}) and labels ({}) differ in length",
                n,
                y.len()
            )));
        }

        let n_pos = y.iter().filter(|v| **v).count();
        let n_neg = n - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(PipelineError::Value(
                "Training labels must contain both classes".to_string(),
            ));
        }

        let class_weights = if params.balanced {
            (
                n as f64 / (2.0 * n_neg as f64),
                n as f64 / (2.0 * n_pos as f64),
            )
        } else {
            (1.0, 1.0)
        };
        let w: Vec<f64> = y
            .iter()
            .map(|&label| if label { class_weights.1 } else { class_weights.0 })
            .collect();
        let t: Vec<f64> = y.iter().map(|&label| if label { 1.0 } else { 0.0 }).collect();

        // Design matrix with a trailing column of ones for the intercept
        let xa = Mat::from_fn(n, p + 1, |i, j| if j < p { x[(i, j)] } else { 1.0 });
        let mut theta = Mat::<f64>::zeros(p + 1, 1);

        let objective = |theta: &Mat<f64>| -> f64 {
            let z = xa.as_ref() * theta;
            let mut loss = 0.0;
            for i in 0..n {
                loss += w[i] * (softplus(z[(i, 0)]) - t[i] * z[(i, 0)]);
            }
            let penalty: f64 = (0..p).map(|j| theta[(j, 0)].powi(2)).sum();
            params.c * loss + 0.5 * penalty
        };

        let mut current = objective(&theta);
        let mut n_iter = 0;
        let mut converged = false;

        while n_iter < params.max_iter {
            let z = xa.as_ref() * &theta;
            let mut residual = Mat::<f64>::zeros(n, 1);
            let mut curvature = vec![0.0; n];
            for i in 0..n {
                let prob = sigmoid(z[(i, 0)]);
                residual[(i, 0)] = params.c * w[i] * (prob - t[i]);
                curvature[i] = params.c * w[i] * prob * (1.0 - prob);
            }

            let mut grad = xa.transpose() * &residual;
            for j in 0..p {
                grad[(j, 0)] += theta[(j, 0)];
            }

            let grad_max = (0..=p).map(|j| grad[(j, 0)].abs()).fold(0.0, f64::max);
            if grad_max < params.tol {
                converged = true;
                break;
            }

            let weighted = Mat::from_fn(n, p + 1, |i, j| curvature[i] * xa[(i, j)]);
            let mut hessian = xa.transpose() * &weighted;
            for j in 0..p {
                hessian[(j, j)] += 1.0;
            }
            hessian[(p, p)] += INTERCEPT_RIDGE;

            let step = newton_step(&hessian, &grad)?;

            // Backtrack until the objective decreases
            let mut scale = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_LINE_SEARCH_STEPS {
                let candidate =
                    Mat::from_fn(p + 1, 1, |j, _| theta[(j, 0)] - scale * step[(j, 0)]);
                let value = objective(&candidate);
                if value <= current {
                    theta = candidate;
                    current = value;
                    accepted = true;
                    break;
                }
                scale *= 0.5;
            }

            n_iter += 1;
            if !accepted {
                // No descent left at machine precision
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(
                max_iter = params.max_iter,
                "logistic regression did not converge"
            );
        }

        Ok(Self {
            coefficients: (0..p).map(|j| theta[(j, 0)]).collect(),
            intercept: theta[(p, 0)],
            class_weights,
            params: *params,
            n_iter,
            converged,
        })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Signed distance to the decision boundary for every row
    pub fn decision_function(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        if x.ncols() != self.n_features() {
            return Err(PipelineError::Shape(format!(
                "Model expects {} feature(s), got {}",
                self.n_features(),
                x.ncols()
            )));
        }
        Ok((0..x.nrows())
            .map(|i| {
                self.intercept
                    + self
                        .coefficients
                        .iter()
                        .enumerate()
                        .map(|(j, b)| b * x[(i, j)])
                        .sum::<f64>()
            })
            .collect())
    }

    /// Probability of the positive class for every row
    pub fn predict_proba(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        Ok(self.decision_function(x)?.into_iter().map(sigmoid).collect())
    }

    pub fn predict(&self, x: &Mat<f64>) -> Result<Vec<bool>> {
        Ok(self.decision_function(x)?.into_iter().map(|z| z > 0.0).collect())
    }
}

/// Build a row-major sample matrix from numeric columns; nulls are rejected.
pub fn feature_matrix(df: &DataFrame) -> Result<Mat<f64>> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let values = column_as_f64(df, name)?;
        let dense: Option<Vec<f64>> = values.into_iter().collect();
        let dense = dense.ok_or_else(|| {
            PipelineError::Value(format!("Feature '{}' contains missing values", name))
        })?;
        columns.push(dense);
    }

    Ok(Mat::from_fn(df.height(), names.len(), |i, j| columns[j][i]))
}

/// Fraction of predictions equal to the truth; 0 for empty input.
pub fn accuracy(predicted: &[bool], actual: &[bool]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Solve `hessian * step = grad` through a Cholesky factorization.
fn newton_step(hessian: &Mat<f64>, grad: &Mat<f64>) -> Result<Mat<f64>> {
    let llt = hessian.cholesky(Side::Lower).map_err(|_| {
        PipelineError::Value("Logistic regression Hessian is not positive definite".to_string())
    })?;
    let step = llt.solve(grad.as_ref());
    if (0..step.nrows()).any(|j| !step[(j, 0)].is_finite()) {
        return Err(PipelineError::Value(
            "Logistic regression Newton step is not finite".to_string(),
        ));
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Mat<f64>, Vec<bool>) {
        let xs = [-2.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.0];
        let x = Mat::from_fn(xs.len(), 1, |i, _| xs[i]);
        let y = xs.iter().map(|v| *v > 0.0).collect();
        (x, y)
    }

    #[test]
    fn test_fit_learns_positive_slope() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &ClassifierParams::default()).unwrap();
        assert!(model.converged);
        assert!(model.coefficients[0] > 0.0);
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_symmetric_data_has_zero_intercept() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &ClassifierParams::default()).unwrap();
        assert!(model.intercept.abs() < 1e-6);
    }

    #[test]
    fn test_balanced_class_weights() {
        let x = Mat::from_fn(4, 1, |i, _| i as f64);
        let y = vec![false, false, false, true];
        let model = LogisticRegression::fit(&x, &y, &ClassifierParams::default()).unwrap();
        assert!((model.class_weights.0 - 4.0 / 6.0).abs() < 1e-12);
        assert!((model.class_weights.1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_rejected() {
        let x = Mat::from_fn(3, 1, |i, _| i as f64);
        let err = LogisticRegression::fit(&x, &[true, true, true], &ClassifierParams::default())
            .unwrap_err();
        assert!(err.to_string().contains("both classes"));
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &ClassifierParams::default()).unwrap();
        for p in model.predict_proba(&x).unwrap() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_decision_function_checks_width() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &ClassifierParams::default()).unwrap();
        let wide = Mat::<f64>::zeros(2, 3);
        assert!(matches!(
            model.decision_function(&wide),
            Err(PipelineError::Shape(_))
        ));
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[true, false, true], &[true, true, true]), 2.0 / 3.0);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_newton_step_solves_system() {
        let a = Mat::from_fn(2, 2, |i, j| [[2.0, 1.0], [1.0, 3.0]][i][j]);
        let b = Mat::from_fn(2, 1, |i, _| [3.0, 5.0][i]);
        let x = newton_step(&a, &b).unwrap();
        assert!((x[(0, 0)] - 0.8).abs() < 1e-12);
        assert!((x[(1, 0)] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_newton_step_rejects_indefinite_hessian() {
        let a = Mat::from_fn(2, 2, |i, j| [[1.0, 0.0], [0.0, -1.0]][i][j]);
        let b = Mat::<f64>::zeros(2, 1);
        assert!(matches!(newton_step(&a, &b), Err(PipelineError::Value(_))));
    }

    #[test]
    fn test_feature_matrix_rejects_nulls() {
        let df = df! { "a" => [Some(1.0f64), None] }.unwrap();
        assert!(feature_matrix(&df).is_err());
    }
}
