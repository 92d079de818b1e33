//! Matrix multiplication simulation.
//!
//! Performs a real dense NxN · NxN product over uniform random entries so the
//! reported aggregates look plausible. Only shape, sum and mean are reported.

use super::run_blocking;
use crate::config::DEFAULT_MAX_CONCURRENT_MATRIX;
use crate::domain::types::{MatrixOutput, SimulationOutput};
use crate::{ComputationKind, ComputeError, MatrixParams, Simulation};
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Matrix multiplication routine.
///
/// Each product holds three N² buffers for its whole run, so a permit is
/// taken before allocating. Clones share the same permits.
#[derive(Debug, Clone)]
pub struct MatrixMultiplication {
    permits: Arc<Semaphore>,
}

impl MatrixMultiplication {
    /// Routine running at most `max_concurrent` products at once (at least one)
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Products that could start right now without waiting
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for MatrixMultiplication {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_MATRIX)
    }
}

#[async_trait::async_trait]
impl Simulation for MatrixMultiplication {
    type Params = MatrixParams;
    type Output = SimulationOutput;

    fn kind(&self) -> ComputationKind {
        ComputationKind::MatrixMultiplication
    }

    async fn simulate(
        &self,
        data: &str,
        params: MatrixParams,
    ) -> Result<SimulationOutput, ComputeError> {
        let n = params.size;
        let flops = flop_count(n)?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ComputeError::TaskFailed("matrix permits closed".into()))?;
        let product = run_blocking(move || {
            let a = random_matrix(n);
            let b = random_matrix(n);
            multiply(&a, &b, n)
        })
        .await?;

        let result_sum: f64 = product.iter().sum();
        let result_mean = if product.is_empty() {
            None
        } else {
            Some(result_sum / product.len() as f64)
        };

        Ok(SimulationOutput::Matrix(MatrixOutput {
            operation: self.kind().operation(),
            input_data: data.to_string(),
            matrix_size: format!("{n}x{n}"),
            result_shape: [n, n],
            result_sum,
            result_mean,
            flops,
        }))
    }
}

/// 2·N³ multiply-adds
fn flop_count(n: usize) -> Result<u64, ComputeError> {
    (n as u64)
        .checked_pow(3)
        .and_then(|cube| cube.checked_mul(2))
        .ok_or_else(|| ComputeError::invalid("matrix_size", "flop count overflows"))
}

/// Row-major NxN matrix with entries in [0, 1)
fn random_matrix(n: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..n * n).map(|_| rng.gen::<f64>()).collect()
}

/// Row-major product, parallel over output rows
fn multiply(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut c = vec![0.0; n * n];
    c.par_chunks_mut(n.max(1))
        .enumerate()
        .for_each(|(i, row)| {
            for k in 0..n {
                let a_ik = a[i * n + k];
                let b_row = &b[k * n..(k + 1) * n];
                for (c_ij, b_kj) in row.iter_mut().zip(b_row) {
                    *c_ij += a_ik * b_kj;
                }
            }
        });
    c
}
