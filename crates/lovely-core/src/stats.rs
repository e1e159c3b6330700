//! Summary statistics over an array view.
//!
//! Range, mean and standard deviation only look at finite values; NaN and
//! infinities are counted separately so a single bad value never hides the
//! distribution of the rest.

use ndarray::ArrayViewD;

use crate::element::Element;

/// Statistics of one array, accumulated in `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub numel: usize,
    pub nbytes: usize,
    /// Smallest finite value.
    pub min: Option<f64>,
    /// Largest finite value.
    pub max: Option<f64>,
    /// Mean of the finite values.
    pub mean: Option<f64>,
    /// Bessel-corrected standard deviation of the finite values; `None` with
    /// fewer than two of them.
    pub std: Option<f64>,
    pub n_finite: usize,
    pub n_nan: usize,
    pub n_pos_inf: usize,
    pub n_neg_inf: usize,
    /// Every element is exactly zero (false for empty arrays).
    pub all_zeros: bool,
}

impl Stats {
    /// Compute statistics for every element of `view`.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute<A: Element>(view: &ArrayViewD<'_, A>) -> Self {
        let numel = view.len();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut n_finite = 0usize;
        let mut n_nan = 0usize;
        let mut n_pos_inf = 0usize;
        let mut n_neg_inf = 0usize;
        let mut all_zeros = numel > 0;

        // Welford's running mean / variance.
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;

        for &v in view.iter() {
            let x = v.to_f64();
            if x != 0.0 {
                all_zeros = false;
            }
            if x.is_nan() {
                n_nan += 1;
                continue;
            }
            if x.is_infinite() {
                if x > 0.0 {
                    n_pos_inf += 1;
                } else {
                    n_neg_inf += 1;
                }
                continue;
            }
            n_finite += 1;
            min = min.min(x);
            max = max.max(x);
            let delta = x - mean;
            mean += delta / n_finite as f64;
            m2 += delta * (x - mean);
        }

        let (min, max, mean) = if n_finite > 0 {
            (Some(min), Some(max), Some(mean))
        } else {
            (None, None, None)
        };
        let std = (n_finite > 1).then(|| (m2 / (n_finite - 1) as f64).sqrt());

        Self {
            numel,
            nbytes: numel * A::size_bytes(),
            min,
            max,
            mean,
            std,
            n_finite,
            n_nan,
            n_pos_inf,
            n_neg_inf,
            all_zeros,
        }
    }

    /// Whether any NaN or infinity was seen.
    pub fn has_bad_values(&self) -> bool {
        self.n_nan + self.n_pos_inf + self.n_neg_inf > 0
    }
}
