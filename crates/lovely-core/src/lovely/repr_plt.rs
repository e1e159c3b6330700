//! Value distribution plots rendered as SVG.
//!
//! A plot shows a density-normalized histogram of all finite values, a
//! Gaussian kernel density estimate over (a sample of) those values, shaded
//! bands at one and two standard deviations around the mean, and markers at
//! the minimum, maximum and mean. The summary line is used as the title.

use std::fmt::Write as _;
use std::path::Path;

use ndarray::ArrayViewD;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::Config;
use crate::element::Element;
use crate::error::{LovelyError, Result};
use crate::format::pretty_str;

use super::repr_str::summary;

/// Where the x axis is centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Center {
    /// Symmetric around zero.
    #[default]
    Zero,
    /// From the minimum to the maximum.
    Range,
    /// Symmetric around the mean.
    Mean,
}

/// Options for [`plt`].
#[derive(Debug, Clone, PartialEq)]
pub struct PltOptions {
    pub center: Center,
    /// At most this many values feed the density estimate.
    pub max_s: usize,
    /// Include exact zeros.
    pub plt0: bool,
    /// SVG width in pixels.
    pub width: usize,
    /// SVG height in pixels.
    pub height: usize,
}

impl Default for PltOptions {
    fn default() -> Self {
        Self {
            center: Center::Zero,
            max_s: 10_000,
            plt0: true,
            width: 966,
            height: 240,
        }
    }
}

const SAMPLE_SEED: u64 = 0x5eed;
const KDE_POINTS: usize = 200;
const MIN_BINS: usize = 10;
const MAX_BINS: usize = 100;
const MARGIN_X: f64 = 40.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 24.0;

/// One histogram bar: `[lo, hi)` with a density-normalized height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub density: f64,
}

/// A computed distribution plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    title: String,
    x_range: (f64, f64),
    bins: Vec<Bin>,
    kde: Vec<(f64, f64)>,
    n_values: usize,
    n_sampled: usize,
    min: f64,
    max: f64,
    mean: f64,
    std: Option<f64>,
    width: usize,
    height: usize,
    labels: (String, String),
}

impl Plot {
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    #[inline]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Density estimate as `(x, density)` points; empty when the values have
    /// no spread.
    #[inline]
    pub fn kde(&self) -> &[(f64, f64)] {
        &self.kde
    }

    /// Number of values plotted in the histogram.
    #[inline]
    pub fn n_values(&self) -> usize {
        self.n_values
    }

    /// Number of values the density estimate was computed from.
    #[inline]
    pub fn n_sampled(&self) -> usize {
        self.n_sampled
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn std(&self) -> Option<f64> {
        self.std
    }

    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.width as f64, self.height as f64);
        let plot_w = (w - 2.0 * MARGIN_X).max(1.0);
        let plot_h = (h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let (x0, x1) = self.x_range;
        let sx = |x: f64| MARGIN_X + (x - x0) / (x1 - x0) * plot_w;
        let y_max = self
            .bins
            .iter()
            .map(|b| b.density)
            .chain(self.kde.iter().map(|&(_, d)| d))
            .fold(0.0_f64, f64::max)
            .max(f64::MIN_POSITIVE);
        let base = MARGIN_TOP + plot_h;
        let sy = |d: f64| base - d / y_max * plot_h;

        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

        if let Some(sd) = self.std {
            for (k, opacity) in [(2.0, 0.08), (1.0, 0.15)] {
                let lo = sx((self.mean - k * sd).max(x0));
                let hi = sx((self.mean + k * sd).min(x1));
                let _ = writeln!(
                    svg,
                    r#"<rect x="{lo:.2}" y="{MARGIN_TOP:.2}" width="{:.2}" height="{plot_h:.2}" fill="gray" fill-opacity="{opacity}"/>"#,
                    (hi - lo).max(0.0)
                );
            }
        }

        for b in &self.bins {
            let (bx0, bx1) = (sx(b.lo), sx(b.hi));
            let top = sy(b.density);
            let _ = writeln!(
                svg,
                r#"<rect x="{bx0:.2}" y="{top:.2}" width="{:.2}" height="{:.2}" fill="steelblue" fill-opacity="0.6"/>"#,
                (bx1 - bx0).max(0.0),
                base - top
            );
        }

        if !self.kde.is_empty() {
            let points: Vec<String> = self
                .kde
                .iter()
                .map(|&(x, d)| format!("{:.2},{:.2}", sx(x), sy(d)))
                .collect();
            let _ = writeln!(
                svg,
                r#"<polyline points="{}" fill="none" stroke="navy" stroke-width="1.5"/>"#,
                points.join(" ")
            );
        }

        for (x, color) in [(self.min, "blue"), (self.max, "red"), (self.mean, "black")] {
            let px = sx(x);
            let _ = writeln!(
                svg,
                r#"<line x1="{px:.2}" y1="{MARGIN_TOP:.2}" x2="{px:.2}" y2="{base:.2}" stroke="{color}" stroke-width="1"/>"#
            );
        }

        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_X:.2}" y1="{base:.2}" x2="{:.2}" y2="{base:.2}" stroke="black"/>"#,
            MARGIN_X + plot_w
        );
        let _ = writeln!(
            svg,
            r#"<text x="{MARGIN_X:.2}" y="{:.2}" font-family="monospace" font-size="11" text-anchor="middle">{}</text>"#,
            h - 6.0,
            escape_xml(&self.labels.0)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-family="monospace" font-size="11" text-anchor="middle">{}</text>"#,
            MARGIN_X + plot_w,
            h - 6.0,
            escape_xml(&self.labels.1)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{MARGIN_X:.2}" y="16" font-family="monospace" font-size="12">{}</text>"#,
            escape_xml(&self.title)
        );
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the SVG document to `path`.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg()).map_err(|e| LovelyError::io(path, e))?;
        debug!(path = %path.display(), "saved plot");
        Ok(())
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn mean_std(values: &[f64]) -> (f64, Option<f64>) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, None);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, Some(var.sqrt()))
}

fn x_range(center: Center, min: f64, max: f64, mean: f64) -> (f64, f64) {
    let (lo, hi) = match center {
        Center::Zero => {
            let m = min.abs().max(max.abs());
            (-m, m)
        }
        Center::Range => (min, max),
        Center::Mean => {
            let d = (mean - min).max(max - mean);
            (mean - d, mean + d)
        }
    };
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn histogram(values: &[f64], (lo, hi): (f64, f64)) -> Vec<Bin> {
    let n_bins = ((values.len() as f64).sqrt().ceil() as usize).clamp(MIN_BINS, MAX_BINS);
    let width = (hi - lo) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let i = (((v - lo) / width) as usize).min(n_bins - 1);
        counts[i] += 1;
    }
    let total = values.len() as f64 * width;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| Bin {
            lo: lo + i as f64 * width,
            hi: lo + (i + 1) as f64 * width,
            density: c as f64 / total,
        })
        .collect()
}

/// Scott's rule for one dimension: `σ · n^(-1/5)`.
fn scott_bandwidth(sd: f64, n: f64) -> f64 {
    sd * n.powf(-0.2)
}

#[allow(clippy::cast_precision_loss)]
fn kde(sample: &[f64], (lo, hi): (f64, f64)) -> Vec<(f64, f64)> {
    let (_, std) = mean_std(sample);
    let Some(sd) = std.filter(|s| *s > 0.0) else {
        return Vec::new();
    };
    let n = sample.len() as f64;
    let bw = scott_bandwidth(sd, n);
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());
    (0..KDE_POINTS)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (KDE_POINTS - 1) as f64;
            let d: f64 = sample
                .iter()
                .map(|&s| (-0.5 * ((x - s) / bw).powi(2)).exp())
                .sum();
            (x, d * norm)
        })
        .collect()
}

/// Compute the distribution plot of `view`.
pub fn plt<A: Element>(view: &ArrayViewD<'_, A>, opts: &PltOptions, cfg: &Config) -> Result<Plot> {
    if opts.max_s == 0 {
        return Err(LovelyError::invalid_argument("max_s must be at least 1"));
    }
    let values: Vec<f64> = view
        .iter()
        .map(|v| v.to_f64())
        .filter(|v| v.is_finite() && (opts.plt0 || *v != 0.0))
        .collect();
    if values.is_empty() {
        return Err(LovelyError::NoFiniteValues {
            shape: view.shape().to_vec(),
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (mean, std) = mean_std(&values);
    let range = x_range(opts.center, min, max, mean);

    let sample: Vec<f64> = if values.len() > opts.max_s {
        let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
        rand::seq::index::sample(&mut rng, values.len(), opts.max_s)
            .into_iter()
            .map(|i| values[i])
            .collect()
    } else {
        values.clone()
    };
    debug!(
        values = values.len(),
        sampled = sample.len(),
        center = ?opts.center,
        "computing distribution plot"
    );

    let text_cfg = Config {
        color: false,
        ..cfg.clone()
    };
    let mut title = summary(view, &text_cfg, false);
    if !opts.plt0 {
        title.push_str(" (zeros ignored)");
    }

    Ok(Plot {
        title,
        x_range: range,
        bins: histogram(&values, range),
        kde: kde(&sample, range),
        n_values: values.len(),
        n_sampled: sample.len(),
        min,
        max,
        mean,
        std,
        width: opts.width,
        height: opts.height,
        labels: (
            pretty_str(range.0, true, &text_cfg),
            pretty_str(range.1, true, &text_cfg),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lovely;
    use ndarray::{arr1, Array1};

    fn cfg() -> Config {
        Config::default()
    }

    fn plot<A: Element>(a: &Array1<A>, opts: &PltOptions) -> Result<Plot> {
        Lovely::new(a.view().into_dyn()).with_config(cfg()).plt(opts)
    }

    #[test]
    fn test_center_modes() {
        assert_eq!(x_range(Center::Zero, -1.0, 3.0, 1.0), (-3.0, 3.0));
        assert_eq!(x_range(Center::Range, -1.0, 3.0, 1.0), (-1.0, 3.0));
        assert_eq!(x_range(Center::Mean, -1.0, 3.0, 0.0), (-3.0, 3.0));
        // degenerate ranges are widened
        assert_eq!(x_range(Center::Range, 2.0, 2.0, 2.0), (1.0, 3.0));
    }

    #[test]
    fn test_histogram_density_integrates_to_one() {
        let values: Vec<f64> = (0..1000).map(|i| f64::from(i) / 999.0).collect();
        let bins = histogram(&values, (0.0, 1.0));
        assert_eq!(bins.len(), 32);
        let area: f64 = bins.iter().map(|b| b.density * (b.hi - b.lo)).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_plot_basic() {
        let a = Array1::from_shape_fn(500, |i| (i as f32 - 250.0) / 100.0);
        let p = plt(&a.view().into_dyn(), &PltOptions::default(), &cfg()).unwrap();
        assert_eq!(p.n_values(), 500);
        assert_eq!(p.n_sampled(), 500);
        assert_eq!(p.x_range(), (-2.5, 2.5));
        assert_eq!(p.kde().len(), KDE_POINTS);
        assert!(p.title().starts_with("tensor[500] (2.0Kb) x∈[-2.500, 2.490]"));
        assert!(!p.title().contains('\x1b'));
    }

    #[test]
    fn test_plt0_ignores_zeros() {
        let a = arr1(&[0.0_f32, 0.0, 0.0, 2.0, 4.0]);
        let with = plot(&a, &PltOptions::default()).unwrap();
        let without = plot(
            &a,
            &PltOptions {
                plt0: false,
                ..PltOptions::default()
            },
        )
        .unwrap();
        assert_eq!(with.n_values(), 5);
        assert_eq!(without.n_values(), 2);
        assert!((without.mean() - 3.0).abs() < 1e-12);
        assert!(without.title().ends_with("(zeros ignored)"));
    }

    #[test]
    fn test_sampling_limit() {
        let a = Array1::from_shape_fn(5000, |i| i as f64);
        let opts = PltOptions {
            max_s: 100,
            ..PltOptions::default()
        };
        let p = plot(&a, &opts).unwrap();
        assert_eq!(p.n_values(), 5000);
        assert_eq!(p.n_sampled(), 100);
        // fixed seed, so the plot is reproducible
        assert_eq!(p, plot(&a, &opts).unwrap());
    }

    #[test]
    fn test_kde_bandwidth() {
        assert!((scott_bandwidth(2.0, 32.0) - 1.0).abs() < 1e-12);

        let sample = [-1.0, 1.0];
        let bw = scott_bandwidth(2f64.sqrt(), 2.0);
        let curve = kde(&sample, (-1.0, 1.0));
        let expected = (1.0 + (-0.5 * (2.0 / bw).powi(2)).exp())
            / (2.0 * bw * (2.0 * std::f64::consts::PI).sqrt());
        assert_eq!(curve[0].0, -1.0);
        assert!((curve[0].1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constant_values_have_no_kde() {
        let a = Array1::<f32>::from_elem(10, 3.0);
        let p = plot(&a, &PltOptions::default()).unwrap();
        assert!(p.kde().is_empty());
        assert_eq!(p.std(), Some(0.0));
    }

    #[test]
    fn test_no_finite_values() {
        let a = arr1(&[f32::NAN, f32::INFINITY]);
        assert!(matches!(
            plot(&a, &PltOptions::default()),
            Err(LovelyError::NoFiniteValues { .. })
        ));
        let zeros = Array1::<f32>::zeros(4);
        let opts = PltOptions {
            plt0: false,
            ..PltOptions::default()
        };
        assert!(plot(&zeros, &opts).is_err());
    }

    #[test]
    fn test_svg_output() {
        let a = arr1(&[1.0_f32, 2.0, 2.5, 3.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let svg = plot(&a, &PltOptions::default()).unwrap().to_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("tensor[11] x∈[1.000, 16.000]"));
        assert!(svg.contains(r#"stroke="red""#));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
