//! `Display` for [`Lovely`]: the one-line statistical summary.
//!
//! ```text
//! tensor[3, 196, 196] n=115248 (0.4Mb) x∈[-2.118, 2.640] μ=-0.388 σ=1.073
//! ```

use core::fmt;

use ndarray::{ArrayViewD, Axis};

use crate::config::Config;
use crate::element::{Element, DEFAULT_DTYPE};
use crate::format::{ansi_color, element_str, mem_str, plain_values, pretty_str, sparse_join, Color};
use crate::stats::Stats;

use super::Lovely;

/// Arrays with at most this many elements also print their values.
const SHOW_VALUES_UP_TO: usize = 10;

/// Build the summary line for `view`.
pub fn summary<A: Element>(view: &ArrayViewD<'_, A>, cfg: &Config, with_values: bool) -> String {
    let stats = Stats::compute(view);
    let mut parts: Vec<String> = Vec::with_capacity(8);

    let mut head = String::from("tensor");
    if view.ndim() > 0 {
        head.push_str(&shape_str(view.shape()));
    }
    parts.push(head);

    if A::DTYPE != DEFAULT_DTYPE {
        parts.push(A::DTYPE.to_string());
    }
    if view.ndim() > 1 && stats.numel > 0 {
        parts.push(format!("n={}", stats.numel));
    }
    if stats.nbytes > cfg.show_mem_above {
        parts.push(format!("({})", mem_str(stats.nbytes)));
    }

    if stats.numel == 0 {
        parts.push("empty".to_string());
        return sparse_join(parts, " ");
    }

    if stats.numel == 1 {
        if let Some(&v) = view.iter().next() {
            parts.push(element_str(v, cfg));
        }
    } else if stats.all_zeros {
        parts.push(ansi_color("all_zeros", Color::Grey, cfg.color));
    } else {
        if let (Some((min, max)), Some(mean)) = (finite_range(view), stats.mean) {
            parts.push(format!(
                "x∈[{}, {}]",
                element_str(min, cfg),
                element_str(max, cfg)
            ));
            parts.push(format!("μ={}", pretty_str(mean, true, cfg)));
        }
        if let Some(std) = stats.std {
            parts.push(format!("σ={}", pretty_str(std, true, cfg)));
        }
    }

    if stats.n_pos_inf > 0 {
        parts.push(ansi_color("+Inf!", Color::Red, cfg.color));
    }
    if stats.n_neg_inf > 0 {
        parts.push(ansi_color("-Inf!", Color::Red, cfg.color));
    }
    if stats.n_nan > 0 {
        parts.push(ansi_color("NaN!", Color::Red, cfg.color));
    }

    if with_values && stats.numel > 1 && stats.numel <= SHOW_VALUES_UP_TO {
        parts.push(plain_values(view, cfg));
    }

    sparse_join(parts, " ")
}

/// Smallest and largest finite element, compared as `A` so that wide
/// integers print every digit.
fn finite_range<A: Element>(view: &ArrayViewD<'_, A>) -> Option<(A, A)> {
    view.iter()
        .copied()
        .filter(|v| v.to_f64().is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )),
        })
}

fn shape_str(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    format!("[{}]", dims.join(", "))
}

/// Write the summary of `view` and, while `depth` allows, of its sub-arrays.
fn write_tree<A: Element>(
    f: &mut fmt::Formatter<'_>,
    view: &ArrayViewD<'_, A>,
    cfg: &Config,
    depth: usize,
    level: usize,
) -> fmt::Result {
    write!(f, "{}", summary(view, cfg, true))?;
    if depth == 0 || view.ndim() == 0 {
        return Ok(());
    }

    let pad = " ".repeat(cfg.indent * (level + 1));
    for (i, sub) in view.axis_iter(Axis(0)).enumerate() {
        if i == cfg.deeper_width {
            write!(f, "\n{pad}...")?;
            break;
        }
        write!(f, "\n{pad}")?;
        write_tree(f, &sub, cfg, depth - 1, level + 1)?;
    }
    Ok(())
}

impl<A: Element> fmt::Display for Lovely<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plain {
            return write!(f, "{}", self.view);
        }
        if self.verbose {
            write!(f, "{}", summary(&self.view, &self.cfg, false))?;
            return write!(f, "\n{}", self.view);
        }
        write_tree(f, &self.view, &self.cfg, self.depth, 0)
    }
}
