//! Number, memory and colour formatting helpers shared by the text views.

use ndarray::{ArrayViewD, Axis};

use crate::config::Config;
use crate::element::Element;

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Format a single number the way summaries print it.
///
/// Integral values (`is_float == false`) print exactly. Floats print with
/// `cfg.precision` digits, switching to scientific notation outside the
/// `[10^threshold_min, 10^threshold_max)` magnitude band unless
/// `cfg.sci_mode` forces the choice.
///
/// ```
/// # use lovely_core::{format::pretty_str, Config};
/// let cfg = Config::default();
/// assert_eq!(pretty_str(-393.7761, true, &cfg), "-393.776");
/// assert_eq!(pretty_str(1180.2, true, &cfg), "1.180e+03");
/// assert_eq!(pretty_str(-4.054e-5, true, &cfg), "-4.054e-05");
/// assert_eq!(pretty_str(42.0, false, &cfg), "42");
/// ```
pub fn pretty_str(x: f64, is_float: bool, cfg: &Config) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if !is_float {
        return format!("{x:.0}");
    }

    let sci = x != 0.0
        && cfg.sci_mode.unwrap_or_else(|| {
            let mag = x.abs();
            // the upper bound applies to the digits that would be printed
            let shown: f64 = format!("{mag:.prec$}", prec = cfg.precision)
                .parse()
                .unwrap_or(mag);
            shown >= 10f64.powi(cfg.threshold_max) || mag < 10f64.powi(cfg.threshold_min)
        });

    if sci {
        sci_str(x, cfg.precision)
    } else {
        format!("{x:.prec$}", prec = cfg.precision)
    }
}

/// Scientific notation with a signed, at least two-digit exponent
/// (`1.180e+03`).
fn sci_str(x: f64, precision: usize) -> String {
    let raw = format!("{x:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

/// Format one array element: floats through [`pretty_str`], everything else
/// through its own `Display`.
pub fn element_str<A: Element>(value: A, cfg: &Config) -> String {
    if A::IS_FLOAT {
        pretty_str(value.to_f64(), true, cfg)
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

const MEM_UNITS: [&str; 5] = ["b", "Kb", "Mb", "Gb", "Tb"];

/// Human-readable memory size: `50b`, `4.7Kb`, `0.4Mb`.
///
/// The value moves to the next unit while it is at least 100 in the current
/// one, so sizes read as small decimals of the larger unit.
#[allow(clippy::cast_precision_loss)]
pub fn mem_str(bytes: usize) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 100.0 && unit + 1 < MEM_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}{}", MEM_UNITS[0])
    } else {
        format!("{value:.1}{}", MEM_UNITS[unit])
    }
}

// ---------------------------------------------------------------------------
// Joining and colour
// ---------------------------------------------------------------------------

/// Join the non-empty parts with `sep`.
pub fn sparse_join<I, S>(parts: I, sep: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(sep);
        }
        out.push_str(part);
    }
    out
}

/// Terminal colours used by the text views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Grey,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Self::Red => "31",
            Self::Grey => "90",
        }
    }
}

/// Wrap `s` in ANSI colour codes when `enabled`.
pub fn ansi_color(s: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{}m{s}\x1b[0m", color.code())
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Plain values
// ---------------------------------------------------------------------------

/// Render every value as nested brackets, e.g. `[[1.000, 2.000], [3.000, 4.000]]`.
///
/// A 0-d array renders as its bare value.
pub fn plain_values<A: Element>(view: &ArrayViewD<'_, A>, cfg: &Config) -> String {
    let mut out = String::new();
    push_values(view, cfg, &mut out);
    out
}

fn push_values<A: Element>(view: &ArrayViewD<'_, A>, cfg: &Config, out: &mut String) {
    if view.ndim() == 0 {
        if let Some(v) = view.iter().next() {
            out.push_str(&element_str(*v, cfg));
        }
        return;
    }
    out.push('[');
    for (i, sub) in view.axis_iter(Axis(0)).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_values(&sub, cfg, out);
    }
    out.push(']');
}
