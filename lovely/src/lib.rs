//! # lovely
//!
//! Human-friendly views of `ndarray` arrays: one-line statistical summaries,
//! RGB image previews, per-channel colour-mapped previews and value
//! distribution plots.
//!
//! ```
//! use lovely::prelude::*;
//! use ndarray::Array3;
//!
//! let image = Array3::<f32>::zeros((3, 32, 32));
//! let line = image.lovely().color(false).to_string();
//! assert_eq!(line, "tensor[3, 32, 32] n=3072 (12.0Kb) all_zeros");
//! ```

pub use lovely_core as core;

/// Glob-import convenience: `use lovely::prelude::*;`
pub mod prelude {
    pub use lovely_core::prelude::*;
}
