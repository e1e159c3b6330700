//! `lovely-core` — summaries, image previews and value plots for `ndarray`
//! arrays.
//!
//! Provides the [`Lovely`] wrapper and the [`LovelyExt`] extension trait, the
//! global display [`Config`], and the environment switch that routes [`repr`]
//! through lovely summaries.
//!
//! # Design
//!
//! - The host array types are never modified; every view is an explicit
//!   wrapper constructed by the caller.
//! - Statistics are accumulated in `f64` over finite values only.
//! - Image views return an owned [`RgbImage`]; plots return a [`Plot`] that
//!   renders to SVG.

pub mod activate;
pub mod colormap;
pub mod config;
pub mod element;
pub mod error;
pub mod format;
pub mod image;
pub mod lovely;
pub mod stats;

// Re-export key types at crate root for convenience.
pub use activate::{activate, activate_from_env, deactivate, is_active, repr, Repr};
pub use colormap::{Colormap, Rgb};
pub use config::{get_config, scoped_config, set_config, update_config, Config, ConfigGuard};
pub use element::Element;
pub use error::{LovelyError, Result};
pub use image::RgbImage;
pub use lovely::repr_rgb::Layout;
pub use lovely::{Center, ChansOptions, Lovely, LovelyExt, Plot, PltOptions, RgbOptions};
pub use stats::Stats;

/// Items intended for glob-import: `use lovely_core::prelude::*;`
pub mod prelude {
    pub use crate::activate::{activate, activate_from_env, repr};
    pub use crate::colormap::{Colormap, Rgb};
    pub use crate::config::{get_config, scoped_config, set_config, Config};
    pub use crate::element::Element;
    pub use crate::error::{LovelyError, Result};
    pub use crate::lovely::repr_rgb::Layout;
    pub use crate::lovely::{Center, ChansOptions, Lovely, LovelyExt, PltOptions, RgbOptions};
}
