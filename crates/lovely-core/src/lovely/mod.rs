//! The [`Lovely`] wrapper: an explicit, caller-constructed decoration of a
//! host array with summary, image and plot views.
//!
//! The host library's types are never modified. Instead a `Lovely` borrows an
//! array view and exposes the display methods:
//!
//! - `Display` — one-line statistical summary ([`repr_str`])
//! - [`Lovely::rgb`] — RGB image preview ([`repr_rgb`])
//! - [`Lovely::chans`] — per-channel colour-mapped preview ([`repr_chans`])
//! - [`Lovely::plt`] — value distribution plot ([`repr_plt`])
//!
//! [`LovelyExt`] adds `.lovely()` and friends to every `ndarray` array.

pub mod repr_chans;
pub mod repr_plt;
pub mod repr_rgb;
pub mod repr_str;

use ndarray::{ArrayBase, ArrayViewD, Data, Dimension};

use crate::config::{get_config, Config};
use crate::element::Element;
use crate::error::Result;
use crate::image::RgbImage;

pub use repr_chans::ChansOptions;
pub use repr_plt::{Center, Plot, PltOptions};
pub use repr_rgb::RgbOptions;

/// A borrowed array together with the settings used to display it.
///
/// The global [`Config`] is captured when the wrapper is created.
#[derive(Debug, Clone)]
pub struct Lovely<'a, A> {
    view: ArrayViewD<'a, A>,
    cfg: Config,
    verbose: bool,
    plain: bool,
    depth: usize,
}

impl<'a, A: Element> Lovely<'a, A> {
    /// Wrap a view using the current global settings.
    pub fn new(view: ArrayViewD<'a, A>) -> Self {
        Self {
            view,
            cfg: get_config(),
            verbose: false,
            plain: false,
            depth: 0,
        }
    }

    /// Use `cfg` instead of the global settings.
    #[must_use]
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Summary line followed by the host library's own rendering.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Only the host library's own rendering.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.plain = true;
        self
    }

    /// Also summarize sub-arrays along the first axis, one level further.
    #[must_use]
    pub fn deeper(mut self) -> Self {
        self.depth += 1;
        self
    }

    /// Summarize sub-arrays down to `depth` levels.
    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Override the colour setting for this view.
    #[must_use]
    pub fn color(mut self, enabled: bool) -> Self {
        self.cfg.color = enabled;
        self
    }

    /// The wrapped view.
    #[inline]
    pub fn view(&self) -> &ArrayViewD<'a, A> {
        &self.view
    }

    /// The settings this wrapper renders with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Render the array as an RGB image.
    pub fn rgb(&self, opts: &RgbOptions) -> Result<RgbImage> {
        repr_rgb::rgb(&self.view, opts)
    }

    /// Render every channel through a colour map.
    pub fn chans(&self, opts: &ChansOptions) -> Result<RgbImage> {
        repr_chans::chans(&self.view, opts)
    }

    /// Plot the distribution of values.
    pub fn plt(&self, opts: &PltOptions) -> Result<Plot> {
        repr_plt::plt(&self.view, opts, &self.cfg)
    }
}

/// Adds lovely views to every `ndarray` array.
///
/// ```
/// use lovely_core::LovelyExt;
/// use ndarray::arr1;
///
/// let a = arr1(&[1.0_f32, 2.0, 3.0]);
/// let s = a.lovely().color(false).to_string();
/// assert!(s.starts_with("tensor[3] x∈[1.000, 3.000]"));
/// ```
pub trait LovelyExt<A: Element> {
    /// Wrap the array for display.
    fn lovely(&self) -> Lovely<'_, A>;

    /// Shorthand for `self.lovely().rgb(opts)`.
    fn rgb(&self, opts: &RgbOptions) -> Result<RgbImage> {
        self.lovely().rgb(opts)
    }

    /// Shorthand for `self.lovely().chans(opts)`.
    fn chans(&self, opts: &ChansOptions) -> Result<RgbImage> {
        self.lovely().chans(opts)
    }

    /// Shorthand for `self.lovely().plt(opts)`.
    fn plt(&self, opts: &PltOptions) -> Result<Plot> {
        self.lovely().plt(opts)
    }
}

impl<A, S, D> LovelyExt<A> for ArrayBase<S, D>
where
    A: Element,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn lovely(&self) -> Lovely<'_, A> {
        Lovely::new(self.view().into_dyn())
    }
}
