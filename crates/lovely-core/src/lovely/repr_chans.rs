//! Per-channel previews: every channel is drawn on its own tile through a
//! colour map.
//!
//! Values in `[0, 1]` go through the colour map; values outside that range
//! and non-finite values get dedicated colours so they stand out.

use ndarray::{Array3, ArrayView2, ArrayViewD, Axis};
use tracing::debug;

use crate::colormap::{Colormap, Rgb};
use crate::element::Element;
use crate::error::{LovelyError, Result};
use crate::image::RgbImage;

use super::repr_rgb::{channels_first, Layout};

/// Options for [`chans`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChansOptions {
    pub cmap: Colormap,
    /// Colour for finite values below 0.
    pub cm_below: Rgb,
    /// Colour for finite values above 1.
    pub cm_above: Rgb,
    pub cm_ninf: Rgb,
    pub cm_pinf: Rgb,
    pub cm_nan: Rgb,
    /// Channels are the last axis (`[..., H, W, C]`).
    pub cl: bool,
    pub layout: Layout,
}

impl Default for ChansOptions {
    fn default() -> Self {
        Self {
            cmap: Colormap::Twilight,
            cm_below: Rgb::BLUE,
            cm_above: Rgb::RED,
            cm_ninf: Rgb::CYAN,
            cm_pinf: Rgb::FUCHSIA,
            cm_nan: Rgb::YELLOW,
            cl: false,
            layout: Layout::default(),
        }
    }
}

impl ChansOptions {
    /// Colour for a single value.
    pub fn color_of(&self, v: f64) -> Rgb {
        if v.is_nan() {
            self.cm_nan
        } else if v == f64::INFINITY {
            self.cm_pinf
        } else if v == f64::NEG_INFINITY {
            self.cm_ninf
        } else if v < 0.0 {
            self.cm_below
        } else if v > 1.0 {
            self.cm_above
        } else {
            self.cmap.sample(v)
        }
    }
}

fn to_nhw(data: ndarray::ArrayD<f64>) -> Result<Array3<f64>> {
    let shape = data.shape().to_vec();
    let ndim = shape.len();
    let (h, w) = (shape[ndim - 2], shape[ndim - 1]);
    let n: usize = shape[..ndim - 2].iter().product();
    if h == 0 || w == 0 || n == 0 {
        return Err(LovelyError::InvalidShape {
            shape,
            reason: "channel views need non-empty channels",
        });
    }
    data.as_standard_layout()
        .into_owned()
        .into_shape((n, h, w))
        .map_err(|_| LovelyError::InvalidShape {
            shape,
            reason: "cannot flatten leading dimensions",
        })
}

fn render_channel(channel: &ArrayView2<'_, f64>, opts: &ChansOptions) -> RgbImage {
    let (h, w) = channel.dim();
    let mut out = RgbImage::new(w, h, Rgb::BLACK);
    for ((y, x), &v) in channel.indexed_iter() {
        out.put(x, y, opts.color_of(v));
    }
    out
}

/// Render every channel of `view` as a colour-mapped tile.
///
/// Layout is `[..., C, H, W]` (or `[..., H, W, C]` with `cl`); all leading
/// dimensions are flattened, so a batch of images shows every channel of
/// every image. A 2-d array is a single channel.
pub fn chans<A: Element>(view: &ArrayViewD<'_, A>, opts: &ChansOptions) -> Result<RgbImage> {
    opts.layout.validate()?;
    let data = to_nhw(channels_first(view, opts.cl)?)?;
    debug!(channels = data.len_of(Axis(0)), cmap = ?opts.cmap, "rendering channels");
    let tiles: Vec<RgbImage> = data
        .axis_iter(Axis(0))
        .map(|channel| render_channel(&channel, opts))
        .collect();
    opts.layout.tile(&tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LovelyExt;
    use ndarray::{arr2, Array3, Array4};

    fn bare() -> ChansOptions {
        ChansOptions {
            layout: Layout {
                gutter_px: 0,
                frame_px: 0,
                ..Layout::default()
            },
            ..ChansOptions::default()
        }
    }

    #[test]
    fn test_special_values() {
        let a = arr2(&[[-0.5_f32, 1.5, f32::NAN, f32::INFINITY, f32::NEG_INFINITY]]);
        let img = a.chans(&bare()).unwrap();
        assert_eq!(img.get(0, 0), Some(Rgb::BLUE));
        assert_eq!(img.get(1, 0), Some(Rgb::RED));
        assert_eq!(img.get(2, 0), Some(Rgb::YELLOW));
        assert_eq!(img.get(3, 0), Some(Rgb::FUCHSIA));
        assert_eq!(img.get(4, 0), Some(Rgb::CYAN));
    }

    #[test]
    fn test_in_range_uses_cmap() {
        let a = arr2(&[[0.0_f64, 1.0]]);
        let opts = ChansOptions {
            cmap: Colormap::Gray,
            ..bare()
        };
        let img = a.chans(&opts).unwrap();
        assert_eq!(img.get(0, 0), Some(Rgb::BLACK));
        assert_eq!(img.get(1, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_one_tile_per_channel() {
        let a = Array3::<f32>::zeros((5, 2, 3));
        let opts = ChansOptions {
            layout: Layout {
                view_width: 3,
                ..bare().layout
            },
            ..bare()
        };
        let img = a.chans(&opts).unwrap();
        assert_eq!((img.width(), img.height()), (3, 10));

        let wide = a.chans(&bare()).unwrap();
        assert_eq!((wide.width(), wide.height()), (15, 2));
    }

    #[test]
    fn test_batch_and_channels_last() {
        let a = Array4::<f32>::zeros((2, 4, 4, 3));
        let opts = ChansOptions {
            cl: true,
            ..bare()
        };
        let img = a.chans(&opts).unwrap();
        // 2 images x 3 channels, each 4x4, all on one row
        assert_eq!((img.width(), img.height()), (24, 4));
    }

    #[test]
    fn test_custom_colours() {
        let a = arr2(&[[-1.0_f32]]);
        let opts = ChansOptions {
            cm_below: "#102030".parse().unwrap(),
            ..bare()
        };
        assert_eq!(a.chans(&opts).unwrap().get(0, 0), Some(Rgb::new(16, 32, 48)));
    }

    #[test]
    fn test_rejects_1d_and_empty() {
        assert!(ndarray::arr1(&[1.0_f32]).chans(&bare()).is_err());
        assert!(Array3::<f32>::zeros((0, 2, 2)).chans(&bare()).is_err());
    }
}
