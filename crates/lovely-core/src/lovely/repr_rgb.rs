//! RGB image previews.
//!
//! Accepted layouts, channels first unless `cl` is set:
//!
//! ```text
//! [H, W]              one gray image
//! [C, H, W]           one image, C in {1, 3, 4}
//! [..., C, H, W]      leading dims flattened into a batch, tiled in a grid
//! ```
//!
//! Four-channel images are composited over a checkerboard so transparent
//! regions stay visible.

use ndarray::{Array4, ArrayD, ArrayView3, ArrayViewD, Axis};
use tracing::{debug, warn};

use crate::colormap::Rgb;
use crate::element::Element;
use crate::error::{LovelyError, Result};
use crate::image::RgbImage;

// ---------------------------------------------------------------------------
// Grid layout shared with `repr_chans`
// ---------------------------------------------------------------------------

/// How tiles are arranged on the output canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Space between tiles.
    pub gutter_px: usize,
    /// Frame drawn around every tile.
    pub frame_px: usize,
    /// Integer up-scaling of every tile.
    pub scale: usize,
    /// Target canvas width; decides how many tiles go on one row.
    pub view_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            gutter_px: 3,
            frame_px: 1,
            scale: 1,
            view_width: 966,
        }
    }
}

const BACKGROUND: Rgb = Rgb::WHITE;
const FRAME: Rgb = Rgb::new(64, 64, 64);
const CHECKER_PX: usize = 8;
const CHECKER_LIGHT: f64 = 1.0;
const CHECKER_DARK: f64 = 0.8;
/// Largest canvas the grid will allocate.
const MAX_CANVAS_PIXELS: usize = 1 << 28;

impl Layout {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(LovelyError::invalid_argument("scale must be at least 1"));
        }
        Ok(())
    }

    /// Number of tile columns for tiles `tile_w` pixels wide (frame included).
    fn columns(&self, tile_w: usize, n: usize) -> usize {
        let fit = self.view_width.saturating_add(self.gutter_px)
            / tile_w.saturating_add(self.gutter_px).max(1);
        fit.clamp(1, n.max(1))
    }

    /// Size of one framed tile whose image side is `px` before scaling.
    fn tile_extent(&self, px: usize) -> Option<usize> {
        px.checked_mul(self.scale)?
            .checked_add(self.frame_px.checked_mul(2)?)
    }

    /// Size of `count` tiles of `extent` pixels with gutters in between.
    fn grid_extent(&self, extent: usize, count: usize) -> Option<usize> {
        extent
            .checked_mul(count)?
            .checked_add(count.saturating_sub(1).checked_mul(self.gutter_px)?)
    }

    /// Arrange equally sized `tiles` row by row on one canvas.
    pub(crate) fn tile(&self, tiles: &[RgbImage]) -> Result<RgbImage> {
        let Some(first) = tiles.first() else {
            return Ok(RgbImage::new(0, 0, BACKGROUND));
        };
        let too_large = || {
            LovelyError::invalid_argument(format!(
                "{} tiles of {}x{} at scale {} do not fit on one canvas",
                tiles.len(),
                first.width(),
                first.height(),
                self.scale
            ))
        };
        let tile_w = self.tile_extent(first.width()).ok_or_else(too_large)?;
        let tile_h = self.tile_extent(first.height()).ok_or_else(too_large)?;

        let cols = self.columns(tile_w, tiles.len());
        let rows = tiles.len().div_ceil(cols);
        let width = self.grid_extent(tile_w, cols).ok_or_else(too_large)?;
        let height = self.grid_extent(tile_h, rows).ok_or_else(too_large)?;
        if width.checked_mul(height).map_or(true, |px| px > MAX_CANVAS_PIXELS) {
            return Err(too_large());
        }

        let mut canvas = RgbImage::new(width, height, BACKGROUND);
        for (i, tile) in tiles.iter().enumerate() {
            let x = (i % cols) * tile_w.saturating_add(self.gutter_px);
            let y = (i / cols) * tile_h.saturating_add(self.gutter_px);
            canvas.fill_rect(x, y, tile_w, tile_h, FRAME);
            canvas.blit(&tile.upscale(self.scale)?, x + self.frame_px, y + self.frame_px);
        }
        debug!(tiles = tiles.len(), cols, rows, width, height, "tiled image grid");
        Ok(canvas)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for [`rgb`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RgbOptions {
    /// Per-channel `(mean, std)`; values are mapped to `x * std + mean`
    /// before display.
    pub denorm: Option<([f64; 3], [f64; 3])>,
    /// Channels are the last axis (`[..., H, W, C]`).
    pub cl: bool,
    pub layout: Layout,
}

// ---------------------------------------------------------------------------
// Shape handling
// ---------------------------------------------------------------------------

/// Convert to `f64` with the channel axis (if any) placed before `H, W`.
pub(crate) fn channels_first<A: Element>(view: &ArrayViewD<'_, A>, cl: bool) -> Result<ArrayD<f64>> {
    let ndim = view.ndim();
    if ndim < 2 {
        return Err(LovelyError::InvalidShape {
            shape: view.shape().to_vec(),
            reason: "image views need at least 2 dimensions",
        });
    }
    let data = view.mapv(Element::to_f64);
    if !cl || ndim == 2 {
        return Ok(data);
    }
    // [..., H, W, C] -> [..., C, H, W]
    let mut perm: Vec<usize> = (0..ndim - 3).collect();
    perm.extend([ndim - 1, ndim - 3, ndim - 2]);
    Ok(data.permuted_axes(perm))
}

/// Reshape a channels-first array to `[batch, C, H, W]`.
fn to_bchw(data: ArrayD<f64>) -> Result<Array4<f64>> {
    let shape = data.shape().to_vec();
    let ndim = shape.len();
    let (c, h, w) = if ndim == 2 {
        (1, shape[0], shape[1])
    } else {
        (shape[ndim - 3], shape[ndim - 2], shape[ndim - 1])
    };
    if h == 0 || w == 0 {
        return Err(LovelyError::InvalidShape {
            shape,
            reason: "image height and width must be non-zero",
        });
    }
    if !matches!(c, 1 | 3 | 4) {
        return Err(LovelyError::InvalidShape {
            shape,
            reason: "expected 1, 3 or 4 channels",
        });
    }
    let batch: usize = shape.iter().take(ndim.saturating_sub(3)).product();
    if batch == 0 {
        return Err(LovelyError::InvalidShape {
            shape,
            reason: "batch is empty",
        });
    }
    data.as_standard_layout()
        .into_owned()
        .into_shape((batch, c, h, w))
        .map_err(|_| LovelyError::InvalidShape {
            shape,
            reason: "cannot flatten leading dimensions",
        })
}

fn apply_denorm(data: &mut Array4<f64>, (mean, std): &([f64; 3], [f64; 3])) {
    let channels = data.len_of(Axis(1));
    for c in 0..channels.min(3) {
        let (m, s) = (mean[c], std[c]);
        data.index_axis_mut(Axis(1), c).mapv_inplace(|x| x * s + m);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn checker(x: usize, y: usize) -> f64 {
    if ((x / CHECKER_PX) + (y / CHECKER_PX)) % 2 == 0 {
        CHECKER_LIGHT
    } else {
        CHECKER_DARK
    }
}

/// Render one `[C, H, W]` image with values already in display range.
fn render(image: &ArrayView3<'_, f64>) -> RgbImage {
    let (c, h, w) = image.dim();
    let mut out = RgbImage::new(w, h, Rgb::BLACK);
    for y in 0..h {
        for x in 0..w {
            let at = |ch: usize| clip_unit(image[[ch, y, x]]);
            let px = match c {
                1 => {
                    let v = at(0);
                    Rgb::from_unit(v, v, v)
                }
                3 => Rgb::from_unit(at(0), at(1), at(2)),
                _ => {
                    let alpha = at(3);
                    let bg = checker(x, y);
                    let blend = |v: f64| alpha * v + (1.0 - alpha) * bg;
                    Rgb::from_unit(blend(at(0)), blend(at(1)), blend(at(2)))
                }
            };
            out.put(x, y, px);
        }
    }
    out
}

#[inline]
fn clip_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Render `view` as an RGB image or a grid of images.
pub fn rgb<A: Element>(view: &ArrayViewD<'_, A>, opts: &RgbOptions) -> Result<RgbImage> {
    opts.layout.validate()?;
    let mut data = to_bchw(channels_first(view, opts.cl)?)?;
    if let Some(denorm) = &opts.denorm {
        apply_denorm(&mut data, denorm);
    }

    let non_finite = data.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        warn!(non_finite, "non-finite values rendered as black");
    }
    let clipped = data
        .iter()
        .filter(|v| v.is_finite() && !(0.0..=1.0).contains(*v))
        .count();
    if clipped > 0 {
        debug!(clipped, "values outside [0, 1] clipped");
    }

    let tiles: Vec<RgbImage> = data
        .axis_iter(Axis(0))
        .map(|image| render(&image))
        .collect();
    opts.layout.tile(&tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LovelyExt;
    use ndarray::{Array, Array2, Array3, Array4, ShapeBuilder};

    fn bare() -> RgbOptions {
        RgbOptions {
            layout: Layout {
                gutter_px: 0,
                frame_px: 0,
                ..Layout::default()
            },
            ..RgbOptions::default()
        }
    }

    #[test]
    fn test_single_rgb_image() {
        let mut a = Array3::<f32>::zeros((3, 2, 2));
        a[[0, 0, 0]] = 1.0;
        a[[1, 0, 1]] = 1.0;
        a[[2, 1, 0]] = 1.0;
        let img = a.rgb(&bare()).unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
        assert_eq!(img.get(0, 0), Some(Rgb::RED));
        assert_eq!(img.get(1, 0), Some(Rgb::new(0, 255, 0)));
        assert_eq!(img.get(0, 1), Some(Rgb::BLUE));
        assert_eq!(img.get(1, 1), Some(Rgb::BLACK));
    }

    #[test]
    fn test_channels_last_matches_channels_first() {
        let a = Array3::<f64>::from_shape_fn((3, 4, 5), |(c, y, x)| (c + y + x) as f64 / 10.0);
        let cl = a.view().permuted_axes([1, 2, 0]).to_owned();
        let first = a.rgb(&bare()).unwrap();
        let last = cl
            .rgb(&RgbOptions {
                cl: true,
                ..bare()
            })
            .unwrap();
        assert_eq!(first, last);
    }

    #[test]
    fn test_gray_and_clipping() {
        let a = Array2::from_shape_vec((1, 3), vec![-1.0_f32, 0.5, 7.0]).unwrap();
        let img = a.rgb(&bare()).unwrap();
        assert_eq!(img.get(0, 0), Some(Rgb::BLACK));
        assert_eq!(img.get(1, 0), Some(Rgb::new(128, 128, 128)));
        assert_eq!(img.get(2, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_denorm() {
        let a = Array3::<f32>::zeros((3, 1, 1));
        let opts = RgbOptions {
            denorm: Some(([1.0, 0.5, 0.0], [0.2, 0.2, 0.2])),
            ..bare()
        };
        let img = a.rgb(&opts).unwrap();
        assert_eq!(img.get(0, 0), Some(Rgb::new(255, 128, 0)));
    }

    #[test]
    fn test_alpha_over_checkerboard() {
        let mut a = Array3::<f32>::zeros((4, 1, 1));
        a[[3, 0, 0]] = 0.0; // fully transparent
        let img = a.rgb(&bare()).unwrap();
        assert_eq!(img.get(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_batch_grid_with_frame_and_gutter() {
        let a = Array4::<f32>::ones((5, 3, 2, 2));
        let opts = RgbOptions {
            layout: Layout {
                gutter_px: 3,
                frame_px: 1,
                scale: 1,
                // room for two 4px tiles and one gutter
                view_width: 12,
            },
            ..RgbOptions::default()
        };
        let img = a.rgb(&opts).unwrap();
        // 2 columns, 3 rows of 4x4 tiles
        assert_eq!(img.width(), 2 * 4 + 3);
        assert_eq!(img.height(), 3 * 4 + 2 * 3);
        assert_eq!(img.get(0, 0), Some(FRAME));
        assert_eq!(img.get(1, 1), Some(Rgb::WHITE));
        assert_eq!(img.get(4, 0), Some(BACKGROUND));
    }

    #[test]
    fn test_scale() {
        let a = Array3::<f32>::ones((1, 2, 3));
        let opts = RgbOptions {
            layout: Layout {
                scale: 4,
                ..bare().layout
            },
            ..bare()
        };
        let img = a.rgb(&opts).unwrap();
        assert_eq!((img.width(), img.height()), (12, 8));
    }

    #[test]
    fn test_leading_dims_flattened() {
        let a = Array::<f32, _>::zeros((2, 3, 3, 2, 2).f());
        let opts = RgbOptions {
            layout: Layout {
                view_width: 2,
                ..bare().layout
            },
            ..bare()
        };
        let img = a.rgb(&opts).unwrap();
        // six tiles stacked in one column
        assert_eq!((img.width(), img.height()), (2, 12));
    }

    #[test]
    fn test_errors() {
        let v = ndarray::arr1(&[1.0_f32, 2.0]);
        assert!(matches!(v.rgb(&bare()), Err(LovelyError::InvalidShape { .. })));

        let two_chan = Array3::<f32>::zeros((2, 4, 4));
        assert!(matches!(two_chan.rgb(&bare()), Err(LovelyError::InvalidShape { .. })));

        let flat = Array3::<f32>::zeros((3, 0, 4));
        assert!(flat.rgb(&bare()).is_err());

        let a = Array3::<f32>::zeros((3, 4, 4));
        let opts = RgbOptions {
            layout: Layout {
                scale: 0,
                ..Layout::default()
            },
            ..RgbOptions::default()
        };
        assert!(matches!(a.rgb(&opts), Err(LovelyError::InvalidArgument { .. })));
    }

    #[test]
    fn test_oversized_layout_is_an_error() {
        let a = Array2::<f32>::zeros((2, 2));
        for layout in [
            Layout {
                scale: usize::MAX / 2,
                ..Layout::default()
            },
            Layout {
                frame_px: usize::MAX / 2,
                ..Layout::default()
            },
            Layout {
                scale: 1 << 20,
                ..Layout::default()
            },
        ] {
            let opts = RgbOptions {
                layout,
                ..RgbOptions::default()
            };
            assert!(matches!(a.rgb(&opts), Err(LovelyError::InvalidArgument { .. })));
        }

        let wide = Layout {
            view_width: usize::MAX,
            gutter_px: usize::MAX,
            ..Layout::default()
        };
        let batch = Array4::<f32>::zeros((3, 1, 2, 2));
        let opts = RgbOptions {
            layout: wide,
            ..RgbOptions::default()
        };
        assert!(matches!(batch.rgb(&opts), Err(LovelyError::InvalidArgument { .. })));
    }
}
