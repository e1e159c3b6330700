//! Process-wide display settings.
//!
//! Every view snapshots the global [`Config`] when it is created, so changing
//! the settings never affects a view that already exists. Temporary overrides
//! go through [`scoped_config`], which restores the previous settings when the
//! returned guard is dropped.

use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LovelyError, Result};

/// Settings shared by all textual and visual views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Digits after the decimal point.
    pub precision: usize,
    /// Use scientific notation when `|x| >= 10^threshold_max`.
    pub threshold_max: i32,
    /// Use scientific notation when `0 < |x| < 10^threshold_min`.
    pub threshold_min: i32,
    /// `Some(true)` forces scientific notation, `Some(false)` forbids it.
    pub sci_mode: Option<bool>,
    /// Show the memory footprint when the array is larger than this (bytes).
    pub show_mem_above: usize,
    /// Spaces per nesting level in `deeper` output.
    pub indent: usize,
    /// Emit ANSI colour codes.
    pub color: bool,
    /// Maximum number of sub-arrays listed per level in `deeper` output.
    pub deeper_width: usize,
}

const MAX_PRECISION: usize = 16;
const MAX_INDENT: usize = 16;

impl Config {
    /// The built-in defaults.
    pub const DEFAULT: Self = Self {
        precision: 3,
        threshold_max: 3,
        threshold_min: -4,
        sci_mode: None,
        show_mem_above: 1024,
        indent: 2,
        color: true,
        deeper_width: 9,
    };

    /// Parse a (possibly partial) TOML document. Missing keys keep their
    /// default values.
    ///
    /// ```
    /// # use lovely_core::Config;
    /// let cfg = Config::from_toml_str("precision = 5\ncolor = false").unwrap();
    /// assert_eq!(cfg.precision, 5);
    /// assert_eq!(cfg.indent, 2);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LovelyError::io(path, e))?;
        let cfg = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded lovely config");
        Ok(cfg)
    }

    /// Check that every field is within its supported range.
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(LovelyError::invalid_argument(format!(
                "precision {} exceeds {MAX_PRECISION}",
                self.precision
            )));
        }
        if self.indent > MAX_INDENT {
            return Err(LovelyError::invalid_argument(format!(
                "indent {} exceeds {MAX_INDENT}",
                self.indent
            )));
        }
        if self.threshold_min > self.threshold_max {
            return Err(LovelyError::invalid_argument(
                "threshold_min must not exceed threshold_max",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static CONFIG: RwLock<Config> = parking_lot::const_rwlock(Config::DEFAULT);

/// Snapshot of the current process-wide settings.
pub fn get_config() -> Config {
    CONFIG.read().clone()
}

/// Replace the process-wide settings.
pub fn set_config(cfg: Config) -> Result<()> {
    cfg.validate()?;
    debug!(?cfg, "lovely config replaced");
    *CONFIG.write() = cfg;
    Ok(())
}

/// Modify the process-wide settings in place.
///
/// The change is discarded if the result fails validation.
pub fn update_config<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut Config),
{
    let mut guard = CONFIG.write();
    let mut next = guard.clone();
    f(&mut next);
    next.validate()?;
    debug!(cfg = ?next, "lovely config updated");
    *guard = next;
    Ok(())
}

/// Restores the settings that were active before [`scoped_config`] ran.
#[must_use = "the override is reverted as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ConfigGuard {
    previous: Config,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        *CONFIG.write() = self.previous.clone();
    }
}

/// Temporarily override settings until the returned guard is dropped.
///
/// ```
/// # use lovely_core::{get_config, scoped_config};
/// {
///     let _guard = scoped_config(|c| c.precision = 6).unwrap();
///     assert_eq!(get_config().precision, 6);
/// }
/// ```
pub fn scoped_config<F>(f: F) -> Result<ConfigGuard>
where
    F: FnOnce(&mut Config),
{
    let mut guard = CONFIG.write();
    let previous = guard.clone();
    let mut next = previous.clone();
    f(&mut next);
    next.validate()?;
    *guard = next;
    Ok(ConfigGuard { previous })
}

/// Serializes tests that touch process-wide state.
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
