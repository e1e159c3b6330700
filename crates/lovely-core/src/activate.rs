//! Process-wide switch between lovely summaries and the host library's own
//! rendering.
//!
//! Code that prints arrays through [`repr`] gets lovely summaries once the
//! switch is on. It can be flipped explicitly with [`activate`] or, at
//! program start, from the environment with [`activate_from_env`]:
//!
//! | `LOVELY_TENSORS` | effect |
//! |---|---|
//! | unset, `""`, `"0"` | nothing |
//! | anything else (`1`, `always`, `upon_import`, ...) | activate |
//!
//! `LOVELY_TENSORS_CONFIG` may name a TOML file that is loaded into the
//! global config before activation.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use ndarray::{ArrayBase, ArrayViewD, Data, Dimension};
use tracing::{debug, error};

use crate::config::{set_config, Config};
use crate::element::Element;
use crate::error::{LovelyError, Result};
use crate::lovely::Lovely;

/// Switch variable.
pub const ENV_SWITCH: &str = "LOVELY_TENSORS";
/// Optional config file variable.
pub const ENV_CONFIG: &str = "LOVELY_TENSORS_CONFIG";

const GUIDANCE: &str = "automatic activation of lovely summaries failed; \
unset LOVELY_TENSORS (or set it to 0) and check LOVELY_TENSORS_CONFIG";

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Turn lovely summaries on for [`repr`].
pub fn activate() {
    if !ACTIVE.swap(true, Ordering::SeqCst) {
        debug!("lovely summaries activated");
    }
}

/// Turn lovely summaries off for [`repr`].
pub fn deactivate() {
    if ACTIVE.swap(false, Ordering::SeqCst) {
        debug!("lovely summaries deactivated");
    }
}

/// Whether [`repr`] renders lovely summaries.
pub fn is_active() -> bool {
    ACTIVE.load(Ordering::SeqCst)
}

/// Whether a `LOVELY_TENSORS` value asks for activation.
pub fn switch_enabled(value: Option<&str>) -> bool {
    !matches!(value.map(str::trim), None | Some("" | "0"))
}

/// Activate according to the environment.
///
/// Returns whether the switch is now on. Failures are logged together with
/// instructions for turning the switch off, then returned.
pub fn activate_from_env() -> Result<bool> {
    let switch = read_env(ENV_SWITCH)?;
    let config = read_env(ENV_CONFIG)?;
    activate_with(switch.as_deref(), config.as_deref()).map_err(|e| {
        error!(error = %e, "{GUIDANCE}");
        e
    })
}

fn read_env(var: &'static str) -> Result<Option<String>> {
    match std::env::var(var) {
        Ok(v) => Ok(Some(v)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(raw)) => {
            let err = LovelyError::Env {
                var,
                value: raw.to_string_lossy().into_owned(),
                reason: "value is not valid unicode".to_string(),
            };
            error!(error = %err, "{GUIDANCE}");
            Err(err)
        }
    }
}

fn activate_with(switch: Option<&str>, config_path: Option<&str>) -> Result<bool> {
    if !switch_enabled(switch) {
        debug!(value = ?switch, "{ENV_SWITCH} not set, leaving summaries off");
        return Ok(false);
    }
    if let Some(path) = config_path.filter(|p| !p.trim().is_empty()) {
        set_config(Config::load(path)?)?;
    }
    activate();
    Ok(true)
}

/// Renders an array as a lovely summary while the switch is on, and with
/// the host library's own `Display` otherwise.
#[derive(Debug, Clone)]
pub struct Repr<'a, A> {
    view: ArrayViewD<'a, A>,
}

/// Wrap `array` for switch-dependent display.
pub fn repr<A, S, D>(array: &ArrayBase<S, D>) -> Repr<'_, A>
where
    A: Element,
    S: Data<Elem = A>,
    D: Dimension,
{
    Repr {
        view: array.view().into_dyn(),
    }
}

impl<A: Element> fmt::Display for Repr<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_active() {
            write!(f, "{}", Lovely::new(self.view.clone()))
        } else {
            write!(f, "{}", self.view)
        }
    }
}
