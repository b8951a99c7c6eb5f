//! Operator-facing terminal output
//!
//! Uses `cliclack` framing and spinners on a TTY and falls back to plain
//! tagged lines (`[OK]`, `[WARN]`, `[FAIL]`) in pipes and CI.
//! Machine-readable output (`--json`, `call`) bypasses this module.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_level, outro, remark, section, step_error_detail, step_ok,
    step_ok_detail, step_warn_hint, Level,
};
pub use progress::TaskSpinner;
pub use prompts::confirm;
