//! Template formatting for marked elements
//!
//! Each element carrying the `formatted` marker is resolved from the template
//! captured on its first resolution:
//!
//! ```text
//! <span formatted="twice" keepamp="true">[WelcomeText]</span>
//! ```
//!
//! The marker value selects a [`FormatMode`]; `keepamp` decides whether the
//! first `&` of the result is escaped or dropped.

mod mode;
mod pipeline;

pub use mode::{apply_ampersand_policy, remove_first, replace_first, FormatMode, FormatOptions};
pub use pipeline::Formatter;
