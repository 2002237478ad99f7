//! Application module: the UI model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the prompt, popup and
//! slider state that has no meaning outside the terminal.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
