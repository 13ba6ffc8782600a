//! Terminal rendering.
//!
//! ## Submodules
//!
//! - [`common`]: Header bar, tab bar, status bar, and the help/alert overlays
//! - [`dashboard`]: Per-quantity gauge tiles with the latest reading
//! - [`history`]: Rolling sparkline charts per quantity
//! - [`theme`]: Color themes with terminal background auto-detection

pub mod common;
pub mod dashboard;
pub mod history;
pub mod theme;

pub use theme::Theme;
