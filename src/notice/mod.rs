//! User-facing, dismissable messages.
//!
//! Recoverable storage conditions are posted here by the stores instead of
//! being returned as errors; typed errors convert into notices for display.

mod notice;
pub use notice::*;
