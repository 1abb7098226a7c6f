//! Utility functions and helpers

pub mod version;

pub use version::{VERSION, banner, get_version};
