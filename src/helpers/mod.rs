//! Helper functions for URLs and dates
//!
//! Shared by the generator, the HTTP API and the command-line output.

mod date;
mod url;

pub use date::*;
pub use url::*;
