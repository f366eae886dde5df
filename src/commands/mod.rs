//! Command implementations behind the CLI

pub mod clean;
pub mod fix;
pub mod generate;
pub mod list;
pub mod new;
pub mod show;
