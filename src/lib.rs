//! Plumbing shared by the daily puzzle binaries: reading records from
//! the input, the error type they report, and logging setup.

pub mod error;
pub mod input;
pub mod logging;
