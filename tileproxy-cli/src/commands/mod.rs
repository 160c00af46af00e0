//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`check`] - Validate a source definition and summarize it
//! - [`urls`] - Print the upstream URLs a tile resolves to
//! - [`fetch`] - Fetch a tile through the proxy chain into a file
//! - [`common`] - Tile request arguments shared by `urls` and `fetch`

pub mod check;
pub mod common;
pub mod fetch;
pub mod urls;
