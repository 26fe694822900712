//! errand — single-action plugin binaries for assistant frameworks.
//!
//! Each binary under `src/bin/` performs exactly one action (run a code
//! snippet, read a file, fetch a web page, ...) and prints one reply to
//! stdout. This library crate holds the shared machinery so integration
//! tests (under `tests/`) can access it.

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod paths;
pub mod plugins;
pub mod reply;
pub mod text;
