//! Library entry for e-file: query portagefilelist.de for the Gentoo packages
//! shipping a file, or the files and versions of a package, and render the
//! answer through configurable format strings.
//!
//! The binary in `main.rs` only parses arguments and sets up logging; every
//! stage of a run is reachable from here so integration tests can drive it
//! without a network.

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod portage;
pub mod render;
pub mod results;
pub mod sources;
