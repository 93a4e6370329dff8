//! Storage infrastructure: the header being edited and the tool's settings.
//!
//! - `config_file` reads and writes the target header on disk, optionally
//!   via write-to-temp-then-rename.
//! - `settings` loads `featconf.toml`, which can override the editor profile
//!   and the default target path.
//! - `mock` is an in-memory [`ConfigStore`](crate::application::ConfigStore)
//!   for tests.

pub mod config_file;
pub mod mock;
pub mod settings;
