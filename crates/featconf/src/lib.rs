//! featconf library crate.
//!
//! Turns `--enable` / `--disable` requests into edits of the managed block in
//! a firmware configuration header, using the pure logic in `featconf-core`.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! featconf (binary)      clap CLI, settings, tracing, exit codes
//!         ↓
//! [featconf]
//!   ├── application/     ConfigureFeaturesUseCase + ConfigStore port
//!   └── infrastructure/
//!         └── storage/   FileConfigStore, featconf.toml settings, mock store
//!         ↓
//! featconf-core          EditorProfile, Selection, RegionTransducer
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `featconf-core` only and reaches files through
//!   the [`application::ConfigStore`] trait.
//! - `infrastructure` implements that trait and owns `tempfile` and `toml`.

/// Application layer: the configure-features use case.
pub mod application;

/// Infrastructure layer: header file store and settings file.
pub mod infrastructure;
