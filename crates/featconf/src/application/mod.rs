//! Application layer for featconf.
//!
//! The application layer sequences the domain objects from `featconf-core`
//! into the single user goal this tool has: "turn these features on, those
//! off, in that header".
//!
//! Use cases here:
//!
//! - **Depend on abstractions** ([`configure_features::ConfigStore`]) rather
//!   than on the file system, so they run against an in-memory store in tests.
//! - **Contain no direct file or terminal access**.  Verbose echo goes to a
//!   caller-supplied writer.
//!
//! # Sub-modules
//!
//! - **`configure_features`** – resolve the selection, validate it, read the
//!   header, rewrite the managed block, write it back.

pub mod configure_features;

pub use configure_features::{
    ConfigStore, ConfigureError, ConfigureFeaturesUseCase, ConfigureOutcome, ConfigureRequest,
    StoreError,
};
