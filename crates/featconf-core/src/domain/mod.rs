//! Domain entities for featconf.
//!
//! Everything here is plain data plus validation rules.  Nothing in this
//! module reads files, touches the environment, or prints.
//!
//! Code in outer layers (the use case, the file store, the CLI) depends on
//! these types, but the domain never depends on them.

/// Marker pair, define prefix, case policy and feature list for one header.
pub mod profile;

/// The closed set of recognised feature names.
pub mod registry;

/// Resolution of raw `--enable` / `--disable` requests into a [`selection::Selection`].
pub mod selection;

pub use profile::{CasePolicy, EditorProfile, ProfileError};
pub use registry::FeatureRegistry;
pub use selection::{FeatureOption, Selection, SelectionError, UnknownFeature};
