//! # featconf-core
//!
//! Pure editing logic for firmware configuration headers that carry a
//! *managed block* of feature toggles, for example the block in
//! `Grbl_Esp32/src/Config.h`:
//!
//! ```text
//! //CONFIGURE_EYECATCH_BEGIN (DO NOT MODIFY THIS LINE)
//! #define ENABLE_BLUETOOTH  // enable bluetooth
//! //#define ENABLE_WIFI
//! //CONFIGURE_EYECATCH_END (DO NOT MODIFY THIS LINE)
//! ```
//!
//! This crate has no file-system, process, or terminal dependencies.  The
//! `featconf` binary crate owns all I/O and feeds text in and out of it.
//!
//! # Architecture overview
//!
//! - **`domain`** – The value objects that describe *what* may be edited:
//!   the [`EditorProfile`] (marker pair, define prefix, case policy), the
//!   [`FeatureRegistry`] of recognised names, and the [`Selection`] of names
//!   to enable and disable after deduplication and conflict resolution.
//!
//! - **`transducer`** – The [`RegionTransducer`]: a single-pass, three-state
//!   line scanner that rewrites toggle lines inside the managed block and
//!   synthesises missing enables right before the closing marker.  Running it
//!   twice with the same selection yields the same text.

pub mod domain;
pub mod transducer;

pub use domain::profile::{CasePolicy, EditorProfile, ProfileError};
pub use domain::registry::FeatureRegistry;
pub use domain::selection::{FeatureOption, Selection, SelectionError, UnknownFeature};
pub use transducer::{RegionError, RegionTransducer, RewriteResult};
