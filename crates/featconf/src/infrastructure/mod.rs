//! Infrastructure layer for featconf.
//!
//! Contains the file-system adapters: the header store the use case reads
//! and writes through, and the TOML settings file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `featconf_core`, but MUST NOT be imported by the `application` layer or
//! the core crate.

pub mod storage;
