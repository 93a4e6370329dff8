//! ConfigureFeaturesUseCase: applies one enable/disable request to a header.
//!
//! The steps run strictly in this order, and each one can stop the run:
//!
//! 1. resolve and validate the selection (no I/O yet),
//! 2. resolve the target to an absolute path,
//! 3. read the header,
//! 4. rewrite the managed block,
//! 5. write the result back.
//!
//! Because validation happens before the read and the transducer either
//! succeeds completely or fails, the header is never left half-edited by this
//! layer.

use std::io::Write;
use std::path::{Path, PathBuf};

use featconf_core::{
    EditorProfile, FeatureRegistry, ProfileError, RegionError, RegionTransducer, RewriteResult,
    Selection, SelectionError,
};
use thiserror::Error;
use tracing::{debug, info};

// ── Storage port ──────────────────────────────────────────────────────────────

/// Error type for reading and writing the target header.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The target does not exist or is not a regular file.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The path could not be made absolute.
    #[error("unable to resolve path {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait abstracting access to the header being edited.
///
/// The production implementation is
/// [`FileConfigStore`](crate::infrastructure::storage::config_file::FileConfigStore);
/// tests use [`MemoryConfigStore`](crate::infrastructure::storage::mock::MemoryConfigStore).
pub trait ConfigStore {
    /// Turns `path` into an absolute path without touching the file.
    fn absolute(&self, path: &Path) -> Result<PathBuf, StoreError>;
    /// Reads the whole file as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String, StoreError>;
    /// Replaces the whole file with `contents`.
    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError>;
}

// ── Request / outcome ─────────────────────────────────────────────────────────

/// One invocation's worth of input.
#[derive(Debug, Clone, Default)]
pub struct ConfigureRequest {
    pub config_path: PathBuf,
    pub enable: Vec<String>,
    pub disable: Vec<String>,
    /// Echo the absolute path and every managed-block line.
    pub verbose: bool,
    /// Do everything except the final write.
    pub dry_run: bool,
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct ConfigureOutcome {
    /// Absolute path of the header.
    pub path: PathBuf,
    pub selection: Selection,
    pub rewrite: RewriteResult,
    /// `true` if the rewritten text differs from what was read.
    pub changed: bool,
    /// `false` for dry runs and when the header was already up to date.
    pub written: bool,
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Everything that can stop a configure run.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("invalid editor profile: {0}")]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("eyecatch pair in {} is unusable: {source}. Cancel changes.", path.display())]
    Region {
        path: PathBuf,
        #[source]
        source: RegionError,
    },

    #[error("failed to echo output: {0}")]
    Echo(#[from] std::io::Error),
}

impl ConfigureError {
    /// `true` for errors that should be followed by the usage text and the
    /// list of valid feature names.
    pub fn is_usage(&self) -> bool {
        matches!(self, ConfigureError::Selection(_))
    }
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// Applies enable/disable requests to headers through a [`ConfigStore`].
pub struct ConfigureFeaturesUseCase<S: ConfigStore> {
    registry: FeatureRegistry,
    transducer: RegionTransducer,
    store: S,
}

impl<S: ConfigStore> ConfigureFeaturesUseCase<S> {
    /// Builds the use case for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigureError::Profile`] if the profile is invalid.
    pub fn new(profile: &EditorProfile, store: S) -> Result<Self, ConfigureError> {
        let transducer = RegionTransducer::new(profile)?;
        Ok(Self {
            registry: profile.registry(),
            transducer,
            store,
        })
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one request.  Verbose output goes to `echo`.
    ///
    /// # Errors
    ///
    /// - [`ConfigureError::Selection`] when the request is empty or names an
    ///   unknown feature.  Nothing is read or written.
    /// - [`ConfigureError::Store`] when the header cannot be found, read or
    ///   written.  A failed read means no write is attempted.
    /// - [`ConfigureError::Region`] when the markers are missing or malformed.
    ///   Nothing is written.
    pub fn execute(
        &self,
        request: &ConfigureRequest,
        echo: &mut dyn Write,
    ) -> Result<ConfigureOutcome, ConfigureError> {
        let selection = Selection::resolve(&request.enable, &request.disable, &self.registry)?;

        let path = self.store.absolute(&request.config_path)?;
        if request.verbose {
            writeln!(echo, "Config path: {}", path.display())?;
            writeln!(echo)?;
        }

        let source = self.store.read(&path)?;
        debug!(path = %path.display(), bytes = source.len(), "config read");

        let rewrite = self
            .transducer
            .apply(&source, &selection)
            .map_err(|source| ConfigureError::Region {
                path: path.clone(),
                source,
            })?;

        if request.verbose {
            for line in &rewrite.block_lines {
                writeln!(echo, "{}", line.trim_end())?;
            }
        }

        let changed = rewrite.text != source;
        let written = if request.dry_run {
            info!(path = %path.display(), changed, "dry run: config not written");
            false
        } else if !changed {
            info!(path = %path.display(), "config already up to date");
            false
        } else {
            self.store.write(&path, &rewrite.text)?;
            info!(
                path = %path.display(),
                enabled = ?selection.to_enable(),
                disabled = ?selection.to_disable(),
                synthesized = rewrite.synthesized.len(),
                "config updated"
            );
            true
        };

        Ok(ConfigureOutcome {
            path,
            selection,
            rewrite,
            changed,
            written,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
