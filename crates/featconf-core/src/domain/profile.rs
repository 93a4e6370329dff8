//! Editor profile: the parameters that distinguish one configuration header
//! from another.
//!
//! A profile names the two eyecatch tokens that delimit the managed block,
//! the prefix every toggle macro carries (`ENABLE_`), whether feature names
//! are matched case-sensitively, and the list of feature names the registry
//! accepts.  The [`RegionTransducer`](crate::transducer::RegionTransducer)
//! is built from a profile, so one transducer implementation serves every
//! header layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::registry::FeatureRegistry;

/// Eyecatch token that opens the managed block in `Config.h`.
pub const DEFAULT_BEGIN_MARKER: &str = "CONFIGURE_EYECATCH_BEGIN";

/// Eyecatch token that closes the managed block in `Config.h`.
pub const DEFAULT_END_MARKER: &str = "CONFIGURE_EYECATCH_END";

/// Prefix shared by every toggle macro (`#define ENABLE_WIFI`).
pub const DEFAULT_DEFINE_PREFIX: &str = "ENABLE_";

/// Features the Grbl_Esp32 `Config.h` managed block knows about.
pub const GRBL_ESP32_FEATURES: &[&str] = &[
    "BLUETOOTH",
    "WIFI",
    "SD_CARD",
    "HTTP",
    "OTA",
    "TELNET",
    "TELNET_WELCOME_MSG",
    "MDNS",
    "SSDP",
    "NOTIFICATIONS",
    "SERIAL2SOCKET_IN",
    "SERIAL2SOCKET_OUT",
    "CAPTIVE_PORTAL",
    "AUTHENTICATION",
];

/// How requested feature names are compared against the registry and
/// against toggle lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePolicy {
    /// `wifi` and `WIFI` are different names; only exact spellings match.
    #[default]
    Sensitive,
    /// Requests are upper-cased before lookup and toggle lines match the
    /// name portion regardless of case.
    Insensitive,
}

impl CasePolicy {
    /// Applies the policy to a raw name.
    pub fn normalize(self, name: &str) -> String {
        match self {
            CasePolicy::Sensitive => name.to_string(),
            CasePolicy::Insensitive => name.to_ascii_uppercase(),
        }
    }
}

/// Errors raised when a profile cannot drive the transducer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("marker token must not be empty")]
    EmptyMarker,

    #[error("begin and end markers must differ (both are '{0}')")]
    IdenticalMarkers(String),

    #[error("marker '{short}' also matches lines carrying marker '{long}'")]
    OverlappingMarkers { short: String, long: String },

    #[error("define prefix must be a non-empty identifier, got '{0}'")]
    InvalidPrefix(String),

    #[error("invalid feature name '{0}': expected letters, digits and underscores")]
    InvalidFeatureName(String),

    #[error("feature '{0}' is listed more than once")]
    DuplicateFeature(String),

    #[error("cannot compile marker pattern: {0}")]
    Pattern(String),
}

/// Parameters for editing one family of configuration headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorProfile {
    /// Token on the comment line that opens the managed block.
    pub begin_marker: String,
    /// Token on the comment line that closes the managed block.
    pub end_marker: String,
    /// Prefix between `#define` and the feature name.
    pub define_prefix: String,
    pub case_policy: CasePolicy,
    /// Recognised feature names, without the prefix.
    pub features: Vec<String>,
}

impl EditorProfile {
    /// Profile for `Grbl_Esp32/src/Config.h`.
    pub fn grbl_esp32() -> Self {
        Self {
            begin_marker: DEFAULT_BEGIN_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            define_prefix: DEFAULT_DEFINE_PREFIX.to_string(),
            case_policy: CasePolicy::Sensitive,
            features: GRBL_ESP32_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Checks that the profile is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProfileError`] found: empty, identical or
    /// overlapping markers, a prefix that is not an identifier, a feature
    /// name that is not an identifier, or a feature listed twice under the
    /// case policy.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.begin_marker.trim().is_empty() || self.end_marker.trim().is_empty() {
            return Err(ProfileError::EmptyMarker);
        }
        if self.begin_marker == self.end_marker {
            return Err(ProfileError::IdenticalMarkers(self.begin_marker.clone()));
        }
        for (short, long) in [
            (&self.begin_marker, &self.end_marker),
            (&self.end_marker, &self.begin_marker),
        ] {
            if marker_shadows(short, long) {
                return Err(ProfileError::OverlappingMarkers {
                    short: short.clone(),
                    long: long.clone(),
                });
            }
        }
        if !is_identifier(&self.define_prefix) {
            return Err(ProfileError::InvalidPrefix(self.define_prefix.clone()));
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.features.len());
        for name in &self.features {
            if !is_identifier(name) {
                return Err(ProfileError::InvalidFeatureName(name.clone()));
            }
            let normalized = self.case_policy.normalize(name);
            if seen.contains(&normalized) {
                return Err(ProfileError::DuplicateFeature(name.clone()));
            }
            seen.push(normalized);
        }
        Ok(())
    }

    /// Builds the registry of recognised names for this profile.
    pub fn registry(&self) -> FeatureRegistry {
        FeatureRegistry::new(self.features.iter().cloned(), self.case_policy)
    }
}

impl Default for EditorProfile {
    fn default() -> Self {
        Self::grbl_esp32()
    }
}

/// `true` if a marker line for `long` would also be taken for `short`: the
/// marker pattern accepts `short` followed by any non-identifier character.
fn marker_shadows(short: &str, long: &str) -> bool {
    match long.strip_prefix(short) {
        Some(rest) => !rest
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_'),
        None => false,
    }
}

/// `true` for a non-empty run of ASCII letters, digits and underscores.
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_grbl_esp32() {
        let profile = EditorProfile::default();
        assert_eq!(profile.begin_marker, "CONFIGURE_EYECATCH_BEGIN");
        assert_eq!(profile.end_marker, "CONFIGURE_EYECATCH_END");
        assert_eq!(profile.define_prefix, "ENABLE_");
        assert_eq!(profile.case_policy, CasePolicy::Sensitive);
        assert_eq!(profile.features.len(), 14);
    }

    #[test]
    fn test_default_profile_validates() {
        assert_eq!(EditorProfile::default().validate(), Ok(()));
    }

    #[test]
    fn test_case_policy_insensitive_uppercases() {
        assert_eq!(CasePolicy::Insensitive.normalize("sd_Card"), "SD_CARD");
        assert_eq!(CasePolicy::Sensitive.normalize("sd_Card"), "sd_Card");
    }

    #[test]
    fn test_validate_rejects_empty_marker() {
        let mut profile = EditorProfile::default();
        profile.end_marker = "  ".to_string();
        assert_eq!(profile.validate(), Err(ProfileError::EmptyMarker));
    }

    #[test]
    fn test_validate_rejects_identical_markers() {
        let mut profile = EditorProfile::default();
        profile.end_marker = profile.begin_marker.clone();
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::IdenticalMarkers(_))
        ));
    }

    #[test]
    fn test_validate_rejects_end_marker_that_prefixes_begin_marker() {
        // Arrange: "//BLOCK END" would also match the end pattern for "BLOCK"
        let mut profile = EditorProfile::default();
        profile.begin_marker = "BLOCK END".to_string();
        profile.end_marker = "BLOCK".to_string();

        // Act
        let result = profile.validate();

        // Assert
        assert_eq!(
            result,
            Err(ProfileError::OverlappingMarkers {
                short: "BLOCK".to_string(),
                long: "BLOCK END".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_begin_marker_that_prefixes_end_marker() {
        let mut profile = EditorProfile::default();
        profile.begin_marker = "FEATURES".to_string();
        profile.end_marker = "FEATURES-END".to_string();
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::OverlappingMarkers { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_markers_sharing_an_identifier_prefix() {
        // "FEATURES" does not match "//FEATURES_END" because '_' continues the token.
        let mut profile = EditorProfile::default();
        profile.begin_marker = "FEATURES".to_string();
        profile.end_marker = "FEATURES_END".to_string();
        assert_eq!(profile.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_prefix_with_spaces() {
        let mut profile = EditorProfile::default();
        profile.define_prefix = "ENABLE ".to_string();
        assert_eq!(
            profile.validate(),
            Err(ProfileError::InvalidPrefix("ENABLE ".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_feature_with_punctuation() {
        let mut profile = EditorProfile::default();
        profile.features.push("WIFI-2".to_string());
        assert_eq!(
            profile.validate(),
            Err(ProfileError::InvalidFeatureName("WIFI-2".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicates_under_insensitive_policy() {
        // Arrange: "wifi" only collides with "WIFI" once names are upper-cased
        let mut profile = EditorProfile::default();
        profile.features.push("wifi".to_string());
        assert_eq!(profile.validate(), Ok(()));

        // Act
        profile.case_policy = CasePolicy::Insensitive;

        // Assert
        assert_eq!(
            profile.validate(),
            Err(ProfileError::DuplicateFeature("wifi".to_string()))
        );
    }
}
