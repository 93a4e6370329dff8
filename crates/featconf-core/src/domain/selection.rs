//! Selection resolver.
//!
//! Turns the raw `--enable` and `--disable` argument lists into a
//! [`Selection`]:
//!
//! 1. each name is normalised with the registry's case policy,
//! 2. duplicates are dropped, keeping the first occurrence,
//! 3. any name present in both lists is removed from the disable list
//!    (enable wins),
//! 4. every remaining name is checked against the [`FeatureRegistry`].
//!
//! An empty request and an invalid request are reported as different errors
//! so the caller can word its diagnostics accordingly.

use std::fmt;

use thiserror::Error;

use super::registry::FeatureRegistry;

/// Which command-line list a name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureOption {
    Enable,
    Disable,
}

impl FeatureOption {
    /// Short flag as the user typed it.
    pub fn flag(self) -> &'static str {
        match self {
            FeatureOption::Enable => "-e",
            FeatureOption::Disable => "-d",
        }
    }
}

impl fmt::Display for FeatureOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// One requested name that the registry does not recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeature {
    pub option: FeatureOption,
    pub name: String,
}

impl fmt::Display for UnknownFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} feature: {}", self.option, self.name)
    }
}

/// Reasons a request cannot be turned into a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Neither list names anything.
    #[error("no features to enable or disable")]
    Empty,

    /// At least one name is not in the registry.  All offenders are listed,
    /// enable-list names first.
    #[error("{}", format_unknown(.0))]
    UnknownFeatures(Vec<UnknownFeature>),
}

fn format_unknown(unknown: &[UnknownFeature]) -> String {
    unknown
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The resolved, deduplicated, conflict-free pair of name lists for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    to_enable: Vec<String>,
    to_disable: Vec<String>,
}

impl Selection {
    /// Resolves raw requests against `registry`.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::Empty`] if both lists are empty after resolution.
    /// - [`SelectionError::UnknownFeatures`] if any resolved name is not in
    ///   the registry.
    pub fn resolve<E, D>(
        enable: &[E],
        disable: &[D],
        registry: &FeatureRegistry,
    ) -> Result<Self, SelectionError>
    where
        E: AsRef<str>,
        D: AsRef<str>,
    {
        let selection = Self::from_requests(enable, disable, |n| registry.normalize(n));

        let unknown: Vec<UnknownFeature> = selection
            .named()
            .filter(|(_, name)| !registry.is_valid(name))
            .map(|(option, name)| UnknownFeature {
                option,
                name: name.to_string(),
            })
            .collect();
        if !unknown.is_empty() {
            return Err(SelectionError::UnknownFeatures(unknown));
        }

        if selection.is_empty() {
            return Err(SelectionError::Empty);
        }

        tracing::debug!(
            enable = ?selection.to_enable,
            disable = ?selection.to_disable,
            "selection resolved"
        );
        Ok(selection)
    }

    /// Deduplicates and resolves conflicts without consulting a registry.
    ///
    /// Useful for callers that drive the transducer directly with names the
    /// registry does not know about.
    pub fn unchecked<E, D>(enable: &[E], disable: &[D]) -> Self
    where
        E: AsRef<str>,
        D: AsRef<str>,
    {
        Self::from_requests(enable, disable, str::to_string)
    }

    fn from_requests<E, D, F>(enable: &[E], disable: &[D], normalize: F) -> Self
    where
        E: AsRef<str>,
        D: AsRef<str>,
        F: Fn(&str) -> String,
    {
        let to_enable = dedup_preserving_order(enable.iter().map(|n| normalize(n.as_ref())));
        let to_disable: Vec<String> =
            dedup_preserving_order(disable.iter().map(|n| normalize(n.as_ref())))
                .into_iter()
                .filter(|n| !to_enable.contains(n))
                .collect();
        Self {
            to_enable,
            to_disable,
        }
    }

    pub fn to_enable(&self) -> &[String] {
        &self.to_enable
    }

    pub fn to_disable(&self) -> &[String] {
        &self.to_disable
    }

    pub fn is_empty(&self) -> bool {
        self.to_enable.is_empty() && self.to_disable.is_empty()
    }

    /// Every name tagged with the list it belongs to, enables first.
    fn named(&self) -> impl Iterator<Item = (FeatureOption, &str)> {
        self.to_enable
            .iter()
            .map(|n| (FeatureOption::Enable, n.as_str()))
            .chain(
                self.to_disable
                    .iter()
                    .map(|n| (FeatureOption::Disable, n.as_str())),
            )
    }
}

fn dedup_preserving_order(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{CasePolicy, EditorProfile};

    fn grbl() -> FeatureRegistry {
        EditorProfile::grbl_esp32().registry()
    }

    const NONE: &[&str] = &[];

    #[test]
    fn test_resolve_deduplicates_preserving_first_occurrence() {
        // Arrange
        let enable = ["WIFI", "HTTP", "WIFI", "OTA", "HTTP"];

        // Act
        let sel = Selection::resolve(&enable, NONE, &grbl()).unwrap();

        // Assert
        assert_eq!(sel.to_enable(), ["WIFI", "HTTP", "OTA"]);
        assert!(sel.to_disable().is_empty());
    }

    #[test]
    fn test_resolve_enable_wins_on_conflict() {
        let sel = Selection::resolve(&["WIFI"], &["SD_CARD", "WIFI", "MDNS"], &grbl()).unwrap();
        assert_eq!(sel.to_enable(), ["WIFI"]);
        assert_eq!(sel.to_disable(), ["SD_CARD", "MDNS"]);
    }

    #[test]
    fn test_resolve_conflict_only_leaves_enable() {
        let sel = Selection::resolve(&["OTA"], &["OTA", "OTA"], &grbl()).unwrap();
        assert_eq!(sel.to_enable(), ["OTA"]);
        assert!(sel.to_disable().is_empty());
    }

    #[test]
    fn test_resolve_empty_request_is_usage_error() {
        let result = Selection::resolve(NONE, NONE, &grbl());
        assert_eq!(result, Err(SelectionError::Empty));
    }

    #[test]
    fn test_resolve_reports_every_unknown_name_with_its_option() {
        // Act
        let result = Selection::resolve(&["WIFI", "BOGUS"], &["NOPE"], &grbl());

        // Assert
        assert_eq!(
            result,
            Err(SelectionError::UnknownFeatures(vec![
                UnknownFeature {
                    option: FeatureOption::Enable,
                    name: "BOGUS".to_string()
                },
                UnknownFeature {
                    option: FeatureOption::Disable,
                    name: "NOPE".to_string()
                },
            ]))
        );
    }

    #[test]
    fn test_unknown_error_message_matches_cli_wording() {
        let err = Selection::resolve(&["NOT_A_FEATURE"], NONE, &grbl()).unwrap_err();
        assert_eq!(err.to_string(), "unknown -e feature: NOT_A_FEATURE");
    }

    #[test]
    fn test_unknown_is_distinct_from_empty_even_when_only_invalid_names() {
        let err = Selection::resolve(NONE, &["nope"], &grbl()).unwrap_err();
        assert!(matches!(err, SelectionError::UnknownFeatures(_)));
    }

    #[test]
    fn test_resolve_normalizes_under_insensitive_policy() {
        // Arrange
        let registry = FeatureRegistry::new(["WIFI", "SD_CARD"], CasePolicy::Insensitive);

        // Act: "wifi" and "WIFI" collapse, so the disable entry is a conflict
        let sel = Selection::resolve(&["wifi", "WIFI"], &["Wifi", "sd_card"], &registry).unwrap();

        // Assert
        assert_eq!(sel.to_enable(), ["WIFI"]);
        assert_eq!(sel.to_disable(), ["SD_CARD"]);
    }

    #[test]
    fn test_unchecked_keeps_unregistered_names() {
        let sel = Selection::unchecked(&["CUSTOM"], &["CUSTOM", "OTHER"]);
        assert_eq!(sel.to_enable(), ["CUSTOM"]);
        assert_eq!(sel.to_disable(), ["OTHER"]);
    }

    #[test]
    fn test_feature_option_flags() {
        assert_eq!(FeatureOption::Enable.to_string(), "-e");
        assert_eq!(FeatureOption::Disable.to_string(), "-d");
    }
}
