//! Feature registry: the closed set of names a caller may request.
//!
//! The registry is used only for input validation and for the usage report.
//! It does not gate the transducer, which acts on whatever names it is given.

use super::profile::CasePolicy;

/// Fixed set of recognised feature names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRegistry {
    /// Names in declaration order, already normalised by `case_policy`.
    names: Vec<String>,
    case_policy: CasePolicy,
}

impl FeatureRegistry {
    /// Creates a registry from declared names.
    ///
    /// Names are normalised with `case_policy` so lookups only need to
    /// normalise the request side.
    pub fn new<I, S>(names: I, case_policy: CasePolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| case_policy.normalize(n.as_ref()))
                .collect(),
            case_policy,
        }
    }

    /// Applies the registry's case policy to a requested name.
    pub fn normalize(&self, name: &str) -> String {
        self.case_policy.normalize(name)
    }

    /// Returns `true` if `name`, after the case policy, is a recognised feature.
    ///
    /// An empty name is never valid.
    pub fn is_valid(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let normalized = self.normalize(name);
        self.names.iter().any(|n| *n == normalized)
    }

    /// Recognised names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Recognised names sorted alphabetically, for the usage report.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut sorted: Vec<&str> = self.names.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::EditorProfile;

    fn grbl() -> FeatureRegistry {
        EditorProfile::grbl_esp32().registry()
    }

    #[test]
    fn test_known_feature_is_valid() {
        let registry = grbl();
        assert!(registry.is_valid("WIFI"));
        assert!(registry.is_valid("SERIAL2SOCKET_OUT"));
    }

    #[test]
    fn test_unknown_feature_is_invalid() {
        assert!(!grbl().is_valid("NOT_A_FEATURE"));
    }

    #[test]
    fn test_empty_name_is_invalid() {
        assert!(!grbl().is_valid(""));
    }

    #[test]
    fn test_sensitive_registry_rejects_lowercase() {
        assert!(!grbl().is_valid("wifi"));
    }

    #[test]
    fn test_insensitive_registry_accepts_any_case() {
        // Arrange
        let registry = FeatureRegistry::new(["WIFI", "Sd_Card"], CasePolicy::Insensitive);

        // Assert
        assert!(registry.is_valid("wifi"));
        assert!(registry.is_valid("sd_card"));
        assert!(registry.is_valid("SD_CARD"));
        assert_eq!(registry.names(), ["WIFI", "SD_CARD"]);
    }

    #[test]
    fn test_sorted_names_are_alphabetical() {
        let registry = FeatureRegistry::new(["WIFI", "BLUETOOTH", "HTTP"], CasePolicy::Sensitive);
        assert_eq!(registry.sorted_names(), vec!["BLUETOOTH", "HTTP", "WIFI"]);
        // Declaration order is untouched.
        assert_eq!(registry.names()[0], "WIFI");
    }

    #[test]
    fn test_grbl_registry_has_fourteen_features() {
        let registry = grbl();
        assert_eq!(registry.len(), 14);
        assert!(!registry.is_empty());
    }
}
