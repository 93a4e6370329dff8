//! Line patterns used by the region transducer.
//!
//! Three shapes are recognised:
//!
//! | Pattern       | Matches                                            |
//! |---------------|----------------------------------------------------|
//! | marker        | `//CONFIGURE_EYECATCH_BEGIN (DO NOT MODIFY ...)`   |
//! | enable toggle | `#define ENABLE_WIFI ...` or `//#define ENABLE_WIFI ...` |
//! | disable toggle| `#define ENABLE_WIFI ...` only (already active)    |
//!
//! A feature name must end at a non-identifier character, so `TELNET` never
//! matches the `ENABLE_TELNET_WELCOME_MSG` line.

use regex::Regex;

use crate::domain::profile::CasePolicy;

/// Everything that may follow a feature name: nothing, or a non-identifier
/// character and then anything.
const NAME_TAIL: &str = r"(?:[^A-Za-z0-9_].*)?";

/// Builds the pattern for a marker comment line: optional indentation, `//`,
/// optional spaces, then the literal token.  The token must not run into
/// further identifier characters; anything else may follow it.
pub(crate) fn marker(token: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^\s*//\s*{}(?:[^A-Za-z0-9_]|$)",
        regex::escape(token)
    ))
}

/// Pre-compiled enable and disable patterns for one requested feature.
#[derive(Debug)]
pub(crate) struct TogglePattern {
    pub(crate) name: String,
    enable: Regex,
    disable: Regex,
}

impl TogglePattern {
    pub(crate) fn new(
        prefix: &str,
        name: &str,
        case_policy: CasePolicy,
    ) -> Result<Self, regex::Error> {
        let escaped = regex::escape(name);
        let name_expr = match case_policy {
            CasePolicy::Sensitive => escaped,
            CasePolicy::Insensitive => format!("(?i:{escaped})"),
        };
        let macro_expr = format!("{}{}{}", regex::escape(prefix), name_expr, NAME_TAIL);

        Ok(Self {
            name: name.to_string(),
            // Any number of `//` comment prefixes; group 1 is the macro body.
            enable: Regex::new(&format!(r"^\s*(?://\s*)*#define\s+({macro_expr})$"))?,
            disable: Regex::new(&format!(r"^\s*#define\s+{macro_expr}$"))?,
        })
    }

    /// If `line` is a toggle for this feature, active or not, returns its
    /// active form: `#define ` followed by the macro name and payload.
    pub(crate) fn activate(&self, line: &str) -> Option<String> {
        self.enable
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|body| format!("#define {}", body.as_str()))
    }

    /// If `line` is an active toggle for this feature, returns it commented out.
    pub(crate) fn deactivate(&self, line: &str) -> Option<String> {
        self.disable.is_match(line).then(|| format!("//{line}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wifi() -> TogglePattern {
        TogglePattern::new("ENABLE_", "WIFI", CasePolicy::Sensitive).unwrap()
    }

    #[test]
    fn test_marker_tolerates_indentation_and_space_after_slashes() {
        let re = marker("CONFIGURE_EYECATCH_BEGIN").unwrap();
        assert!(re.is_match("//CONFIGURE_EYECATCH_BEGIN (DO NOT MODIFY THIS LINE)"));
        assert!(re.is_match("   //  CONFIGURE_EYECATCH_BEGIN"));
        assert!(!re.is_match("#define CONFIGURE_EYECATCH_BEGIN"));
        assert!(!re.is_match("/* CONFIGURE_EYECATCH_BEGIN */"));
    }

    #[test]
    fn test_marker_does_not_match_longer_token() {
        let re = marker("BLOCK").unwrap();
        assert!(re.is_match("//BLOCK"));
        assert!(!re.is_match("//BLOCK_END"));
    }

    #[test]
    fn test_marker_token_is_literal() {
        let re = marker("A.B").unwrap();
        assert!(re.is_match("// A.B"));
        assert!(!re.is_match("// AxB"));
    }

    #[test]
    fn test_activate_uncomments_and_keeps_payload() {
        assert_eq!(
            wifi().activate("//#define ENABLE_WIFI  //enable wifi").as_deref(),
            Some("#define ENABLE_WIFI  //enable wifi")
        );
    }

    #[test]
    fn test_activate_handles_repeated_comment_prefixes_and_indentation() {
        assert_eq!(
            wifi().activate("  // //  #define   ENABLE_WIFI").as_deref(),
            Some("#define ENABLE_WIFI")
        );
    }

    #[test]
    fn test_activate_normalizes_already_active_line() {
        assert_eq!(
            wifi().activate("    #define ENABLE_WIFI 1").as_deref(),
            Some("#define ENABLE_WIFI 1")
        );
    }

    #[test]
    fn test_activate_rejects_longer_name_with_same_prefix() {
        let telnet = TogglePattern::new("ENABLE_", "TELNET", CasePolicy::Sensitive).unwrap();
        assert!(telnet.activate("#define ENABLE_TELNET_WELCOME_MSG").is_none());
        assert!(telnet.activate("#define ENABLE_TELNET  //enable telnet").is_some());
    }

    #[test]
    fn test_activate_ignores_other_directives() {
        assert!(wifi().activate("#if defined(ENABLE_WIFI)").is_none());
        assert!(wifi().activate("#undef ENABLE_WIFI").is_none());
    }

    #[test]
    fn test_deactivate_only_matches_active_lines() {
        assert_eq!(
            wifi().deactivate("#define ENABLE_WIFI  //enable wifi").as_deref(),
            Some("//#define ENABLE_WIFI  //enable wifi")
        );
        assert!(wifi().deactivate("//#define ENABLE_WIFI").is_none());
    }

    #[test]
    fn test_deactivate_keeps_indentation_verbatim() {
        assert_eq!(
            wifi().deactivate("  #define ENABLE_WIFI").as_deref(),
            Some("//  #define ENABLE_WIFI")
        );
    }

    #[test]
    fn test_insensitive_policy_matches_name_in_any_case() {
        let p = TogglePattern::new("ENABLE_", "WIFI", CasePolicy::Insensitive).unwrap();
        assert_eq!(
            p.activate("//#define ENABLE_Wifi").as_deref(),
            Some("#define ENABLE_Wifi")
        );
        // The prefix stays literal.
        assert!(p.activate("//#define enable_WIFI").is_none());
    }
}
