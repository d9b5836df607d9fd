//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// `field` is the dotted config path, used in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_value_unchanged() {
        assert_eq!(expand_env("/archive/", "site.base").unwrap(), "/archive/");
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_env("${WXDOCS_TEST_SURELY_UNSET:-/fallback/}", "site.base").unwrap();
        assert_eq!(value, "/fallback/");
    }

    #[test]
    fn test_unset_without_default_errors() {
        let err = expand_env("${WXDOCS_TEST_SURELY_UNSET}", "site.base").unwrap_err();
        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "site.base");
                assert!(message.contains("WXDOCS_TEST_SURELY_UNSET"));
            }
            other => panic!("Expected ConfigError::EnvVar, got {other:?}"),
        }
    }
}
