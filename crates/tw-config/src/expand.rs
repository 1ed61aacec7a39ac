//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (error when unset) and `${VAR:-default}`.

use std::env::VarError;

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `field` names the configuration key for error reporting.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).map(Some))
}

/// Expand `value` using a custom variable lookup.
pub(crate) fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: FnMut(&str) -> Result<Option<String>, VarError>,
{
    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Result<Option<String>, VarError> {
        match name {
            "WIKI_REPO" => Ok(Some("acme/handbook".to_owned())),
            "WIKI_TOKEN" => Ok(Some("s3cret".to_owned())),
            _ => Err(VarError::NotPresent),
        }
    }

    #[test]
    fn test_plain_value_unchanged() {
        let value = expand_with("acme/handbook", "repository.name", lookup).unwrap();
        assert_eq!(value, "acme/handbook");
    }

    #[test]
    fn test_expands_braced_variable() {
        let value = expand_with("${WIKI_REPO}", "repository.name", lookup).unwrap();
        assert_eq!(value, "acme/handbook");
    }

    #[test]
    fn test_expands_inside_text() {
        let value = expand_with("token-${WIKI_TOKEN}-x", "reload.token", lookup).unwrap();
        assert_eq!(value, "token-s3cret-x");
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_with("${WIKI_BRANCH:-main}", "repository.branch", lookup).unwrap();
        assert_eq!(value, "main");
    }

    #[test]
    fn test_unset_without_default_is_error() {
        let err = expand_with("${WIKI_MISSING}", "reload.token", lookup).unwrap_err();
        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "reload.token");
                assert!(message.contains("WIKI_MISSING"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
