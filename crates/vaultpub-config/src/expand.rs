//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Bare `$VAR` is left alone so upload endpoints and tokens containing
/// dollar signs survive unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand an optional string in place.
pub(crate) fn expand_env_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(v) = value.as_deref() {
        *value = Some(expand_env(v, field)?);
    }
    Ok(())
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("VAULTPUB_TEST_SIMPLE", "abc123");
        }
        let result = expand_env("Client-ID ${VAULTPUB_TEST_SIMPLE}", "uploader.authorization")
            .unwrap();
        assert_eq!(result, "Client-ID abc123");
        unsafe {
            std::env::remove_var("VAULTPUB_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("VAULTPUB_TEST_UNSET");
        }
        let result = expand_env("${VAULTPUB_TEST_UNSET:-https://img.example}", "f").unwrap();
        assert_eq!(result, "https://img.example");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("VAULTPUB_TEST_MISSING");
        }
        let err = expand_env("${VAULTPUB_TEST_MISSING}", "uploader.endpoint").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("VAULTPUB_TEST_MISSING"));
        assert!(err.to_string().contains("uploader.endpoint"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("https://example.com/$path", "uploader.endpoint").unwrap();
        assert_eq!(result, "https://example.com/$path");
    }

    #[test]
    fn test_expand_opt_none_untouched() {
        let mut value = None;
        expand_env_opt(&mut value, "f").unwrap();
        assert!(value.is_none());
    }
}
