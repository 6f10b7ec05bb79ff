//! Secret reference resolver.
//!
//! Descriptor `secrets` map a logical key to where its value lives:
//!
//! - `env::VAR_NAME` - reads `$VAR_NAME`
//! - `VAR_NAME` - also reads `$VAR_NAME`; descriptors name the variable
//!   directly

use std::collections::BTreeMap;

use rooms_core::StaticCredentials;
use tracing::{debug, warn};

/// Resolves one secret reference from the environment.
pub fn resolve(reference: &str) -> Result<String, String> {
    let var = reference.strip_prefix("env::").unwrap_or(reference).trim();
    if var.is_empty() {
        return Err("empty secret reference".to_string());
    }
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(format!("environment variable `{}` is empty", var)),
        Err(_) => Err(format!("environment variable `{}` is not set", var)),
    }
}

/// Resolves every declared secret into a credential set.
///
/// Unresolvable secrets are logged and left out; the addon reports them as
/// missing credentials.
pub fn resolve_all(secrets: &BTreeMap<String, String>) -> StaticCredentials {
    let mut credentials = StaticCredentials::new();
    for (key, reference) in secrets {
        match resolve(reference) {
            Ok(value) => {
                debug!(key = %key, "secret resolved");
                credentials.insert(key.clone(), value);
            }
            Err(e) => warn!(key = %key, error = %e, "secret not resolved"),
        }
    }
    credentials
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooms_core::CredentialProvider;

    #[test]
    fn env_prefix_resolves() {
        unsafe {
            std::env::set_var("_ROOMS_TEST_SECRET_PREFIXED", "my-secret-value");
        }
        assert_eq!(
            resolve("env::_ROOMS_TEST_SECRET_PREFIXED").unwrap(),
            "my-secret-value"
        );
        unsafe {
            std::env::remove_var("_ROOMS_TEST_SECRET_PREFIXED");
        }
    }

    #[test]
    fn bare_name_resolves() {
        unsafe {
            std::env::set_var("_ROOMS_TEST_SECRET_BARE", "abc");
        }
        assert_eq!(resolve("_ROOMS_TEST_SECRET_BARE").unwrap(), "abc");
        unsafe {
            std::env::remove_var("_ROOMS_TEST_SECRET_BARE");
        }
    }

    #[test]
    fn missing_var_errors() {
        let result = resolve("env::_ROOMS_NONEXISTENT_VAR_12345");
        assert!(result.unwrap_err().contains("not set"));
        assert!(resolve("env::").is_err());
    }

    #[test]
    fn resolve_all_skips_missing() {
        unsafe {
            std::env::set_var("_ROOMS_TEST_SECRET_ALL", "tok");
        }
        let secrets = BTreeMap::from([
            ("google_calendars_api_key".to_string(), "_ROOMS_TEST_SECRET_ALL".to_string()),
            ("other".to_string(), "env::_ROOMS_NONEXISTENT_VAR_67890".to_string()),
        ]);
        let credentials = resolve_all(&secrets);
        assert_eq!(credentials.len(), 1);
        assert_eq!(
            credentials
                .credential("google_calendars_api_key")
                .unwrap()
                .expose(),
            "tok"
        );
        assert!(credentials.credential("other").is_none());
        unsafe {
            std::env::remove_var("_ROOMS_TEST_SECRET_ALL");
        }
    }
}
