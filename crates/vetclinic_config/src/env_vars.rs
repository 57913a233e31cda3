//! Environment variable naming for the VetClinic configuration.
//!
//! Plain settings are read from `VETCLINIC__<SECTION>__<KEY>`, secrets from
//! `VETCLINIC_SECRET_<SECTION>_<KEY>` with a fallback to the conventional
//! `<SECTION>_<KEY>` form (e.g. `STRIPE_SECRET_KEY`).

use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "VETCLINIC";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "VETCLINIC_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value in config files meaning "resolve me from the environment".
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `server.host` becomes `VETCLINIC__SERVER__HOST`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `stripe.secret_key` becomes `VETCLINIC_SECRET_STRIPE_SECRET_KEY`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its conventional, unprefixed variable name
///
/// `stripe.secret_key` becomes `STRIPE_SECRET_KEY`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    let env_var = config_path_to_env_var(path);
    env::var(&env_var).ok()
}

/// Get an environment variable for a secret path, prefixed form first.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let env_var = secret_path_to_env_var(path);
    if let Ok(value) = env::var(&env_var) {
        return Some(value);
    }

    let legacy_env_var = legacy_secret_path_to_env_var(path);
    env::var(&legacy_env_var).ok()
}

/// Paths containing "secret", "key", "password" or "token" are secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Get an environment variable for a path, picking the secret or plain naming.
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Replaces every `"secret_from_env"` string in `value` with the matching
/// environment variable.
///
/// Returns `true` if any value was replaced. Markers without a variable are
/// left in place and logged.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(
            config_path_to_env_var("server.host"),
            "VETCLINIC__SERVER__HOST"
        );
        assert_eq!(
            config_path_to_env_var("database.url"),
            "VETCLINIC__DATABASE__URL"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("stripe.secret_key"),
            "VETCLINIC_SECRET_STRIPE_SECRET_KEY"
        );
        assert_eq!(
            secret_path_to_env_var("stripe.webhook_secret"),
            "VETCLINIC_SECRET_STRIPE_WEBHOOK_SECRET"
        );
    }

    #[test]
    fn test_legacy_secret_path_to_env_var() {
        assert_eq!(
            legacy_secret_path_to_env_var("stripe.secret_key"),
            "STRIPE_SECRET_KEY"
        );
        assert_eq!(legacy_secret_path_to_env_var("token"), "TOKEN");
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("stripe.secret_key"));
        assert!(is_secret_path("stripe.webhook_secret"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("database.url"));
    }

    #[test]
    fn test_inject_env_vars_leaves_unresolved_marker() {
        let mut value = serde_json::json!({
            "unit_test_section": { "missing_secret_key": "secret_from_env" },
            "server": { "host": "0.0.0.0" }
        });
        let replaced = inject_env_vars(&mut value);
        assert!(!replaced);
        assert_eq!(
            value["unit_test_section"]["missing_secret_key"],
            "secret_from_env"
        );
        assert_eq!(value["server"]["host"], "0.0.0.0");
    }
}
