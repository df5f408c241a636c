#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn defaults_match_constants() {
    let c = Config::default();
    assert_eq!(c.handle_size, DEFAULT_HANDLE_SIZE);
    assert_eq!(c.resize_quiet_ms, DEFAULT_RESIZE_QUIET_MS);
    assert_eq!(c.aspect_ratio_key, ModifierKey::Ctrl);
    assert_eq!(c.axis_key, ModifierKey::Shift);
    assert_eq!(c.resize_quiet(), Duration::from_millis(100));
}

#[test]
fn empty_lookup_gives_defaults() {
    assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
}

// =============================================================
// Overrides
// =============================================================

#[test]
fn lookup_overrides_every_field() {
    let c = Config::from_lookup(lookup(&[
        (ENV_HANDLE_SIZE, "8"),
        (ENV_RESIZE_QUIET_MS, "250"),
        (ENV_ASPECT_KEY, "Alt"),
        (ENV_AXIS_KEY, "cmd"),
    ]))
    .unwrap();
    assert_eq!(c.handle_size, 8.0);
    assert_eq!(c.resize_quiet_ms, 250);
    assert_eq!(c.aspect_ratio_key, ModifierKey::Alt);
    assert_eq!(c.axis_key, ModifierKey::Meta);
}

#[test]
fn unparsable_numbers_fall_back() {
    let c = Config::from_lookup(lookup(&[(ENV_HANDLE_SIZE, "big"), (ENV_RESIZE_QUIET_MS, "-1")])).unwrap();
    assert_eq!(c.handle_size, DEFAULT_HANDLE_SIZE);
    assert_eq!(c.resize_quiet_ms, DEFAULT_RESIZE_QUIET_MS);
}

#[test]
fn non_positive_handle_size_is_rejected() {
    let err = Config::from_lookup(lookup(&[(ENV_HANDLE_SIZE, "0")])).unwrap_err();
    assert_eq!(err, ConfigError::HandleSize(0.0));
    assert!(Config::from_lookup(lookup(&[(ENV_HANDLE_SIZE, "-3")])).is_err());
}

#[test]
fn unknown_key_name_is_rejected() {
    let err = Config::from_lookup(lookup(&[(ENV_AXIS_KEY, "hyper")])).unwrap_err();
    assert_eq!(err, ConfigError::ModifierKey { var: ENV_AXIS_KEY, value: "hyper".into() });
    assert!(err.to_string().contains("hyper"));
}

#[test]
fn from_env_reads_process_environment() {
    unsafe { std::env::set_var(ENV_RESIZE_QUIET_MS, "42") };
    let c = Config::from_env();
    unsafe { std::env::remove_var(ENV_RESIZE_QUIET_MS) };
    assert_eq!(c.unwrap().resize_quiet_ms, 42);
}

// =============================================================
// Deserialize
// =============================================================

#[test]
fn deserialize_sparse_json() {
    let c: Config = serde_json::from_str(r#"{"handle_size": 6.5, "axis_key": "alt"}"#).unwrap();
    assert_eq!(c.handle_size, 6.5);
    assert_eq!(c.axis_key, ModifierKey::Alt);
    assert_eq!(c.aspect_ratio_key, ModifierKey::Ctrl);
    assert!(c.validate().is_ok());
}

#[test]
fn validate_catches_deserialized_nonsense() {
    let c: Config = serde_json::from_str(r#"{"handle_size": -1}"#).unwrap();
    assert!(c.validate().is_err());
}
