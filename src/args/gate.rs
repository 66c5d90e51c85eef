//! Cache Gate Module
//!
//! Decides, once per call, whether the call participates in caching, and
//! extracts the cache key when it does. Evaluating the gate exactly once
//! before any store access keeps the read and write phases of the same call
//! from diverging.

use serde_json::Value;

use crate::args::CanonicalArgs;
use crate::key::CacheKey;

// == Cache Decision ==
/// Outcome of the gate for one call.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    /// Caching applies; lookups and write-back use this key.
    Enabled(CacheKey),
    /// The call bypasses the store entirely.
    Disabled,
}

impl CacheDecision {
    pub fn is_enabled(&self) -> bool {
        matches!(self, CacheDecision::Enabled(_))
    }

    /// The extracted key, when caching applies.
    pub fn key(&self) -> Option<&CacheKey> {
        match self {
            CacheDecision::Enabled(key) => Some(key),
            CacheDecision::Disabled => None,
        }
    }
}

// == Should Cache ==
/// Evaluates the gate for one normalized call.
///
/// The enabled flag defaults to true when absent from both the call and the
/// declaration; only an explicit `false` disables. A missing key parameter,
/// or a key bound to the `null` sentinel, disables caching regardless of
/// the flag.
pub fn should_cache(
    args: &CanonicalArgs,
    key_param: &str,
    enabled_param: &str,
) -> CacheDecision {
    if matches!(args.get(enabled_param), Some(Value::Bool(false))) {
        return CacheDecision::Disabled;
    }

    match args.get(key_param).cloned().and_then(CacheKey::from_value) {
        Some(key) => CacheDecision::Enabled(key),
        None => CacheDecision::Disabled,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{normalize, Param, Signature};
    use serde_json::json;

    fn sig() -> Signature {
        Signature::new(vec![
            Param::required("x"),
            Param::with_default("cache", json!(true)),
        ])
    }

    fn gate(positional: &[Value], named: &[(String, Value)]) -> CacheDecision {
        let args = normalize(&sig(), positional, named);
        should_cache(&args, "x", "cache")
    }

    #[test]
    fn test_enabled_by_default_with_key() {
        let decision = gate(&[json!(3)], &[]);
        assert!(decision.is_enabled());
        assert_eq!(decision.key().unwrap().canonical(), "3");
    }

    #[test]
    fn test_explicit_false_disables() {
        let decision = gate(&[json!(3)], &[("cache".to_string(), json!(false))]);
        assert_eq!(decision, CacheDecision::Disabled);
    }

    #[test]
    fn test_missing_key_disables() {
        let decision = gate(&[], &[]);
        assert_eq!(decision, CacheDecision::Disabled);
    }

    #[test]
    fn test_null_key_disables_even_when_enabled() {
        let decision = gate(&[json!(null)], &[("cache".to_string(), json!(true))]);
        assert_eq!(decision, CacheDecision::Disabled);
    }

    #[test]
    fn test_undeclared_enabled_param_defaults_to_true() {
        let sig = Signature::new(vec![Param::required("x")]);
        let args = normalize(&sig, &[json!(1)], &[]);

        let decision = should_cache(&args, "x", "cache");
        assert!(decision.is_enabled());
    }

    #[test]
    fn test_non_boolean_flag_does_not_disable() {
        // Only an explicit `false` turns caching off.
        let decision = gate(&[json!(3)], &[("cache".to_string(), json!("off"))]);
        assert!(decision.is_enabled());
    }
}
