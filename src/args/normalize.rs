//! Argument Normalizer Module
//!
//! Resolves a call's positional and named arguments against the declared
//! signature into one canonical name-keyed mapping, so cache-key extraction
//! works the same way no matter how the caller spelled the call.

use serde_json::Value;

use crate::args::Signature;

// == Canonical Arguments ==
/// Ordered mapping from parameter name to bound value.
///
/// Order follows the declaration (then any extra named arguments as given);
/// lookups are by name. Created fresh per call, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalArgs {
    entries: Vec<(String, Value)>,
}

impl CanonicalArgs {
    /// Looks up a bound value by parameter name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Whether the parameter is bound at all.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Iterates bindings in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: &str, value: Value) {
        self.entries.push((name.to_string(), value));
    }
}

// == Normalize ==
/// Binds a call's arguments to the declared parameter names.
///
/// Declared parameters are walked in order: a parameter supplied by name
/// keeps that value; otherwise it takes the next unconsumed positional
/// argument; otherwise its declared default; otherwise it is left unbound.
/// Named arguments outside the declaration pass through unchanged, after
/// the declared ones.
///
/// Pure function of its inputs; no side effects.
pub fn normalize(
    signature: &Signature,
    positional: &[Value],
    named: &[(String, Value)],
) -> CanonicalArgs {
    let mut out = CanonicalArgs::default();
    let mut next_positional = 0;

    for param in signature.params() {
        if let Some((_, value)) = named.iter().find(|(n, _)| n == param.name()) {
            out.push(param.name(), value.clone());
        } else if next_positional < positional.len() {
            out.push(param.name(), positional[next_positional].clone());
            next_positional += 1;
        } else if let Some(default) = param.default() {
            out.push(param.name(), default.clone());
        }
        // Required parameter with nothing supplied: stays unbound. That is a
        // caller contract violation the wrapped function surfaces itself.
    }

    for (name, value) in named {
        if !signature.declares(name) {
            out.push(name, value.clone());
        }
    }

    out
}
