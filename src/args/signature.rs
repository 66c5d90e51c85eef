//! Signature Module
//!
//! Declared parameter list of a wrapped function. Rust has no runtime
//! signature introspection, so the declaration is supplied once at
//! decoration time and reused for every call.

use serde_json::Value;

// == Parameter ==
/// One declared parameter: a name and an optional default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    default: Option<Value>,
}

impl Param {
    /// A parameter with no default. If a call supplies no value for it, the
    /// canonical mapping simply omits it and the wrapped function itself
    /// reports the violation.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a declared default value.
    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

// == Signature ==
/// Ordered parameter declaration of a wrapped function.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Creates a signature from parameters in declaration order.
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Whether a parameter with the given name is declared.
    pub fn declares(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name() == name)
    }
}
