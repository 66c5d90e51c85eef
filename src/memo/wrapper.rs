//! Wrapper Module
//!
//! The decorator composer: normalize arguments, evaluate the gate once,
//! consult the store, run the function on a miss and write the result back.
//! Errors from the wrapped function propagate unchanged and are never
//! cached; errors from the cache machinery degrade to uncached execution.

use serde_json::Value;
use tracing::{debug, error};

use crate::args::{normalize, should_cache, CacheDecision, CanonicalArgs, Signature};
use crate::cache::MemoryCache;
use crate::disk::DiskCache;
use crate::error::{CacheError, Result};
use crate::key::CacheKey;

// == Public Constants ==
/// Default name of the boolean parameter controlling caching per call
pub const DEFAULT_ENABLED_PARAM: &str = "cache";

// == Cache Backend ==
/// The seam between the composer and a store. Both the bounded in-memory
/// store and the disk store plug in here.
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value for the key, if present and live.
    fn get(&self, key: &CacheKey) -> Option<Value>;

    /// Stores a value under the key. Only the persistent store can fail.
    fn put(&self, key: &CacheKey, value: Value) -> Result<()>;
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Value> {
        MemoryCache::get(self, key)
    }

    fn put(&self, key: &CacheKey, value: Value) -> Result<()> {
        MemoryCache::put(self, key, value);
        Ok(())
    }
}

impl CacheBackend for DiskCache {
    fn get(&self, key: &CacheKey) -> Option<Value> {
        DiskCache::get(self, key)
    }

    fn put(&self, key: &CacheKey, value: Value) -> Result<()> {
        DiskCache::put(self, key, value)
    }
}

impl<B: CacheBackend + ?Sized> CacheBackend for std::sync::Arc<B> {
    fn get(&self, key: &CacheKey) -> Option<Value> {
        (**self).get(key)
    }

    fn put(&self, key: &CacheKey, value: Value) -> Result<()> {
        (**self).put(key, value)
    }
}

// == Memo Config ==
/// Per-decoration configuration: which parameter identifies the cache entry
/// and which one toggles caching.
#[derive(Debug, Clone)]
pub struct MemoConfig {
    key_param: String,
    enabled_param: String,
    enabled_explicit: bool,
}

impl MemoConfig {
    /// Designates the key parameter; the enabled parameter defaults to
    /// `"cache"`.
    pub fn new(key_param: impl Into<String>) -> Self {
        Self {
            key_param: key_param.into(),
            enabled_param: DEFAULT_ENABLED_PARAM.to_string(),
            enabled_explicit: false,
        }
    }

    /// Designates an explicit enabled parameter. Unlike the default name,
    /// an explicitly configured one must exist on the signature.
    pub fn enabled_param(mut self, name: impl Into<String>) -> Self {
        self.enabled_param = name.into();
        self.enabled_explicit = true;
        self
    }

    pub fn key_param_name(&self) -> &str {
        &self.key_param
    }

    pub fn enabled_param_name(&self) -> &str {
        &self.enabled_param
    }
}

// == Memoized ==
/// A function bound to a cache store.
///
/// Generic over the backend and the wrapped function's error type, which
/// passes through [`call`](Self::call) untouched.
pub struct Memoized<B, E> {
    name: String,
    doc: Option<String>,
    signature: Signature,
    config: MemoConfig,
    backend: B,
    func: Box<dyn Fn(&CanonicalArgs) -> std::result::Result<Value, E> + Send + Sync>,
}

impl<B: CacheBackend, E> Memoized<B, E> {
    // == Constructor ==
    /// Binds `func` to `backend`, validating the configuration against the
    /// declared signature. Fails fast at decoration time, never per-call.
    pub fn new<F>(
        name: impl Into<String>,
        signature: Signature,
        backend: B,
        config: MemoConfig,
        func: F,
    ) -> Result<Self>
    where
        F: Fn(&CanonicalArgs) -> std::result::Result<Value, E> + Send + Sync + 'static,
    {
        if !signature.declares(&config.key_param) {
            return Err(CacheError::Configuration(format!(
                "key parameter '{}' is not declared on the target signature",
                config.key_param
            )));
        }
        if config.enabled_explicit && !signature.declares(&config.enabled_param) {
            return Err(CacheError::Configuration(format!(
                "enabled parameter '{}' is not declared on the target signature",
                config.enabled_param
            )));
        }

        Ok(Self {
            name: name.into(),
            doc: None,
            signature,
            config,
            backend,
            func: Box::new(func),
        })
    }

    /// Attaches the original function's documentation to the wrapper.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    // == Introspection ==
    /// The wrapped function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped function's documentation, if attached.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The store this function is bound to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // == Call ==
    /// Invokes the wrapped function through the cache.
    ///
    /// The gate is evaluated exactly once, before any store access, so the
    /// read and write phases of one call always agree. A failed store write
    /// is logged and the freshly computed value still returned; a failing
    /// function call propagates its error on every invocation, uncached.
    pub fn call(
        &self,
        positional: &[Value],
        named: &[(String, Value)],
    ) -> std::result::Result<Value, E> {
        let args = normalize(&self.signature, positional, named);
        let decision = should_cache(&args, &self.config.key_param, &self.config.enabled_param);

        if let CacheDecision::Enabled(key) = &decision {
            if let Some(hit) = self.backend.get(key) {
                debug!(function = %self.name, key = %key, "cache hit");
                return Ok(hit);
            }
        }

        let result = (self.func)(&args)?;

        if let CacheDecision::Enabled(key) = &decision {
            match self.backend.put(key, result.clone()) {
                Ok(()) => debug!(function = %self.name, key = %key, "cache store"),
                Err(err) => error!(
                    function = %self.name,
                    key = %key,
                    error = %err,
                    "cache write failed, returning uncached result"
                ),
            }
        }

        Ok(result)
    }

    /// Convenience for calls with positional arguments only.
    pub fn call_positional(&self, positional: &[Value]) -> std::result::Result<Value, E> {
        self.call(positional, &[])
    }
}
