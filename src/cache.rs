//! Compiled-pattern caching with LRU eviction

use crate::error::QueryError;
use crate::search::{compile, CompiledQuery, QueryRequest};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Everything that feeds pattern compilation, in one hashable key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct PatternKey {
    text: String,
    use_marks: bool,
    use_classes: bool,
    forms: [bool; 4],
}

impl PatternKey {
    fn for_request(request: &QueryRequest) -> Self {
        Self {
            text: request.text.clone(),
            use_marks: request.use_marks,
            use_classes: request.use_classes,
            forms: request.form_flags(),
        }
    }
}

/// LRU cache of compiled queries. Compile errors are never cached.
pub struct PatternCache {
    cache: Mutex<LruCache<PatternKey, Arc<CompiledQuery>>>,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        let cache =
            LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(64).unwrap()));
        Self {
            cache: Mutex::new(cache),
        }
    }

    pub fn get_or_compile(&self, request: &QueryRequest) -> Result<Arc<CompiledQuery>, QueryError> {
        let key = PatternKey::for_request(request);
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(compiled) = cache.get(&key) {
                return Ok(Arc::clone(compiled));
            }
        }

        let compiled = Arc::new(compile(request)?);
        {
            let mut cache = self.cache.lock().unwrap();
            cache.put(key, Arc::clone(&compiled));
        }
        Ok(compiled)
    }
}
