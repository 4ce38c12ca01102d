//! Cached Value Module
//!
//! Type-erased storage for facade values plus their size estimate.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

// == Cached Value ==
/// A value exactly as the caller handed it over, shared behind an `Arc`.
///
/// The serialized size is measured once at write time. A value whose JSON
/// form cannot be produced is still stored and reports a size of 0.
#[derive(Clone)]
pub struct CachedValue {
    value: Arc<dyn Any + Send + Sync>,
    size: usize,
}

impl CachedValue {
    /// Wraps `value`, measuring it for the memory estimate.
    pub fn new<T>(key: &str, value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        let size = serialized_size(key, &value);
        Self {
            value: Arc::new(value),
            size,
        }
    }

    /// Whether the stored value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// UTF-16 sized estimate of the value's JSON form, 0 if unmeasurable.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Debug for CachedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedValue")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

fn serialized_size<T: Serialize>(key: &str, value: &T) -> usize {
    match serde_json::to_string(value) {
        Ok(json) => json.encode_utf16().count() * 2,
        Err(err) => {
            warn!(key = %key, error = %err, "could not size cache entry");
            0
        }
    }
}
