//! String interner backing [`Name`].
//!
//! Provides O(1) interning and lookup with thread-safe access via a single
//! `RwLock`. Interned strings are leaked into `'static` storage; the
//! interner is expected to live for the duration of the process (one
//! interner is typically shared by every parse).

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct Inner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Lookup returns `&'static str` so callers never borrow through the lock.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut inner = Inner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        inner.map.insert("", 0);
        inner.strings.push("");
        StringInterner {
            inner: RwLock::new(inner),
        }
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Re-interning an already-known string is a read-lock hash lookup.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&idx) = self.inner.read().map.get(s) {
            return Name::from_raw(idx);
        }
        let mut inner = self.inner.write();
        // Re-check under the write lock; another thread may have raced us.
        if let Some(&idx) = inner.map.get(s) {
            return Name::from_raw(idx);
        }
        let stored: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(inner.strings.len()).unwrap_or_else(|_| {
            panic!("interner capacity exceeded: {} strings", inner.strings.len())
        });
        inner.strings.push(stored);
        inner.map.insert(stored, idx);
        Name::from_raw(idx)
    }

    /// Look up the string for a `Name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` did not come from this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.inner.read().strings[name.index()]
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        // The empty string is always present.
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
