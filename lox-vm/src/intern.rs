// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! String interning.
//!
//! Every string the VM creates — source literals, concatenation results —
//! goes through the intern set. The set has the same open-addressing
//! shape as the globals table but stores only keys: a probe compares
//! cached hash, length and bytes, and a hit returns the existing object.
//! Interning is what lets the rest of the VM compare strings by identity.

use crate::gc::Gc;
use crate::object::{fnv1a, ObjString};

/// Load factor threshold, shared with the globals table.
const MAX_LOAD: f64 = 0.75;

/// Minimum non-zero capacity.
const MIN_CAPACITY: usize = 8;

/// The string intern set.
#[derive(Debug, Default)]
pub struct Interner {
    entries: Vec<Option<Gc<ObjString>>>,
    count: usize,
}

impl Interner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no strings have been interned.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Intern a string: return the existing object for this text, or
    /// allocate, record and return a new one.
    pub fn intern(&mut self, text: &str) -> Gc<ObjString> {
        let hash = fnv1a(text.as_bytes());
        if let Some(existing) = self.find(text, hash) {
            return existing;
        }

        if (self.count + 1) as f64 > self.entries.len() as f64 * MAX_LOAD {
            self.grow();
        }

        let object = Gc::new(ObjString {
            hash,
            text: text.into(),
        });
        let slot = Self::find_slot(&self.entries, text, hash);
        self.entries[slot] = Some(object.clone());
        self.count += 1;
        object
    }

    /// Probe for an already-interned string with this text.
    fn find(&self, text: &str, hash: u32) -> Option<Gc<ObjString>> {
        if self.count == 0 {
            return None;
        }
        let slot = Self::find_slot(&self.entries, text, hash);
        self.entries[slot].clone()
    }

    /// Linear probe from `hash % capacity` to the matching entry or the
    /// first empty slot. The load-factor cap guarantees an empty slot
    /// exists.
    fn find_slot(entries: &[Option<Gc<ObjString>>], text: &str, hash: u32) -> usize {
        let capacity = entries.len();
        let mut index = hash as usize % capacity;
        loop {
            match &entries[index] {
                None => return index,
                Some(existing)
                    if existing.hash == hash
                        && existing.text.len() == text.len()
                        && existing.text.as_ref() == text =>
                {
                    return index;
                }
                Some(_) => index = (index + 1) % capacity,
            }
        }
    }

    fn grow(&mut self) {
        let capacity = if self.entries.len() < MIN_CAPACITY {
            MIN_CAPACITY
        } else {
            self.entries.len() * 2
        };
        let mut entries = vec![None; capacity];
        for object in self.entries.iter().flatten() {
            let slot = Self::find_slot(&entries, &object.text, object.hash);
            entries[slot] = Some(object.clone());
        }
        self.entries = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        assert!(Gc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_objects() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        assert!(!Gc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn survives_growth() {
        let mut interner = Interner::new();
        let originals: Vec<_> = (0..100)
            .map(|i| interner.intern(&format!("key{}", i)))
            .collect();
        // Re-interning after many growths still finds the originals.
        for (i, original) in originals.iter().enumerate() {
            let again = interner.intern(&format!("key{}", i));
            assert!(Gc::ptr_eq(original, &again));
        }
        assert_eq!(interner.len(), 100);
    }

    #[test]
    fn concatenation_results_unify() {
        let mut interner = Interner::new();
        let ab_c = interner.intern(&format!("{}{}", "ab", "c"));
        let a_bc = interner.intern(&format!("{}{}", "a", "bc"));
        assert!(Gc::ptr_eq(&ab_c, &a_bc));
    }

    #[test]
    fn hash_collisions_probe_forward() {
        // Force many entries into a small table so probes wrap.
        let mut interner = Interner::new();
        for i in 0..16 {
            interner.intern(&i.to_string());
        }
        for i in 0..16 {
            let a = interner.intern(&i.to_string());
            let b = interner.intern(&i.to_string());
            assert!(Gc::ptr_eq(&a, &b));
        }
    }
}
