// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Open-addressing hash table for global variables.
//!
//! Keys are interned strings, so key comparison is pointer identity and
//! each key's hash is already cached on the object. Collisions resolve by
//! linear probing. Deletion leaves a tombstone (no key, sentinel value)
//! so probe chains stay walkable; tombstones stay in the count so the
//! load-factor check keeps guaranteeing empty slots and forward progress.

use crate::gc::Gc;
use crate::object::ObjString;
use crate::value::Value;

/// Grow when `count / capacity` would pass this.
const MAX_LOAD: f64 = 0.75;

/// Minimum non-zero capacity.
const MIN_CAPACITY: usize = 8;

#[derive(Debug, Clone)]
struct Entry {
    key: Option<Gc<ObjString>>,
    value: Value,
}

impl Entry {
    /// A never-used slot: no key, nil value.
    fn empty() -> Self {
        Entry {
            key: None,
            value: Value::Nil,
        }
    }

    /// A deleted slot: no key, but a non-nil sentinel so probes keep
    /// walking past it.
    fn tombstone() -> Self {
        Entry {
            key: None,
            value: Value::Bool(true),
        }
    }

    fn is_tombstone(&self) -> bool {
        self.key.is_none() && !matches!(self.value, Value::Nil)
    }
}

/// Hash table keyed by interned strings.
#[derive(Debug, Default)]
pub struct Table {
    /// Live entries plus tombstones.
    count: usize,
    entries: Vec<Entry>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key. Returns `None` for missing and deleted keys.
    pub fn get(&self, key: &Gc<ObjString>) -> Option<Value> {
        if self.count == 0 {
            return None;
        }
        let entry = &self.entries[Self::find_entry(&self.entries, key)];
        entry.key.as_ref().map(|_| entry.value.clone())
    }

    /// Insert or update a key. Returns `true` iff the key was not
    /// already present.
    pub fn set(&mut self, key: Gc<ObjString>, value: Value) -> bool {
        if (self.count + 1) as f64 > self.entries.len() as f64 * MAX_LOAD {
            self.grow();
        }

        let index = Self::find_entry(&self.entries, &key);
        let entry = &mut self.entries[index];
        let is_new = entry.key.is_none();
        // Reusing a tombstone does not change the count: the tombstone
        // was already counted.
        if is_new && !entry.is_tombstone() {
            self.count += 1;
        }
        *entry = Entry {
            key: Some(key),
            value,
        };
        is_new
    }

    /// Delete a key, leaving a tombstone. Returns `true` iff the key was
    /// present.
    pub fn delete(&mut self, key: &Gc<ObjString>) -> bool {
        if self.count == 0 {
            return false;
        }
        let index = Self::find_entry(&self.entries, key);
        if self.entries[index].key.is_none() {
            return false;
        }
        self.entries[index] = Entry::tombstone();
        true
    }

    /// Number of live keys (tombstones excluded).
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.key.is_some()).count()
    }

    /// Whether the table holds no live keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Probe for `key`: the slot holding it, or the slot an insert should
    /// use — the first tombstone passed, if any, otherwise the first
    /// empty slot.
    fn find_entry(entries: &[Entry], key: &Gc<ObjString>) -> usize {
        let capacity = entries.len();
        let mut index = key.hash as usize % capacity;
        let mut tombstone: Option<usize> = None;
        loop {
            let entry = &entries[index];
            match &entry.key {
                None => {
                    if entry.is_tombstone() {
                        // Keep probing: the key may live past this slot.
                        if tombstone.is_none() {
                            tombstone = Some(index);
                        }
                    } else {
                        return tombstone.unwrap_or(index);
                    }
                }
                Some(existing) if Gc::ptr_eq(existing, key) => return index,
                Some(_) => {}
            }
            index = (index + 1) % capacity;
        }
    }

    /// Double the capacity and re-place every live entry. Tombstones are
    /// dropped and the count rebuilt.
    fn grow(&mut self) {
        let capacity = if self.entries.len() < MIN_CAPACITY {
            MIN_CAPACITY
        } else {
            self.entries.len() * 2
        };
        let mut entries = vec![Entry::empty(); capacity];
        let mut count = 0;
        for entry in &self.entries {
            if let Some(key) = &entry.key {
                let index = Self::find_entry(&entries, key);
                entries[index] = entry.clone();
                count += 1;
            }
        }
        self.entries = entries;
        self.count = count;
    }
}
