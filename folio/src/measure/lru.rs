// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fixed-capacity least-recently-used map.

use core::hash::Hash;

use hashbrown::HashMap;

const NONE: usize = usize::MAX;

struct Entry<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// A least-recently-used cache with O(1) amortized lookup and access-order
/// maintenance.
///
/// Entries live in a slab indexed by a hash map; recency is a doubly-linked
/// list threaded through the slab. Inserting beyond capacity evicts the
/// least-recently-accessed entry, and lookups refresh recency.
pub(crate) struct LruCache<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<Entry<K, V>>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-capacity cache is a caller bug.
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LRU capacity must be greater than zero");
        Self {
            index: HashMap::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            head: NONE,
            tail: NONE,
            capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the cached value for `key`, refreshing its recency.
    pub(crate) fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.detach(slot);
        self.attach_front(slot);
        Some(&self.entries[slot].value)
    }

    /// Inserts `value` under `key`, evicting the least-recently-used entry
    /// when the cache is full.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].value = value;
            self.detach(slot);
            self.attach_front(slot);
            return;
        }
        let slot = if self.entries.len() < self.capacity {
            self.entries.push(Entry {
                key: key.clone(),
                value,
                prev: NONE,
                next: NONE,
            });
            self.entries.len() - 1
        } else {
            // Reuse the least-recently-used slot.
            let slot = self.tail;
            self.detach(slot);
            let entry = &mut self.entries[slot];
            let evicted = core::mem::replace(&mut entry.key, key.clone());
            entry.value = value;
            entry.prev = NONE;
            entry.next = NONE;
            self.index.remove(&evicted);
            slot
        };
        self.index.insert(key, slot);
        self.attach_front(slot);
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = {
            let entry = &self.entries[slot];
            (entry.prev, entry.next)
        };
        if prev != NONE {
            self.entries[prev].next = next;
        } else if self.head == slot {
            self.head = next;
        }
        if next != NONE {
            self.entries[next].prev = prev;
        } else if self.tail == slot {
            self.tail = prev;
        }
        self.entries[slot].prev = NONE;
        self.entries[slot].next = NONE;
    }

    fn attach_front(&mut self, slot: usize) {
        self.entries[slot].prev = NONE;
        self.entries[slot].next = self.head;
        if self.head != NONE {
            self.entries[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NONE {
            self.tail = slot;
        }
    }
}
