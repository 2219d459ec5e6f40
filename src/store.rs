//! Hash index paired with an explicit doubly linked list.
//!
//! `LinkedStore` is the storage engine behind [`HashTable`](crate::HashTable),
//! [`HashSet`](crate::HashSet) and [`LruBuffer`](crate::LruBuffer). The map
//! gives O(1) token lookup; the list keeps entries in order, front = oldest,
//! back = newest, and supports O(1) append, unlink and pop-front.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use rustc_hash::FxHashMap;

use crate::key::HashKey;

// Internal node structure for the doubly linked list
struct Node<E> {
    key: HashKey,
    entry: E,
    prev: *mut Node<E>,
    next: *mut Node<E>,
}

impl<E> Node<E> {
    fn new(key: HashKey, entry: E) -> Self {
        Self {
            key,
            entry,
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }
}

// Internal doubly linked list implementation
struct DoublyLinkedList<E> {
    head: *mut Node<E>,
    tail: *mut Node<E>,
    len: usize,
}

impl<E> DoublyLinkedList<E> {
    fn new() -> Self {
        Self {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
            len: 0,
        }
    }

    // Append node at the back of the list
    fn push_back(&mut self, node: *mut Node<E>) {
        unsafe {
            (*node).next = ptr::null_mut();
            (*node).prev = self.tail;

            if !self.tail.is_null() {
                (*self.tail).next = node;
            } else {
                // Empty list case
                self.head = node;
            }
            self.tail = node;
            self.len += 1;
        }
    }

    // Detach specified node, leaving it unlinked
    fn unlink(&mut self, node: *mut Node<E>) {
        unsafe {
            let prev = (*node).prev;
            let next = (*node).next;

            if !prev.is_null() {
                (*prev).next = next;
            } else {
                self.head = next;
            }

            if !next.is_null() {
                (*next).prev = prev;
            } else {
                self.tail = prev;
            }

            (*node).prev = ptr::null_mut();
            (*node).next = ptr::null_mut();
            self.len -= 1;
        }
    }

    // Detach node from the front
    fn pop_front(&mut self) -> Option<*mut Node<E>> {
        if self.head.is_null() {
            return None;
        }
        let old_head = self.head;
        self.unlink(old_head);
        Some(old_head)
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Ordered hash store keyed by [`HashKey`].
///
/// Every node reachable from `list` is owned by the store and indexed
/// exactly once in `map`.
pub(crate) struct LinkedStore<E> {
    list: DoublyLinkedList<E>,
    map: FxHashMap<HashKey, NonNull<Node<E>>>,
    _owns: PhantomData<Box<Node<E>>>,
}

// Nodes are only reachable through the store, so it may cross threads
// whenever its entries can.
unsafe impl<E: Send> Send for LinkedStore<E> {}

unsafe impl<E: Sync> Sync for LinkedStore<E> {}

impl<E> LinkedStore<E> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            list: DoublyLinkedList::new(),
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            _owns: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        debug_assert_eq!(self.list.len(), self.map.len());
        self.map.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn contains(&self, key: &HashKey) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn get(&self, key: &HashKey) -> Option<&E> {
        self.map
            .get(key)
            .map(|node| unsafe { &(*node.as_ptr()).entry })
    }

    /// Replaces the entry in place, keeping its position, or appends a new
    /// entry at the back. Returns the replaced entry.
    pub(crate) fn insert(&mut self, key: HashKey, entry: E) -> Option<E> {
        if let Some(node) = self.map.get(&key) {
            let old = unsafe { mem::replace(&mut (*node.as_ptr()).entry, entry) };
            return Some(old);
        }
        self.append(key, entry);
        None
    }

    /// Removes any existing entry for `key`, then appends `entry` at the
    /// back. Returns the removed entry.
    pub(crate) fn insert_back(&mut self, key: HashKey, entry: E) -> Option<E> {
        let previous = self.remove(&key);
        self.append(key, entry);
        previous
    }

    fn append(&mut self, key: HashKey, entry: E) {
        let node = NonNull::from(Box::leak(Box::new(Node::new(key.clone(), entry))));
        self.list.push_back(node.as_ptr());
        self.map.insert(key, node);
    }

    pub(crate) fn remove(&mut self, key: &HashKey) -> Option<E> {
        let node = self.map.remove(key)?;
        self.list.unlink(node.as_ptr());
        // Get entry and free node
        let node = unsafe { Box::from_raw(node.as_ptr()) };
        Some(node.entry)
    }

    /// Removes the oldest entry.
    pub(crate) fn pop_front(&mut self) -> Option<(HashKey, E)> {
        let node = self.list.pop_front()?;
        let node = unsafe { Box::from_raw(node) };
        self.map.remove(&node.key);
        Some((node.key, node.entry))
    }

    pub(crate) fn clear(&mut self) {
        // Free all nodes
        let mut current = self.list.head;
        while !current.is_null() {
            unsafe {
                let next = (*current).next;
                drop(Box::from_raw(current));
                current = next;
            }
        }
        self.list = DoublyLinkedList::new();
        self.map.clear();
    }

    /// Iterates from front (oldest) to back (newest).
    pub(crate) fn iter(&self) -> Iter<'_, E> {
        Iter {
            next: self.list.head,
            remaining: self.list.len(),
            _marker: PhantomData,
        }
    }
}

impl<E> Drop for LinkedStore<E> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<E: Clone> Clone for LinkedStore<E> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len());
        for (key, entry) in self.iter() {
            copy.append(key.clone(), entry.clone());
        }
        copy
    }
}

impl<E: fmt::Debug> fmt::Debug for LinkedStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(_, e)| e)).finish()
    }
}

pub(crate) struct Iter<'a, E> {
    next: *const Node<E>,
    remaining: usize,
    _marker: PhantomData<&'a Node<E>>,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = (&'a HashKey, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.next.is_null() {
            return None;
        }
        let node = unsafe { &*self.next };
        self.next = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {}

impl<E> Clone for Iter<'_, E> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of;

    fn k(s: &str) -> HashKey {
        key_of(s).unwrap()
    }

    fn order(store: &LinkedStore<&'static str>) -> Vec<&'static str> {
        store.iter().map(|(_, e)| *e).collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = LinkedStore::new();
        assert_eq!(store.insert(k("a"), "a"), None);
        assert_eq!(store.insert(k("b"), "b"), None);
        assert_eq!(store.insert(k("c"), "c"), None);

        assert_eq!(store.len(), 3);
        assert_eq!(order(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut store = LinkedStore::new();
        store.insert(k("a"), "a");
        store.insert(k("b"), "b");

        assert_eq!(store.insert(k("a"), "A"), Some("a"));
        assert_eq!(order(&store), vec!["A", "b"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_back_moves_to_end() {
        let mut store = LinkedStore::new();
        store.insert(k("a"), "a");
        store.insert(k("b"), "b");
        store.insert(k("c"), "c");

        assert_eq!(store.insert_back(k("a"), "A"), Some("a"));
        assert_eq!(order(&store), vec!["b", "c", "A"]);
        assert_eq!(store.insert_back(k("d"), "d"), None);
        assert_eq!(order(&store), vec!["b", "c", "A", "d"]);
    }

    #[test]
    fn test_remove_keeps_neighbours_linked() {
        let mut store = LinkedStore::new();
        for s in ["a", "b", "c"] {
            store.insert(k(s), s);
        }

        assert_eq!(store.remove(&k("b")), Some("b"));
        assert_eq!(store.remove(&k("b")), None);
        assert_eq!(order(&store), vec!["a", "c"]);

        assert_eq!(store.remove(&k("a")), Some("a"));
        assert_eq!(store.remove(&k("c")), Some("c"));
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_pop_front_returns_oldest() {
        let mut store = LinkedStore::new();
        for s in ["a", "b"] {
            store.insert(k(s), s);
        }

        let (key, entry) = store.pop_front().unwrap();
        assert_eq!(key, k("a"));
        assert_eq!(entry, "a");
        assert!(!store.contains(&k("a")));
        assert_eq!(store.pop_front().map(|(_, e)| e), Some("b"));
        assert_eq!(store.pop_front(), None);
    }

    #[test]
    fn test_clear() {
        let mut store = LinkedStore::new();
        store.insert(k("a"), String::from("one"));
        store.insert(k("b"), String::from("two"));

        store.clear();
        assert_eq!(store.len(), 0);
        assert_eq!(store.get(&k("a")), None);

        store.insert(k("c"), String::from("three"));
        assert_eq!(store.get(&k("c")).map(String::as_str), Some("three"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut store = LinkedStore::new();
        store.insert(k("a"), "a");
        let mut copy = store.clone();
        copy.insert(k("b"), "b");

        assert_eq!(order(&store), vec!["a"]);
        assert_eq!(order(&copy), vec!["a", "b"]);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let mut store = LinkedStore::new();
        store.insert(k("a"), "a");
        store.insert(k("b"), "b");

        let iter = store.iter();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(order(&store), order(&store));
    }
}
