//! LRU List Module
//!
//! Implements the recency ordering used for LRU eviction as a doubly linked
//! list threaded through a slab of slots.
//!
//! - Front (head) = Most recently used
//! - Back (tail) = Least recently used
//!
//! Nodes refer to each other by slot index instead of by pointer. Freed slots
//! are pushed on a free stack and reused by the next insert, so a list that
//! stays within a fixed size never reallocates.

use std::iter::FusedIterator;

// == Handle ==
/// Stable reference to a live node in an [`LruList`].
///
/// A handle stays valid until its node is removed. After that its slot may
/// be reused, so owners must drop handles to removed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Slab-backed doubly linked list ordered by recency.
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value as the most recently used node.
    pub fn push_front(&mut self, value: T) -> Handle {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Touch ==
    /// Marks a node as recently used (moves to front).
    ///
    /// Returns false if the handle does not refer to a live node.
    pub fn touch(&mut self, handle: Handle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        if self.head != Some(handle.0) {
            self.unlink(handle.0);
            self.link_front(handle.0);
        }
        true
    }

    // == Remove ==
    /// Unlinks a node and returns its value, freeing the slot for reuse.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }
        self.unlink(handle.0);
        let node = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(node.value)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used value.
    ///
    /// Returns None if the list is empty.
    pub fn evict_oldest(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(Handle(tail))
    }

    // == Peek Oldest ==
    /// Returns the least recently used value without removing it.
    pub fn peek_oldest(&self) -> Option<&T> {
        self.get(Handle(self.tail?))
    }

    /// Returns the value behind a handle.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.0)
            .and_then(Option::as_ref)
            .map(|node| &node.value)
    }

    /// Returns a mutable reference to the value behind a handle.
    ///
    /// Does not change the node's position.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    /// Checks if a handle refers to a live node.
    pub fn contains(&self, handle: Handle) -> bool {
        matches!(self.slots.get(handle.0), Some(Some(_)))
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node. Allocated slot storage is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates values from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Number of slots ever allocated, live or free.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, idx: usize) -> Option<&Node<T>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    // Detaches a node from its neighbours. The node's own links are left stale.
    fn unlink(&mut self, idx: usize) {
        let Some((prev, next)) = self.node(idx).map(|n| (n.prev, n.next)) else {
            return;
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?)?;
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
