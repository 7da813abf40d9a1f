//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

// == Node Id ==
/// Stable handle to a tracked key, valid until the key is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Doubly-linked list threaded through a slab of nodes:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Every operation is O(1). Freed slots are reused, so a `NodeId` must not
/// be used after the key it names has been removed.
#[derive(Debug, Default)]
pub struct LruTracker {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Starts tracking a key as the most recently used.
    pub fn insert(&mut self, key: String) -> NodeId {
        let node = Node {
            key,
            prev: None,
            next: self.head,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        self.attach_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Touch ==
    /// Marks a key as recently used (moves to head).
    pub fn touch(&mut self, id: NodeId) {
        if self.head == Some(id.0) {
            return;
        }
        self.detach(id.0);
        if let Some(node) = self.nodes[id.0].as_mut() {
            node.prev = None;
            node.next = self.head;
        }
        self.attach_front(id.0);
    }

    // == Remove ==
    /// Stops tracking a key, returning it.
    pub fn remove(&mut self, id: NodeId) -> Option<String> {
        if !matches!(self.nodes.get(id.0), Some(Some(_))) {
            return None;
        }
        self.detach(id.0);
        let node = self.nodes[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.key)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let tail = self.tail?;
        self.remove(NodeId(tail))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        let tail = self.tail?;
        self.nodes[tail].as_ref().map(|node| node.key.as_str())
    }

    // == Clear ==
    /// Forgets every tracked key.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn attach_front(&mut self, idx: usize) {
        match self.head {
            Some(old_head) => {
                if let Some(node) = self.nodes[old_head].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}
