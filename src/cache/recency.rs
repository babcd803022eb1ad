//! Recency List Module
//!
//! Arena-backed doubly-linked list tracking least-to-most recently used keys
//! within a single shard.
//!
//! Nodes live in a growable slot arena and are linked by index, so handles
//! stay valid across any reallocation of the backing storage. A freed slot is
//! recycled through a free list. Head = least recently used, tail = most
//! recently used. All operations are O(1).

// == Node Handle ==
/// Stable identifier for a node in a [`RecencyList`].
///
/// Handles are plain slot indices. A handle is valid from the `push_back`
/// that produced it until the `remove`/`pop_front` that frees its node;
/// callers must not hold a handle across its node's removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Returns the raw slot index (used by invariant checks in tests).
    pub fn index(self) -> usize {
        self.0
    }
}

// == List Node ==
#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Ordered sequence of keys for one shard, head = LRU, tail = MRU.
#[derive(Debug)]
pub struct RecencyList<K> {
    /// Slot arena; `None` marks a free slot.
    slots: Vec<Option<Node<K>>>,
    /// Indices of free slots available for reuse.
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates an empty recency list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty recency list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends a key at the tail (most recently used position).
    ///
    /// Returns a handle the caller stores alongside its entry.
    pub fn push_back(&mut self, key: K) -> NodeHandle {
        let node = Node {
            key,
            prev: self.tail,
            next: None,
        };
        let idx = if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        };
        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.slots[tail].as_mut() {
                    tail_node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        NodeHandle(idx)
    }

    // == Remove ==
    /// Detaches and frees the node behind `handle`, returning its key.
    ///
    /// Returns `None` if the slot is already free (stale handle); the list is
    /// left untouched in that case.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<K> {
        self.detach(handle.0)?;
        let node = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(node.key)
    }

    // == Move To Back ==
    /// Promotes the node behind `handle` to the tail (most recently used).
    ///
    /// Returns the handle of the promoted node, or `None` for a stale handle.
    pub fn move_to_back(&mut self, handle: NodeHandle) -> Option<NodeHandle> {
        if self.slots.get(handle.0).map_or(true, |s| s.is_none()) {
            return None;
        }
        if self.tail == Some(handle.0) {
            return Some(handle);
        }
        self.detach(handle.0)?;
        // Reattach the same slot at the tail; the handle stays valid.
        let old_tail = self.tail;
        if let Some(node) = self.slots[handle.0].as_mut() {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail) => {
                if let Some(tail_node) = self.slots[tail].as_mut() {
                    tail_node.next = Some(handle.0);
                }
            }
            None => self.head = Some(handle.0),
        }
        self.tail = Some(handle.0);
        Some(handle)
    }

    // == Front ==
    /// Returns the least recently used key without removing it.
    pub fn front(&self) -> Option<&K> {
        self.head
            .and_then(|idx| self.slots[idx].as_ref().map(|node| &node.key))
    }

    // == Pop Front ==
    /// Removes and returns the least recently used key and its handle.
    ///
    /// The returned handle is already freed; callers use it only to check it
    /// against the handle they stored for the key.
    pub fn pop_front(&mut self) -> Option<(K, NodeHandle)> {
        let idx = self.head?;
        let key = self.remove(NodeHandle(idx))?;
        Some((key, NodeHandle(idx)))
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Detach ==
    /// Unlinks the node at `idx` from its neighbors without freeing its slot.
    fn detach(&mut self, idx: usize) -> Option<()> {
        let (prev, next) = {
            let node = self.slots.get(idx)?.as_ref()?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.slots[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.slots[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        Some(())
    }

    // == Iteration ==
    /// Returns keys from least to most recently used (test helper, O(n)).
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let idx = current?;
            let node = self.slots[idx].as_ref()?;
            current = node.next;
            Some(&node.key)
        })
    }
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}
