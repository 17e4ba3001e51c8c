//! Chain: the singly linked collision list behind one bucket.
//!
//! Nodes live in a `SlotMap` arena owned by the map; a chain only holds the
//! key of its head node and its length, and every node holds the key of its
//! successor. Removing a node frees its slot back to the arena's free list,
//! and generational keys make a stale link fail loudly instead of aliasing a
//! recycled slot.

use core::borrow::Borrow;
use core::fmt;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational index of a node in a map's arena.
    pub(crate) struct NodeKey;
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    next: Option<NodeKey>,
}

pub(crate) type NodeArena<K, V> = SlotMap<NodeKey, Node<K, V>>;

/// Head link and node count of one bucket.
///
/// Invariant: `len` equals the number of nodes reachable from `head`.
/// A chain tolerates duplicate keys; uniqueness is the map's job.
#[derive(Debug, Default)]
pub(crate) struct Chain {
    head: Option<NodeKey>,
    len: usize,
}

impl Chain {
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates a node for `(key, value)` and makes it the new head.
    pub(crate) fn add_front<K, V>(
        &mut self,
        arena: &mut NodeArena<K, V>,
        key: K,
        value: V,
    ) -> NodeKey {
        let node = arena.insert(Node {
            key,
            value,
            next: self.head,
        });
        self.head = Some(node);
        self.len += 1;
        node
    }

    /// Makes an already allocated node the new head, discarding whatever
    /// successor it had before. Used when relinking nodes during a rehash.
    pub(crate) fn link_front<K, V>(&mut self, arena: &mut NodeArena<K, V>, node: NodeKey) {
        arena[node].next = self.head;
        self.head = Some(node);
        self.len += 1;
    }

    /// First node (from the head) whose key equals `q`.
    pub(crate) fn contains<K, V, Q>(&self, arena: &NodeArena<K, V>, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.iter(arena)
            .find(|(_, node)| node.key.borrow() == q)
            .map(|(k, _)| k)
    }

    /// Splices out the first node whose key equals `q` and frees its slot.
    pub(crate) fn remove<K, V, Q>(&mut self, arena: &mut NodeArena<K, V>, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let head = self.head?;
        if arena[head].key.borrow() == q {
            self.head = arena[head].next;
            return self.free(arena, head);
        }

        let mut prev = head;
        let mut cur = arena[head].next;
        while let Some(k) = cur {
            let next = arena[k].next;
            if arena[k].key.borrow() == q {
                arena[prev].next = next;
                return self.free(arena, k);
            }
            prev = k;
            cur = next;
        }
        None
    }

    fn free<K, V>(&mut self, arena: &mut NodeArena<K, V>, node: NodeKey) -> Option<(K, V)> {
        self.len -= 1;
        arena.remove(node).map(|n| (n.key, n.value))
    }

    /// Forgets every node without touching the arena; the caller frees the
    /// slots (the map clears its whole arena at once).
    pub(crate) fn detach(&mut self) {
        self.head = None;
        self.len = 0;
    }

    /// Head-to-tail walk.
    pub(crate) fn iter<'a, K, V>(&self, arena: &'a NodeArena<K, V>) -> ChainIter<'a, K, V> {
        ChainIter {
            arena,
            cur: self.head,
        }
    }

    pub(crate) fn display<'a, K, V>(&'a self, arena: &'a NodeArena<K, V>) -> ChainDisplay<'a, K, V> {
        ChainDisplay { chain: self, arena }
    }
}

pub(crate) struct ChainIter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    cur: Option<NodeKey>,
}

impl<'a, K, V> Iterator for ChainIter<'a, K, V> {
    type Item = (NodeKey, &'a Node<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = &self.arena[k];
        self.cur = node.next;
        Some((k, node))
    }
}

/// Renders a chain as `[(k1, v1) -> (k2, v2)]`, head first.
pub(crate) struct ChainDisplay<'a, K, V> {
    chain: &'a Chain,
    arena: &'a NodeArena<K, V>,
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for ChainDisplay<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (_, node)) in self.chain.iter(self.arena).enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "({}, {})", node.key, node.value)?;
        }
        f.write_str("]")
    }
}
