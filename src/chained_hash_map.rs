//! ChainedHashMap: separate-chaining table with an injected hash function.

use crate::chain::{Chain, Node, NodeArena, NodeKey};
use crate::error::MapError;
use crate::hash::{HashStrategy, KeyHasher};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::mem;
use log::debug;

/// Bucket count used by `Default`.
const DEFAULT_CAPACITY: usize = 16;

/// A key-value map resolving collisions with one singly linked chain per
/// bucket.
///
/// Keys are addressed as `hasher(key) % capacity`. The table never grows
/// on its own: `table_load` reports the average chain length and the
/// caller decides when to call `resize_table`.
pub struct ChainedHashMap<K, V, H = HashStrategy> {
    buckets: Vec<Chain>,
    nodes: NodeArena<K, V>, // every live entry, linked into exactly one bucket
    hasher: H,
    reentrancy: DebugReentrancy,
}

fn new_buckets(capacity: usize) -> Vec<Chain> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Chain::new);
    buckets
}

fn index_for<H, Q>(hasher: &H, q: &Q, capacity: usize) -> usize
where
    H: KeyHasher<Q>,
    Q: ?Sized,
{
    (hasher.hash_key(q) % capacity as u64) as usize
}

impl<K, V> ChainedHashMap<K, V> {
    /// A map with `capacity` buckets using the default hash strategy.
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        Self::new(capacity, HashStrategy::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::with_buckets(DEFAULT_CAPACITY, HashStrategy::default())
    }
}

impl<K, V, H> ChainedHashMap<K, V, H> {
    /// Creates a map with `capacity` empty buckets.
    ///
    /// Fails with [`MapError::ZeroCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize, hasher: H) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::ZeroCapacity);
        }
        Ok(Self::with_buckets(capacity, hasher))
    }

    fn with_buckets(capacity: usize, hasher: H) -> Self {
        debug_assert!(capacity > 0);
        Self {
            buckets: new_buckets(capacity),
            nodes: NodeArena::with_key(),
            hasher,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// The hash function the map was built with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Length of the chain in bucket `index`, or `None` past the end.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Chain::len)
    }

    /// Number of buckets holding no entries.
    pub fn empty_buckets(&self) -> usize {
        let _g = self.reentrancy.enter("empty_buckets");
        self.buckets.iter().filter(|c| c.is_empty()).count()
    }

    /// Load factor: entries per bucket. Values above 1.0 are legal.
    pub fn table_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Drops every entry; the bucket count is kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        for chain in &mut self.buckets {
            chain.detach();
        }
        let dropped = self.nodes.len();
        self.nodes.clear();
        debug!(
            "cleared {} entries from {} buckets",
            dropped,
            self.buckets.len()
        );
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.nodes.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }

    fn find<Q>(&self, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let idx = index_for(&self.hasher, q, self.buckets.len());
        self.buckets[idx].contains(&self.nodes, q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let _g = self.reentrancy.enter("get");
        self.find(q).map(|n| &self.nodes[n].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let _g = self.reentrancy.enter("get_mut");
        let n = self.find(q)?;
        Some(&mut self.nodes[n].value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let _g = self.reentrancy.enter("contains_key");
        self.find(q).is_some()
    }

    /// Removes `q`, returning its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Removes `q`, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: KeyHasher<Q>,
    {
        let _g = self.reentrancy.enter("remove");
        let idx = index_for(&self.hasher, q, self.buckets.len());
        self.buckets[idx].remove(&mut self.nodes, q)
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Inserts or overwrites `key`.
    ///
    /// An existing entry keeps its node and its place in the chain; only
    /// the value is replaced, and the old one is returned. A new key is
    /// linked at the front of its bucket.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("put");
        let idx = index_for(&self.hasher, &key, self.buckets.len());
        let chain = &mut self.buckets[idx];
        if let Some(n) = chain.contains(&self.nodes, &key) {
            return Some(mem::replace(&mut self.nodes[n].value, value));
        }
        chain.add_front(&mut self.nodes, key, value);
        None
    }

    /// Re-addresses every entry into `new_capacity` buckets.
    ///
    /// Old buckets are walked in index order, each head to tail, and every
    /// entry is linked at the front of its new bucket, so entries sharing a
    /// new bucket end up most-recently-rehashed first. All hashing happens
    /// before the first link is rewritten and the new bucket array replaces
    /// the old one only once it is complete. A zero capacity is rejected
    /// and leaves the map untouched.
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), MapError> {
        let _g = self.reentrancy.enter("resize_table");
        if new_capacity == 0 {
            return Err(MapError::ZeroCapacity);
        }

        let mut moves = Vec::with_capacity(self.nodes.len());
        for chain in &self.buckets {
            for (n, node) in chain.iter(&self.nodes) {
                moves.push((n, index_for(&self.hasher, &node.key, new_capacity)));
            }
        }

        // No user code past this point.
        let mut buckets = new_buckets(new_capacity);
        for (n, idx) in moves {
            buckets[idx].link_front(&mut self.nodes, n);
        }
        let old = mem::replace(&mut self.buckets, buckets);
        debug!(
            "resized table from {} to {} buckets ({} entries)",
            old.len(),
            new_capacity,
            self.nodes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Panics unless every structural invariant holds: each live node is
    /// reachable exactly once, from the bucket its hash selects, chain
    /// lengths match, and keys are unique.
    pub(crate) fn assert_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for (idx, chain) in self.buckets.iter().enumerate() {
            let mut walked = 0;
            for (n, node) in chain.iter(&self.nodes) {
                assert!(seen.insert(n), "node linked twice");
                assert_eq!(
                    index_for(&self.hasher, &node.key, self.buckets.len()),
                    idx,
                    "node in wrong bucket"
                );
                walked += 1;
            }
            assert_eq!(walked, chain.len(), "chain length out of sync");
            total += walked;
        }
        assert_eq!(total, self.nodes.len(), "unreachable nodes in arena");
        let keys: Vec<&K> = self.keys().collect();
        for (i, a) in keys.iter().enumerate() {
            assert!(keys[i + 1..].iter().all(|b| b != a), "duplicate key");
        }
    }
}

/// Iterator over `(&K, &V)` in unspecified order.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, NodeKey, Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over `(&K, &mut V)` in unspecified order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, NodeKey, Node<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (&n.key, &mut n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, H> IntoIterator for &'a ChainedHashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H> IntoIterator for &'a mut ChainedHashMap<K, V, H> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// One line per bucket: `index: [(k, v) -> ...]`. For debugging only; the
/// format is not stable.
impl<K: fmt::Display, V: fmt::Display, H> fmt::Display for ChainedHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{}: {}", idx, chain.display(&self.nodes))?;
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for ChainedHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
