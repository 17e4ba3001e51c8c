//! chained-hashmap: a single-threaded, separate-chaining hash map with an
//! injected hash function and explicit, caller-driven resizing, plus a
//! word-frequency client built on top of it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose addressing is fully visible: bucket index is
//!   `hash(key) % capacity`, collisions go to a per-bucket singly linked
//!   chain, and the caller reads the load factor and decides when to
//!   resize.
//! - Layers:
//!   - `Chain`: head link and length of one bucket; insertion at the
//!     front, first-match lookup and splice-out removal.
//!   - `ChainedHashMap<K, V, H>`: owns the bucket array, the node arena,
//!     and the hasher `H`; enforces key uniqueness and the rehash
//!     protocol.
//!   - `word_count`: tokenizes text and drives the map through
//!     `get`/`put` to rank words by frequency.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` through the reentrancy tracker's
//!   marker. Callers that share a map across threads must wrap it.
//! - Nodes live in a `SlotMap`; chains link nodes by generational key, so
//!   there are no raw pointers and no shared ownership between nodes.
//! - Keys are unique map-wide; `put` on a present key overwrites the value
//!   in place without moving the node.
//! - Capacity is always at least 1. Zero is rejected by `new` and
//!   `resize_table` with `MapError::ZeroCapacity`.
//!
//! Hash functions
//! - Any `Fn(&Q) -> u64` is a hasher; `HashStrategy` names the two
//!   reference functions (`char_sum`, `position_weighted`) for string-like
//!   keys. Both wrap on overflow, so key length is unbounded.
//! - Lookups take any borrowed form `Q` of the key as long as the hasher
//!   can hash `Q` too. `HashStrategy` hashes every `AsRef<str>`, so a
//!   `ChainedHashMap<String, _>` can be queried with `&str`.
//!
//! Resizing
//! - `resize_table` first computes every entry's new bucket (the only part
//!   that runs user code), then relinks the nodes into a fresh bucket
//!   array and swaps it in. Either the whole table is old-addressed or the
//!   whole table is new-addressed; no lookup sees a mix.
//! - Entries are relinked at the front of their new chain while old chains
//!   are walked head to tail, so per-bucket order after a resize is
//!   most-recently-rehashed first.
//!
//! Reentrancy policy
//! - Each public operation enters a debug-only guard before calling into
//!   the hasher or `K: Eq`. A hasher that reaches back into the same map
//!   panics in debug builds; release builds compile the guard away.
//!
//! Notes and non-goals
//! - No automatic growth and no shrink-on-delete; the word-frequency
//!   client shows a caller-side growth policy.
//! - Iteration order is unspecified.
//! - No persistence or serialization of the map itself.

mod chain;
pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod error;
pub mod hash;
mod reentrancy;
pub mod word_count;

// Public surface
pub use chained_hash_map::ChainedHashMap;
pub use error::{FrequencyError, MapError};
pub use hash::{char_sum, position_weighted, HashStrategy, KeyHasher};
pub use word_count::{top_words, top_words_in_file, FrequencyConfig, WordCounter};
