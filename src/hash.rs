//! Hash functions for string-like keys and the seam used to inject them.
//!
//! The map only needs a deterministic, pure function from a key to a
//! `u64`; bucket selection is `hash % capacity`. Both reference functions
//! accumulate with wrapping arithmetic, so arbitrarily long keys never
//! overflow.

/// A pure function from a key (or a borrowed form of it) to a hash.
///
/// Implemented for [`HashStrategy`] and for every closure or function
/// pointer of shape `Fn(&Q) -> u64`.
pub trait KeyHasher<Q: ?Sized> {
    fn hash_key(&self, key: &Q) -> u64;
}

impl<Q, F> KeyHasher<Q> for F
where
    Q: ?Sized,
    F: Fn(&Q) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self(key)
    }
}

/// Sum of the Unicode scalar values of `key`.
///
/// Anagrams collide: `char_sum("stop") == char_sum("pots")`.
pub fn char_sum<Q: ?Sized + AsRef<str>>(key: &Q) -> u64 {
    key.as_ref()
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(c as u64))
}

/// Position-weighted sum: the scalar value of the character at zero-based
/// position `i` is multiplied by `i + 1` before summing.
pub fn position_weighted<Q: ?Sized + AsRef<str>>(key: &Q) -> u64 {
    key.as_ref()
        .chars()
        .zip(1u64..)
        .fold(0u64, |acc, (c, weight)| {
            acc.wrapping_add((c as u64).wrapping_mul(weight))
        })
}

/// Selects one of the reference hash functions by value.
///
/// This is the default hasher of `ChainedHashMap` and the form the
/// word-frequency client is configured with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HashStrategy {
    /// [`char_sum`]
    CharSum,
    /// [`position_weighted`]
    #[default]
    PositionWeighted,
}

impl HashStrategy {
    /// Hashes `key` with the selected function.
    pub fn hash_str(self, key: &str) -> u64 {
        match self {
            HashStrategy::CharSum => char_sum(key),
            HashStrategy::PositionWeighted => position_weighted(key),
        }
    }
}

impl<Q: ?Sized + AsRef<str>> KeyHasher<Q> for HashStrategy {
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self.hash_str(key.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_sum_adds_code_points() {
        assert_eq!(char_sum(""), 0);
        assert_eq!(char_sum("a"), 97);
        // c=99 a=97 t=116
        assert_eq!(char_sum("cat"), 312);
        assert_eq!(char_sum("act"), char_sum("cat"));
    }

    #[test]
    fn position_weighted_multiplies_by_position() {
        assert_eq!(position_weighted(""), 0);
        // 99*1 + 97*2 + 116*3
        assert_eq!(position_weighted("cat"), 641);
        // 97*1 + 99*2 + 116*3
        assert_eq!(position_weighted("act"), 643);
    }

    #[test]
    fn weights_follow_chars_not_bytes() {
        // 'é' is two bytes in UTF-8 but a single position.
        let e = 'é' as u64;
        assert_eq!(position_weighted("éa"), e + 97 * 2);
        assert_eq!(char_sum("éa"), e + 97);
    }

    #[test]
    fn long_keys_wrap_instead_of_overflowing() {
        let long: String = std::iter::repeat('\u{10FFFF}').take(100_000).collect();
        // Must not panic in debug builds.
        let _ = position_weighted(&long);
        let _ = char_sum(&long);
    }

    #[test]
    fn strategy_dispatches_to_functions() {
        assert_eq!(HashStrategy::CharSum.hash_key("dog"), char_sum("dog"));
        assert_eq!(
            HashStrategy::PositionWeighted.hash_key(&"dog".to_string()),
            position_weighted("dog")
        );
        assert_eq!(HashStrategy::default(), HashStrategy::PositionWeighted);
        assert_eq!(HashStrategy::CharSum.hash_str("cat"), 312);
    }

    #[test]
    fn closures_are_key_hashers() {
        let h = |k: &str| k.len() as u64;
        assert_eq!(KeyHasher::<str>::hash_key(&h, "four"), 4);
    }
}
