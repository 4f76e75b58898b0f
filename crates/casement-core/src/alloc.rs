//! Hash collections used across Casement.
//!
//! Window and display lookup tables are keyed by small integer ids, so the
//! faster AHash hasher is used instead of SipHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert(1u32, "window");
        assert_eq!(map.get(&1), Some(&"window"));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(42u32);
        assert!(set.contains(&42));
    }
}
