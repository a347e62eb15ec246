//! ap_core — Core types, entity roster, and deterministic ordering helpers.
//!
//! This crate is **I/O-free**. It defines the stable types shared by the
//! apportionment engine (`ap_algo`) and any embedding caller:
//!
//! - Registry token: `EntityId`
//! - Roster entry: `EntityItem` (id, display name, canonical order index)
//! - Deterministic ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        EmptyName,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::EmptyName => write!(f, "empty display name"),
            }
        }
    }
}

pub mod tokens {
    //! Registry token type (`EntityId`) with strict charset.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    fn is_token(s: &str) -> bool {
        let len = s.len();
        if !(1..=64).contains(&len) { return false; }
        s.bytes().all(|b| matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
            b'_' | b'-' | b':' | b'.'
        ))
    }

    /// Opaque, ordered identifier for a unit receiving seats (e.g. a state code).
    #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct EntityId(String);

    impl EntityId {
        pub fn as_str(&self) -> &str { &self.0 }
    }

    impl fmt::Display for EntityId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
    }

    impl FromStr for EntityId {
        type Err = CoreError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            if is_token(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidToken) }
        }
    }
}

pub mod entities {
    //! Roster entry for one seat-receiving entity.

    use crate::errors::CoreError;
    use crate::tokens::EntityId;
    use alloc::string::String;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    /// One roster entry: identifier, display name, and canonical order index.
    ///
    /// The roster slice handed to the engine is the canonical scan order;
    /// `order_index` exists so callers can sort a roster back into canonical
    /// order after building it from unordered sources.
    #[derive(Clone, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct EntityItem {
        pub entity_id: EntityId,
        pub name: String,
        pub order_index: u16,
    }

    impl EntityItem {
        /// Construct a roster entry; the display name must be non-empty.
        pub fn new(entity_id: EntityId, name: String, order_index: u16) -> Result<Self, CoreError> {
            if name.is_empty() {
                return Err(CoreError::EmptyName);
            }
            Ok(Self { entity_id, name, order_index })
        }
    }
}

pub mod determinism {
    //! Stable ordering helpers.

    use core::cmp::Ordering;
    use crate::entities::EntityItem;

    /// Compare by `order_index`, then by `entity_id` lexicographically.
    pub fn cmp_entities_by_order(a: &EntityItem, b: &EntityItem) -> Ordering {
        match a.order_index.cmp(&b.order_index) {
            Ordering::Equal => a.entity_id.as_str().cmp(b.entity_id.as_str()),
            o => o,
        }
    }

    /// Sort a roster into canonical `(order_index, entity_id)` order.
    pub fn sort_entities_canonical(entities: &mut [EntityItem]) {
        entities.sort_by(cmp_entities_by_order);
    }
}

#[cfg(test)]
mod tests {
    use super::determinism::{cmp_entities_by_order, sort_entities_canonical};
    use super::entities::EntityItem;
    use super::errors::CoreError;
    use super::tokens::EntityId;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cmp::Ordering;

    #[test]
    fn token_accepts_strict_charset() {
        assert!("CA".parse::<EntityId>().is_ok());
        assert!("E-001".parse::<EntityId>().is_ok());
        assert!("a.b:c_d".parse::<EntityId>().is_ok());
    }

    #[test]
    fn token_rejects_bad_input() {
        assert_eq!("".parse::<EntityId>(), Err(CoreError::InvalidToken));
        assert_eq!("no spaces".parse::<EntityId>(), Err(CoreError::InvalidToken));
        let too_long = "x".repeat(65);
        assert_eq!(too_long.parse::<EntityId>(), Err(CoreError::InvalidToken));
    }

    #[test]
    fn entity_item_requires_name() {
        let id: EntityId = "CA".parse().unwrap();
        assert_eq!(
            EntityItem::new(id, "".to_string(), 0),
            Err(CoreError::EmptyName)
        );
    }

    #[test]
    fn canonical_order_is_index_then_id() {
        let e = |id: &str, ix: u16| {
            EntityItem::new(id.parse().unwrap(), "name".to_string(), ix).unwrap()
        };
        assert_eq!(cmp_entities_by_order(&e("B", 0), &e("A", 1)), Ordering::Less);
        assert_eq!(cmp_entities_by_order(&e("A", 2), &e("B", 2)), Ordering::Less);

        let mut roster = vec![e("B", 1), e("C", 0), e("A", 1)];
        sort_entities_canonical(&mut roster);
        let ids: Vec<&str> = roster.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }
}
