/// A single cell of the table's slot array.
///
/// A slot moves `Empty -> Occupied` on insert and `Occupied -> Tombstone` on
/// remove. Tombstones only turn back into `Empty` when the table is rebuilt
/// by a resize or swept by compaction; inserts never write over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Never used since the last rebuild.
    #[default]
    Empty,
    /// Holds a live key.
    Occupied(i64),
    /// Previously held a key that has since been removed.
    Tombstone,
}

impl Slot {
    /// Returns `true` if the slot holds a live key.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    /// Returns `true` if the slot is a removal marker.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// Returns `true` if the slot has never been written since the last
    /// rebuild.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Returns the key held by an occupied slot.
    #[inline]
    pub fn key(&self) -> Option<i64> {
        match *self {
            Slot::Occupied(key) => Some(key),
            _ => None,
        }
    }

    /// Returns `true` if the slot holds exactly `key`.
    #[inline]
    pub fn holds(&self, key: i64) -> bool {
        *self == Slot::Occupied(key)
    }

    /// Turns an occupied slot into a tombstone, returning the key it held.
    ///
    /// Empty slots and tombstones are left untouched.
    #[inline]
    pub fn bury(&mut self) -> Option<i64> {
        let key = self.key()?;
        *self = Slot::Tombstone;
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_predicates() {
        assert!(Slot::Empty.is_empty());
        assert!(!Slot::Empty.is_occupied());
        assert!(Slot::Occupied(3).is_occupied());
        assert!(Slot::Tombstone.is_tombstone());
        assert!(!Slot::Tombstone.is_occupied());
        assert_eq!(Slot::default(), Slot::Empty);
    }

    #[test]
    fn tombstone_never_holds_a_key() {
        let mut slot = Slot::Occupied(-9);
        assert!(slot.holds(-9));
        assert!(!slot.holds(9));

        assert_eq!(slot.bury(), Some(-9));
        assert_eq!(slot, Slot::Tombstone);
        assert_eq!(slot.key(), None);
        assert!(!slot.holds(-9));

        assert_eq!(slot.bury(), None);
        assert_eq!(slot, Slot::Tombstone);

        let mut empty = Slot::Empty;
        assert_eq!(empty.bury(), None);
        assert!(empty.is_empty());
    }
}
