//! Per-operation and structural events reported by the table.
//!
//! Every event renders as one execution-log line through [`Display`]:
//!
//! | Event     | Line                          |
//! |-----------|-------------------------------|
//! | `Created` | `TAM:<capacity>`              |
//! | `Insert`  | `INC:<key>/<hash>/<position>` |
//! | `Lookup`  | `BUS:<key>/<hash>/<position>` |
//! | `Remove`  | `REM:<key>/<hash>/<position>` |
//! | `Grow`    | `DOBRAR_TAM:<capacity>`       |
//! | `Shrink`  | `METADE_TAM:<capacity>`       |
//! | `Compact` | `LIMPAR`                      |
//!
//! A key that was not found prints its position as `-1`.

use alloc::vec::Vec;
use core::fmt;
use core::fmt::Display;

/// Something that happened inside a [`HashTable`](crate::HashTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The table was constructed with `capacity` slots.
    Created {
        /// Initial slot count.
        capacity: usize,
    },
    /// A key was written to `position`.
    Insert {
        /// Inserted key.
        key: i64,
        /// Tabulation hash of the key.
        hash: u64,
        /// Slot the key was written to.
        position: usize,
    },
    /// A key was looked up.
    Lookup {
        /// Requested key.
        key: i64,
        /// Tabulation hash of the key.
        hash: u64,
        /// Slot holding the key, if any.
        position: Option<usize>,
    },
    /// A key was removed, or a removal missed.
    Remove {
        /// Requested key.
        key: i64,
        /// Tabulation hash of the key.
        hash: u64,
        /// Slot that was turned into a tombstone, if any.
        position: Option<usize>,
    },
    /// The table doubled to `capacity` slots.
    Grow {
        /// New slot count.
        capacity: usize,
    },
    /// The table halved to `capacity` slots.
    Shrink {
        /// New slot count.
        capacity: usize,
    },
    /// Tombstones were swept out in place.
    Compact,
}

struct Position(Option<usize>);

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, "{position}"),
            None => f.write_str("-1"),
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::Created { capacity } => write!(f, "TAM:{capacity}"),
            Event::Insert {
                key,
                hash,
                position,
            } => write!(f, "INC:{key}/{hash}/{position}"),
            Event::Lookup {
                key,
                hash,
                position,
            } => write!(f, "BUS:{key}/{hash}/{}", Position(position)),
            Event::Remove {
                key,
                hash,
                position,
            } => write!(f, "REM:{key}/{hash}/{}", Position(position)),
            Event::Grow { capacity } => write!(f, "DOBRAR_TAM:{capacity}"),
            Event::Shrink { capacity } => write!(f, "METADE_TAM:{capacity}"),
            Event::Compact => f.write_str("LIMPAR"),
        }
    }
}

/// Receives the events a table emits, in execution order.
///
/// An operation's own event is delivered before any structural event it
/// triggers, so an insert that causes growth yields `Insert` then `Grow`.
pub trait Observer {
    /// Handles one event.
    fn observe(&mut self, event: Event);
}

/// Discards every event.
impl Observer for () {
    #[inline]
    fn observe(&mut self, _event: Event) {}
}

/// Records every event.
impl Observer for Vec<Event> {
    fn observe(&mut self, event: Event) {
        self.push(event);
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn observe(&mut self, event: Event) {
        (**self).observe(event);
    }
}
