use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::command::Command;
use crate::command::Op;
use crate::config::Config;
use crate::config::TOMBSTONE_THRESHOLD;
use crate::error::Result;
use crate::event::Event;
use crate::event::Observer;
use crate::slot::Slot;
use crate::tabulation::TabulationHasher;

#[inline(always)]
fn ratio(count: usize, capacity: usize) -> f64 {
    count as f64 / capacity as f64
}

#[inline(always)]
fn home_slot(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// Yields every position of a `capacity`-slot table once, in linear probe
/// order starting at the home slot of `hash`.
#[inline]
fn probe_sequence(hash: u64, capacity: usize) -> impl Iterator<Item = usize> {
    let home = home_slot(hash, capacity);
    (0..capacity).map(move |offset| (home + offset) % capacity)
}

/// Writes `key` into the first `Empty` slot of its probe sequence.
///
/// Occupied slots and tombstones are both skipped. Returns `None` when no
/// slot in the table is empty.
fn place(slots: &mut [Slot], hash: u64, key: i64) -> Option<usize> {
    let position = probe_sequence(hash, slots.len()).find(|&p| slots[p].is_empty())?;
    slots[position] = Slot::Occupied(key);
    Some(position)
}

/// The outcome of resolving a key: its hash and, if present, the slot
/// holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Tabulation hash of the key, before reduction modulo capacity.
    pub hash: u64,
    /// Slot holding the key, or `None` if it is absent.
    pub position: Option<usize>,
}

impl Probe {
    /// Returns `true` if the key was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        self.position.is_some()
    }
}

/// Diagnostic counters for a table.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of slots.
    pub capacity: usize,
    /// Number of occupied slots.
    pub filled: usize,
    /// Number of tombstones.
    pub tombstones: usize,
    /// Number of empty slots.
    pub empty: usize,
    /// Load factor (filled / capacity).
    pub load_factor: f64,
    /// Tombstone ratio (tombstones / capacity).
    pub tombstone_ratio: f64,
    /// Longest distance of an occupied slot from its home slot.
    pub max_probe: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.filled,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Tombstones: {} ({:.2}% of slots)",
            self.tombstones,
            self.tombstone_ratio * 100.0
        );
        println!("Empty: {} slots", self.empty);
        println!("Longest probe: {}", self.max_probe);
    }
}

/// A self-resizing open-addressing hash set over `i64` keys.
///
/// Keys are placed by tabulation hashing and linear probing. Removal leaves
/// a tombstone; once tombstones exceed a quarter of the slots they are swept
/// out in place by [`compact`](Self::compact). The table doubles when its
/// load factor rises above the grow threshold and halves when it falls
/// below the shrink threshold, rehashing every live key into the new slot
/// array.
///
/// Insert does not check for an existing copy of the key, so duplicates
/// occupy separate slots.
///
/// The table is generic over an [`Observer`] that receives an [`Event`] for
/// every operation and every structural change. The default `()` observer
/// discards them.
///
/// The table is not synchronised; wrap it in a lock to share it between
/// threads.
///
/// ## Example
///
/// ```rust
/// use tab_hash::Config;
/// use tab_hash::HashTable;
/// use tab_hash::TabulationHasher;
///
/// let mut table = HashTable::with_hasher(Config::default(), TabulationHasher::with_seed(3))?;
/// for key in [10, 20, 30, 40] {
///     table.insert(key);
/// }
/// assert_eq!(table.capacity(), 8);
///
/// assert!(table.remove(10).is_found());
/// assert!(!table.contains(10));
/// assert!(table.contains(20));
/// # Ok::<(), tab_hash::Error>(())
/// ```
#[derive(Clone)]
pub struct HashTable<O = ()> {
    slots: Vec<Slot>,
    hasher: TabulationHasher,
    config: Config,

    filled: usize,
    removed: usize,

    observer: O,
}

impl<O> Debug for HashTable<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("capacity", &self.slots.len())
            .field("filled", &self.filled)
            .field("tombstones", &self.removed)
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|chunk| {
                        chunk
                            .iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Tombstone => "xx".to_string(),
                                Slot::Occupied(key) => format!("{key}"),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for HashTable {
    /// An empty table with the default [`Config`] and an OS-seeded hasher.
    fn default() -> Self {
        HashTable::build(Config::default(), TabulationHasher::default(), ())
    }
}

impl HashTable {
    /// Creates a table with a freshly seeded hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tab_hash::Config;
    /// use tab_hash::HashTable;
    ///
    /// let table = HashTable::new(Config::default().with_capacity(16))?;
    /// assert_eq!(table.capacity(), 16);
    /// assert!(table.is_empty());
    ///
    /// assert!(HashTable::new(Config::default().with_capacity(0)).is_err());
    /// # Ok::<(), tab_hash::Error>(())
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        Self::with_hasher(config, TabulationHasher::default())
    }

    /// Creates a table that hashes with `hasher`.
    pub fn with_hasher(config: Config, hasher: TabulationHasher) -> Result<Self> {
        HashTable::with_observer(config, hasher, ())
    }
}

impl<O: Observer> HashTable<O> {
    /// Creates a table that reports its events to `observer`.
    ///
    /// The observer receives [`Event::Created`] before this returns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tab_hash::Config;
    /// use tab_hash::Event;
    /// use tab_hash::HashTable;
    /// use tab_hash::TabulationHasher;
    ///
    /// let mut table = HashTable::with_observer(
    ///     Config::default(),
    ///     TabulationHasher::with_seed(11),
    ///     Vec::new(),
    /// )?;
    /// let position = table.insert(5);
    ///
    /// let hash = table.hasher().hash(5);
    /// assert_eq!(
    ///     table.observer().as_slice(),
    ///     &[
    ///         Event::Created { capacity: 4 },
    ///         Event::Insert { key: 5, hash, position },
    ///     ]
    /// );
    /// # Ok::<(), tab_hash::Error>(())
    /// ```
    pub fn with_observer(config: Config, hasher: TabulationHasher, observer: O) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher, observer))
    }

    fn build(config: Config, hasher: TabulationHasher, observer: O) -> Self {
        let mut table = Self {
            slots: vec![Slot::Empty; config.initial_capacity],
            hasher,
            config,
            filled: 0,
            removed: 0,
            observer,
        };

        log::debug!("created table with {} slots", config.initial_capacity);
        table.observer.observe(Event::Created {
            capacity: config.initial_capacity,
        });
        table
    }

    /// Inserts `key` and returns the slot it was written to.
    ///
    /// The key goes into the first empty slot of its probe sequence, even if
    /// another slot already holds the same key. If the insert pushes the load
    /// factor above the grow threshold the table then doubles, so the
    /// returned position refers to the layout before growth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tab_hash::Config;
    /// use tab_hash::HashTable;
    ///
    /// let mut table = HashTable::new(Config::default().with_capacity(8))?;
    /// let first = table.insert(7);
    /// let second = table.insert(7);
    /// assert_ne!(first, second);
    /// assert_eq!(table.len(), 2);
    /// # Ok::<(), tab_hash::Error>(())
    /// ```
    pub fn insert(&mut self, key: i64) -> usize {
        self.insert_impl(key).1
    }

    fn insert_impl(&mut self, key: i64) -> (u64, usize) {
        let hash = self.hasher.hash(key);
        let position = self.place_or_make_room(hash, key);
        self.filled += 1;

        log::trace!("insert {key} (hash {hash:#018x}) at slot {position}");
        self.observer.observe(Event::Insert {
            key,
            hash,
            position,
        });

        if ratio(self.filled, self.capacity()) > self.config.grow_threshold {
            self.grow();
        }

        (hash, position)
    }

    /// Places `key`, compacting or growing first if no slot is empty.
    ///
    /// The grow threshold keeps this from happening in steady state; it only
    /// fires when occupied slots and tombstones together cover the table, or
    /// when a grow threshold of 1.0 lets the table fill completely.
    fn place_or_make_room(&mut self, hash: u64, key: i64) -> usize {
        loop {
            if let Some(position) = place(&mut self.slots, hash, key) {
                return position;
            }

            log::warn!(
                "no empty slot for {key}: {} slots, {} filled, {} tombstones",
                self.capacity(),
                self.filled,
                self.removed
            );
            if self.removed > 0 {
                self.compact();
            } else {
                self.grow();
            }
        }
    }

    /// Resolves `key` without reporting it.
    ///
    /// Probing starts at the key's home slot and continues past tombstones,
    /// empty slots and other keys until it has visited every slot once, so
    /// a miss costs a full scan.
    pub fn find(&self, key: i64) -> Probe {
        let hash = self.hasher.hash(key);
        let position = probe_sequence(hash, self.capacity()).find(|&p| self.slots[p].holds(key));
        Probe { hash, position }
    }

    /// Returns `true` if some slot holds `key`.
    pub fn contains(&self, key: i64) -> bool {
        self.find(key).is_found()
    }

    /// Resolves `key` and reports an [`Event::Lookup`].
    pub fn lookup(&mut self, key: i64) -> Probe {
        let probe = self.find(key);

        log::trace!(
            "lookup {key} (hash {:#018x}) -> {:?}",
            probe.hash,
            probe.position
        );
        self.observer.observe(Event::Lookup {
            key,
            hash: probe.hash,
            position: probe.position,
        });
        probe
    }

    /// Removes one copy of `key`, leaving a tombstone in its slot.
    ///
    /// A miss changes nothing but is still reported. A hit may trigger
    /// compaction (tombstones above a quarter of the slots) and then a
    /// shrink (load factor below the shrink threshold), in that order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tab_hash::Config;
    /// use tab_hash::HashTable;
    ///
    /// let mut table = HashTable::new(Config::default().with_capacity(8))?;
    /// table.insert(1);
    /// table.insert(2);
    /// table.insert(3);
    ///
    /// assert!(table.remove(1).is_found());
    /// assert_eq!(table.tombstones(), 1);
    /// assert!(!table.remove(99).is_found());
    /// # Ok::<(), tab_hash::Error>(())
    /// ```
    pub fn remove(&mut self, key: i64) -> Probe {
        let probe = self.find(key);

        log::trace!(
            "remove {key} (hash {:#018x}) -> {:?}",
            probe.hash,
            probe.position
        );
        self.observer.observe(Event::Remove {
            key,
            hash: probe.hash,
            position: probe.position,
        });

        if let Some(position) = probe.position {
            let buried = self.slots[position].bury();
            debug_assert_eq!(buried, Some(key));
            self.removed += 1;
            self.filled -= 1;

            if ratio(self.removed, self.capacity()) > TOMBSTONE_THRESHOLD {
                self.compact();
            }
            if ratio(self.filled, self.capacity()) < self.config.shrink_threshold {
                self.shrink();
            }
        }

        probe
    }

    /// Runs one command against the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tab_hash::Config;
    /// use tab_hash::HashTable;
    /// use tab_hash::command::Command;
    ///
    /// let mut table = HashTable::new(Config::default())?;
    /// let inserted = table.apply(Command::insert(4));
    /// let found = table.apply(Command::lookup(4));
    /// assert_eq!(inserted, found);
    ///
    /// table.apply(Command::remove(4));
    /// assert!(!table.apply(Command::lookup(4)).is_found());
    /// # Ok::<(), tab_hash::Error>(())
    /// ```
    pub fn apply(&mut self, command: Command) -> Probe {
        match command.op {
            Op::Insert => {
                let (hash, position) = self.insert_impl(command.key);
                Probe {
                    hash,
                    position: Some(position),
                }
            }
            Op::Lookup => self.lookup(command.key),
            Op::Remove => self.remove(command.key),
        }
    }

    /// Sweeps every tombstone out of the table without changing capacity.
    ///
    /// Scanning left to right, each stretch starting at a tombstone and
    /// ending before the next occupied slot is cleared, and the run of
    /// occupied slots after it slides left to close the gap. Keys keep their
    /// relative order but are not rehashed, so a shifted key may sit before
    /// its home slot; lookups still reach it because they scan the whole
    /// table.
    ///
    /// Reports [`Event::Compact`].
    pub fn compact(&mut self) {
        let capacity = self.slots.len();
        let mut read = 0;

        while read < capacity {
            let mut gap_start = None;
            let mut gap_end = None;
            while read < capacity {
                match self.slots[read] {
                    Slot::Tombstone => {
                        self.slots[read] = Slot::Empty;
                        if gap_start.is_none() {
                            gap_start = Some(read);
                        }
                    }
                    Slot::Occupied(_) if gap_start.is_some() => {
                        gap_end = Some(read);
                        break;
                    }
                    _ => {}
                }
                read += 1;
            }

            let (Some(start), Some(end)) = (gap_start, gap_end) else {
                break;
            };

            let shift = end - start;
            while read < capacity && self.slots[read].is_occupied() {
                self.slots[read - shift] = core::mem::take(&mut self.slots[read]);
                read += 1;
            }
        }

        self.removed = 0;

        log::debug!(
            "compacted table: {} slots, {} filled",
            self.capacity(),
            self.filled
        );
        self.observer.observe(Event::Compact);
    }

    fn grow(&mut self) {
        let capacity = self.capacity() * 2;
        self.rebuild(capacity);

        log::debug!("grew table to {capacity} slots ({} filled)", self.filled);
        self.observer.observe(Event::Grow { capacity });
    }

    fn shrink(&mut self) {
        let capacity = self.capacity() / 2;
        if capacity == 0 || capacity < self.filled {
            log::debug!(
                "not shrinking {} slots holding {} keys",
                self.capacity(),
                self.filled
            );
            return;
        }
        self.rebuild(capacity);

        log::debug!("shrank table to {capacity} slots ({} filled)", self.filled);
        self.observer.observe(Event::Shrink { capacity });
    }

    /// Reinserts every live key into a fresh slot array of `capacity` slots,
    /// dropping tombstones.
    fn rebuild(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.filled);

        let old = core::mem::replace(&mut self.slots, vec![Slot::Empty; capacity]);
        for key in old.iter().filter_map(Slot::key) {
            let hash = self.hasher.hash(key);
            let placed = place(&mut self.slots, hash, key);
            debug_assert!(placed.is_some(), "rebuilt table ran out of slots");
        }
        self.removed = 0;
    }
}

impl<O> HashTable<O> {
    /// Returns the number of live keys, counting duplicates.
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones awaiting compaction.
    pub fn tombstones(&self) -> usize {
        self.removed
    }

    /// Returns the raw slot array.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterates over live keys in slot order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots.iter().filter_map(Slot::key)
    }

    /// Returns the hasher used for placement.
    pub fn hasher(&self) -> &TabulationHasher {
        &self.hasher
    }

    /// Returns the configuration the table was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Returns the observer mutably, e.g. to drain recorded events.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consumes the table and returns its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Distance of the slot at `position` from its key's home slot.
    #[cfg(any(test, feature = "stats"))]
    fn probe_distance(&self, position: usize, key: i64) -> usize {
        let capacity = self.capacity();
        let home = home_slot(self.hasher.hash(key), capacity);
        (position + capacity - home) % capacity
    }

    /// Computes a histogram of probe distances for the current layout.
    ///
    /// Bin `d` counts occupied slots sitting `d` positions after their home
    /// slot, wrapping around the table. Keys moved before their home slot by
    /// compaction land in the high bins. The result has one bin per distance
    /// up to the longest one present, and is empty for an empty table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for (position, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(key) = *slot {
                let distance = self.probe_distance(position, key);
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }
        hist
    }

    /// Returns occupancy statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let empty = self.slots.iter().filter(|slot| slot.is_empty()).count();
        let max_probe = self.probe_histogram().len().saturating_sub(1);

        DebugStats {
            capacity,
            filled: self.filled,
            tombstones: self.removed,
            empty,
            load_factor: ratio(self.filled, capacity),
            tombstone_ratio: ratio(self.removed, capacity),
            max_probe,
        }
    }

    /// Pretty-prints the probe-distance histogram horizontally using stdout.
    #[cfg(all(feature = "std", any(test, feature = "stats")))]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} keys):", self.filled);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let ch = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(ch);
            bar
        };

        for (distance, &count) in hist.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}
