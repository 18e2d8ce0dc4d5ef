use alloc::boxed::Box;
use core::fmt::Debug;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Number of bits in each key piece looked up in a table.
const PIECE_BITS: usize = 8;

/// Number of pieces a 64-bit key is split into.
const PIECES: usize = 64 / PIECE_BITS;

/// Entries per lookup table, one for every value a piece can take.
const TABLE_LEN: usize = 1 << PIECE_BITS;

/// Seed used for the default hasher when no OS entropy source is available.
#[cfg_attr(feature = "std", allow(dead_code))]
const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Simple tabulation hashing over 64-bit keys.
///
/// The key is split into eight bytes, most significant first. Byte `i`
/// selects an entry of lookup table `i`, and the eight selected values are
/// XORed together to form the hash.
///
/// The tables are filled once from the random source handed to the
/// constructor and never change afterwards, so `hash` is a pure function of
/// the key for a given hasher. The tables come from a non-cryptographic
/// generator; this is not meant to resist adversarial inputs.
///
/// Table entries span the whole `u64` range, so hashes (and the hash field
/// of `INC:` log lines) use all 64 bits and are not limited to `i64::MAX`.
#[derive(Clone)]
pub struct TabulationHasher {
    tables: Box<[[u64; TABLE_LEN]; PIECES]>,
}

impl Debug for TabulationHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TabulationHasher")
            .field("pieces", &PIECES)
            .field("table_len", &TABLE_LEN)
            .field(
                "first_entries",
                &core::array::from_fn::<u64, PIECES, _>(|i| self.tables[i][0]),
            )
            .finish()
    }
}

impl TabulationHasher {
    /// Builds a hasher whose lookup tables are drawn from `rng`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::SeedableRng;
    /// use rand::rngs::SmallRng;
    /// use tab_hash::TabulationHasher;
    ///
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let hasher = TabulationHasher::from_rng(&mut rng);
    /// assert_eq!(hasher.hash(42), hasher.hash(42));
    /// ```
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut tables = Box::new([[0u64; TABLE_LEN]; PIECES]);
        for table in tables.iter_mut() {
            for entry in table.iter_mut() {
                *entry = rng.random();
            }
        }

        Self { tables }
    }

    /// Builds a hasher from a fixed seed, giving reproducible hashes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tab_hash::TabulationHasher;
    ///
    /// let a = TabulationHasher::with_seed(1);
    /// let b = TabulationHasher::with_seed(1);
    /// assert_eq!(a.hash(-17), b.hash(-17));
    /// ```
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(&mut SmallRng::seed_from_u64(seed))
    }

    /// Hashes `key` by XORing one table entry per key byte.
    #[inline]
    pub fn hash(&self, key: i64) -> u64 {
        key.to_be_bytes()
            .iter()
            .zip(self.tables.iter())
            .fold(0, |acc, (&byte, table)| acc ^ table[byte as usize])
    }
}

impl Default for TabulationHasher {
    /// Seeds from OS entropy when `std` is enabled, and from a fixed seed
    /// otherwise.
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "std")] {
                Self::from_rng(&mut SmallRng::from_os_rng())
            } else {
                Self::with_seed(FALLBACK_SEED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_per_instance() {
        let hasher = TabulationHasher::default();
        for key in [0i64, 1, -1, i64::MIN, i64::MAX, 0x0123_4567_89AB_CDEF] {
            assert_eq!(hasher.hash(key), hasher.hash(key));
        }
    }

    #[test]
    fn same_seed_same_tables() {
        let a = TabulationHasher::with_seed(0xDEAD_BEEF);
        let b = TabulationHasher::with_seed(0xDEAD_BEEF);
        for key in -500i64..500 {
            assert_eq!(a.hash(key), b.hash(key));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = TabulationHasher::with_seed(1);
        let b = TabulationHasher::with_seed(2);
        assert!((0i64..64).any(|key| a.hash(key) != b.hash(key)));
    }

    #[test]
    fn most_significant_byte_uses_first_table() {
        let mut tables = Box::new([[0u64; TABLE_LEN]; PIECES]);
        for (i, table) in tables.iter_mut().enumerate() {
            for (byte, entry) in table.iter_mut().enumerate() {
                *entry = ((i as u64) << 56) | ((byte as u64) << (i * 4));
            }
        }
        let hasher = TabulationHasher { tables };

        let bytes = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let key = i64::from_be_bytes(bytes);
        let expected = bytes
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc ^ hasher.tables[i][b as usize]);

        assert_eq!(hasher.hash(key), expected);
        assert_eq!(hasher.hash(0), (0..PIECES).fold(0, |acc, i| acc ^ hasher.tables[i][0]));
    }

    #[test]
    fn single_byte_change_flips_one_lookup() {
        let hasher = TabulationHasher::with_seed(99);
        let base = 0i64;
        let low = 0x01i64;
        let high = i64::from_be_bytes([0x01, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(
            hasher.hash(base) ^ hasher.hash(low),
            hasher.tables[PIECES - 1][0] ^ hasher.tables[PIECES - 1][1]
        );
        assert_eq!(
            hasher.hash(base) ^ hasher.hash(high),
            hasher.tables[0][0] ^ hasher.tables[0][1]
        );
    }

    #[test]
    fn hashes_use_the_top_bit() {
        let hasher = TabulationHasher::with_seed(1);
        assert!((0..256i64).any(|key| hasher.hash(key) > i64::MAX as u64));
    }
}
