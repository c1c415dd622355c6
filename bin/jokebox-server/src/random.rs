//! Uniform random index selection.
//!
//! The `/jokes/random*` endpoints need one uniformly-random row out of `n`.
//! Rather than constructing a generator inside the handlers, the picker is
//! injected through [`crate::state::AppState`] so tests can substitute a
//! deterministic implementation.

use rand::RngExt;

/// Source of uniformly-distributed indices.
pub trait IndexPicker: Send + Sync + 'static {
    /// Pick an index in `0..len`, each with equal probability.
    ///
    /// `len` must be greater than zero; callers check for an empty set
    /// before picking.
    fn pick(&self, len: usize) -> usize;
}

/// Production picker backed by the OS-seeded generator from [`rand`].
pub struct RandPicker;

impl IndexPicker for RandPicker {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pick_stays_in_range() {
        let picker = RandPicker;
        for len in [1usize, 2, 7, 100] {
            for _ in 0..50 {
                assert!(picker.pick(len) < len);
            }
        }
    }

    #[test]
    fn pick_covers_all_indices_eventually() {
        let picker = RandPicker;
        let mut seen = [false; 5];
        for _ in 0..1000 {
            seen[picker.pick(5)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
