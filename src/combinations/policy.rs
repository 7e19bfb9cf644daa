//! Tuple legality policies and slot relations.

use super::Slot;

/// Ordering constraint between consecutive same-table slots.
///
/// Constraints bind only within a run of slots on one table (detected by
/// storage identity); slots on different tables are mutually unconstrained
/// and a run's constraint restarts at a table boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexPolicy {
    /// No cross-slot constraint: the full Cartesian product.
    #[default]
    Full,
    /// Consecutive same-table slots must satisfy `idx[i] <= idx[i + 1]`
    /// (combinations with repetition).
    Upper,
    /// Consecutive same-table slots must satisfy `idx[i] < idx[i + 1]`
    /// (classic k-combinations without replacement).
    StrictlyUpper,
}

impl IndexPolicy {
    /// Smallest legal index for a slot given the previous slot's index.
    #[inline]
    pub(crate) fn lower_bound(&self, same_as_prev: bool, prev_index: usize) -> usize {
        match self {
            IndexPolicy::Full => 0,
            IndexPolicy::Upper => {
                if same_as_prev {
                    prev_index
                } else {
                    0
                }
            }
            IndexPolicy::StrictlyUpper => {
                if same_as_prev {
                    prev_index + 1
                } else {
                    0
                }
            }
        }
    }
}

/// Same-table relation between consecutive slots, computed once per slot
/// set and consulted uniformly by every policy.
///
/// Slot 0 has no predecessor and is always unrelated. "Same" means same
/// storage identity and same selection handle: a filtered and an unfiltered
/// view of one table enumerate in different index spaces and are treated as
/// distinct.
#[derive(Clone, Debug)]
pub(crate) struct SlotRelations {
    same_as_prev: Vec<bool>,
}

impl SlotRelations {
    pub(crate) fn new(slots: &[Slot]) -> Self {
        let mut same_as_prev = Vec::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            let same = i > 0 && slot.same_index_space(&slots[i - 1]);
            same_as_prev.push(same);
        }
        Self { same_as_prev }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[bool] {
        &self.same_as_prev
    }
}
