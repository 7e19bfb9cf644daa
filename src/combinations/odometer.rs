//! Carry-propagating index advance shared by plain and block enumeration.

use super::policy::IndexPolicy;

/// Multi-digit odometer over per-slot index ranges.
///
/// Digit i runs over `0..sizes[i]`, with its minimum supplied by the policy
/// from the previous same-table digit. Incrementing the rightmost digit past
/// its range resets it to that minimum and carries one digit left; when the
/// leftmost digit cannot advance, every digit parks at its slot's size (the
/// canonical terminal tuple) and the odometer stays terminal.
#[derive(Clone, Debug)]
pub(crate) struct Odometer {
    policy: IndexPolicy,
    same_as_prev: Vec<bool>,
    sizes: Vec<usize>,
    idx: Vec<usize>,
    terminal: bool,
}

impl Odometer {
    pub(crate) fn new(policy: IndexPolicy, same_as_prev: Vec<bool>, sizes: Vec<usize>) -> Self {
        debug_assert_eq!(same_as_prev.len(), sizes.len());
        let idx = vec![0; sizes.len()];
        Self {
            policy,
            same_as_prev,
            sizes,
            idx,
            terminal: false,
        }
    }

    /// Build the first legal tuple. Returns false (and parks at the terminal
    /// tuple) when none exists, e.g. a strictly-upper self-combination of
    /// arity exceeding the table size, or an empty slot.
    pub(crate) fn start(&mut self) -> bool {
        if self.idx.is_empty() || !self.refill_from(0) {
            self.mark_terminal();
            return false;
        }
        true
    }

    /// Advance to the next legal tuple; false once exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        if self.terminal {
            return false;
        }
        let mut i = self.idx.len();
        loop {
            if i == 0 {
                self.mark_terminal();
                return false;
            }
            i -= 1;
            self.idx[i] += 1;
            // A failed refill cannot be fixed by pushing this digit further:
            // larger digits only raise downstream minimums. Carry left.
            if self.idx[i] < self.sizes[i] && self.refill_from(i + 1) {
                return true;
            }
        }
    }

    /// Current tuple; the terminal tuple holds `sizes[i]` in every slot.
    #[inline]
    pub(crate) fn indices(&self) -> &[usize] {
        &self.idx
    }

    #[cfg(test)]
    pub(crate) fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Reset digits from `start` rightwards to their policy minimums.
    fn refill_from(&mut self, start: usize) -> bool {
        for j in start..self.idx.len() {
            let lower = if j == 0 {
                0
            } else {
                self.policy.lower_bound(self.same_as_prev[j], self.idx[j - 1])
            };
            if lower >= self.sizes[j] {
                return false;
            }
            self.idx[j] = lower;
        }
        true
    }

    fn mark_terminal(&mut self) {
        self.idx.copy_from_slice(&self.sizes);
        self.terminal = true;
    }
}
