//! The restartable combination generator and its iterator.

use crate::table::RowCursor;

use super::block::{BlockConfig, BlockIter};
use super::odometer::Odometer;
use super::policy::{IndexPolicy, SlotRelations};
use super::Slot;

/// Window introspection attached to tuples of block enumerations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowInfo {
    pub(crate) new_window: bool,
    pub(crate) neighbours: usize,
}

impl WindowInfo {
    /// True for the first tuple emitted from a window.
    #[inline]
    pub fn is_new_window(&self) -> bool {
        self.new_window
    }

    /// Number of category groups merged into the current window.
    #[inline]
    pub fn neighbours(&self) -> usize {
        self.neighbours
    }
}

/// One enumerated tuple: a zero-copy row reference per slot.
///
/// Projection is O(1) per slot and copies no row data; cursors stay valid
/// while the generator's tables are alive.
#[derive(Clone, Debug)]
pub struct Combination<'a> {
    cursors: Vec<RowCursor<'a>>,
    window: Option<WindowInfo>,
}

impl<'a> Combination<'a> {
    /// Number of slots.
    #[inline]
    pub fn arity(&self) -> usize {
        self.cursors.len()
    }

    /// Cursor for one slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= arity()`.
    #[inline]
    pub fn cursor(&self, slot: usize) -> RowCursor<'a> {
        self.cursors[slot]
    }

    /// All cursors in slot order.
    #[inline]
    pub fn cursors(&self) -> &[RowCursor<'a>] {
        &self.cursors
    }

    /// Destructure an arity-2 combination.
    ///
    /// # Panics
    ///
    /// Panics if the arity is not 2.
    pub fn pair(&self) -> (RowCursor<'a>, RowCursor<'a>) {
        assert_eq!(self.cursors.len(), 2, "pair() needs arity 2");
        (self.cursors[0], self.cursors[1])
    }

    /// Destructure an arity-3 combination.
    ///
    /// # Panics
    ///
    /// Panics if the arity is not 3.
    pub fn triple(&self) -> (RowCursor<'a>, RowCursor<'a>, RowCursor<'a>) {
        assert_eq!(self.cursors.len(), 3, "triple() needs arity 3");
        (self.cursors[0], self.cursors[1], self.cursors[2])
    }

    /// Window introspection; `None` outside block enumerations.
    #[inline]
    pub fn window(&self) -> Option<WindowInfo> {
        self.window
    }

    /// True for the first tuple of a block window; always false otherwise.
    #[inline]
    pub fn is_new_window(&self) -> bool {
        self.window.is_some_and(|w| w.new_window)
    }

    /// Category groups merged into the current window (block only).
    #[inline]
    pub fn window_neighbours(&self) -> Option<usize> {
        self.window.map(|w| w.neighbours)
    }
}

/// Restartable lazy enumeration over a fixed slot set and policy.
///
/// The generator itself is immutable configuration: category tables and
/// selection masks are built once at construction, and every
/// [`iter`](CombinationsGenerator::iter) call restarts enumeration from
/// scratch with private state. Independent iterators share nothing mutable,
/// so abandoning one early (a `break`, or dropping it mid-window) never
/// affects the next.
#[derive(Clone, Debug)]
pub struct CombinationsGenerator {
    slots: Vec<Slot>,
    policy: IndexPolicy,
    relations: SlotRelations,
    block: Option<BlockConfig>,
}

impl CombinationsGenerator {
    pub(crate) fn plain(policy: IndexPolicy, slots: Vec<Slot>) -> Self {
        let relations = SlotRelations::new(&slots);
        Self {
            slots,
            policy,
            relations,
            block: None,
        }
    }

    pub(crate) fn block(policy: IndexPolicy, slots: Vec<Slot>, block: BlockConfig) -> Self {
        let relations = SlotRelations::new(&slots);
        Self {
            slots,
            policy,
            relations,
            block: Some(block),
        }
    }

    /// Number of slots per combination.
    #[inline]
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// The active ordering policy.
    #[inline]
    pub fn policy(&self) -> IndexPolicy {
        self.policy
    }

    /// The participating slots.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Start a fresh enumeration.
    pub fn iter(&self) -> CombinationsIter<'_> {
        let state = match &self.block {
            Some(config) => {
                IterState::Block(BlockIter::new(config, self.policy, self.relations.as_slice()))
            }
            None => IterState::Plain {
                odo: Odometer::new(
                    self.policy,
                    self.relations.as_slice().to_vec(),
                    self.slots.iter().map(Slot::len).collect(),
                ),
                started: false,
            },
        };
        CombinationsIter { generator: self, state }
    }

    /// Project dense per-slot rows into cursors on the true global rows.
    fn project<'a>(&'a self, rows: &[usize], window: Option<WindowInfo>) -> Combination<'a> {
        let cursors = self
            .slots
            .iter()
            .zip(rows)
            .map(|(slot, &dense)| slot.table().row(slot.global(dense)))
            .collect();
        Combination { cursors, window }
    }
}

impl<'a> IntoIterator for &'a CombinationsGenerator {
    type Item = Combination<'a>;
    type IntoIter = CombinationsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
enum IterState<'a> {
    Plain { odo: Odometer, started: bool },
    Block(BlockIter<'a>),
    Terminal,
}

/// Single-pass iterator over one enumeration.
///
/// Reaching the terminal state is absorbing; `next` keeps returning `None`.
#[derive(Debug)]
pub struct CombinationsIter<'a> {
    generator: &'a CombinationsGenerator,
    state: IterState<'a>,
}

impl<'a> Iterator for CombinationsIter<'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let generator = self.generator;
        let step = match &mut self.state {
            IterState::Terminal => None,
            IterState::Plain { odo, started } => {
                let ok = if *started {
                    odo.advance()
                } else {
                    *started = true;
                    generator.arity() > 0 && odo.start()
                };
                ok.then(|| (odo.indices().to_vec(), None))
            }
            IterState::Block(block) => block
                .next_indices()
                .map(|(rows, info)| (rows, Some(info))),
        };
        match step {
            Some((rows, window)) => Some(generator.project(&rows, window)),
            None => {
                self.state = IterState::Terminal;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for CombinationsIter<'_> {}
