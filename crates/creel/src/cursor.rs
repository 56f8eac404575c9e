//! Bidirectional cursor shared by all three containers.
//!
//! A [`Cursor`] is a plain value recording a traversal position; the
//! containers own the stepping logic (`cursor_next` / `cursor_previous`)
//! because only they know which positions are live. The two sentinel
//! states make the cursor restartable from either end: stepping forward
//! from [`Cursor::BeforeFirst`] lands on the first live position, stepping
//! backward from [`Cursor::AfterLast`] lands on the last.
//!
//! The meaning of the [`Cursor::At`] payload is container-specific: an
//! element index for `Buffer`, a bucket index for `Table`, and an
//! identifier value for `Registry`.

/// A traversal position within a container.
///
/// Stepping past either end parks the cursor on the corresponding sentinel,
/// where further steps in the same direction saturate. Stepping back from a
/// sentinel re-enters the live range, so a finite walk in one direction can
/// always be reversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    /// One-before-begin sentinel.
    #[default]
    BeforeFirst,
    /// Positioned on a live entry.
    At(usize),
    /// One-past-end sentinel.
    AfterLast,
}

impl Cursor {
    /// The live position, if the cursor is not parked on a sentinel.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::At(pos) => Some(*pos),
            _ => None,
        }
    }

    /// Whether the cursor is parked on either sentinel.
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::At(_))
    }

    /// Step toward the end given the neighbour lookup of the container.
    ///
    /// `first` is the first live position; `next_of` maps a live position to
    /// its successor. Saturates at [`Cursor::AfterLast`].
    pub(crate) fn step_next<F, G>(&mut self, first: F, next_of: G)
    where
        F: FnOnce() -> Option<usize>,
        G: FnOnce(usize) -> Option<usize>,
    {
        *self = match *self {
            Self::BeforeFirst => match first() {
                Some(pos) => Self::At(pos),
                None => Self::AfterLast,
            },
            Self::At(pos) => match next_of(pos) {
                Some(next) => Self::At(next),
                None => Self::AfterLast,
            },
            Self::AfterLast => Self::AfterLast,
        };
    }

    /// Step toward the beginning; mirror image of [`Cursor::step_next`].
    pub(crate) fn step_previous<F, G>(&mut self, last: F, previous_of: G)
    where
        F: FnOnce() -> Option<usize>,
        G: FnOnce(usize) -> Option<usize>,
    {
        *self = match *self {
            Self::AfterLast => match last() {
                Some(pos) => Self::At(pos),
                None => Self::BeforeFirst,
            },
            Self::At(pos) => match previous_of(pos) {
                Some(prev) => Self::At(prev),
                None => Self::BeforeFirst,
            },
            Self::BeforeFirst => Self::BeforeFirst,
        };
    }
}
