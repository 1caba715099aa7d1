//! Strongly typed identifier wrappers and the seat-relative `Side`.
//!
//! Philosophers and chopsticks are both numbered `0..N` around the table.
//! The inner integer is `pub` for direct construction in tests, but callers
//! should prefer `.index()` when indexing the per-seat `Vec`s.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Seat number of a philosopher, fixed for the lifetime of a table.
    pub struct PhilosopherId(u32);
}

typed_id! {
    /// Index of a chopstick.  Chopstick `i` lies between philosophers
    /// `i - 1` and `i` (mod N).
    pub struct ChopstickId(u32);
}

impl PhilosopherId {
    /// The chopstick on this philosopher's `side` at a table of `seats`.
    ///
    /// Left is the chopstick with the same index; right wraps around to
    /// `(id + 1) mod seats`.
    #[inline]
    pub fn chopstick(self, side: Side, seats: usize) -> ChopstickId {
        match side {
            Side::Left  => ChopstickId(self.0),
            Side::Right => ChopstickId(((self.index() + 1) % seats) as u32),
        }
    }
}

// ── Side ──────────────────────────────────────────────────────────────────────

/// Which of a philosopher's two chopsticks a request refers to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other hand.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Left  => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left  => "left",
            Side::Right => "right",
        })
    }
}
