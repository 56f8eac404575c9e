//! Error types shared by all three containers.
//!
//! Every fallible operation returns a [`ContainerError`] through `Result`;
//! nothing panics on caller input. A failed operation leaves the container
//! in its last-valid state — errors are reported before any mutation takes
//! effect.

use std::error::Error;
use std::fmt;

/// Errors that can occur during container operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerError {
    /// The allocator refused a growth request, or an open-addressing table
    /// has no free slot left on the probe path.
    OutOfMemory {
        /// Number of elements the operation needed storage for.
        requested: usize,
    },
    /// An index beyond the valid range of the container.
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of live elements at the time of the call.
        count: usize,
    },
    /// The operation found nothing to act on (pop or shrink of an empty
    /// buffer).
    Empty,
    /// A table insert was rejected because the key is already present.
    KeyExists {
        /// The duplicate key.
        key: u32,
    },
    /// A table lookup or removal found no entry for the key.
    KeyNotFound {
        /// The missing key.
        key: u32,
    },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: no storage for {requested} element(s)")
            }
            Self::OutOfBounds { index, count } => {
                write!(f, "index {index} out of bounds for {count} element(s)")
            }
            Self::Empty => write!(f, "container is empty"),
            Self::KeyExists { key } => write!(f, "key {key} already exists"),
            Self::KeyNotFound { key } => write!(f, "key {key} not found"),
        }
    }
}

impl Error for ContainerError {}
