//! Generic container toolkit: growable buffer, open-addressing table,
//! free-list object registry.
//!
//! Three primitives share one memory model: every container exclusively
//! owns its storage, copies caller values in and out (never borrowing
//! caller memory long-term), and reports growth failure as a recoverable
//! error instead of aborting.
//!
//! # Architecture
//!
//! ```text
//! Buffer<T>            growable contiguous storage, power-of-two growth
//! ├── Table<V>         u32 keys, linear probing over one slot Buffer
//! └── Registry<T>      dense elements + validity flags + free-ID stack,
//!                      three Buffers and a next-id counter
//! ```
//!
//! The table and the registry never manage raw capacity themselves; all
//! growth, bounds-checked indexing, and push/pop mechanics go through
//! [`Buffer`].
//!
//! # Concurrency
//!
//! Single-threaded by design: no internal locking, no atomics. A container
//! instance has one logical owner; sharing across threads requires
//! external synchronisation.
//!
//! # Allocation
//!
//! All storage is reserved through `Vec::try_reserve_exact`, so allocator
//! refusal surfaces as [`ContainerError::OutOfMemory`] with the container
//! unchanged. The allocation policy itself is the process-wide global
//! allocator; a build that wants a custom one installs it with
//! `#[global_allocator]`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod cursor;
pub mod error;
pub mod registry;
pub mod table;

// Public re-exports for the primary API surface.
pub use buffer::{Buffer, Shrink};
pub use cursor::Cursor;
pub use error::ContainerError;
pub use registry::{ObjectId, Registry};
pub use table::Table;
