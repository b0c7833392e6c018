//! Persistent save blocks for Tandem.
//!
//! The save data is split into three blocks ([`BlockId`]) that live at a
//! shared base offset inside slightly larger windows. At intervals the
//! [`SaveManager`] relocates every block to a new offset and rotates the
//! XOR key that obfuscates sensitive fields.
//!
//! # Architecture
//!
//! ```text
//! SaveManager
//! ├── SaveArena (current generation, three windows)
//! ├── ScratchHeap (bump region holding captures mid-relocation)
//! ├── ConsumerRegistry (suspended while blocks move)
//! ├── EncryptedFieldSet (fields re-keyed on rotation)
//! └── ChaCha8Rng (offset and key draws)
//! ```
//!
//! # Relocation
//!
//! 1. Suspend every registered [`BlockConsumer`].
//! 2. Capture each block into the scratch heap.
//! 3. Derive the new offset from the trainer id and a random draw.
//! 4. Build a new arena at the next generation and copy each capture in,
//!    using the same size the capture was taken with.
//! 5. Reset the heap and resume consumers at the new location.
//! 6. Rotate the encryption key.
//!
//! [`BlockRef`]s minted before step 4 fail with
//! [`SaveError::StaleHandle`] afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod bag;
pub mod block;
pub mod config;
pub mod consumer;
pub mod crypt;
pub mod error;
pub mod heap;
pub mod layout;
pub mod manager;
pub mod party;
pub mod relocate;

pub use arena::{BaseLocation, BlockRef};
pub use bag::{ItemSlot, LoadedBag};
pub use block::{Block, BlockMut};
pub use config::SaveConfig;
pub use consumer::{BlockConsumer, SuspendGuard};
pub use crypt::{EncryptedFieldSet, EncryptionKey};
pub use error::{SaveConfigError, SaveError};
pub use layout::{BlockId, Pocket};
pub use manager::SaveManager;
pub use relocate::RelocationReport;
