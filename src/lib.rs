//! Hash-identity collections and an LRU eviction buffer.
//!
//! Every associative container in this crate locates its entries by an
//! identity token, a [`HashKey`], computed from the value itself rather than
//! from `Hash + Eq`:
//!
//! - scalars (numbers, strings, chars, bools, null) are keyed by a canonical
//!   encoding of their content
//! - composites (tuples, slices, `Vec`, arrays) are keyed by their components
//!   in order
//! - objects are keyed by the identity they declare through [`Key`]
//!
//! The crate provides:
//!
//! 1. [`HashTable`] and [`HashSet`] - insertion-ordered map and set
//! 2. [`LruBuffer`] - a bounded buffer that hands back its least recently
//!    used entry on overflow
//! 3. [`Vector`], [`Stack`] and [`Queue`] - sequential containers searched by
//!    value equality
//! 4. [`Shared`] - opt-in locking around any of the above
//!
//! Containers can also be typed at run time: with a [`Type`] contract a
//! container of dynamic [`Var`] values rejects ill-typed keys and values
//! before mutating.
//!
//! # Examples
//!
//! ```rust
//! use identity_collections::{HashTable, LruBuffer};
//!
//! // composite keys are compared by content
//! let mut table = HashTable::new();
//! table.put(vec![1, 2], "pair").unwrap();
//! assert_eq!(table.get(&vec![1, 2]).unwrap(), Some(&"pair"));
//!
//! // the least recently used entry is evicted first
//! let mut buffer = LruBuffer::new(2).unwrap();
//! buffer.add("a").unwrap();
//! buffer.add("b").unwrap();
//! buffer.update("a").unwrap();
//! assert_eq!(buffer.add("c").unwrap(), Some("b"));
//! ```

pub mod contract;
mod display;
pub mod error;
pub mod hash_set;
pub mod hash_table;
pub mod key;
pub mod lru_buffer;
pub mod queue;
pub mod stack;
mod store;
pub mod sync;
pub mod traits;
pub mod var;
pub mod vector;

pub use contract::{Contract, Unchecked};
pub use error::{CollectionError, Result};
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use key::{key_of, ByAddress, HashKey, Key, KeyShape, Scalar};
pub use lru_buffer::{BufferId, LruBuffer};
pub use queue::Queue;
pub use stack::Stack;
pub use sync::Shared;
pub use traits::{Map, Set};
pub use var::{Object, Type, Var};
pub use vector::Vector;
