//! roster-core — Student records, the roster store and its flat-file codec.
//!
//! This crate defines the data model, the in-memory roster with its queries,
//! and the persistence format that everything else in roster builds on.

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod roster;
pub mod statistics;
pub mod traits;

pub use error::{CodecError, PersistError, RosterError};
pub use model::{Score, Student, StudentId};
pub use roster::Roster;
