//! Store interfaces and `SurrealDB` implementation.
//!
//! The store executes planned query attempts against the scripture and talk
//! tables. Seeding an embedded store is the only write it performs.

pub mod surreal;

pub use surreal::{StoreError, StoreResult, SurrealLibraryStore};
