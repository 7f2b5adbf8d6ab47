//! Document storage for the restaurant back-office.
//!
//! Every entity lives in a named [`Collection`] as a JSON document keyed by its
//! generated [`ExternalId`]. The [`DocumentStore`] trait is the whole storage
//! surface the read side needs: find by id, find many by filter, insert one and
//! patch one. Every call a service makes is wrapped in [`with_deadline`].

pub mod collection;
pub mod deadline;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use collection::{Collection, Document};
pub use common::ExternalId;
pub use deadline::{Deadlines, with_deadline};
pub use error::{Result, StoreError};
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use query::{Condition, Filter};
pub use store::{DocumentStore, DocumentStoreExt, Patch};
