//! Shared types for the restaurant back-office workspace.

pub mod money;
pub mod types;

pub use money::{CENT_PLACES, round_to_cents};
pub use types::ExternalId;
