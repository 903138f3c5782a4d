//! Reference property-management ontology.
//!
//! Each sub-module encodes one slice of the domain as Rust data: its entity
//! definitions, the relationships it originates, its lifecycle state machine,
//! and its operation catalog entries. [`crate::Ontology::sample`] assembles
//! them into a single bundle.

pub mod common;
pub mod lease;
pub mod party;
pub mod property;
pub mod work_order;
