//! Repository layer: the only code that touches catalog storage.
//!
//! # Responsibility
//! - Translate entity intents into ordered table operations.
//! - Map rows back to domain records.
//!
//! # Invariants
//! - Repositories refuse connections that are not fully migrated.
//! - Absence is an error only for the primary product lookup.

pub mod catalog_repo;
pub mod product_repo;
mod support;
