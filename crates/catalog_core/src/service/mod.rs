//! Catalog use-case services.
//!
//! # Responsibility
//! - Turn inbound forms into entity mutations and repository calls.
//! - Keep callers decoupled from storage details.

pub mod product_service;
