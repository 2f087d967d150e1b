//! # Institution Profile
//!
//! - `schema`: typed, shape-tolerant profile document
//! - `facts`: projection into the flat fact set used as matcher predicates
//! - `loader`: reading profile documents from disk or streams

pub mod facts;
pub mod loader;
pub mod schema;

pub use facts::{project, FactKey, FactSet};
pub use loader::{load_profile, parse_profile, read_profile};
pub use schema::InstitutionProfile;
