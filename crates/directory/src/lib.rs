//! Query and taxonomy engine for the organizations directory.
//!
//! The interesting pieces live here: the activity hierarchy with its depth
//! invariant ([`taxonomy`]), the two-phase geographic filter ([`geo`]), and
//! the query service composing them with organization, building, and phone
//! data ([`query`]).

pub mod error;
pub mod geo;
pub mod query;
pub mod seed;
pub mod taxonomy;

pub use error::{DirectoryError, DirectoryResult};
