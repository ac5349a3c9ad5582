//! Database module exports.

mod models;
mod mongo;
mod repository;
mod users;

pub use models::*;
pub use mongo::Database;
pub use repository::{AuthRepository, BioFilterRepository};
pub use users::UserRepo;
