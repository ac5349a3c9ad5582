//! Permission checking.

mod checker;

pub use checker::Permissions;
