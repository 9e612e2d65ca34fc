//! Database models and queries

pub mod episodes;
pub mod init;
pub mod models;

pub use episodes::*;
pub use init::*;
pub use models::*;
