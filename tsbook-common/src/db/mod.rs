//! Book store access
//!
//! The generator only ever reads from the store. Schema creation exists so a
//! fresh database (or a test fixture) can be bootstrapped.

pub mod init;
pub mod models;
pub mod queries;

pub use init::*;
pub use models::*;
pub use queries::*;
