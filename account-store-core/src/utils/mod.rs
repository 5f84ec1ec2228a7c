//! Serde helpers shared by the account types.

pub mod lenient_id;
pub mod nullable;
