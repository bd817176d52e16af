//! # Domain Models
//!
//! Plain data shared by every slice: the configuration tree, persisted records and
//! well-known constants. Keep it lean: no I/O, networking or business rules here.

pub mod config;
pub mod constants;
pub mod records;
pub mod registry;
