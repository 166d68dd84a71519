//! Command implementations

pub mod analyze;
pub mod chat;
pub mod export;
pub mod list;
pub mod scan;
pub mod show;
