//! CLI command implementations

pub mod announce;
pub mod dirty_status;
pub mod targets;
