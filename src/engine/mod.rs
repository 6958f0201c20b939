//! The attendance engine: pure status/aggregation logic, no store access.

pub mod aggregate;
pub mod csv;
pub mod status;
