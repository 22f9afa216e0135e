// Read-side orchestration

pub mod activity_queries;
pub mod market_queries;
