pub mod config;
pub mod logging;

pub mod executor;
pub mod fetch;
pub mod plan;
