pub mod config;
pub mod focus;
pub mod quote;
pub mod task;
