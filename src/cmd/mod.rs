pub mod config;
pub mod repos;
pub mod summarize;
