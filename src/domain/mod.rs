pub mod pull_request;
pub mod repository;
pub mod summary;
pub mod window;
