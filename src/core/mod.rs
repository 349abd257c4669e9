pub mod config;
pub mod session;
pub mod store;
pub mod summary;
pub mod weeks;
