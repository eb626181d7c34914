pub mod config;
pub mod overview;
