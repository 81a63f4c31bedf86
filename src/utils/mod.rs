pub mod config;
pub mod database;
pub mod pagination;
pub mod validation;
