pub mod identifier;
pub mod record;
pub mod repository;
pub mod routes;
pub mod service;
