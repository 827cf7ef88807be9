//! modelshelf daemon library - exposes modules for testing.

pub mod config;
pub mod routes;
pub mod server;
pub mod service;
pub mod store;
pub mod thumbnail;
