// src/web/mod.rs
pub mod operation_handlers;
pub mod routes;
