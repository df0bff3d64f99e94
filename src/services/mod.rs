// src/services/mod.rs
pub mod operation_service;
