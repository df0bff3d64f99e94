// src/models/mod.rs
pub mod operation;
