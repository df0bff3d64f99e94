// src/view/mod.rs
pub mod filter;
