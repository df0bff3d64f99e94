// src/lib.rs
pub mod client;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod view;
pub mod web;
