// src/lib.rs

//! Anjun Express Tracker Library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod platform;
pub mod services;
pub mod utils;
