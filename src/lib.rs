// src/lib.rs

//! podscout: podcast discovery and source-backed contact finding.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
