// src/infrastructure/mod.rs
pub mod storage;
