// src/core/mod.rs
pub mod alphabet;
pub mod assembler;
pub mod context;
pub mod engine;
pub mod resolver;
pub mod tokenizer;
pub mod types;
