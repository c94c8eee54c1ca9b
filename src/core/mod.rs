pub mod catalog;
pub mod config;
pub mod list;
pub mod log;
pub mod reconcile;
pub mod tokenizer;
