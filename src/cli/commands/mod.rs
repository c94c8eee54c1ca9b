pub mod catalog;
pub mod config;
pub mod db;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
