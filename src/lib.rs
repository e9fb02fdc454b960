pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod form;
pub mod map;
pub mod render;
pub mod storage;
pub mod store;
pub mod types;
pub mod utils;
