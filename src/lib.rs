pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod nutrition;
pub mod state;
