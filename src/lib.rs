pub mod api;
pub mod config;
pub mod db;
pub mod flash;
pub mod models;
