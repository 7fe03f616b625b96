pub mod aggregate;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod models;
pub mod render;
pub mod views;
