pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod contacts;
pub mod error;
pub mod pages;
pub mod seed;
pub mod state;
pub mod store;
