pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod geoip;
pub mod response;
pub mod state;
pub mod users;
