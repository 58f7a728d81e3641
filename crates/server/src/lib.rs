pub mod config;
pub mod db;
pub mod error_convert;
pub mod store;

pub mod auth;
pub mod headers;
pub mod health;
pub mod rate_limit;
pub mod telemetry;

// Club domain modules
pub mod csv;
pub mod openapi;
pub mod rest;
pub mod slots;
pub mod stripe;
