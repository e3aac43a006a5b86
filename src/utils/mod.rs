pub mod app_config;
pub mod commons;
pub mod db;
pub mod error;
pub mod memory;
pub mod traits;
pub mod validation;
