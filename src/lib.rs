pub mod config;
pub mod errors;
pub mod lot_processor;
pub mod lot_store;
pub mod monitor;
pub mod scraper_client;
