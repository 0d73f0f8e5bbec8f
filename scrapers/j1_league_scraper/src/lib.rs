pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetcher;
pub mod pipeline;
pub mod table;
pub mod types;

pub use pipeline::{run_from_env, run_full_scrape};
