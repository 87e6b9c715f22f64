pub mod aggregator;
pub mod board;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod source;
