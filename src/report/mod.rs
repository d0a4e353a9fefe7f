pub mod builder;
pub mod config;
pub mod decoder;
pub mod filters;
pub mod metrics;
pub mod scoring;
pub mod tracks;
pub mod utils;


pub use builder::*;
pub use config::*;
pub use metrics::*;
