pub mod bronze;
pub mod config;
pub mod domain;
pub mod error;
pub mod gold;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod silver;
