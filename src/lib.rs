pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod render;
pub mod test_helpers;
