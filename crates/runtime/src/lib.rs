mod config;
pub mod logging;

pub use config::PROGRAM_LOG_LEVEL;
pub use logging::init;
