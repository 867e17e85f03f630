/// Environment variable controlling the stderr log level.
pub const PROGRAM_LOG_LEVEL: &str = "TALLY_LOG_LEVEL";
