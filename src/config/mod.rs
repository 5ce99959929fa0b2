pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "horo-scan")]
#[command(about = "Face and zodiac fortune reading with remedy recommendation")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "reading.toml")]
    pub config: String,

    /// Birth date as dd/mm/yyyy or yyyy-mm-dd
    #[arg(short, long)]
    pub birthdate: Option<String>,

    /// Face image fed to the capture session in place of a live camera (required for a reading)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Preview the scores after choosing this remedy
    #[arg(long)]
    pub remedy: Option<String>,

    /// Override the scan window from the config, in seconds
    #[arg(long)]
    pub scan_delay: Option<u64>,

    /// Write the reading as JSON to this path
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, help = "Log output format")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
