//! Command-line flags for the `hot-coffee` binary.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "hot-coffee")]
#[command(about = "Coffee Shop Management System", long_about = None)]
pub struct Cli {
    /// Port number.
    #[arg(long, default_value_t = 8080, allow_negative_numbers = true)]
    pub port: i64,

    /// Keep inventory in memory instead of Postgres (dev only, nothing is persisted).
    #[arg(long)]
    pub in_memory: bool,
}

impl Cli {
    /// The listen port, or `None` when it is outside `1..=65535`.
    pub fn listen_port(&self) -> Option<u16> {
        u16::try_from(self.port).ok().filter(|p| *p != 0)
    }
}
