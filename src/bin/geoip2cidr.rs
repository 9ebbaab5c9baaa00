//! geoip2cidr: extract CIDR lists from a v2ray geoip.dat file.

use clap::Parser;
use geoip2cidr::{Config, Mode};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geoip2cidr")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Extract CIDR lists from geoip.dat, split by IP version or load into ipsets", long_about = None)]
struct Cli {
    /// geoip.dat file (plain or gzip-compressed)
    #[arg(short = 'g', long = "geofile", default_value = "./geoip.dat")]
    geofile: PathBuf,

    /// Category tag, e.g. `cn`; matched case-insensitively, empty selects all
    #[arg(short, long, default_value = "")]
    category: String,

    /// Output mode: show, save or ipset
    #[arg(short, long, default_value = "show", value_parser = parse_mode)]
    mode: Mode,

    /// Skip IPv4 prefixes
    #[arg(long = "no-v4", alias = "n4")]
    no_v4: bool,

    /// Skip IPv6 prefixes
    #[arg(long = "no-v6", alias = "n6")]
    no_v6: bool,

    /// ipset name for IPv4 prefixes
    #[arg(long = "ipset-v4", alias = "i4")]
    ipset_v4: Option<String>,

    /// ipset name for IPv6 prefixes
    #[arg(long = "ipset-v6", alias = "i6")]
    ipset_v6: Option<String>,

    /// Output file for IPv4 prefixes (may equal --save-v6)
    #[arg(long = "save-v4", alias = "s4")]
    save_v4: Option<PathBuf>,

    /// Output file for IPv6 prefixes (may equal --save-v4)
    #[arg(long = "save-v6", alias = "s6")]
    save_v6: Option<PathBuf>,

    /// Number of classifier worker threads
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            database: cli.geofile,
            category: cli.category,
            mode: cli.mode,
            skip_v4: cli.no_v4,
            skip_v6: cli.no_v6,
            ipset_v4: cli.ipset_v4.filter(|s| !s.is_empty()),
            ipset_v6: cli.ipset_v6.filter(|s| !s.is_empty()),
            save_v4: cli.save_v4.filter(|p| !p.as_os_str().is_empty()),
            save_v6: cli.save_v6.filter(|p| !p.as_os_str().is_empty()),
            workers: cli.jobs,
        }
    }
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| e.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from(Cli::parse());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = geoip2cidr::run(&config, &mut out) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let _ = out.flush();
}
