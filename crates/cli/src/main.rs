//! Delta-correlation prefetch simulator CLI.
//!
//! This binary is the single entry point for trace-driven runs. It performs:
//! 1. **Config load:** JSON configuration file or built-in defaults.
//! 2. **Trace load:** plain-text access trace (`<ip-hex> <addr-hex>` per line).
//! 3. **Simulation:** runs the cache model + prefetch engine over the trace
//!    and prints the harness and engine statistics.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::{fs, process};

use bertisim_core::config::Config;
use bertisim_core::sim::{Simulator, read_trace};

#[derive(Parser, Debug)]
#[command(
    name = "bertisim",
    author,
    version,
    about = "Timeliness-aware delta-correlation prefetch simulator",
    long_about = "Run a memory-access trace through a demand cache model and the \
delta-correlation prefetch engine.\n\nTraces are plain text, one access per line: \
`<ip-hex> <addr-hex>`; `#` starts a comment. Configuration is JSON (see \
bertisim_core::config::Config); the CLI uses built-in defaults when no file is given.\n\n\
Examples:\n  bertisim run -t traces/stream.txt\n  bertisim run -t traces/stream.txt -c config.json --stats prefetch"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single trace file.
    Run {
        /// Access trace to execute.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration file (defaults when omitted).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Engine stats sections to print: train, fill, prefetch (all when empty).
        #[arg(long)]
        stats: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            trace,
            config,
            stats,
        }) => cmd_run(&trace, config.as_deref(), &stats),
        None => {
            eprintln!("bertisim — pass a subcommand");
            eprintln!();
            eprintln!("  bertisim run -t <trace>              Run with default config");
            eprintln!("  bertisim run -t <trace> -c <json>    Run with a config file");
            eprintln!();
            eprintln!("  bertisim --help  for full options");
            process::exit(1);
        }
    }
}

/// Runs the simulator over one trace and prints the statistics reports.
///
/// Loads the JSON config (or defaults), validates it, loads the trace, and
/// exits with code 1 on any of those failing.
fn cmd_run(trace_path: &std::path::Path, config_path: Option<&std::path::Path>, stats: &[String]) {
    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("[!] Could not read config '{}': {}", path.display(), e);
                process::exit(1);
            });
            serde_json::from_str::<Config>(&text).unwrap_or_else(|e| {
                eprintln!("[!] Invalid config '{}': {}", path.display(), e);
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let records = read_trace(trace_path).unwrap_or_else(|e| {
        eprintln!("[!] {}", e);
        process::exit(1);
    });

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("[!] Invalid configuration: {}", e);
        process::exit(1);
    });

    println!(
        "[*] Trace: {} ({} records)  Degree: {}  Fill latency: {}",
        trace_path.display(),
        records.len(),
        config.engine.degree,
        config.sim.fill_latency
    );
    println!();

    sim.run(&records);
    sim.stats().print();
    sim.engine().stats().print_sections(stats);
}
