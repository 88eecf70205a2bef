use anyhow::Result;
use clap::{Parser, Subcommand};
use fragcode_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "fragcode")]
#[command(about = "Fragcode - Rateless erasure coding for fragmented data blocks", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into coded fragment records
    Encode {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for fragment records
        #[arg(short, long)]
        output: String,

        /// Fragment size in bytes
        #[arg(short = 's', long, default_value = "64")]
        frag_size: usize,

        /// Number of redundancy fragments after the systematic ones
        #[arg(short, long, default_value = "0")]
        redundancy: usize,

        /// Manifest path (defaults to <output>.json)
        #[arg(long)]
        manifest: Option<String>,
    },

    /// Recover a file from (possibly damaged) fragment records
    Decode {
        /// Input file with fragment records ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the recovered message
        #[arg(short, long)]
        output: String,

        /// Manifest path (defaults to <input>.json when present)
        #[arg(long)]
        manifest: Option<String>,
    },

    /// Scan a record stream and report what it contains
    Inspect {
        /// Input file with fragment records ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// List every record found
        #[arg(long)]
        list: bool,
    },

    /// Simulate a lossy channel and measure decoding overhead
    Simulate {
        /// Number of source fragments
        #[arg(short = 'm', long, default_value = "32")]
        fragments: usize,

        /// Fragment size in bytes
        #[arg(short = 's', long, default_value = "16")]
        frag_size: usize,

        /// Probability that a fragment is lost (0.0..1.0)
        #[arg(short, long, default_value = "0.2")]
        loss: f64,

        /// Number of independent trials
        #[arg(short, long, default_value = "100")]
        trials: usize,

        /// RNG seed
        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// Print one row of the parity matrix
    Row {
        /// Sequence index of the row
        #[arg(short = 'n', long)]
        index: u32,

        /// Number of source fragments
        #[arg(short = 'm', long)]
        fragments: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Encode {
            input,
            output,
            frag_size,
            redundancy,
            manifest,
        } => commands::encode::execute(&input, &output, frag_size, redundancy, manifest.as_deref())
            .map(|_| ()),

        Commands::Decode {
            input,
            output,
            manifest,
        } => commands::decode::execute(&input, &output, manifest.as_deref()).map(|_| ()),

        Commands::Inspect { input, list } => commands::inspect::execute(&input, list),

        Commands::Simulate {
            fragments,
            frag_size,
            loss,
            trials,
            seed,
        } => commands::simulate::execute(fragments, frag_size, loss, trials, seed).map(|_| ()),

        Commands::Row { index, fragments } => commands::row::execute(index, fragments),
    }
}
