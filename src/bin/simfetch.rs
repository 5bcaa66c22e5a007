//! simfetch CLI - cached dataset downloads
//!
//! Usage:
//!   simfetch probe <url>                 Show status, size and suggested name
//!   simfetch download <url>              Download (or reuse) a file
//!   simfetch extract <archive>           Extract a zip archive
//!   simfetch fetch <url>                 Download and extract
//!   simfetch simbench <code>             Fetch a SimBench CSV dataset

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use simfetch::acquire::http::{self, TIMEOUT_ENV};
use simfetch::extract::default_extract_dir;
use simfetch::{
    ConsoleReporter, DownloadOptions, Transport, UreqTransport, download, extract,
    fetch_and_unpack, output, simbench_url,
};
use std::path::PathBuf;

/// Default cache directory for SimBench datasets (XDG compliant)
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("simfetch")
}

#[derive(Parser)]
#[command(name = "simfetch")]
#[command(about = "Download, cache and unpack remote datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show cache decisions and extracted entries
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP timeout in seconds (clamped to 5-300)
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    timeout: Option<u64>,
}

#[derive(Args)]
struct Target {
    /// Directory to store the download in (default: current directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// File name, relative to --dir (default: server-suggested or derived from the URL)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Download again even if a cached copy exists
    #[arg(long)]
    overwrite: bool,
}

impl Target {
    fn options(&self) -> DownloadOptions {
        DownloadOptions {
            file: self.file.clone(),
            dir: self.dir.clone(),
            overwrite: self.overwrite,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show remote status, size and suggested file name
    Probe {
        url: String,
    },

    /// Download a file, reusing a cached copy of the same size
    Download {
        url: String,

        #[command(flatten)]
        target: Target,
    },

    /// Extract a zip archive
    Extract {
        archive: PathBuf,

        /// Destination directory (default: archive path without extension)
        #[arg(short, long)]
        dst: Option<PathBuf>,

        /// Remove an existing destination and extract again
        #[arg(long)]
        force: bool,
    },

    /// Download and extract an archive
    Fetch {
        url: String,

        #[command(flatten)]
        target: Target,
    },

    /// Download and extract a SimBench CSV dataset
    Simbench {
        /// Dataset code, e.g. 1-LV-rural1--0-sw
        code: String,

        /// Cache directory
        #[arg(long, env = "SIMFETCH_CACHE_DIR")]
        cache_dir: Option<PathBuf>,

        /// Download and extract again
        #[arg(long)]
        overwrite: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let transport = match cli.timeout {
        Some(secs) => UreqTransport::with_timeout(http::clamp_timeout(secs)),
        None => UreqTransport::new(),
    };
    let reporter = ConsoleReporter::new(cli.verbose);

    match cli.command {
        Commands::Probe { url } => {
            let resource = transport
                .probe(&url)
                .with_context(|| format!("Failed to probe {}", url))?;
            println!("status: {}", resource.status);
            println!("size:   {}", resource.size);
            println!(
                "name:   {}",
                resource.suggested_name.as_deref().unwrap_or("-")
            );
        }

        Commands::Download { url, target } => {
            output::action(&format!("Downloading {}", url));
            let path = download(&transport, &reporter, &url, &target.options())
                .with_context(|| format!("Failed to download {}", url))?;
            output::success(&path.display().to_string());
        }

        Commands::Extract {
            archive,
            dst,
            force,
        } => {
            let dst = dst.unwrap_or_else(|| default_extract_dir(&archive));
            if force && dst.is_dir() {
                std::fs::remove_dir_all(&dst)
                    .with_context(|| format!("Failed to remove {}", dst.display()))?;
            }
            output::action(&format!("Extracting {}", archive.display()));
            let dir = extract(&archive, Some(&dst), true, &reporter)
                .with_context(|| format!("Failed to extract {}", archive.display()))?;
            output::success(&dir.display().to_string());
        }

        Commands::Fetch { url, target } => {
            output::action(&format!("Fetching {}", url));
            let dir = fetch_and_unpack(&transport, &reporter, &url, &target.options())
                .with_context(|| format!("Failed to fetch {}", url))?;
            output::success(&dir.display().to_string());
        }

        Commands::Simbench {
            code,
            cache_dir,
            overwrite,
        } => {
            let url = simbench_url(&code);
            let options = DownloadOptions::new()
                .dir(cache_dir.unwrap_or_else(default_cache_dir))
                .overwrite(overwrite);

            output::action(&format!("Fetching SimBench dataset {}", code));
            let dir = fetch_and_unpack(&transport, &reporter, &url, &options)
                .with_context(|| format!("Failed to fetch SimBench dataset {}", code))?;
            output::success(&dir.display().to_string());
        }
    }

    Ok(())
}
