use std::{net::IpAddr, path::PathBuf, process::ExitCode, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use cli::{
    handlers::{handle_inspect, handle_list, handle_serve},
    server::ServerConfig,
};

#[derive(Parser)]
#[command(version, about = "Browse model weight files and edit their metadata")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a directory of model files over HTTP
    Serve {
        /// Directory containing safetensors files to serve
        #[arg(short, long)]
        directory: PathBuf,
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port to bind to
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
        /// Enable debug logging
        #[arg(long)]
        debug: bool,
        /// HTML page served at `/`
        #[arg(long, default_value = "index.html")]
        index: PathBuf,
        /// Seconds a single file operation may take
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// List compatible files in a directory
    List {
        #[arg(short, long)]
        directory: PathBuf,
    },
    /// Print the metadata of a safetensors file
    Inspect {
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            directory,
            host,
            port,
            debug,
            index,
            timeout_secs,
        }) => handle_serve(ServerConfig {
            directory,
            host,
            port,
            debug,
            index_path: index,
            io_timeout: Duration::from_secs(timeout_secs),
        }),
        Some(Commands::List {
            directory,
        }) => handle_list(&directory),
        Some(Commands::Inspect {
            file,
        }) => handle_inspect(&file),
        None => {
            let mut cmd = Cli::command();
            let _ = cmd.print_help();
            ExitCode::SUCCESS
        },
    }
}
