use std::process::ExitCode;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use metaview::Library;
use tokio::runtime::Runtime;

use crate::server::{ServerConfig, run_server};

pub fn handle_serve(config: ServerConfig) -> ExitCode {
    let library = match Library::open(&config.directory) {
        Ok(library) => library,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        },
    };

    let style_bold = Style::new().bold();
    println!("🚀 Starting metadata viewer server");
    println!(
        "📂 Files directory: {}",
        style_bold.apply_to(library.root().display())
    );
    println!(
        "🌐 Server will be available at: http://{}:{}",
        config.host, config.port
    );
    println!("🔢 Found {} compatible files", count_files(&library));
    println!(
        "📝 Endpoints:\n   GET /api/files\n   GET /api/file/<path>\n   GET|PUT /api/metadata/<path>\n   GET /api/info\n"
    );

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: unable to start the async runtime: {err}");
            return ExitCode::FAILURE;
        },
    };
    runtime.block_on(run_server(config, library));
    ExitCode::SUCCESS
}

fn count_files(library: &Library) -> usize {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.enable_steady_tick(std::time::Duration::from_millis(100));
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} Scanning: {msg}")
    {
        progress_bar.set_style(style);
    }
    progress_bar.set_message(library.root().display().to_string());

    let count = library.list().map(|files| files.len()).unwrap_or(0);
    progress_bar.finish_and_clear();
    count
}
