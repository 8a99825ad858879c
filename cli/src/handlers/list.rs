use std::{path::Path, process::ExitCode};

use console::Style;
use indicatif::HumanBytes;
use metaview::Library;

pub fn handle_list(directory: &Path) -> ExitCode {
    let files = match Library::open(directory).and_then(|library| library.list())
    {
        Ok(files) => files,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        },
    };

    let style_bold = Style::new().bold();
    let style_dim = Style::new().dim();
    for file in &files {
        println!(
            "{:>10}  {}  {}",
            HumanBytes(file.size).to_string(),
            style_bold.apply_to(&file.name),
            style_dim.apply_to(&file.relative_path),
        );
    }
    println!("{} file(s)", files.len());
    ExitCode::SUCCESS
}
