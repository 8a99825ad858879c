use std::{fs::File, io::BufReader, path::Path, process::ExitCode};

use console::Style;
use metaview::{
    HeaderCodecError, ModelFormat, container::read_header, extract_metadata,
};

pub fn handle_inspect(path: &Path) -> ExitCode {
    if ModelFormat::from_path(path) != Some(ModelFormat::Safetensors) {
        eprintln!("Error: metadata can only be read from .safetensors files");
        return ExitCode::FAILURE;
    }

    let decoded = match File::open(path)
        .map_err(HeaderCodecError::from)
        .and_then(|file| read_header(&mut BufReader::new(file)))
    {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        },
    };

    let style_bold = Style::new().bold();
    println!("{}", style_bold.apply_to(path.display()));
    println!("   Header: {} bytes", decoded.header_length);
    println!("   Tensors: {}", decoded.tensor_names().count());

    match extract_metadata(&decoded.raw_header) {
        Ok(extracted) => {
            match serde_json::to_string_pretty(&extracted.structured()) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("Error: {err}");
                    return ExitCode::FAILURE;
                },
            }
        },
        Err(HeaderCodecError::NoMetadata) => println!("No metadata found"),
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        },
    }
    ExitCode::SUCCESS
}
