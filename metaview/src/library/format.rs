use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Safetensors,
    /// Listed and served, never parsed.
    Gguf,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 2] = [ModelFormat::Safetensors, ModelFormat::Gguf];

    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Safetensors => ".safetensors",
            ModelFormat::Gguf => ".gguf",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|format| name.ends_with(format.extension()))
    }

    pub fn has_metadata(&self) -> bool {
        matches!(self, ModelFormat::Safetensors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        let cases = [
            ("model.safetensors", Some(ModelFormat::Safetensors)),
            ("dir/Style.SafeTensors", Some(ModelFormat::Safetensors)),
            ("llama-q4.GGUF", Some(ModelFormat::Gguf)),
            ("notes.txt", None),
            ("safetensors", None),
            (".gguf", Some(ModelFormat::Gguf)),
        ];
        for (path, expected) in cases {
            assert_eq!(ModelFormat::from_path(Path::new(path)), expected, "{path}");
        }
    }
}
