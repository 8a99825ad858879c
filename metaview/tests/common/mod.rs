#![allow(dead_code)]
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

pub const LORA_FILE_NAME: &str = "style_lora.safetensors";

pub fn build_container(
    header: &Value,
    payload: &[u8],
) -> Vec<u8> {
    let header = serde_json::to_vec(header).unwrap();
    let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(payload);
    bytes
}

pub fn lora_payload() -> Vec<u8> {
    (0..64u32).flat_map(|i| (i as f32 * 0.25).to_le_bytes()).collect()
}

pub fn lora_container() -> Vec<u8> {
    build_container(
        &json!({
            "__metadata__": {
                "ss_output_name": "style_lora",
                "ss_network_dim": "16",
                "ss_tag_frequency": "{\"style\":{\"portrait\":12,\"landscape\":3}}"
            },
            "lora_unet.down.weight": {"dtype": "F32", "shape": [4, 8], "data_offsets": [0, 128]},
            "lora_unet.up.weight": {"dtype": "F32", "shape": [8, 4], "data_offsets": [128, 256]}
        }),
        &lora_payload(),
    )
}

pub fn bare_container() -> Vec<u8> {
    build_container(
        &json!({"w": {"dtype": "U8", "shape": [4], "data_offsets": [0, 4]}}),
        &[1, 2, 3, 4],
    )
}

pub fn write_file(
    root: &Path,
    relative: &str,
    bytes: &[u8],
) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, bytes).unwrap();
    path
}
