mod common;

use metaview::{Library, LibraryError, ModelFormat};
use tempfile::TempDir;

use crate::common::{bare_container, lora_container, write_file};

fn populated_library() -> (TempDir, Library) {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "zeta.safetensors", &lora_container());
    write_file(dir.path(), "loras/Alpha.SAFETENSORS", &bare_container());
    write_file(dir.path(), "llm/mid-q4_k.gguf", b"GGUF\x03\x00\x00\x00");
    write_file(dir.path(), "llm/readme.md", b"not a model");
    let library = Library::open(dir.path()).expect("library");
    (dir, library)
}

#[test]
fn test_open_rejects_missing_and_non_directories() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "file.txt", b"x");

    assert!(matches!(
        Library::open(dir.path().join("missing")),
        Err(LibraryError::DirectoryNotFound(_))
    ));
    assert!(matches!(
        Library::open(&file),
        Err(LibraryError::NotADirectory(_))
    ));
}

#[test]
fn test_list_walks_recursively_and_sorts_by_name() {
    let (_dir, library) = populated_library();

    let files = library.list().unwrap();
    let names: Vec<_> = files.iter().map(|file| file.name.as_str()).collect();
    let relative: Vec<_> =
        files.iter().map(|file| file.relative_path.as_str()).collect();

    assert_eq!(
        names,
        vec!["Alpha.SAFETENSORS", "mid-q4_k.gguf", "zeta.safetensors"]
    );
    assert_eq!(
        relative,
        vec![
            "loras/Alpha.SAFETENSORS",
            "llm/mid-q4_k.gguf",
            "zeta.safetensors"
        ]
    );
    assert_eq!(files[1].format, ModelFormat::Gguf);
    assert_eq!(files[2].size, lora_container().len() as u64);
    assert!(files[2].modified > 0.0);
}

#[test]
fn test_list_fails_when_root_disappears() {
    let (dir, library) = populated_library();
    std::fs::remove_dir_all(dir.path()).unwrap();
    assert!(matches!(
        library.list(),
        Err(LibraryError::DirectoryNotFound(_))
    ));
}

#[test]
fn test_resolve_stays_inside_root() {
    let (_dir, library) = populated_library();

    let resolved = library.resolve("loras/./Alpha.SAFETENSORS").unwrap();
    assert!(resolved.starts_with(library.root()));
    assert!(resolved.is_file());

    let resolved = library.resolve("loras/../zeta.safetensors").unwrap();
    assert_eq!(resolved, library.root().join("zeta.safetensors"));
}

#[test]
fn test_resolve_rejects_escapes() {
    let (_dir, library) = populated_library();

    for relative in [
        "../outside.safetensors",
        "loras/../../outside.safetensors",
        "llm/../../../etc/passwd",
        "/etc/passwd",
    ] {
        assert!(
            matches!(
                library.resolve(relative),
                Err(LibraryError::AccessDenied(_))
            ),
            "resolved {relative}"
        );
    }
}

#[cfg(unix)]
#[test]
fn test_resolve_rejects_symlinks_leaving_root() {
    let outside = TempDir::new().unwrap();
    let target = write_file(outside.path(), "secret.safetensors", &bare_container());
    let (dir, library) = populated_library();
    std::os::unix::fs::symlink(&target, dir.path().join("link.safetensors"))
        .unwrap();

    assert!(matches!(
        library.resolve("link.safetensors"),
        Err(LibraryError::AccessDenied(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_list_follows_symlinks_inside_root() {
    let outside = TempDir::new().unwrap();
    let secret = write_file(outside.path(), "secret.safetensors", &bare_container());
    let (dir, library) = populated_library();
    std::os::unix::fs::symlink(
        dir.path().join("zeta.safetensors"),
        dir.path().join("linked.safetensors"),
    )
    .unwrap();
    std::os::unix::fs::symlink(&secret, dir.path().join("secret.safetensors"))
        .unwrap();

    let names: Vec<_> = library
        .list()
        .unwrap()
        .into_iter()
        .map(|file| file.name)
        .collect();

    assert!(names.contains(&"linked.safetensors".to_string()));
    assert!(!names.contains(&"secret.safetensors".to_string()));
    let (_, info) = library.file("linked.safetensors").unwrap();
    assert_eq!(info.size, lora_container().len() as u64);
}

#[test]
fn test_file_requires_existing_compatible_file() {
    let (_dir, library) = populated_library();

    let (path, info) = library.file("zeta.safetensors").unwrap();
    assert_eq!(info.relative_path, "zeta.safetensors");
    assert!(path.is_file());

    assert!(matches!(
        library.file("missing.safetensors"),
        Err(LibraryError::FileNotFound(_))
    ));
    assert!(matches!(
        library.file("llm"),
        Err(LibraryError::FileNotFound(_))
    ));
    assert!(matches!(
        library.file("llm/readme.md"),
        Err(LibraryError::UnsupportedFormat(_))
    ));
}
