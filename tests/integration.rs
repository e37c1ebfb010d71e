use std::fs;
use std::path::{Path, PathBuf};

use rax_notes::NoteResolver;
use rax_notes::content::{ContentGate, MAX_NOTE_SIZE};
use rax_notes::error::ErrorKind;
use rax_notes::notes::Resolution;
use rax_notes::storage::{LocalStorage, PathSanitizer, SanitizerOptions};
use tempfile::TempDir;

const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\xff\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x00;";

struct Fixture {
    // Keeps the temp directory alive; notes live one level down so escapes
    // would be visible next to them.
    tmp: TempDir,
    resolver: NoteResolver<LocalStorage>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_options(SanitizerOptions::default())
    }

    fn with_options(options: SanitizerOptions) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("notes");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("todo"), "Buy red socks").unwrap();
        fs::write(root.join(".htpasswd"), "admin:secret").unwrap();
        fs::write(root.join("pixel.gif"), GIF).unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("note"), "nested").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git").join("config"), "[core]").unwrap();

        let resolver = NoteResolver::new(
            LocalStorage::new(&root),
            PathSanitizer::new(options),
            ContentGate::default(),
        );
        Self { tmp, resolver }
    }

    fn root(&self) -> PathBuf {
        self.tmp.path().join("notes")
    }

    fn outside(&self) -> &Path {
        self.tmp.path()
    }
}

fn error_kind<T: std::fmt::Debug>(result: Result<T, rax_notes::error::NoteError>) -> ErrorKind {
    result.unwrap_err().kind()
}

#[test]
fn test_existing_note_opens() {
    let fx = Fixture::new();
    match fx.resolver.resolve("todo").unwrap() {
        Resolution::Note(note) => {
            assert_eq!(note.content, b"Buy red socks");
            assert_eq!(note.filename(), "todo");
            assert!(note.modified.is_some());
        }
        other => panic!("expected note, got {:?}", other),
    }
}

#[test]
fn test_missing_note_is_new() {
    let fx = Fixture::new();
    match fx.resolver.resolve("ideas/later").unwrap() {
        Resolution::NewNote(note) => {
            assert!(note.content.is_empty());
            assert_eq!(note.path.as_str(), "ideas/later");
        }
        other => panic!("expected new note, got {:?}", other),
    }
    assert!(!fx.root().join("ideas").exists());
}

#[test]
fn test_save_then_resolve_round_trip() {
    let fx = Fixture::new();
    let saved = fx.resolver.save("journal/2024/monday", "Dear diary".as_bytes()).unwrap();
    assert_eq!(saved.as_str(), "journal/2024/monday");
    assert_eq!(
        fs::read_to_string(fx.root().join("journal/2024/monday")).unwrap(),
        "Dear diary"
    );

    match fx.resolver.resolve("/journal/2024/monday").unwrap() {
        Resolution::Note(note) => assert_eq!(note.text(), "Dear diary"),
        other => panic!("expected note, got {:?}", other),
    }
}

#[test]
fn test_save_is_idempotent() {
    let fx = Fixture::new();
    fx.resolver.save("todo", "Buy blue socks".as_bytes()).unwrap();
    fx.resolver.save("todo", "Buy blue socks".as_bytes()).unwrap();
    assert_eq!(fs::read_to_string(fx.root().join("todo")).unwrap(), "Buy blue socks");
}

#[test]
fn test_empty_save_truncates() {
    let fx = Fixture::new();
    fx.resolver.save("todo", &b""[..]).unwrap();
    assert_eq!(fs::read(fx.root().join("todo")).unwrap(), b"");
}

#[test]
fn test_traversal_is_refused() {
    let fx = Fixture::new();
    for raw in ["../escape", "sub/../../escape", "/../escape", "sub/../../../escape"] {
        assert_eq!(error_kind(fx.resolver.resolve(raw)), ErrorKind::InvalidPath, "{}", raw);
        assert_eq!(
            error_kind(fx.resolver.save(raw, "pwned".as_bytes())),
            ErrorKind::InvalidPath,
            "{}",
            raw
        );
    }
    assert!(!fx.outside().join("escape").exists());
}

#[test]
fn test_dot_segments_inside_root_are_cleaned() {
    let fx = Fixture::new();
    match fx.resolver.resolve("sub/../todo").unwrap() {
        Resolution::Note(note) => assert_eq!(note.path.as_str(), "todo"),
        other => panic!("expected note, got {:?}", other),
    }
}

#[test]
fn test_hidden_entries_are_opaque() {
    let fx = Fixture::new();

    for raw in [".htpasswd", ".git", ".git/config", "sub/.hidden"] {
        assert_eq!(error_kind(fx.resolver.resolve(raw)), ErrorKind::InvalidPath, "{}", raw);
    }
    assert_eq!(
        error_kind(fx.resolver.save(".htpasswd", "admin:owned".as_bytes())),
        ErrorKind::InvalidPath
    );
    assert_eq!(
        fs::read_to_string(fx.root().join(".htpasswd")).unwrap(),
        "admin:secret"
    );

    match fx.resolver.index().unwrap() {
        Resolution::Browse(view) => {
            assert!(view.path.is_none());
            assert_eq!(view.names(), vec!["pixel.gif", "sub", "todo"]);
        }
        other => panic!("expected listing, got {:?}", other),
    }
}

#[test]
fn test_hidden_leaf_can_be_allowed() {
    let fx = Fixture::with_options(SanitizerOptions {
        hidden_leaf_addressable: true,
        ..SanitizerOptions::default()
    });

    fx.resolver.save("sub/.draft", "wip".as_bytes()).unwrap();
    assert!(matches!(fx.resolver.resolve("sub/.draft").unwrap(), Resolution::Note(_)));
    assert_eq!(error_kind(fx.resolver.resolve(".git/config")), ErrorKind::InvalidPath);

    match fx.resolver.resolve("sub").unwrap() {
        Resolution::Browse(view) => assert_eq!(view.names(), vec!["note"]),
        other => panic!("expected listing, got {:?}", other),
    }
}

#[test]
fn test_binary_note_is_refused() {
    let fx = Fixture::new();
    match fx.resolver.resolve("pixel.gif") {
        Err(e) => assert_eq!(e.kind(), ErrorKind::UnsupportedType),
        Ok(other) => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_binary_save_leaves_storage_untouched() {
    let fx = Fixture::new();
    assert_eq!(error_kind(fx.resolver.save("todo", GIF)), ErrorKind::UnsupportedType);
    assert_eq!(error_kind(fx.resolver.save("fresh/img", GIF)), ErrorKind::UnsupportedType);

    assert_eq!(fs::read_to_string(fx.root().join("todo")).unwrap(), "Buy red socks");
    assert!(!fx.root().join("fresh").exists());
}

#[test]
fn test_size_ceiling() {
    let fx = Fixture::new();
    let limit = MAX_NOTE_SIZE as usize;

    let exact = vec![b'a'; limit];
    fx.resolver.save("big", exact.as_slice()).unwrap();
    assert!(matches!(fx.resolver.resolve("big").unwrap(), Resolution::Note(_)));

    let over = vec![b'a'; limit + 1];
    assert_eq!(error_kind(fx.resolver.save("bigger", over.as_slice())), ErrorKind::TooLarge);
    assert!(!fx.root().join("bigger").exists());

    fs::write(fx.root().join("huge"), &over).unwrap();
    assert_eq!(error_kind(fx.resolver.resolve("huge")), ErrorKind::TooLarge);
}

#[test]
fn test_directory_is_browsed_not_overwritten() {
    let fx = Fixture::new();

    match fx.resolver.resolve("sub").unwrap() {
        Resolution::Browse(view) => {
            assert_eq!(view.path.as_ref().map(|p| p.as_str()), Some("sub"));
            assert_eq!(view.entries.len(), 1);
            assert_eq!(view.entries[0].path.as_str(), "sub/note");
            assert_eq!(view.entries[0].size, Some(6));
        }
        other => panic!("expected listing, got {:?}", other),
    }

    assert_eq!(
        error_kind(fx.resolver.save("sub", "flatten".as_bytes())),
        ErrorKind::IsDirectory
    );
    assert!(fx.root().join("sub").is_dir());
}

#[test]
fn test_root_is_never_a_note() {
    let fx = Fixture::new();
    for raw in ["", "/", ".", "sub/..", "//"] {
        assert_eq!(error_kind(fx.resolver.resolve(raw)), ErrorKind::InvalidPath, "{}", raw);
        assert_eq!(
            error_kind(fx.resolver.save(raw, "x".as_bytes())),
            ErrorKind::InvalidPath,
            "{}",
            raw
        );
    }
    assert!(fx.root().is_dir());
}

#[test]
fn test_file_used_as_directory() {
    let fx = Fixture::new();
    assert_eq!(
        error_kind(fx.resolver.resolve("todo/inner")),
        ErrorKind::NotFound
    );
    assert!(fx.resolver.save("todo/inner", "x".as_bytes()).is_err());
    assert_eq!(fs::read_to_string(fx.root().join("todo")).unwrap(), "Buy red socks");
}
