mod common;

use std::path::PathBuf;

use common::{FakeBackend, Script};
use native_file_selector::{
    DialogConfig, DialogFailure, DialogKind, DialogMode, DialogOptions, DialogOutcome,
    DialogRequest, FileSelector, FilterMask, FilterSpec, NativeCall,
};
use pretty_assertions::assert_eq;

#[test]
fn save_dialog_end_to_end() {
    let backend = FakeBackend::new();
    backend
        .push(Script::Cancel)
        .push(Script::select(r"C:\out\photo.jpg"));
    let mut selector = FileSelector::with_backend(&backend);

    let mask = selector.register_extension_token("Images", "*.jpg;*.png", "jpg");
    assert_eq!(mask, 1);

    assert_eq!(selector.show_save_file(mask as u64, "photo"), None);
    assert_eq!(
        backend.last_config(),
        Some(DialogConfig {
            kind: DialogKind::Save,
            options: DialogOptions::STRICT_FILE_TYPES,
            filters: vec![FilterSpec {
                name: "Images".into(),
                spec: "*.jpg;*.png".into(),
            }],
            default_extension: Some("jpg".into()),
            file_name: Some("photo".into()),
        })
    );

    assert_eq!(
        selector.show_save_file(mask as u64, "photo").as_deref(),
        Some(r"C:\out\photo.jpg")
    );
    assert_eq!(backend.allocated.get(), 1);
    assert_eq!(backend.released.get(), 1);
}

#[test]
fn every_invocation_is_bracketed_by_the_subsystem_scope() {
    let backend = FakeBackend::new();
    backend
        .push(Script::select("/tmp/a"))
        .push(Script::Cancel)
        .push(Script::Fail(DialogFailure::native(NativeCall::Show, -1)));
    let selector = FileSelector::with_backend(&backend);

    assert!(selector.show_file_open(&[]).is_selected());
    assert_eq!(selector.show_folder_open(), DialogOutcome::Cancelled);
    assert!(matches!(
        selector.show_file_save(None, "x"),
        DialogOutcome::Failed(DialogFailure::Native {
            call: NativeCall::Show,
            ..
        })
    ));
    assert_eq!(backend.entered.get(), 3);
    assert_eq!(backend.left.get(), 3);
}

#[test]
fn failed_subsystem_entry_never_shows_or_leaves() {
    let backend = FakeBackend::new();
    backend.fail_enter.set(true);
    backend.push(Script::select("/tmp/a"));
    let selector = FileSelector::with_backend(&backend);

    let outcome = selector.show_folder_open();
    assert!(matches!(
        outcome,
        DialogOutcome::Failed(DialogFailure::Native {
            call: NativeCall::Initialize,
            ..
        })
    ));
    assert!(backend.configs.borrow().is_empty());
    assert_eq!(backend.left.get(), 0);
}

#[test]
fn folder_requests_ignore_the_mask() {
    let backend = FakeBackend::new();
    let mut selector = FileSelector::with_backend(&backend);
    selector.register_extension("A", "*.a", "a").unwrap();
    selector.register_extension("B", "*.b", "b").unwrap();

    selector.invoke(&DialogRequest::new(DialogMode::OpenFolder, FilterMask::EMPTY, None));
    selector.invoke(&DialogRequest::new(
        DialogMode::OpenFolder,
        FilterMask::from_bits(3),
        None,
    ));

    let configs = backend.configs.borrow();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0], configs[1]);
    assert_eq!(configs[0].options, DialogOptions::PICK_FOLDERS);
    assert!(configs[0].filters.is_empty());
}

#[test]
fn open_with_several_handles_installs_each_filter() {
    let backend = FakeBackend::new();
    backend.push(Script::select(r"D:\music\track.flac"));
    let mut selector = FileSelector::with_backend(&backend);
    let audio = selector
        .register_file_extension("Audio", &["flac", "mp3"])
        .unwrap();
    let _skipped = selector.register_file_extension("Text", &["txt"]).unwrap();
    let playlists = selector.register_file_extension("Playlists", &["m3u"]).unwrap();

    let outcome = selector.show_file_open(&[playlists, audio]);
    assert_eq!(
        outcome,
        DialogOutcome::Selected(PathBuf::from(r"D:\music\track.flac"))
    );

    let config = backend.last_config().unwrap();
    assert_eq!(config.kind, DialogKind::Open);
    let specs: Vec<&str> = config.filters.iter().map(|f| f.spec.as_str()).collect();
    assert_eq!(specs, vec!["*.flac;*.mp3", "*.m3u"]);
    assert_eq!(config.default_extension.as_deref(), Some("flac"));
    assert_eq!(config.file_name, None);
}

#[test]
fn unconvertible_result_is_released_and_reported() {
    let backend = FakeBackend::new();
    backend.push(Script::Select(vec![0x0043, 0xDC00]));
    backend.push(Script::Select(vec![]));
    let selector = FileSelector::with_backend(&backend);

    assert_eq!(
        selector.show_file_open(&[]),
        DialogOutcome::Failed(DialogFailure::Encoding)
    );
    assert_eq!(selector.show_open_file(0), None);
    assert_eq!(backend.allocated.get(), 2);
    assert_eq!(backend.released.get(), 2);
}

#[test]
fn stale_mask_bits_are_skipped() {
    let backend = FakeBackend::new();
    let mut selector = FileSelector::with_backend(&backend);
    selector.register_extension("A", "*.a", "a").unwrap();

    selector.show_open_file(u64::MAX);
    let config = backend.last_config().unwrap();
    assert_eq!(config.filters.len(), 1);
    assert_eq!(config.filters[0].name, "A");
}
