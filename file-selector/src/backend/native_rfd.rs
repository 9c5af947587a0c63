//! Portable native backend (rfd).
//!
//! Shows the OS dialog through the `rfd` crate (GTK / xdg-portal on Linux,
//! AppKit on macOS). Notes
//! - Filters map to `rfd::FileDialog::add_filter`, which only understands
//!   plain extensions. Globs such as `*.jpg` are reduced to `jpg`; anything
//!   more complex (`data_??.bin`) is dropped from the filter.
//! - `rfd` has no default-extension switch. Save dialogs append the default
//!   extension themselves, to the pre-filled name and to the returned path,
//!   unless the name already ends in one of the filters' extensions.
//! - There is no strict-file-type switch either; it is only logged.
//! - `rfd` needs no per-thread initialization, so `enter`/`leave` are no-ops.

use std::path::{Path, PathBuf};

use crate::backend::DialogBackend;
use crate::error::DialogFailure;
use crate::logging::{selector_debug, selector_trace};
use crate::request::{DialogConfig, DialogKind, DialogOptions, FilterSpec};
use crate::wide::{HeapRelease, NativeWideString};

/// Dialog backend built on `rfd::FileDialog`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RfdBackend;

impl RfdBackend {
    fn to_rfd(config: &DialogConfig) -> ::rfd::FileDialog {
        let mut d = ::rfd::FileDialog::new();
        if let Some(name) = &config.file_name {
            let name = match config.kind {
                DialogKind::Save => with_default_extension(
                    name,
                    config.default_extension.as_deref(),
                    &config.filters,
                ),
                DialogKind::Open => name.clone(),
            };
            d = d.set_file_name(name);
        }
        for f in &config.filters {
            let exts_owned = filter_extensions(f);
            let exts: Vec<&str> = exts_owned.iter().map(|s| s.as_str()).collect();
            if !exts.is_empty() {
                d = d.add_filter(&f.name, &exts);
            }
        }
        if config.options.contains(DialogOptions::STRICT_FILE_TYPES) {
            selector_debug!(
                default_extension = ?config.default_extension,
                "rfd cannot enforce strict file types"
            );
        }
        d
    }
}

impl DialogBackend for RfdBackend {
    type Release = HeapRelease;

    fn enter(&self) -> Result<(), DialogFailure> {
        Ok(())
    }

    fn leave(&self) {}

    fn show(
        &self,
        config: &DialogConfig,
    ) -> Result<Option<NativeWideString<HeapRelease>>, DialogFailure> {
        selector_trace!(?config.kind, ?config.options, "rfd blocking open");
        let dialog = Self::to_rfd(config);
        let picked: Option<PathBuf> = match config.kind {
            DialogKind::Save => dialog.save_file(),
            DialogKind::Open if config.options.contains(DialogOptions::PICK_FOLDERS) => {
                dialog.pick_folder()
            }
            DialogKind::Open => dialog.pick_file(),
        };
        let Some(mut path) = picked else {
            return Ok(None);
        };
        if config.kind == DialogKind::Save {
            path = saved_path(path, config);
        }
        let path = path.to_str().ok_or(DialogFailure::Encoding)?;
        Ok(Some(NativeWideString::from_str_heap(path)))
    }
}

/// Apply the default extension to the file name component of a chosen save path.
fn saved_path(path: PathBuf, config: &DialogConfig) -> PathBuf {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path;
    };
    let named = with_default_extension(
        name,
        config.default_extension.as_deref(),
        &config.filters,
    );
    if named == name {
        return path;
    }
    selector_trace!(%named, "appending default extension");
    path.with_file_name(named)
}

/// Append `.{default_extension}` to `name` unless it already ends in the
/// default extension or any plain extension of `filters` (case-insensitive).
fn with_default_extension(
    name: &str,
    default_extension: Option<&str>,
    filters: &[FilterSpec],
) -> String {
    let ext = default_extension
        .map(|e| e.trim().trim_start_matches('.'))
        .unwrap_or_default();
    if name.is_empty() || ext.is_empty() {
        return name.to_owned();
    }
    let current = match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(current) => current.to_lowercase(),
        None => return format!("{name}.{ext}"),
    };
    let allowed = current == ext.to_lowercase()
        || filters
            .iter()
            .flat_map(filter_extensions)
            .any(|e| e == current);
    if allowed {
        name.to_owned()
    } else {
        format!("{name}.{ext}")
    }
}

fn filter_extensions(filter: &FilterSpec) -> Vec<String> {
    filter
        .spec
        .split(';')
        .filter_map(plain_extension_for_native)
        .collect()
}

fn is_plain_extension_token(token: &str) -> bool {
    let t = token.trim().trim_start_matches("*.");
    !t.is_empty() && !(t.contains('*') || t.contains('?'))
}

fn plain_extension_for_native(token: &str) -> Option<String> {
    if !is_plain_extension_token(token) {
        return None;
    }
    let t = token.trim().trim_start_matches('*').trim_start_matches('.');
    if t.is_empty() {
        return None;
    }
    Some(t.to_lowercase())
}
