//! Session object tying a registry to a backend.
//!
//! [`FileSelector`] is what applications hold on to: register filters once,
//! then open as many dialogs as needed. Besides the typed API it offers the
//! token-level surface used by foreign callers, where registrations come back
//! as raw `i64` masks (or a negative sentinel) and results as plain strings.

use std::path::PathBuf;

use crate::backend::{DefaultBackend, DialogBackend, default_backend};
use crate::error::SelectorResult;
use crate::invoker::{DialogOutcome, invoke};
use crate::mask::FilterMask;
use crate::registry::{ExtensionRegistry, FileExtension};
use crate::request::{DialogMode, DialogRequest, SelectorFlags};

/// Registration failed for a reason other than capacity (usually allocation).
pub const REGISTER_FAILED: i64 = -1;
/// The registry already holds the maximum number of extensions.
pub const REGISTER_CAPACITY_EXCEEDED: i64 = -2;

/// File selector session: an owned extension registry plus a dialog backend.
#[derive(Debug, Default)]
pub struct FileSelector<B: DialogBackend = DefaultBackend> {
    registry: ExtensionRegistry,
    backend: B,
}

impl FileSelector<DefaultBackend> {
    /// Create a selector using the platform's default backend.
    pub fn new() -> Self {
        Self::with_backend(default_backend())
    }
}

impl<B: DialogBackend> FileSelector<B> {
    /// Create a selector on a specific backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            registry: ExtensionRegistry::new(),
            backend,
        }
    }

    /// Registered extensions
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Dialog backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Register a filter from a description, glob pattern and default extension.
    pub fn register_extension(
        &mut self,
        description: impl Into<String>,
        pattern: impl Into<String>,
        default_extension: impl Into<String>,
    ) -> SelectorResult<FileExtension> {
        self.registry
            .register(description, pattern, default_extension)
    }

    /// Register a filter from bare extensions, e.g. `("Images", &["jpg", "png"])`.
    pub fn register_file_extension(
        &mut self,
        description: impl Into<String>,
        extensions: &[&str],
    ) -> SelectorResult<FileExtension> {
        self.registry.register_file_extension(description, extensions)
    }

    /// Run a request and report exactly what happened.
    pub fn invoke(&self, request: &DialogRequest) -> DialogOutcome {
        invoke(&self.backend, &self.registry, request)
    }

    /// Pick an existing file accepted by any of `extensions` (none = any file).
    pub fn show_file_open(&self, extensions: &[FileExtension]) -> DialogOutcome {
        self.invoke(&DialogRequest::open_file(
            extensions.iter().collect::<FilterMask>(),
        ))
    }

    /// Pick an existing folder.
    pub fn show_folder_open(&self) -> DialogOutcome {
        self.invoke(&DialogRequest::open_folder())
    }

    /// Choose a save location, optionally enforcing `extension`.
    pub fn show_file_save(
        &self,
        extension: Option<FileExtension>,
        default_name: impl Into<String>,
    ) -> DialogOutcome {
        let mask = extension.map_or(FilterMask::EMPTY, FileExtension::mask);
        self.invoke(&DialogRequest::save_file(mask, Some(default_name.into())))
    }

    /// Token boundary: register and return the single-bit mask, or a negative sentinel.
    ///
    /// Masks are returned as the `u64` bit pattern reinterpreted as `i64`, so the
    /// 64th registration yields `i64::MIN`. Neither sentinel is a single-bit pattern.
    pub fn register_extension_token(
        &mut self,
        description: &str,
        pattern: &str,
        default_extension: &str,
    ) -> i64 {
        match self.register_extension(description, pattern, default_extension) {
            Ok(ext) => ext.mask().bits() as i64,
            Err(err) => err.sentinel(),
        }
    }

    /// Token boundary: open a file restricted to the raw `mask`.
    pub fn show_open_file(&self, mask: u64) -> Option<String> {
        self.show_token(DialogMode::OpenFile.flags(), mask, None)
    }

    /// Token boundary: open a folder.
    pub fn show_open_folder(&self) -> Option<String> {
        self.show_token(DialogMode::OpenFolder.flags(), 0, None)
    }

    /// Token boundary: save a file restricted to the raw `mask`.
    pub fn show_save_file(&self, mask: u64, default_name: &str) -> Option<String> {
        self.show_token(
            DialogMode::SaveFile.flags(),
            mask,
            Some(default_name.to_owned()),
        )
    }

    /// Token boundary: run a request described by raw flags.
    ///
    /// Invalid flags, cancellation and failures all yield `None`.
    pub fn show_token(
        &self,
        flags: SelectorFlags,
        mask: u64,
        default_name: Option<String>,
    ) -> Option<String> {
        let request =
            DialogRequest::from_flags(flags, FilterMask::from_bits(mask), default_name).ok()?;
        self.invoke(&request)
            .into_path()
            .and_then(into_caller_string)
    }
}

fn into_caller_string(path: PathBuf) -> Option<String> {
    path.into_os_string().into_string().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UnsupportedBackend;
    use crate::error::DialogFailure;

    #[test]
    fn token_registration_and_sentinel() {
        let mut selector = FileSelector::with_backend(UnsupportedBackend);
        for i in 0..64 {
            let token = selector.register_extension_token("T", "*.t", "t");
            assert_eq!(token as u64, 1u64 << i);
            assert_ne!(token, REGISTER_FAILED);
            assert_ne!(token, REGISTER_CAPACITY_EXCEEDED);
        }
        assert_eq!(
            selector.register_extension_token("T", "*.t", "t"),
            REGISTER_CAPACITY_EXCEEDED
        );
        assert_eq!(selector.registry().len(), 64);
    }

    #[test]
    fn token_registration_rejects_interior_nul() {
        let mut selector = FileSelector::with_backend(UnsupportedBackend);
        assert_eq!(
            selector.register_extension_token("T\0", "*.t", "t"),
            REGISTER_FAILED
        );
        assert!(selector.registry().is_empty());
    }

    #[test]
    fn unsupported_backend_degrades_to_none() {
        let selector = FileSelector::with_backend(UnsupportedBackend);
        assert_eq!(
            selector.show_folder_open(),
            DialogOutcome::Failed(DialogFailure::Unsupported)
        );
        assert_eq!(selector.show_open_file(0), None);
        assert_eq!(selector.show_save_file(0, "out"), None);
    }

    #[test]
    fn invalid_flags_yield_none() {
        let selector = FileSelector::with_backend(UnsupportedBackend);
        assert_eq!(
            selector.show_token(SelectorFlags::SAVE | SelectorFlags::FOLDERS, 0, None),
            None
        );
    }
}
