//! Dialog requests and native configuration composition.
//!
//! A [`DialogRequest`] says *what* the caller wants (mode, filters, default
//! name). [`DialogConfig::compose`] turns it into *how* the native dialog must
//! be configured, given the current [`ExtensionRegistry`]. Composition is pure
//! so it can be tested without showing anything.

use bitflags::bitflags;

use crate::error::{SelectorError, SelectorResult};
use crate::logging::selector_trace;
use crate::mask::FilterMask;
use crate::registry::ExtensionRegistry;

bitflags! {
    /// Raw intent flags as exchanged with the token boundary.
    ///
    /// Two independent axes: `SAVE`/`OPEN` and `FILES`/`FOLDERS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct SelectorFlags: u8 {
        /// Show a save dialog
        const SAVE = 2;
        /// Show an open dialog
        const OPEN = 4;
        /// Select files
        const FILES = 8;
        /// Select folders
        const FOLDERS = 16;
    }
}

bitflags! {
    /// Options applied to the native dialog.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[repr(transparent)]
    pub struct DialogOptions: u32 {
        /// Pick folders instead of files
        const PICK_FOLDERS = 1 << 0;
        /// Refuse results outside the declared filters
        const STRICT_FILE_TYPES = 1 << 1;
    }
}

/// Dialog mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogMode {
    /// Pick an existing file
    OpenFile,
    /// Pick an existing folder
    OpenFolder,
    /// Choose a location to save a file
    SaveFile,
}

impl DialogMode {
    /// Decode a raw flag combination.
    ///
    /// Exactly one of `SAVE`/`OPEN` must be set. `OPEN | FOLDERS` is a folder
    /// picker and any `FILES` bit is ignored; otherwise exactly one of
    /// `FILES`/`FOLDERS` must be set and saving folders is not a thing.
    pub fn from_flags(flags: SelectorFlags) -> SelectorResult<Self> {
        let invalid = || SelectorError::InvalidFlags { bits: flags.bits() };
        let save = flags.contains(SelectorFlags::SAVE);
        let open = flags.contains(SelectorFlags::OPEN);
        let files = flags.contains(SelectorFlags::FILES);
        let folders = flags.contains(SelectorFlags::FOLDERS);

        match (save, open) {
            (false, true) if folders => Ok(Self::OpenFolder),
            (false, true) if files => Ok(Self::OpenFile),
            (true, false) if files && !folders => Ok(Self::SaveFile),
            _ => Err(invalid()),
        }
    }

    /// Canonical flag combination for this mode.
    pub fn flags(self) -> SelectorFlags {
        match self {
            Self::OpenFile => SelectorFlags::OPEN | SelectorFlags::FILES,
            Self::OpenFolder => SelectorFlags::OPEN | SelectorFlags::FOLDERS,
            Self::SaveFile => SelectorFlags::SAVE | SelectorFlags::FILES,
        }
    }

    /// Returns `true` for [`DialogMode::SaveFile`].
    pub fn is_save(self) -> bool {
        matches!(self, Self::SaveFile)
    }
}

/// Immutable description of one picker invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogRequest {
    mode: DialogMode,
    mask: FilterMask,
    default_name: Option<String>,
}

impl DialogRequest {
    /// Create a request. `default_name` is dropped unless `mode` is [`DialogMode::SaveFile`].
    pub fn new(mode: DialogMode, mask: FilterMask, default_name: Option<String>) -> Self {
        Self {
            mode,
            mask,
            default_name: default_name.filter(|_| mode.is_save()),
        }
    }

    /// Open a single existing file, restricted to `mask` (empty = any file).
    pub fn open_file(mask: impl Into<FilterMask>) -> Self {
        Self::new(DialogMode::OpenFile, mask.into(), None)
    }

    /// Open a folder. Folder pickers take no filters.
    pub fn open_folder() -> Self {
        Self::new(DialogMode::OpenFolder, FilterMask::EMPTY, None)
    }

    /// Save a file, restricted to `mask`, suggesting `default_name`.
    pub fn save_file(mask: impl Into<FilterMask>, default_name: Option<String>) -> Self {
        Self::new(DialogMode::SaveFile, mask.into(), default_name)
    }

    /// Build from raw boundary flags.
    pub fn from_flags(
        flags: SelectorFlags,
        mask: FilterMask,
        default_name: Option<String>,
    ) -> SelectorResult<Self> {
        Ok(Self::new(DialogMode::from_flags(flags)?, mask, default_name))
    }

    /// Requested mode
    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    /// Requested filters
    pub fn mask(&self) -> FilterMask {
        self.mask
    }

    /// Suggested file name (save dialogs only)
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }
}

/// Which native dialog class to instantiate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogKind {
    /// File open dialog (also used to pick folders)
    Open,
    /// File save dialog
    Save,
}

/// One entry of the native filter list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    /// Display name
    pub name: String,
    /// `;`-separated globs
    pub spec: String,
}

/// Fully composed native dialog configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogConfig {
    /// Dialog class
    pub kind: DialogKind,
    /// Options to add on top of the dialog's defaults
    pub options: DialogOptions,
    /// File type filters; empty means "no filtering" and nothing is installed
    pub filters: Vec<FilterSpec>,
    /// Default extension hint, from the first filter
    pub default_extension: Option<String>,
    /// Suggested file name
    pub file_name: Option<String>,
}

impl DialogConfig {
    /// Compose the native configuration for `request` against `registry`.
    pub fn compose(request: &DialogRequest, registry: &ExtensionRegistry) -> Self {
        let mode = request.mode();
        let kind = if mode.is_save() {
            DialogKind::Save
        } else {
            DialogKind::Open
        };

        let mut options = DialogOptions::empty();
        let mut filters = Vec::new();
        let mut default_extension = None;

        if mode == DialogMode::OpenFolder {
            options |= DialogOptions::PICK_FOLDERS;
        } else {
            let resolved = registry.resolve(request.mask());
            if let Some(first) = resolved.first() {
                options |= DialogOptions::STRICT_FILE_TYPES;
                default_extension = Some(first.default_extension().to_owned());
            }
            filters = resolved
                .into_iter()
                .map(|ext| FilterSpec {
                    name: ext.description().to_owned(),
                    spec: ext.pattern().to_owned(),
                })
                .collect();
        }

        let config = Self {
            kind,
            options,
            filters,
            default_extension,
            file_name: request.default_name().map(str::to_owned),
        };
        selector_trace!(?mode, ?config, "composed dialog configuration");
        config
    }
}
