//! Registry of named file type filters.
//!
//! Extensions are appended in registration order and never removed. The
//! position of an extension is its identifier: registering the `i`-th
//! extension returns the mask `1 << i`, which callers combine into a
//! [`FilterMask`] to select a subset of filters for one dialog.
//!
//! The registry is an ordinary owned value. Registration takes `&mut self`
//! and resolution `&self`, so the borrow checker provides the external
//! serialization the native API requires.

use crate::error::{SelectorError, SelectorResult};
use crate::logging::selector_debug;
use crate::mask::{FilterMask, MAX_FILTERS};

/// A registered file type filter (e.g. "Images" -> `*.jpg;*.png`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    description: String,
    pattern: String,
    default_extension: String,
}

impl Extension {
    /// Display name shown in the picker's type list
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Glob filter, possibly several globs joined by `;`
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Suffix (without dot) appended when the user types a bare name
    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    /// Individual globs of [`pattern`](Self::pattern), trimmed, empty entries skipped.
    pub fn globs(&self) -> impl Iterator<Item = &str> {
        self.pattern
            .split(';')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

/// Handle to a registered extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileExtension {
    index: usize,
}

impl FileExtension {
    /// Position in the registry
    pub fn index(self) -> usize {
        self.index
    }

    /// Single-bit mask selecting this extension
    pub fn mask(self) -> FilterMask {
        FilterMask::from_bits(1u64 << self.index)
    }
}

impl From<FileExtension> for FilterMask {
    fn from(ext: FileExtension) -> Self {
        ext.mask()
    }
}

impl FromIterator<FileExtension> for FilterMask {
    fn from_iter<I: IntoIterator<Item = FileExtension>>(iter: I) -> Self {
        iter.into_iter().map(FileExtension::mask).collect()
    }
}

impl<'a> FromIterator<&'a FileExtension> for FilterMask {
    fn from_iter<I: IntoIterator<Item = &'a FileExtension>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

/// Append-only store of [`Extension`]s addressed by bit position.
#[derive(Clone, Debug, Default)]
pub struct ExtensionRegistry {
    entries: Vec<Extension>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extension at `index`, if registered.
    pub fn get(&self, index: usize) -> Option<&Extension> {
        self.entries.get(index)
    }

    /// Register a filter and return its identifier.
    ///
    /// Fails with [`SelectorError::Capacity`] once [`MAX_FILTERS`] entries exist, and
    /// with [`SelectorError::Allocation`] if the storage cannot grow. Either way the
    /// registry is left unchanged.
    pub fn register(
        &mut self,
        description: impl Into<String>,
        pattern: impl Into<String>,
        default_extension: impl Into<String>,
    ) -> SelectorResult<FileExtension> {
        let index = self.entries.len();
        if index >= MAX_FILTERS {
            return Err(SelectorError::capacity(MAX_FILTERS));
        }

        let ext = Extension {
            description: description.into(),
            pattern: pattern.into(),
            default_extension: default_extension.into(),
        };
        for value in [&ext.description, &ext.pattern, &ext.default_extension] {
            if value.contains('\0') {
                return Err(SelectorError::interior_nul(value.as_str()));
            }
        }

        self.entries
            .try_reserve(1)
            .map_err(|_| SelectorError::allocation())?;
        selector_debug!(
            index,
            description = %ext.description,
            pattern = %ext.pattern,
            "registered file extension"
        );
        self.entries.push(ext);
        Ok(FileExtension { index })
    }

    /// Register a filter from a list of bare extensions (`["jpg", "png"]`).
    ///
    /// The pattern becomes `*.jpg;*.png` and the first entry is the default extension.
    /// Leading dots are stripped.
    pub fn register_file_extension(
        &mut self,
        description: impl Into<String>,
        extensions: &[&str],
    ) -> SelectorResult<FileExtension> {
        let description = description.into();
        let mut normalized = Vec::with_capacity(extensions.len());
        for ext in extensions {
            let ext = ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                return Err(SelectorError::invalid_extension(
                    "each extension must be non-empty",
                ));
            }
            normalized.push(ext);
        }
        let Some(first) = normalized.first().copied() else {
            return Err(SelectorError::invalid_extension(
                "at least one extension is required",
            ));
        };

        let pattern = normalized
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect::<Vec<_>>()
            .join(";");
        self.register(description, pattern, first)
    }

    /// Extensions selected by `mask`, in ascending bit order.
    ///
    /// Bits beyond the current registry size are skipped.
    pub fn resolve(&self, mask: FilterMask) -> Vec<&Extension> {
        mask.iter().filter_map(|i| self.entries.get(i)).collect()
    }

    /// All registered extensions in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Extension> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ExtensionRegistry {
    type Item = &'a Extension;
    type IntoIter = std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
