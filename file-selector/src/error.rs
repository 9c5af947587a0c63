//! Error types for the file selector
//!
//! Registration and request construction report [`SelectorError`]. Native
//! dialog problems are described by [`DialogFailure`] and carried inside
//! [`DialogOutcome::Failed`](crate::DialogOutcome::Failed) instead of being
//! returned as errors, since a failed dialog is never fatal to the caller.

use std::fmt;
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::{error, warn};

/// Result type for registry and request operations
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Errors raised while registering extensions or building requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The registry already holds the maximum number of extensions
    #[error("cannot register more than {max} file extensions")]
    Capacity {
        /// Registry capacity
        max: usize,
    },

    /// Growing the registry storage failed
    #[error("failed to allocate storage for a new file extension")]
    Allocation,

    /// The extension description or patterns are unusable
    #[error("invalid file extension: {reason}")]
    InvalidExtension {
        /// What was wrong
        reason: String,
    },

    /// A string that must cross the native boundary contains a NUL character
    #[error("string contains an interior nul character: {value:?}")]
    InteriorNul {
        /// Offending string
        value: String,
    },

    /// A raw flag combination does not describe a dialog mode
    #[error("invalid dialog flags: {bits:#06b}")]
    InvalidFlags {
        /// Raw flag bits
        bits: u8,
    },
}

impl SelectorError {
    /// Create a capacity error
    pub fn capacity(max: usize) -> Self {
        #[cfg(feature = "tracing")]
        warn!("Extension registry is full ({} entries)", max);
        Self::Capacity { max }
    }

    /// Create an allocation error
    pub fn allocation() -> Self {
        #[cfg(feature = "tracing")]
        error!("Extension registry allocation failed");
        Self::Allocation
    }

    /// Create an invalid extension error
    pub fn invalid_extension(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        warn!("Invalid file extension: {}", reason);
        Self::InvalidExtension { reason }
    }

    /// Create an interior nul error
    pub fn interior_nul(value: impl Into<String>) -> Self {
        Self::InteriorNul {
            value: value.into(),
        }
    }

    /// Sentinel used at the token boundary: `-2` for capacity, `-1` for everything else.
    pub fn sentinel(&self) -> i64 {
        match self {
            Self::Capacity { .. } => -2,
            _ => -1,
        }
    }
}

/// Native call that can fail while showing a dialog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeCall {
    /// Per-thread subsystem initialization
    Initialize,
    /// Dialog object creation
    CreateInstance,
    /// Reading the current dialog options
    GetOptions,
    /// Writing dialog options
    SetOptions,
    /// Installing the file type filters
    SetFileTypes,
    /// Installing the default extension
    SetDefaultExtension,
    /// Installing the default file name
    SetFileName,
    /// Showing the modal dialog
    Show,
    /// Fetching the selected item
    GetResult,
    /// Reading the selected item's file system path
    GetDisplayName,
}

impl fmt::Display for NativeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::CreateInstance => "create instance",
            Self::GetOptions => "get options",
            Self::SetOptions => "set options",
            Self::SetFileTypes => "set file types",
            Self::SetDefaultExtension => "set default extension",
            Self::SetFileName => "set file name",
            Self::Show => "show",
            Self::GetResult => "get result",
            Self::GetDisplayName => "get display name",
        };
        f.write_str(name)
    }
}

/// Reasons a dialog invocation produced no path other than user cancellation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogFailure {
    /// A native call reported failure; `code` is the platform status (an `HRESULT` on Windows)
    #[error("native dialog call `{call}` failed with code {code:#010x}")]
    Native {
        /// Failing call
        call: NativeCall,
        /// Platform status code
        code: i32,
    },

    /// The returned path buffer was empty or not valid UTF-16
    #[error("selected path could not be converted")]
    Encoding,

    /// No native dialog backend is available on this platform/build
    #[error("no native dialog backend available")]
    Unsupported,
}

impl DialogFailure {
    /// Create a native call failure. Not logged here; [`invoke`](crate::invoke)
    /// reports failed outcomes.
    pub const fn native(call: NativeCall, code: i32) -> Self {
        Self::Native { call, code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_distinct() {
        assert_eq!(SelectorError::capacity(64).sentinel(), -2);
        assert_eq!(SelectorError::allocation().sentinel(), -1);
        assert_eq!(SelectorError::invalid_extension("empty").sentinel(), -1);
    }

    #[test]
    fn failure_message_names_the_call() {
        let err = DialogFailure::native(NativeCall::Show, 0x8000_4005u32 as i32);
        assert!(err.to_string().contains("`show`"));
        assert!(err.to_string().contains("0x80004005"));
    }

    #[test]
    fn native_failure_builds_in_const_context() {
        const SHOW_FAILED: DialogFailure = DialogFailure::native(NativeCall::Show, -1);
        assert_eq!(
            SHOW_FAILED,
            DialogFailure::Native {
                call: NativeCall::Show,
                code: -1
            }
        );
    }
}
