//! Dialog invocation.
//!
//! [`invoke`] runs one modal dialog: enter the backend's subsystem, compose
//! the configuration, show, and marshal the result. The subsystem scope and
//! the native path buffer are both released by `Drop`, so every early return
//! below is leak-free.

use std::path::PathBuf;

use crate::backend::{DialogBackend, SubsystemScope};
use crate::error::DialogFailure;
use crate::registry::ExtensionRegistry;
use crate::request::{DialogConfig, DialogRequest};
use crate::wide::to_caller_string;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Result of one dialog invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The user picked this absolute path
    Selected(PathBuf),
    /// The user dismissed the dialog
    Cancelled,
    /// The dialog could not be shown or its result could not be read
    Failed(DialogFailure),
}

impl DialogOutcome {
    /// Selected path, collapsing cancellation and failure into `None`.
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Selected(path) => Some(path),
            Self::Cancelled | Self::Failed(_) => None,
        }
    }

    /// Returns `true` if a path was selected.
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }

    /// Convert to a `Result`, treating cancellation as `Ok(None)`.
    pub fn into_result(self) -> Result<Option<PathBuf>, DialogFailure> {
        match self {
            Self::Selected(path) => Ok(Some(path)),
            Self::Cancelled => Ok(None),
            Self::Failed(failure) => Err(failure),
        }
    }
}

impl From<Result<Option<PathBuf>, DialogFailure>> for DialogOutcome {
    fn from(value: Result<Option<PathBuf>, DialogFailure>) -> Self {
        match value {
            Ok(Some(path)) => Self::Selected(path),
            Ok(None) => Self::Cancelled,
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// Show the dialog described by `request` and wait for the user.
pub fn invoke<B>(backend: &B, registry: &ExtensionRegistry, request: &DialogRequest) -> DialogOutcome
where
    B: DialogBackend + ?Sized,
{
    let outcome = DialogOutcome::from(run(backend, registry, request));
    #[cfg(feature = "tracing")]
    match &outcome {
        DialogOutcome::Selected(path) => debug!(?path, "dialog selection"),
        DialogOutcome::Cancelled => debug!(mode = ?request.mode(), "dialog cancelled"),
        DialogOutcome::Failed(failure) => warn!(%failure, "dialog failed"),
    }
    outcome
}

fn run<B>(
    backend: &B,
    registry: &ExtensionRegistry,
    request: &DialogRequest,
) -> Result<Option<PathBuf>, DialogFailure>
where
    B: DialogBackend + ?Sized,
{
    let scope = SubsystemScope::enter(backend)?;
    let config = DialogConfig::compose(request, registry);
    let Some(native) = scope.backend().show(&config)? else {
        return Ok(None);
    };
    let path = to_caller_string(Some(native)).ok_or(DialogFailure::Encoding)?;
    Ok(Some(PathBuf::from(path)))
}
