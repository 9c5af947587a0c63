#![deny(missing_docs)]
//! Native file and folder selection dialogs.
//!
//! Three operations are exposed: open a file, open a folder, save a file. Each
//! shows the operating system's modal picker and blocks until the user picks
//! something or cancels. File type filters are declared up front in an
//! [`ExtensionRegistry`]; every registration gets a bit position, and a
//! [`FilterMask`] selects which registered filters apply to a given dialog.
//!
//! ```no_run
//! use native_file_selector::{DialogOutcome, FileSelector};
//!
//! let mut selector = FileSelector::new();
//! let images = selector.register_extension("Images", "*.jpg;*.png", "jpg")?;
//! match selector.show_file_save(Some(images), "photo") {
//!     DialogOutcome::Selected(path) => println!("saving to {}", path.display()),
//!     DialogOutcome::Cancelled => {}
//!     DialogOutcome::Failed(err) => eprintln!("dialog failed: {err}"),
//! }
//! # Ok::<(), native_file_selector::SelectorError>(())
//! ```
//!
//! Backends:
//! - Windows: the Common Item Dialog (`IFileDialog`) via the `windows` crate
//! - Elsewhere, with `native-rfd` (default): `rfd`, without strict filtering

pub mod backend;
mod error;
mod invoker;
pub mod logging;
mod mask;
mod registry;
mod request;
mod selector;
pub mod wide;

pub use backend::{
    DefaultBackend, DialogBackend, SubsystemScope, UnsupportedBackend, default_backend,
};
pub use error::{DialogFailure, NativeCall, SelectorError, SelectorResult};
pub use invoker::{DialogOutcome, invoke};
pub use mask::{FilterMask, Indices, MAX_FILTERS};
pub use registry::{Extension, ExtensionRegistry, FileExtension};
pub use request::{
    DialogConfig, DialogKind, DialogMode, DialogOptions, DialogRequest, FilterSpec, SelectorFlags,
};
pub use selector::{FileSelector, REGISTER_CAPACITY_EXCEEDED, REGISTER_FAILED};
