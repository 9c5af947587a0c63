//! Native dialog backends.
//!
//! A [`DialogBackend`] owns the platform specifics: entering the per-thread
//! dialog subsystem, instantiating and configuring the dialog from a
//! [`DialogConfig`], and handing back the selected path as a native-owned
//! [`NativeWideString`]. The invoker only ever talks to this trait.

use crate::error::DialogFailure;
use crate::logging::selector_trace;
use crate::request::DialogConfig;
use crate::wide::{NativeWideString, WideRelease};

#[cfg(windows)]
mod com;
#[cfg(feature = "native-rfd")]
mod native_rfd;

#[cfg(windows)]
pub use com::ComBackend;
#[cfg(feature = "native-rfd")]
pub use native_rfd::RfdBackend;

/// Platform dialog subsystem.
pub trait DialogBackend {
    /// Deallocator for path buffers returned by [`show`](Self::show).
    type Release: WideRelease;

    /// Enter the dialog subsystem on the current thread.
    ///
    /// Only called through [`SubsystemScope::enter`]; a successful call is always
    /// paired with exactly one [`leave`](Self::leave).
    fn enter(&self) -> Result<(), DialogFailure>;

    /// Leave the dialog subsystem on the current thread.
    fn leave(&self);

    /// Show one modal dialog configured by `config`.
    ///
    /// `Ok(None)` means the user cancelled.
    fn show(
        &self,
        config: &DialogConfig,
    ) -> Result<Option<NativeWideString<Self::Release>>, DialogFailure>;
}

impl<B: DialogBackend + ?Sized> DialogBackend for &B {
    type Release = B::Release;

    fn enter(&self) -> Result<(), DialogFailure> {
        (**self).enter()
    }

    fn leave(&self) {
        (**self).leave()
    }

    fn show(
        &self,
        config: &DialogConfig,
    ) -> Result<Option<NativeWideString<Self::Release>>, DialogFailure> {
        (**self).show(config)
    }
}

/// Guard that keeps the dialog subsystem entered and leaves it on drop.
#[must_use = "the subsystem is left as soon as the scope is dropped"]
pub struct SubsystemScope<'a, B: DialogBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: DialogBackend + ?Sized> SubsystemScope<'a, B> {
    /// Enter the subsystem. On error nothing needs to be released.
    pub fn enter(backend: &'a B) -> Result<Self, DialogFailure> {
        backend.enter()?;
        selector_trace!("entered dialog subsystem");
        Ok(Self { backend })
    }

    /// Backend this scope was entered on.
    pub fn backend(&self) -> &'a B {
        self.backend
    }
}

impl<B: DialogBackend + ?Sized> Drop for SubsystemScope<'_, B> {
    fn drop(&mut self) {
        self.backend.leave();
        selector_trace!("left dialog subsystem");
    }
}

/// Backend used when no native dialog is compiled in.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedBackend;

impl DialogBackend for UnsupportedBackend {
    type Release = crate::wide::HeapRelease;

    fn enter(&self) -> Result<(), DialogFailure> {
        Err(DialogFailure::Unsupported)
    }

    fn leave(&self) {}

    fn show(
        &self,
        _config: &DialogConfig,
    ) -> Result<Option<NativeWideString<Self::Release>>, DialogFailure> {
        Err(DialogFailure::Unsupported)
    }
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        /// Best backend for this platform.
        pub type DefaultBackend = ComBackend;
    } else if #[cfg(feature = "native-rfd")] {
        /// Best backend for this platform.
        pub type DefaultBackend = RfdBackend;
    } else {
        /// Best backend for this platform.
        pub type DefaultBackend = UnsupportedBackend;
    }
}

/// Construct the [`DefaultBackend`].
pub fn default_backend() -> DefaultBackend {
    DefaultBackend::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Refusing {
        entered: Cell<usize>,
        left: Cell<usize>,
        refuse: bool,
    }

    impl DialogBackend for Refusing {
        type Release = crate::wide::HeapRelease;

        fn enter(&self) -> Result<(), DialogFailure> {
            if self.refuse {
                return Err(DialogFailure::native(crate::NativeCall::Initialize, -1));
            }
            self.entered.set(self.entered.get() + 1);
            Ok(())
        }

        fn leave(&self) {
            self.left.set(self.left.get() + 1);
        }

        fn show(
            &self,
            _config: &DialogConfig,
        ) -> Result<Option<NativeWideString<Self::Release>>, DialogFailure> {
            Ok(None)
        }
    }

    #[test]
    fn scope_leaves_on_drop() {
        let backend = Refusing::default();
        {
            let _scope = SubsystemScope::enter(&backend).unwrap();
            assert_eq!(backend.entered.get(), 1);
            assert_eq!(backend.left.get(), 0);
        }
        assert_eq!(backend.left.get(), 1);
    }

    #[test]
    fn failed_enter_does_not_leave() {
        let backend = Refusing {
            refuse: true,
            ..Default::default()
        };
        assert!(SubsystemScope::enter(&backend).is_err());
        assert_eq!(backend.left.get(), 0);
    }

    #[test]
    fn unsupported_backend_refuses() {
        assert_eq!(
            UnsupportedBackend.enter(),
            Err(DialogFailure::Unsupported)
        );
    }
}
