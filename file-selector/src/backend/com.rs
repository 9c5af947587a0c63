//! Windows backend built on the Common Item Dialog (`IFileDialog`).
//!
//! Each invocation runs inside its own single-threaded COM apartment. The
//! dialog object and shell item are released by their `windows` crate
//! wrappers; the path string returned by `GetDisplayName` is owned by the
//! caller and freed through `CoTaskMemFree`.

use windows::Win32::Foundation::ERROR_CANCELLED;
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE, CoCreateInstance,
    CoInitializeEx, CoUninitialize,
};
use windows::Win32::UI::Shell::Common::COMDLG_FILTERSPEC;
use windows::Win32::UI::Shell::{
    FOS_PICKFOLDERS, FOS_STRICTFILETYPES, FileOpenDialog, FileSaveDialog, IFileDialog,
    SIGDN_FILESYSPATH,
};
use windows::core::{HRESULT, PCWSTR};

use crate::backend::DialogBackend;
use crate::error::{DialogFailure, NativeCall};
use crate::logging::{selector_debug, selector_trace};
use crate::request::{DialogConfig, DialogKind, DialogOptions};
use crate::wide::{CoTaskMemRelease, NativeWideString, ToWideNul};

/// Dialog backend using `IFileOpenDialog` / `IFileSaveDialog`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComBackend;

fn fail(call: NativeCall) -> impl FnOnce(windows::core::Error) -> DialogFailure {
    move |e| DialogFailure::native(call, e.code().0)
}

/// Encode a string for a `PCWSTR` parameter. Strings were validated on registration,
/// so an interior NUL here can only come from a default file name.
fn wide(s: &str, call: NativeCall) -> Result<Vec<u16>, DialogFailure> {
    s.to_wide_nul()
        .map_err(|_| DialogFailure::native(call, windows::Win32::Foundation::E_INVALIDARG.0))
}

impl ComBackend {
    fn configure(dialog: &IFileDialog, config: &DialogConfig) -> Result<(), DialogFailure> {
        let mut options = unsafe { dialog.GetOptions() }.map_err(fail(NativeCall::GetOptions))?;
        if config.options.contains(DialogOptions::PICK_FOLDERS) {
            options = options | FOS_PICKFOLDERS;
        }

        // The wide buffers must outlive the SetFileTypes call that borrows them.
        let mut buffers = Vec::with_capacity(config.filters.len());
        for f in &config.filters {
            buffers.push((
                wide(&f.name, NativeCall::SetFileTypes)?,
                wide(&f.spec, NativeCall::SetFileTypes)?,
            ));
        }
        if !buffers.is_empty() {
            let specs: Vec<COMDLG_FILTERSPEC> = buffers
                .iter()
                .map(|(name, spec)| COMDLG_FILTERSPEC {
                    pszName: PCWSTR(name.as_ptr()),
                    pszSpec: PCWSTR(spec.as_ptr()),
                })
                .collect();
            unsafe { dialog.SetFileTypes(&specs) }.map_err(fail(NativeCall::SetFileTypes))?;
        }
        if config.options.contains(DialogOptions::STRICT_FILE_TYPES) {
            options = options | FOS_STRICTFILETYPES;
        }
        unsafe { dialog.SetOptions(options) }.map_err(fail(NativeCall::SetOptions))?;

        if let Some(ext) = &config.default_extension {
            let ext = wide(ext, NativeCall::SetDefaultExtension)?;
            unsafe { dialog.SetDefaultExtension(PCWSTR(ext.as_ptr())) }
                .map_err(fail(NativeCall::SetDefaultExtension))?;
        }
        if let Some(name) = &config.file_name {
            let name = wide(name, NativeCall::SetFileName)?;
            unsafe { dialog.SetFileName(PCWSTR(name.as_ptr())) }
                .map_err(fail(NativeCall::SetFileName))?;
        }
        Ok(())
    }
}

impl DialogBackend for ComBackend {
    type Release = CoTaskMemRelease;

    fn enter(&self) -> Result<(), DialogFailure> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE) };
        // S_FALSE (already initialized) still has to be balanced by CoUninitialize.
        if hr.is_err() {
            return Err(DialogFailure::native(NativeCall::Initialize, hr.0));
        }
        Ok(())
    }

    fn leave(&self) {
        unsafe { CoUninitialize() };
    }

    fn show(
        &self,
        config: &DialogConfig,
    ) -> Result<Option<NativeWideString<CoTaskMemRelease>>, DialogFailure> {
        let class = match config.kind {
            DialogKind::Open => &FileOpenDialog,
            DialogKind::Save => &FileSaveDialog,
        };
        let dialog: IFileDialog = unsafe { CoCreateInstance(class, None, CLSCTX_ALL) }
            .map_err(fail(NativeCall::CreateInstance))?;

        Self::configure(&dialog, config)?;

        selector_trace!(kind = ?config.kind, "showing IFileDialog");
        if let Err(e) = unsafe { dialog.Show(None) } {
            if e.code() == HRESULT::from_win32(ERROR_CANCELLED.0) {
                selector_debug!("dialog cancelled by user");
                return Ok(None);
            }
            return Err(DialogFailure::native(NativeCall::Show, e.code().0));
        }

        let item = unsafe { dialog.GetResult() }.map_err(fail(NativeCall::GetResult))?;
        let path = unsafe { item.GetDisplayName(SIGDN_FILESYSPATH) }
            .map_err(fail(NativeCall::GetDisplayName))?;
        // SAFETY: GetDisplayName returns a CoTaskMemAlloc'd NUL-terminated string we now own.
        Ok(unsafe { NativeWideString::from_raw(path.0, CoTaskMemRelease) })
    }
}
