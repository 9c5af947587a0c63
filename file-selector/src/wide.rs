//! Wide-character string marshalling.
//!
//! Native dialogs speak NUL-terminated UTF-16. Outbound (caller -> native)
//! strings go through [`ToWideNul`]. Inbound buffers are allocated by the
//! native side and wrapped in a [`NativeWideString`], which owns the buffer
//! and hands it back to the matching deallocator exactly once when dropped.
//! [`to_caller_string`] consumes the wrapper, so the release happens on every
//! exit path: success, empty buffer, or failed transcoding.

use std::fmt;
use std::ptr::NonNull;

use crate::error::{SelectorError, SelectorResult};

/// Deallocation routine matching the allocator of a native wide string.
pub trait WideRelease {
    /// Free the buffer.
    ///
    /// # Safety
    /// `ptr` must have been produced by the allocator this release pairs with
    /// and must not be used again afterwards.
    unsafe fn release(&self, ptr: NonNull<u16>);
}

/// Release for buffers produced by [`NativeWideString::from_str_heap`].
#[derive(Clone, Copy, Debug)]
pub struct HeapRelease {
    len: usize,
}

impl WideRelease for HeapRelease {
    unsafe fn release(&self, ptr: NonNull<u16>) {
        let slice = std::ptr::slice_from_raw_parts_mut(ptr.as_ptr(), self.len);
        drop(unsafe { Box::from_raw(slice) });
    }
}

/// Release through `CoTaskMemFree`, for strings handed out by COM.
#[cfg(windows)]
#[derive(Clone, Copy, Debug, Default)]
pub struct CoTaskMemRelease;

#[cfg(windows)]
impl WideRelease for CoTaskMemRelease {
    unsafe fn release(&self, ptr: NonNull<u16>) {
        unsafe {
            windows::Win32::System::Com::CoTaskMemFree(Some(
                ptr.as_ptr() as *const std::ffi::c_void
            ));
        }
    }
}

/// An owned, NUL-terminated UTF-16 buffer allocated outside of Rust.
pub struct NativeWideString<R: WideRelease> {
    ptr: NonNull<u16>,
    release: R,
}

impl<R: WideRelease> NativeWideString<R> {
    /// Take ownership of a native buffer. Returns `None` for a null pointer.
    ///
    /// # Safety
    /// A non-null `ptr` must point to a NUL-terminated UTF-16 buffer that stays
    /// valid until `release` frees it, and nothing else may free it.
    pub unsafe fn from_raw(ptr: *mut u16, release: R) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, release })
    }

    /// Code units before the terminating NUL.
    pub fn as_wide(&self) -> &[u16] {
        // SAFETY: from_raw guarantees a live NUL-terminated buffer.
        unsafe {
            let mut len = 0usize;
            while *self.ptr.as_ptr().add(len) != 0 {
                len += 1;
            }
            std::slice::from_raw_parts(self.ptr.as_ptr(), len)
        }
    }

    /// Raw pointer to the first code unit.
    pub fn as_ptr(&self) -> *const u16 {
        self.ptr.as_ptr()
    }
}

impl NativeWideString<HeapRelease> {
    /// Allocate a NUL-terminated copy of `s` on the Rust heap.
    ///
    /// Used by backends whose native layer already returns owned Rust strings,
    /// so every backend hands the invoker the same kind of buffer.
    pub fn from_str_heap(s: &str) -> Self {
        let buf: Box<[u16]> = s.encode_utf16().chain(std::iter::once(0)).collect();
        let len = buf.len();
        let raw = Box::into_raw(buf) as *mut u16;
        Self {
            // SAFETY: Box::into_raw never returns null.
            ptr: unsafe { NonNull::new_unchecked(raw) },
            release: HeapRelease { len },
        }
    }
}

impl<R: WideRelease> Drop for NativeWideString<R> {
    fn drop(&mut self) {
        // SAFETY: the pointer is owned by self and released only here.
        unsafe { self.release.release(self.ptr) }
    }
}

impl<R: WideRelease> fmt::Debug for NativeWideString<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeWideString")
            .field(&String::from_utf16_lossy(self.as_wide()))
            .finish()
    }
}

/// Convert a native result buffer into a caller string, releasing the buffer.
///
/// A missing buffer, an empty buffer and invalid UTF-16 all map to `None`.
pub fn to_caller_string<R: WideRelease>(native: Option<NativeWideString<R>>) -> Option<String> {
    let native = native?;
    let wide = native.as_wide();
    if wide.is_empty() {
        return None;
    }
    String::from_utf16(wide).ok()
}

/// Conversion of caller strings into NUL-terminated UTF-16.
pub trait ToWideNul {
    /// Encode as UTF-16 with a trailing NUL, rejecting interior NULs.
    fn to_wide_nul(&self) -> SelectorResult<Vec<u16>>;
}

impl ToWideNul for str {
    fn to_wide_nul(&self) -> SelectorResult<Vec<u16>> {
        if self.contains('\0') {
            return Err(SelectorError::interior_nul(self));
        }
        Ok(self.encode_utf16().chain(std::iter::once(0)).collect())
    }
}

impl ToWideNul for String {
    fn to_wide_nul(&self) -> SelectorResult<Vec<u16>> {
        self.as_str().to_wide_nul()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Heap release that also counts how often it ran.
    struct Counting {
        inner: HeapRelease,
        count: Rc<Cell<usize>>,
    }

    impl WideRelease for Counting {
        unsafe fn release(&self, ptr: NonNull<u16>) {
            self.count.set(self.count.get() + 1);
            unsafe { self.inner.release(ptr) }
        }
    }

    fn counted(units: &[u16]) -> (NativeWideString<Counting>, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let buf: Box<[u16]> = units.iter().copied().chain(std::iter::once(0)).collect();
        let len = buf.len();
        let raw = Box::into_raw(buf) as *mut u16;
        let release = Counting {
            inner: HeapRelease { len },
            count: Rc::clone(&count),
        };
        let s = unsafe { NativeWideString::from_raw(raw, release) }.unwrap();
        (s, count)
    }

    #[test]
    fn null_maps_to_none() {
        let s = unsafe { NativeWideString::from_raw(std::ptr::null_mut(), HeapRelease { len: 0 }) };
        assert!(s.is_none());
        assert_eq!(to_caller_string(s), None);
    }

    #[test]
    fn valid_buffer_is_converted_and_released_once() {
        let units: Vec<u16> = r"C:\out\photo.jpg".encode_utf16().collect();
        let (s, count) = counted(&units);
        assert_eq!(to_caller_string(Some(s)).as_deref(), Some(r"C:\out\photo.jpg"));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn non_ascii_round_trips() {
        let units: Vec<u16> = "D:\\音乐\\ü.flac".encode_utf16().collect();
        let (s, count) = counted(&units);
        assert_eq!(to_caller_string(Some(s)).as_deref(), Some("D:\\音乐\\ü.flac"));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn empty_buffer_is_none_and_released() {
        let (s, count) = counted(&[]);
        assert_eq!(to_caller_string(Some(s)), None);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unpaired_surrogate_is_none_and_released() {
        let (s, count) = counted(&[0x0043, 0xD800, 0x0078]);
        assert_eq!(to_caller_string(Some(s)), None);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn heap_string_exposes_units_without_terminator() {
        let s = NativeWideString::from_str_heap("ab");
        assert_eq!(s.as_wide(), &[0x61, 0x62]);
    }

    #[test]
    fn to_wide_nul_appends_terminator() {
        assert_eq!("*.jpg".to_wide_nul().unwrap().last(), Some(&0));
        assert_eq!("a".to_wide_nul().unwrap(), vec![0x61, 0]);
        assert!(matches!(
            "a\0b".to_wide_nul(),
            Err(SelectorError::InteriorNul { .. })
        ));
    }
}
