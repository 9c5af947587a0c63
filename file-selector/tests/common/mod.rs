#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ptr::NonNull;
use std::rc::Rc;

use native_file_selector::wide::{NativeWideString, WideRelease};
use native_file_selector::{DialogBackend, DialogConfig, DialogFailure};

/// What the fake dialog does when shown.
#[derive(Clone, Debug)]
pub enum Script {
    Select(Vec<u16>),
    Cancel,
    Fail(DialogFailure),
}

impl Script {
    pub fn select(path: &str) -> Self {
        Self::Select(path.encode_utf16().collect())
    }
}

/// Frees boxed buffers and counts how often it did.
pub struct CountingRelease {
    len: usize,
    released: Rc<Cell<usize>>,
}

impl WideRelease for CountingRelease {
    unsafe fn release(&self, ptr: NonNull<u16>) {
        self.released.set(self.released.get() + 1);
        let slice = std::ptr::slice_from_raw_parts_mut(ptr.as_ptr(), self.len);
        drop(unsafe { Box::from_raw(slice) });
    }
}

/// Scripted stand-in for the native dialog subsystem.
#[derive(Default)]
pub struct FakeBackend {
    script: RefCell<VecDeque<Script>>,
    pub fail_enter: Cell<bool>,
    pub entered: Cell<usize>,
    pub left: Cell<usize>,
    pub allocated: Cell<usize>,
    pub released: Rc<Cell<usize>>,
    pub configs: RefCell<Vec<DialogConfig>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: Script) -> &Self {
        self.script.borrow_mut().push_back(step);
        self
    }

    pub fn last_config(&self) -> Option<DialogConfig> {
        self.configs.borrow().last().cloned()
    }

    fn allocate(&self, units: &[u16]) -> NativeWideString<CountingRelease> {
        let buf: Box<[u16]> = units.iter().copied().chain(std::iter::once(0)).collect();
        let len = buf.len();
        let raw = Box::into_raw(buf) as *mut u16;
        self.allocated.set(self.allocated.get() + 1);
        let release = CountingRelease {
            len,
            released: Rc::clone(&self.released),
        };
        unsafe { NativeWideString::from_raw(raw, release) }.expect("boxed buffer is non-null")
    }
}

impl DialogBackend for FakeBackend {
    type Release = CountingRelease;

    fn enter(&self) -> Result<(), DialogFailure> {
        if self.fail_enter.get() {
            return Err(DialogFailure::native(
                native_file_selector::NativeCall::Initialize,
                0x8001_0106u32 as i32,
            ));
        }
        self.entered.set(self.entered.get() + 1);
        Ok(())
    }

    fn leave(&self) {
        self.left.set(self.left.get() + 1);
    }

    fn show(
        &self,
        config: &DialogConfig,
    ) -> Result<Option<NativeWideString<CountingRelease>>, DialogFailure> {
        assert!(
            self.entered.get() > self.left.get(),
            "show called outside of the subsystem scope"
        );
        self.configs.borrow_mut().push(config.clone());
        match self.script.borrow_mut().pop_front().unwrap_or(Script::Cancel) {
            Script::Select(units) => Ok(Some(self.allocate(&units))),
            Script::Cancel => Ok(None),
            Script::Fail(failure) => Err(failure),
        }
    }
}
