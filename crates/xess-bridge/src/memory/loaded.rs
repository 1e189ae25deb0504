//! Modules loaded in the current process.

use std::mem::size_of;

use tracing::debug;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::ProcessStatus::{GetModuleInformation, MODULEINFO};
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::core::{HSTRING, PCWSTR};

use super::{ModuleImage, ModuleProvider};
use crate::error::{Error, Result};

/// Looks modules up with `GetModuleHandleW`. An empty name is the main executable.
///
/// The returned image borrows live memory. The caller must keep the module
/// loaded while the image is in use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadedModules;

impl LoadedModules {
    pub fn new() -> Self {
        Self
    }

    fn handle(name: &str) -> Result<HMODULE> {
        let result = if name.is_empty() {
            // SAFETY: a null name queries the executable of the current process.
            unsafe { GetModuleHandleW(PCWSTR::null()) }
        } else {
            let wide = HSTRING::from(name);
            // SAFETY: `wide` is a valid NUL-terminated string for the duration of the call.
            unsafe { GetModuleHandleW(PCWSTR(wide.as_ptr())) }
        };

        result.map_err(|e| {
            debug!("GetModuleHandleW({}) failed: {}", name, e);
            Error::ModuleNotFound(name.to_string())
        })
    }
}

impl ModuleProvider for LoadedModules {
    fn module(&self, name: &str) -> Result<ModuleImage<'_>> {
        let module = Self::handle(name)?;

        let mut info = MODULEINFO::default();
        // SAFETY: `info` is a valid out pointer of the size passed in `cb`.
        unsafe {
            GetModuleInformation(
                GetCurrentProcess(),
                module,
                &mut info,
                size_of::<MODULEINFO>() as u32,
            )
        }
        .map_err(|e| {
            debug!("GetModuleInformation({}) failed: {}", name, e);
            Error::ModuleNotFound(name.to_string())
        })?;

        let base = info.lpBaseOfDll as usize;
        let size = info.SizeOfImage as usize;
        if base == 0 || size == 0 {
            return Err(Error::ModuleNotFound(name.to_string()));
        }

        // SAFETY: the loader maps SizeOfImage bytes at lpBaseOfDll for as long as
        // the module stays loaded, which the caller guarantees.
        let bytes = unsafe { std::slice::from_raw_parts(base as *const u8, size) };
        Ok(ModuleImage::new(base, bytes))
    }
}
