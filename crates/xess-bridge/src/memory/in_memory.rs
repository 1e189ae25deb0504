//! Module images backed by owned buffers.
//!
//! Used by the CLI to scan binaries read from disk and by tests that need a
//! module at a fixed base address.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{ModuleImage, ModuleProvider};
use crate::error::{Error, Result};

#[derive(Debug)]
struct OwnedModule {
    name: String,
    base: usize,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct InMemoryModules {
    modules: Vec<OwnedModule>,
}

impl InMemoryModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_module(mut self, name: impl Into<String>, base: usize, bytes: Vec<u8>) -> Self {
        self.insert(name, base, bytes);
        self
    }

    /// Add or replace a module. Names compare case-insensitively.
    pub fn insert(&mut self, name: impl Into<String>, base: usize, bytes: Vec<u8>) {
        let name = name.into();
        self.modules.retain(|m| !m.name.eq_ignore_ascii_case(&name));
        debug!(
            "Mapped {} at {:#x} ({:#x} bytes)",
            name,
            base,
            bytes.len()
        );
        self.modules.push(OwnedModule { name, base, bytes });
    }

    /// Read a file from disk and map it at `base`.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        name: impl Into<String>,
        base: usize,
        path: P,
    ) -> Result<()> {
        let bytes = fs::read(path.as_ref())?;
        if base.checked_add(bytes.len()).is_none() {
            return Err(Error::OutOfBounds {
                address: base,
                base,
                size: bytes.len(),
            });
        }
        self.insert(name, base, bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleProvider for InMemoryModules {
    fn module(&self, name: &str) -> Result<ModuleImage<'_>> {
        self.modules
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .map(|m| ModuleImage::new(m.base, &m.bytes))
            .ok_or_else(|| Error::ModuleNotFound(name.to_string()))
    }
}
