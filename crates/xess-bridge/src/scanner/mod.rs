//! Signature scanning over loaded modules.
//!
//! [`Scanner`] resolves a module through a [`ModuleProvider`], searches it for
//! a [`Pattern`] and optionally follows a rel32 displacement (near `call`/`jmp`,
//! RIP-relative `lea`/`mov`) to its absolute target. Every scan is bounded by
//! the module's mapped range.

mod pattern;
mod scan;
mod signature;

pub use pattern::Pattern;
pub use scan::{find_all, find_offset, find_pattern, find_pattern_raw};
pub use signature::{HookSignature, SignatureKind, SignatureSet, load_signatures, save_signatures};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::memory::{ModuleImage, ModuleProvider};

/// Size of the rel32 displacement operand
const DISPLACEMENT_SIZE: usize = 4;

/// Outcome of resolving one entry of a [`SignatureSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSignature {
    pub name: String,
    pub address: Option<usize>,
}

pub struct Scanner<'a, M: ModuleProvider> {
    modules: &'a M,
}

impl<'a, M: ModuleProvider> Scanner<'a, M> {
    pub fn new(modules: &'a M) -> Self {
        Self { modules }
    }

    /// First match of `pattern` in `module`, plus `offset`.
    ///
    /// With `start` set, the scan begins there instead of at the module base,
    /// which allows chained searches. `start` must lie inside the module and
    /// the adjusted address must too.
    pub fn get_address(
        &self,
        module: &str,
        pattern: &Pattern,
        offset: isize,
        start: Option<usize>,
    ) -> Result<usize> {
        let image = self.modules.module(module)?;
        let address = locate(&image, module, pattern, offset, start)?;
        debug!("{} [{}] {:+} -> {:#x}", module, pattern, offset, address);
        Ok(address)
    }

    /// Resolve the rel32 displacement found at match address plus `offset`.
    ///
    /// Returns `match + offset + 4 + displacement`.
    pub fn get_offset_from_instruction(
        &self,
        module: &str,
        pattern: &Pattern,
        offset: isize,
    ) -> Result<usize> {
        let image = self.modules.module(module)?;
        let address = locate(&image, module, pattern, offset, None)?;

        let displacement = image.read_i32(address).ok_or(Error::OutOfBounds {
            address,
            base: image.base(),
            size: image.size(),
        })?;

        let target = (address + DISPLACEMENT_SIZE).wrapping_add_signed(displacement as isize);
        debug!(
            "{} [{}] rel32 {:#x} at {:#x} -> {:#x}",
            module, pattern, displacement, address, target
        );
        Ok(target)
    }

    /// Resolve a single hook signature according to its kind.
    pub fn resolve(&self, signature: &HookSignature) -> Result<usize> {
        let pattern = signature.pattern()?;
        match signature.kind {
            SignatureKind::Direct => {
                self.get_address(&signature.module, &pattern, signature.offset, None)
            }
            SignatureKind::Relative => {
                self.get_offset_from_instruction(&signature.module, &pattern, signature.offset)
            }
        }
    }

    /// Resolve every entry. Failed entries are logged and left unresolved so
    /// the hook layer can disable just those features.
    pub fn resolve_all(&self, signatures: &SignatureSet) -> Vec<ResolvedSignature> {
        let resolved: Vec<ResolvedSignature> = signatures
            .entries
            .iter()
            .map(|signature| {
                let address = match self.resolve(signature) {
                    Ok(address) => Some(address),
                    Err(e) if e.is_not_found() => {
                        warn!("Signature {} not resolved: {}", signature.name, e);
                        None
                    }
                    Err(e) => {
                        warn!("Signature {} is invalid: {}", signature.name, e);
                        None
                    }
                };
                ResolvedSignature {
                    name: signature.name.clone(),
                    address,
                }
            })
            .collect();

        let found = resolved.iter().filter(|r| r.address.is_some()).count();
        info!(
            "Resolved {}/{} signatures (set version {})",
            found,
            resolved.len(),
            signatures.version
        );
        resolved
    }
}

fn locate(
    image: &ModuleImage<'_>,
    module: &str,
    pattern: &Pattern,
    offset: isize,
    start: Option<usize>,
) -> Result<usize> {
    let out_of_bounds = |address: usize| Error::OutOfBounds {
        address,
        base: image.base(),
        size: image.size(),
    };

    let scan_from = start.unwrap_or(image.base());
    let bytes = image
        .slice_from(scan_from)
        .ok_or_else(|| out_of_bounds(scan_from))?;

    let found = find_pattern(bytes, scan_from, pattern).ok_or_else(|| Error::PatternNotFound {
        module: module.to_string(),
        pattern: pattern.to_string(),
    })?;

    found
        .checked_add_signed(offset)
        .filter(|address| image.contains(*address))
        .ok_or_else(|| out_of_bounds(found.wrapping_add_signed(offset)))
}
