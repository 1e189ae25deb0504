//! Scan command implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;
use xess_bridge::{InMemoryModules, ModuleProvider, Pattern, Scanner, find_all};

use super::hex_utils::format_hex_address;

pub struct ScanOptions {
    pub file: PathBuf,
    pub pattern: String,
    pub offset: isize,
    pub base: usize,
    pub start: Option<usize>,
    pub relative: bool,
    pub all: bool,
}

/// Module name used for a file on disk: its file name.
pub fn module_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve the scan. `Ok(None)` means not found or out of bounds.
pub fn resolve(options: &ScanOptions, modules: &InMemoryModules) -> Result<Option<usize>> {
    let pattern = Pattern::parse(&options.pattern)?;
    let name = module_name(&options.file);
    let scanner = Scanner::new(modules);

    let result = if options.relative {
        scanner.get_offset_from_instruction(&name, &pattern, options.offset)
    } else {
        scanner.get_address(&name, &pattern, options.offset, options.start)
    };

    match result {
        Ok(address) => Ok(Some(address)),
        Err(e) if e.is_not_found() => {
            warn!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the scan command
pub fn run(options: &ScanOptions) -> Result<()> {
    let name = module_name(&options.file);
    let mut modules = InMemoryModules::new();
    modules.load_file(&name, options.base, &options.file)?;

    let image = modules.module(&name)?;
    println!(
        "{}: {} bytes at {}",
        name,
        image.size(),
        format_hex_address(image.base())
    );

    let pattern = Pattern::parse(&options.pattern)?;
    let matches = find_all(image.bytes(), image.base(), &pattern);
    if options.all {
        for address in &matches {
            println!(
                "  {} (rva {})",
                format_hex_address(*address),
                format_hex_address(address - image.base())
            );
        }
    }
    println!("Matches: {}", matches.len());
    if matches.len() > 1 {
        warn!(
            "Pattern is not unique ({} matches); the first one is used",
            matches.len()
        );
    }

    match resolve(options, &modules)? {
        Some(address) => println!(
            "Result:  {} (rva {})",
            format_hex_address(address),
            format_hex_address(address.wrapping_sub(image.base()))
        ),
        None => println!("Result:  not found"),
    }

    Ok(())
}
