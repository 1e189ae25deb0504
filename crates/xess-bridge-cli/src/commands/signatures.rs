//! Signatures command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde_json::{Map, Value};
use xess_bridge::{InMemoryModules, ResolvedSignature, Scanner, load_signatures};

use super::hex_utils::{format_hex_address, parse_hex_address};

const DEFAULT_BASE: usize = 0x1_4000_0000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArg {
    pub name: String,
    pub path: PathBuf,
    pub base: usize,
}

/// Parse `NAME=PATH[@BASE]`.
pub fn parse_module_arg(s: &str) -> Result<ModuleArg> {
    let Some((name, rest)) = s.split_once('=') else {
        bail!("Expected NAME=PATH[@BASE], got '{}'", s);
    };
    if name.is_empty() || rest.is_empty() {
        bail!("Expected NAME=PATH[@BASE], got '{}'", s);
    }

    let (path, base) = match rest.rsplit_once('@') {
        Some((path, base)) => (path, parse_hex_address(base)?),
        None => (rest, DEFAULT_BASE),
    };

    Ok(ModuleArg {
        name: name.to_string(),
        path: PathBuf::from(path),
        base,
    })
}

/// Resolved addresses keyed by signature name; unresolved entries are `null`.
pub fn to_json(resolved: &[ResolvedSignature]) -> Value {
    let map: Map<String, Value> = resolved
        .iter()
        .map(|r| {
            let value = r
                .address
                .map(|a| Value::String(format_hex_address(a)))
                .unwrap_or(Value::Null);
            (r.name.clone(), value)
        })
        .collect();
    Value::Object(map)
}

/// Run the signatures command
pub fn run(file: &Path, modules: &[ModuleArg], output: Option<&Path>) -> Result<()> {
    let set = load_signatures(file)?;
    println!(
        "Signature set {} ({} entries)",
        set.version,
        set.entries.len()
    );

    let mut images = InMemoryModules::new();
    for module in modules {
        images.load_file(&module.name, module.base, &module.path)?;
    }

    let resolved = Scanner::new(&images).resolve_all(&set);
    for entry in &resolved {
        match entry.address {
            Some(address) => println!("  {:<32} {}", entry.name, format_hex_address(address)),
            None => println!("  {:<32} not found", entry.name),
        }
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&to_json(&resolved))?;
        std::fs::write(path, json)?;
        println!("Saved to: {}", path.display());
    }

    Ok(())
}
