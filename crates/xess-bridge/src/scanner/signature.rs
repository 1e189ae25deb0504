use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::{Display, EnumString};

use super::Pattern;
use crate::error::Result;

/// How the address of a hook target is derived from a pattern match.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignatureKind {
    /// Match address plus `offset`
    #[default]
    Direct,
    /// Target of the rel32 displacement at match address plus `offset`
    Relative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSignature {
    pub name: String,
    pub module: String,
    pub pattern: String,
    #[serde(default)]
    pub offset: isize,
    #[serde(default)]
    pub kind: SignatureKind,
}

impl HookSignature {
    pub fn pattern(&self) -> Result<Pattern> {
        Pattern::parse(&self.pattern)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    pub version: String,
    pub entries: Vec<HookSignature>,
}

impl SignatureSet {
    pub fn entry(&self, name: &str) -> Option<&HookSignature> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<SignatureSet> {
    let content = fs::read_to_string(&path)?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &SignatureSet) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_fields_missing() {
        let json = r#"{
            "version": "1",
            "entries": [
                { "name": "xessD3D12Init", "module": "libxess.dll", "pattern": "48 89 5C 24 ??" }
            ]
        }"#;
        let set: SignatureSet = serde_json::from_str(json).unwrap();
        let entry = set.entry("XESSD3D12INIT").unwrap();
        assert_eq!(entry.offset, 0);
        assert_eq!(entry.kind, SignatureKind::Direct);
        assert_eq!(entry.pattern().unwrap().len(), 5);
    }

    #[test]
    fn test_relative_kind_parsing() {
        let json = r#"{ "name": "a", "module": "b", "pattern": "E8", "offset": 1, "kind": "relative" }"#;
        let entry: HookSignature = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, SignatureKind::Relative);
        assert_eq!("relative".parse::<SignatureKind>().unwrap(), SignatureKind::Relative);
        assert_eq!(SignatureKind::Direct.to_string(), "direct");
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let set = SignatureSet {
            version: "2.0.1".to_string(),
            entries: vec![HookSignature {
                name: "create_feature".to_string(),
                module: "game.exe".to_string(),
                pattern: "E8 ?? ?? ?? ?? 48 8B D8".to_string(),
                offset: 1,
                kind: SignatureKind::Relative,
            }],
        };

        save_signatures(file.path(), &set).unwrap();
        let loaded = load_signatures(file.path()).unwrap();
        assert_eq!(loaded, set);
        assert!(loaded.entry("missing").is_none());
    }
}
