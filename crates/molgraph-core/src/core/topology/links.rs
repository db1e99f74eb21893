use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const NUCLEOTIDES: &[&str] = &["A", "C", "G", "U", "I", "DA", "DC", "DG", "DT", "DI"];

/// The atoms through which a residue bonds to its neighbours in a chain.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkAtoms {
    /// Bonds to the tail of the preceding residue.
    pub head: String,
    /// Bonds to the head of the following residue.
    pub tail: String,
}

impl LinkAtoms {
    pub fn new(head: &str, tail: &str) -> Self {
        Self {
            head: head.to_string(),
            tail: tail.to_string(),
        }
    }

    fn peptide() -> Self {
        Self::new("N", "C")
    }

    fn nucleotide() -> Self {
        Self::new("P", "O3'")
    }
}

/// Maps residue names to their link atoms, falling back to a default for unlisted names.
///
/// The TOML layout is:
///
/// ```toml
/// [default]
/// head = "N"
/// tail = "C"
///
/// [residues.DA]
/// head = "P"
/// tail = "O3'"
/// ```
///
/// A missing `[default]` table means peptide links.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkRegistry {
    #[serde(default = "LinkAtoms::peptide")]
    default: LinkAtoms,
    #[serde(default)]
    residues: HashMap<String, LinkAtoms>,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        let residues = NUCLEOTIDES
            .iter()
            .map(|name| (name.to_string(), LinkAtoms::nucleotide()))
            .collect();
        Self {
            default: LinkAtoms::peptide(),
            residues,
        }
    }
}

impl LinkRegistry {
    pub fn load(path: &Path) -> Result<Self, LinkRegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| LinkRegistryError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LinkRegistryError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, LinkRegistryError> {
        toml::from_str(content).map_err(|e| LinkRegistryError::Toml {
            path: origin.to_string(),
            source: e,
        })
    }

    /// Link atoms for a residue name, or the default when the name is not listed.
    pub fn links_for(&self, residue_name: &str) -> &LinkAtoms {
        self.residues.get(residue_name).unwrap_or(&self.default)
    }
}

#[derive(Debug, Error)]
pub enum LinkRegistryError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_registry_covers_peptides_and_nucleotides() {
        let registry = LinkRegistry::default();
        assert_eq!(registry.links_for("ALA"), &LinkAtoms::new("N", "C"));
        assert_eq!(registry.links_for("XYZ"), &LinkAtoms::new("N", "C"));
        assert_eq!(registry.links_for("DG"), &LinkAtoms::new("P", "O3'"));
        assert_eq!(registry.links_for("U"), &LinkAtoms::new("P", "O3'"));
    }

    #[test]
    fn toml_entries_override_default() {
        let content = r#"
            [default]
            head = "N1"
            tail = "C1"

            [residues.SUG]
            head = "O1"
            tail = "C4"
        "#;
        let registry = LinkRegistry::from_toml_str(content).unwrap();
        assert_eq!(registry.links_for("SUG"), &LinkAtoms::new("O1", "C4"));
        assert_eq!(registry.links_for("ALA"), &LinkAtoms::new("N1", "C1"));
    }

    #[test]
    fn missing_default_table_means_peptide_links() {
        let registry = LinkRegistry::from_toml_str("[residues]\n").unwrap();
        assert_eq!(registry.links_for("GLY"), &LinkAtoms::new("N", "C"));
        assert_eq!(registry.links_for("DA"), &LinkAtoms::new("N", "C"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = LinkRegistry::from_toml_str("[default]\nhead = \"N\"\ntail = \"C\"\nbond = 1\n");
        assert!(matches!(result, Err(LinkRegistryError::Toml { .. })));
    }

    #[test]
    fn load_reads_registry_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[residues.DA]\nhead = \"P\"\ntail = \"O3'\"").unwrap();

        let registry = LinkRegistry::load(file.path()).unwrap();
        assert_eq!(registry.links_for("DA").tail, "O3'");
    }

    #[test]
    fn load_reports_missing_file() {
        let result = LinkRegistry::load(Path::new("/nonexistent/links.toml"));
        assert!(matches!(result, Err(LinkRegistryError::Io { .. })));
    }
}
