use super::ids::{AtomKey, ModelId, ResidueKey};
use super::registry::Registered;

/// A named selection of residues and their atoms marking a region of interest.
///
/// The residues are borrowed: they remain owned by their chains or small molecules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindSite {
    pub(crate) id: String,
    /// Free-text description of the site.
    pub name: Option<String>,
    pub(crate) residues: Vec<ResidueKey>,
    pub(crate) atoms: Vec<AtomKey>,
    /// ID of the small molecule the site binds, when known.
    pub ligand: Option<String>,
    pub(crate) model: Option<ModelId>,
    pub(crate) origin: ModelId,
}

impl BindSite {
    pub(crate) fn new(
        id: &str,
        residues: Vec<ResidueKey>,
        atoms: Vec<AtomKey>,
        origin: ModelId,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            residues,
            atoms,
            ligand: None,
            model: None,
            origin,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn residues(&self) -> &[ResidueKey] {
        &self.residues
    }

    pub fn atoms(&self) -> &[AtomKey] {
        &self.atoms
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }
}

impl Registered for BindSite {
    fn registry_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn registry_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_model(&mut self, model: Option<ModelId>) {
        self.model = model;
    }
}
