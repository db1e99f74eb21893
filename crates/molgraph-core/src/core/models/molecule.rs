use super::ids::{AtomKey, ModelId, ResidueKey};
use super::model::Model;
use super::registry::Registered;

/// A non-polymer unit owned directly by a model, such as a ligand, ion or water.
///
/// Its atoms are owned by a hetero backing residue that shares the molecule's ID and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallMolecule {
    pub(crate) id: String,
    pub name: String,
    pub(crate) residue: ResidueKey,
    pub(crate) model: Option<ModelId>,
    pub(crate) origin: ModelId,
}

impl SmallMolecule {
    pub(crate) fn new(id: &str, name: &str, residue: ResidueKey, origin: ModelId) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            residue,
            model: None,
            origin,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The backing residue that owns the molecule's atoms.
    pub fn residue(&self) -> ResidueKey {
        self.residue
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    /// The molecule's atoms, looked up through its backing residue in `model`.
    pub fn atoms<'a>(&self, model: &'a Model) -> &'a [AtomKey] {
        model.residue(self.residue).map_or(&[], |residue| residue.atoms())
    }
}

impl Registered for SmallMolecule {
    fn registry_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn registry_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn set_model(&mut self, model: Option<ModelId>) {
        self.model = model;
    }
}
