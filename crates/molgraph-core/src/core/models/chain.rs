use super::ids::{ModelId, ResidueKey};
use super::model::Model;
use super::registry::Registered;
use crate::core::utils::sequence::one_letter_code;

/// An ordered, bond-connected sequence of residues.
///
/// Chains can only be obtained from [`Model::create_chain`], which proves that the residues
/// form one unbroken path, or from [`Model::remove_chain`]. The chain ID is optional but unique
/// within its owning model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub(crate) id: Option<String>,
    /// Descriptive name, taken from the compound the chain belongs to.
    pub name: Option<String>,
    pub(crate) residues: Vec<ResidueKey>,
    /// Residue names declared for the full polymer, including unobserved residues.
    pub declared_sequence: Vec<String>,
    pub(crate) model: Option<ModelId>,
    /// The model whose residues the chain was built from.
    pub(crate) origin: ModelId,
}

impl Chain {
    pub(crate) fn new(id: Option<&str>, residues: Vec<ResidueKey>, origin: ModelId) -> Self {
        Self {
            id: id.map(str::to_string),
            name: None,
            residues,
            declared_sequence: Vec::new(),
            model: None,
            origin,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn residues(&self) -> &[ResidueKey] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The model this chain is registered with, if any.
    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    /// One-letter sequence of the observed residues.
    pub fn sequence(&self, model: &Model) -> String {
        self.residues
            .iter()
            .filter_map(|&key| model.residue(key))
            .map(|residue| one_letter_code(&residue.name))
            .collect()
    }

    /// Finds a residue by its sequence number.
    pub fn residue_by_number(&self, model: &Model, number: i64) -> Option<ResidueKey> {
        self.residues.iter().copied().find(|&key| {
            model
                .residue(key)
                .and_then(|residue| residue.label())
                .is_some_and(|label| label.number == number)
        })
    }
}

impl Registered for Chain {
    fn registry_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn registry_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_model(&mut self, model: Option<ModelId>) {
        self.model = model;
    }
}
