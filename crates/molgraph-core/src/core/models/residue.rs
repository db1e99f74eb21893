use super::ids::{AtomKey, BondKey, ChainKey, ResidueKey};
use crate::core::utils::identifiers::ResidueLabel;

/// A named group of atoms, the monomer unit of a chain.
///
/// Small molecules are backed by a hetero residue so that every atom has exactly one owning
/// residue. The `previous`/`next` links are weak: they name neighbouring residues without owning
/// them, and are only ever set through [`Model::link_residues`](super::model::Model::link_residues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub(crate) id: String,        // Chain letter + sequence number, e.g. "A12"
    pub name: String,             // Three-letter code, e.g. "TYR"
    pub(crate) atoms: Vec<AtomKey>,
    pub(crate) hetero: bool,      // Read from HETATM records
    pub(crate) previous: Option<ResidueKey>,
    pub(crate) next: Option<ResidueKey>,
    pub(crate) link_bond: Option<BondKey>, // Bond carrying the link to `next`
    pub(crate) chain: Option<ChainKey>,
}

impl Residue {
    pub(crate) fn new(id: &str, name: &str, hetero: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            atoms: Vec::new(),
            hetero,
            previous: None,
            next: None,
            link_bond: None,
            chain: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn atoms(&self) -> &[AtomKey] {
        &self.atoms
    }

    pub fn is_hetero(&self) -> bool {
        self.hetero
    }

    pub fn previous(&self) -> Option<ResidueKey> {
        self.previous
    }

    pub fn next(&self) -> Option<ResidueKey> {
        self.next
    }

    pub fn chain(&self) -> Option<ChainKey> {
        self.chain
    }

    /// The chain letter, sequence number and insertion code encoded in the ID.
    pub fn label(&self) -> Option<ResidueLabel> {
        self.id.parse().ok()
    }
}
