use super::bond::BondError;
use super::connectivity::ConnectivityError;
use super::ids::AtomKey;
use std::fmt;
use thiserror::Error;

/// The kinds of entity a [`Model`](super::model::Model) manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Atom,
    Residue,
    SmallMolecule,
    Chain,
    BindSite,
    Complex,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntityKind::Atom => "Atom",
                EntityKind::Residue => "Residue",
                EntityKind::SmallMolecule => "SmallMolecule",
                EntityKind::Chain => "Chain",
                EntityKind::BindSite => "BindSite",
                EntityKind::Complex => "Complex",
            }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Cannot add small molecule with ID {0}: the model already has one with that ID")]
    DuplicateSmallMolecules(String),

    #[error("Cannot add chain with ID {0}: the model already has one with that ID")]
    DuplicateChains(String),

    #[error("Cannot add bind site with ID {0}: the model already has one with that ID")]
    DuplicateBindSites(String),

    #[error("Cannot add complex with ID {0}: the model already has one with that ID")]
    DuplicateComplexes(String),

    #[error("{kind} is not owned by this model")]
    NotOwned { kind: EntityKind },

    #[error("There is already a {kind} with ID {id}")]
    IdInUse { kind: EntityKind, id: String },

    #[error("{kind} ID '{id}' is not a prefix followed by a sequence number")]
    MalformedId { kind: EntityKind, id: String },

    #[error("Every single-letter chain ID from A to Z is already in use")]
    ChainIdsExhausted,

    #[error("{kind} was built for another model or refers to entities outside this one")]
    ForeignEntity { kind: EntityKind },

    #[error("Atom {0} already has an owner")]
    AtomAlreadyOwned(u32),

    #[error("Residue {0} already belongs to a chain")]
    ResidueAlreadyOwned(String),

    #[error("Atom {atom:?} does not belong to residue {residue}")]
    AtomNotInResidue { atom: AtomKey, residue: String },

    #[error(transparent)]
    Bond(#[from] BondError),

    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),
}
