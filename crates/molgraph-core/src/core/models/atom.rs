use super::ids::{BondKey, ResidueKey};
use nalgebra::Point3;
use std::collections::HashSet;

/// Represents an atom in a structural model.
///
/// An atom is identified by an integer `id` that is unique within its model. A ghost atom
/// carries identity and element information but no coordinates; it is used as a template when
/// duplicating structures before they have been placed.
///
/// Bond membership and the owning residue are maintained by the [`Model`](super::model::Model)
/// and are read-only from the outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub(crate) id: u32,
    /// Element symbol (e.g. "C", "FE").
    pub element: String,
    /// Atom name within its residue (e.g. "CA", "OXT").
    pub name: String,
    /// Cartesian coordinates in Angstroms, or `None` for a ghost atom.
    pub position: Option<Point3<f64>>,
    /// Formal charge in elementary charge units.
    pub charge: Option<f64>,
    pub occupancy: Option<f64>,
    pub temperature_factor: Option<f64>,
    /// Alternate location indicator.
    pub alt_loc: Option<char>,
    pub(crate) bonds: HashSet<BondKey>,
    pub(crate) residue: Option<ResidueKey>,
}

impl Atom {
    /// Creates a placed atom with no optional metadata.
    ///
    /// # Arguments
    ///
    /// * `id` - The model-unique atom ID.
    /// * `element` - The element symbol.
    /// * `name` - The atom name.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(id: u32, element: &str, name: &str, position: Point3<f64>) -> Self {
        Self {
            position: Some(position),
            ..Self::ghost(id, element, name)
        }
    }

    /// Creates a ghost atom, known only by ID, element and name.
    pub fn ghost(id: u32, element: &str, name: &str) -> Self {
        Self {
            id,
            element: element.to_string(),
            name: name.to_string(),
            position: None,
            charge: None,
            occupancy: None,
            temperature_factor: None,
            alt_loc: None,
            bonds: HashSet::new(),
            residue: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_ghost(&self) -> bool {
        self.position.is_none()
    }

    pub fn bonds(&self) -> impl Iterator<Item = BondKey> + '_ {
        self.bonds.iter().copied()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// The residue (or small-molecule backing residue) that owns this atom.
    pub fn residue(&self) -> Option<ResidueKey> {
        self.residue
    }

    /// Euclidean distance to another atom, `None` if either one is a ghost.
    pub fn distance_to(&self, other: &Atom) -> Option<f64> {
        match (self.position, other.position) {
            (Some(a), Some(b)) => Some(nalgebra::distance(&a, &b)),
            _ => None,
        }
    }

    /// Copies this atom under a new ID, without its bonds or owner.
    ///
    /// Ghost atoms stay ghosts, so duplicated templates keep their unplaced state.
    pub(crate) fn duplicate_with_id(&self, id: u32) -> Self {
        Self {
            id,
            bonds: HashSet::new(),
            residue: None,
            ..self.clone()
        }
    }
}
