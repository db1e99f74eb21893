use super::atom::Atom;
use super::ids::{AtomKey, BondKey};
use slotmap::SlotMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BondError {
    #[error("An atom cannot be bonded to itself")]
    SelfBond,
    #[error("Bond endpoint {0:?} is not an atom of this model")]
    UnknownAtom(AtomKey),
}

/// An unordered bond between two distinct atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    atoms: [AtomKey; 2],
}

impl Bond {
    /// The two bonded atoms. The array is a copy; it cannot alter the bond.
    pub fn atoms(&self) -> [AtomKey; 2] {
        self.atoms
    }

    pub fn contains(&self, atom: AtomKey) -> bool {
        self.atoms.contains(&atom)
    }

    /// The atom at the other end of the bond from `atom`.
    pub fn partner(&self, atom: AtomKey) -> Option<AtomKey> {
        match self.atoms {
            [a, b] if a == atom => Some(b),
            [a, b] if b == atom => Some(a),
            _ => None,
        }
    }

    /// Bond length recomputed from the current atom coordinates.
    ///
    /// Returns `None` if either atom is missing from `atoms` or is a ghost.
    pub fn length(&self, atoms: &SlotMap<AtomKey, Atom>) -> Option<f64> {
        let [a, b] = self.atoms;
        atoms.get(a)?.distance_to(atoms.get(b)?)
    }
}

/// Creates a bond and registers it on both atoms.
pub(crate) fn create(
    atoms: &mut SlotMap<AtomKey, Atom>,
    bonds: &mut SlotMap<BondKey, Bond>,
    atom1: AtomKey,
    atom2: AtomKey,
) -> Result<BondKey, BondError> {
    if atom1 == atom2 {
        return Err(BondError::SelfBond);
    }
    for key in [atom1, atom2] {
        if !atoms.contains_key(key) {
            return Err(BondError::UnknownAtom(key));
        }
    }

    let bond_key = bonds.insert(Bond {
        atoms: [atom1, atom2],
    });
    atoms[atom1].bonds.insert(bond_key);
    atoms[atom2].bonds.insert(bond_key);
    Ok(bond_key)
}

/// Removes a bond and deregisters it from both atoms.
pub(crate) fn destroy(
    atoms: &mut SlotMap<AtomKey, Atom>,
    bonds: &mut SlotMap<BondKey, Bond>,
    bond_key: BondKey,
) -> Option<Bond> {
    let bond = bonds.remove(bond_key)?;
    for key in bond.atoms {
        if let Some(atom) = atoms.get_mut(key) {
            atom.bonds.remove(&bond_key);
        }
    }
    Some(bond)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn two_atoms() -> (SlotMap<AtomKey, Atom>, AtomKey, AtomKey) {
        let mut atoms = SlotMap::with_key();
        let c = atoms.insert(Atom::new(1, "C", "C", Point3::new(0.0, 0.0, 0.0)));
        let n = atoms.insert(Atom::new(2, "N", "N", Point3::new(0.0, 0.0, 1.5)));
        (atoms, c, n)
    }

    #[test]
    fn creating_bond_registers_on_both_atoms() {
        let (mut atoms, c, n) = two_atoms();
        let mut bonds = SlotMap::with_key();

        let bond = create(&mut atoms, &mut bonds, c, n).unwrap();

        assert!(atoms[c].bonds().any(|k| k == bond));
        assert!(atoms[n].bonds().any(|k| k == bond));
        assert_eq!(bonds[bond].atoms(), [c, n]);
    }

    #[test]
    fn atom_cannot_bond_to_itself() {
        let (mut atoms, c, _) = two_atoms();
        let mut bonds = SlotMap::with_key();

        assert_eq!(create(&mut atoms, &mut bonds, c, c), Err(BondError::SelfBond));
        assert!(bonds.is_empty());
        assert_eq!(atoms[c].bond_count(), 0);
    }

    #[test]
    fn bond_to_unknown_atom_is_rejected() {
        let (mut atoms, c, _) = two_atoms();
        let mut bonds = SlotMap::with_key();
        let stale = atoms.insert(Atom::ghost(9, "O", "O"));
        atoms.remove(stale);

        assert_eq!(
            create(&mut atoms, &mut bonds, c, stale),
            Err(BondError::UnknownAtom(stale))
        );
        assert_eq!(atoms[c].bond_count(), 0);
    }

    #[test]
    fn destroying_bond_leaves_unrelated_bonds_untouched() {
        let (mut atoms, c, n) = two_atoms();
        let o = atoms.insert(Atom::new(3, "O", "O", Point3::new(1.2, 0.0, 0.0)));
        let mut bonds = SlotMap::with_key();

        let existing = create(&mut atoms, &mut bonds, c, o).unwrap();
        let bond = create(&mut atoms, &mut bonds, c, n).unwrap();
        assert_eq!(atoms[c].bond_count(), 2);

        destroy(&mut atoms, &mut bonds, bond).unwrap();

        assert_eq!(atoms[c].bonds().collect::<Vec<_>>(), vec![existing]);
        assert_eq!(atoms[n].bond_count(), 0);
        assert!(!bonds.contains_key(bond));
    }

    #[test]
    fn length_tracks_atom_movement() {
        let (mut atoms, c, n) = two_atoms();
        let mut bonds = SlotMap::with_key();
        let key = create(&mut atoms, &mut bonds, c, n).unwrap();

        assert_eq!(bonds[key].length(&atoms), Some(1.5));
        atoms[n].position = Some(Point3::new(0.0, 0.0, 2.0));
        assert_eq!(bonds[key].length(&atoms), Some(2.0));
    }

    #[test]
    fn partner_returns_other_end() {
        let (mut atoms, c, n) = two_atoms();
        let mut bonds = SlotMap::with_key();
        let key = create(&mut atoms, &mut bonds, c, n).unwrap();

        assert_eq!(bonds[key].partner(c), Some(n));
        assert_eq!(bonds[key].partner(n), Some(c));
        assert!(bonds[key].contains(c));
    }
}
