use super::atom::Atom;
use super::bond::{self, Bond};
use super::chain::Chain;
use super::complex::Complex;
use super::connectivity;
use super::error::{EntityKind, ModelError};
use super::ids::{AtomKey, BondKey, ChainKey, ComplexKey, ModelId, MoleculeKey, ResidueKey, SiteKey};
use super::molecule::SmallMolecule;
use super::registry::Registry;
use super::residue::Residue;
use super::site::BindSite;
use crate::core::utils::identifiers::{next_chain_letter, next_iteration_id, next_numbered_id};
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Name given to a complex produced by [`Model::duplicate_complex`].
pub const DUPLICATE_COMPLEX_NAME: &str = "...";

/// Generates the read-only lookups shared by every registered entity kind.
macro_rules! registry_lookups {
    (
        $field:ident, $key:ty, $entity:ty,
        $get:ident, $get_mut:ident, $iter:ident,
        $by_id:ident, $by_name:ident, $all_by_name:ident
    ) => {
        pub fn $get(&self, key: $key) -> Option<&$entity> {
            self.$field.get(key)
        }

        pub fn $get_mut(&mut self, key: $key) -> Option<&mut $entity> {
            self.$field.get_mut(key)
        }

        /// Unordered view over the registered entities of this kind.
        pub fn $iter(&self) -> impl Iterator<Item = ($key, &$entity)> {
            self.$field.iter()
        }

        pub fn $by_id(&self, id: &str) -> Option<$key> {
            self.$field.find_by_id(id)
        }

        /// First entity with the given name, by linear scan.
        pub fn $by_name(&self, name: &str) -> Option<$key> {
            self.$field.find_by_name(name)
        }

        pub fn $all_by_name(&self, name: &str) -> Vec<$key> {
            self.$field.find_all_by_name(name)
        }
    };
}

/// One complete structural model: the owner of every atom, bond and residue, and of the
/// registered small molecules, chains, bind sites and complexes.
///
/// Atoms, bonds and residues live in slot-map arenas. Top-level entities are plain values
/// that are built through `create_*`, registered with `add_*` (which enforces per-kind ID
/// uniqueness and sets the entity's back-reference) and handed back by `remove_*` (which
/// clears it again).
#[derive(Debug)]
pub struct Model {
    id: ModelId,
    atoms: SlotMap<AtomKey, Atom>,
    atom_index: HashMap<u32, AtomKey>,
    bonds: SlotMap<BondKey, Bond>,
    residues: SlotMap<ResidueKey, Residue>,
    loose_atoms: Vec<AtomKey>,
    small_molecules: Registry<MoleculeKey, SmallMolecule>,
    chains: Registry<ChainKey, Chain>,
    bind_sites: Registry<SiteKey, BindSite>,
    complexes: Registry<ComplexKey, Complex>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an empty model with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: ModelId::next(),
            atoms: SlotMap::with_key(),
            atom_index: HashMap::new(),
            bonds: SlotMap::with_key(),
            residues: SlotMap::with_key(),
            loose_atoms: Vec::new(),
            small_molecules: Registry::default(),
            chains: Registry::default(),
            bind_sites: Registry::default(),
            complexes: Registry::default(),
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    // ----- Atoms -----

    /// Stores an atom in the model's arena without giving it an owner.
    ///
    /// The atom becomes part of [`all_atoms`](Self::all_atoms) once a registered entity owns it
    /// through a residue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IdInUse`] if another atom already has the same ID.
    pub fn create_atom(&mut self, atom: Atom) -> Result<AtomKey, ModelError> {
        if self.atom_index.contains_key(&atom.id) {
            return Err(ModelError::IdInUse {
                kind: EntityKind::Atom,
                id: atom.id.to_string(),
            });
        }
        let id = atom.id;
        let key = self.atoms.insert(atom);
        self.atom_index.insert(id, key);
        Ok(key)
    }

    /// Stores an atom owned directly by the model, outside any residue.
    pub fn add_atom(&mut self, atom: Atom) -> Result<AtomKey, ModelError> {
        let key = self.create_atom(atom)?;
        self.loose_atoms.push(key);
        Ok(key)
    }

    /// Removes an atom from the model, destroying every bond it takes part in.
    ///
    /// The atom is also dropped from its residue, from the loose atom list and from every bind
    /// site that selects it. Returns the atom without bonds or owner.
    pub fn remove_atom(&mut self, key: AtomKey) -> Option<Atom> {
        let bond_keys: Vec<BondKey> = self.atoms.get(key)?.bonds().collect();
        for bond_key in bond_keys {
            self.destroy_bond(bond_key);
        }

        let mut atom = self.atoms.remove(key)?;
        if self.atom_index.get(&atom.id) == Some(&key) {
            self.atom_index.remove(&atom.id);
        }
        if let Some(residue) = atom.residue.take().and_then(|r| self.residues.get_mut(r)) {
            residue.atoms.retain(|&a| a != key);
        }
        self.loose_atoms.retain(|&a| a != key);
        for (_, site) in self.bind_sites.iter_mut() {
            site.atoms.retain(|&a| a != key);
        }
        Some(atom)
    }

    pub fn atom(&self, key: AtomKey) -> Option<&Atom> {
        self.atoms.get(key)
    }

    pub fn atom_mut(&mut self, key: AtomKey) -> Option<&mut Atom> {
        self.atoms.get_mut(key)
    }

    /// Iterates over every atom in the arena, owned or not.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomKey, &Atom)> {
        self.atoms.iter()
    }

    pub fn find_atom_by_id(&self, id: u32) -> Option<AtomKey> {
        self.atom_index.get(&id).copied()
    }

    /// Atoms owned directly by the model rather than by a residue.
    pub fn loose_atoms(&self) -> &[AtomKey] {
        &self.loose_atoms
    }

    /// Every atom owned by the model: the atoms of registered small molecules and chains plus
    /// the loose atoms.
    ///
    /// Computed on each call. Bind sites only borrow atoms and add nothing of their own.
    pub fn all_atoms(&self) -> HashSet<AtomKey> {
        let molecule_residues = self.small_molecules.iter().map(|(_, m)| m.residue);
        let chain_residues = self
            .chains
            .iter()
            .flat_map(|(_, c)| c.residues.iter().copied());

        molecule_residues
            .chain(chain_residues)
            .filter_map(|r| self.residues.get(r))
            .flat_map(|r| r.atoms.iter().copied())
            .chain(self.loose_atoms.iter().copied())
            .collect()
    }

    /// The largest atom ID in the model, or `None` for an empty model.
    ///
    /// Counts the atoms of registered entities, loose atoms and atoms created but not yet
    /// grouped. Atoms of removed entities are out of the index and do not count.
    pub fn max_atom_id(&self) -> Option<u32> {
        self.atom_index.keys().max().copied()
    }

    fn residue_atoms(&self, residues: &[ResidueKey]) -> Vec<AtomKey> {
        residues
            .iter()
            .filter_map(|&r| self.residues.get(r))
            .flat_map(|r| r.atoms.iter().copied())
            .collect()
    }

    /// Drops the atoms of `residues` from the ID index. They stay in the arena, so the entity
    /// owning the residues can be registered again.
    fn release_atoms(&mut self, residues: &[ResidueKey]) {
        for key in self.residue_atoms(residues) {
            let Some(atom) = self.atoms.get(key) else {
                continue;
            };
            if self.atom_index.get(&atom.id) == Some(&key) {
                self.atom_index.remove(&atom.id);
            }
        }
    }

    /// Puts the atoms of `residues` back into the ID index.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IdInUse`] if another atom took one of their IDs in the meantime.
    fn claim_atoms(&mut self, residues: &[ResidueKey]) -> Result<(), ModelError> {
        let mut claimed = Vec::new();
        for key in self.residue_atoms(residues) {
            let Some(atom) = self.atoms.get(key) else {
                continue;
            };
            if self.atom_index.get(&atom.id).is_some_and(|&other| other != key) {
                return Err(ModelError::IdInUse {
                    kind: EntityKind::Atom,
                    id: atom.id.to_string(),
                });
            }
            claimed.push((atom.id, key));
        }
        self.atom_index.extend(claimed);
        Ok(())
    }

    // ----- Bonds -----

    /// Bonds two distinct atoms of this model.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::SelfBond`](super::bond::BondError::SelfBond) when both keys are
    /// the same atom, or [`BondError::UnknownAtom`](super::bond::BondError::UnknownAtom) when
    /// either key is not in this model.
    pub fn create_bond(&mut self, atom1: AtomKey, atom2: AtomKey) -> Result<BondKey, ModelError> {
        Ok(bond::create(&mut self.atoms, &mut self.bonds, atom1, atom2)?)
    }

    /// Destroys a bond, deregistering it from both atoms.
    ///
    /// If the bond carried a residue link, the two residues are unlinked as well.
    pub fn destroy_bond(&mut self, key: BondKey) -> Option<Bond> {
        let link_owner = self.bonds.get(key)?.atoms().into_iter().find_map(|a| {
            let residue = self.atoms.get(a)?.residue?;
            (self.residues.get(residue)?.link_bond == Some(key)).then_some(residue)
        });
        if let Some(upstream) = link_owner {
            self.unlink_downstream(upstream);
        }
        bond::destroy(&mut self.atoms, &mut self.bonds, key)
    }

    pub fn bond(&self, key: BondKey) -> Option<&Bond> {
        self.bonds.get(key)
    }

    /// Length of a bond from the current coordinates, `None` if an endpoint is a ghost.
    pub fn bond_length(&self, key: BondKey) -> Option<f64> {
        self.bonds.get(key)?.length(&self.atoms)
    }

    /// The bond joining two atoms, if there is one.
    pub fn bond_between(&self, atom1: AtomKey, atom2: AtomKey) -> Option<BondKey> {
        self.atoms
            .get(atom1)?
            .bonds()
            .find(|&b| self.bonds.get(b).is_some_and(|bond| bond.partner(atom1) == Some(atom2)))
    }

    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondKey, &Bond)> {
        self.bonds.iter()
    }

    /// Atoms sharing a bond with `atom`.
    pub fn bonded_neighbors(&self, atom: AtomKey) -> Vec<AtomKey> {
        self.atoms.get(atom).map_or_else(Vec::new, |a| {
            a.bonds()
                .filter_map(|b| self.bonds.get(b)?.partner(atom))
                .collect()
        })
    }

    // ----- Residues -----

    /// Groups unowned atoms into a polymer residue.
    ///
    /// # Arguments
    ///
    /// * `id` - Chain identifier followed by the sequence number, e.g. `"A12"`.
    /// * `name` - The residue name, e.g. `"TYR"`.
    /// * `atoms` - The atoms to hand over to the residue.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::ForeignEntity`] if an atom is not in this model, and with
    /// [`ModelError::AtomAlreadyOwned`] if an atom already belongs to a residue, is a loose
    /// atom or is listed twice.
    pub fn create_residue(
        &mut self,
        id: &str,
        name: &str,
        atoms: Vec<AtomKey>,
    ) -> Result<ResidueKey, ModelError> {
        self.insert_residue(id, name, atoms, false)
    }

    /// [`create_residue`](Self::create_residue) for residues read from `HETATM` records as
    /// well, which keep the flag when they sit inside a chain.
    pub(crate) fn insert_residue(
        &mut self,
        id: &str,
        name: &str,
        atoms: Vec<AtomKey>,
        hetero: bool,
    ) -> Result<ResidueKey, ModelError> {
        let mut seen = HashSet::with_capacity(atoms.len());
        for &key in &atoms {
            let atom = self.atoms.get(key).ok_or(ModelError::ForeignEntity {
                kind: EntityKind::Residue,
            })?;
            if atom.residue.is_some() || self.loose_atoms.contains(&key) || !seen.insert(key) {
                return Err(ModelError::AtomAlreadyOwned(atom.id));
            }
        }

        let mut residue = Residue::new(id, name, hetero);
        residue.atoms = atoms;
        let residue_key = self.residues.insert(residue);
        for &key in &self.residues[residue_key].atoms {
            self.atoms[key].residue = Some(residue_key);
        }
        Ok(residue_key)
    }

    pub fn residue(&self, key: ResidueKey) -> Option<&Residue> {
        self.residues.get(key)
    }

    pub fn residue_mut(&mut self, key: ResidueKey) -> Option<&mut Residue> {
        self.residues.get_mut(key)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueKey, &Residue)> {
        self.residues.iter()
    }

    /// The atom with the given name inside a residue.
    pub fn find_atom_in_residue(&self, residue: ResidueKey, name: &str) -> Option<AtomKey> {
        self.residues
            .get(residue)?
            .atoms
            .iter()
            .copied()
            .find(|&a| self.atoms.get(a).is_some_and(|atom| atom.name == name))
    }

    /// Links `upstream` to `downstream` through a bond between their link atoms.
    ///
    /// An existing bond between the two atoms is reused. If either residue was already linked
    /// to a different neighbour on that side, the old link is dropped (its bond is kept).
    ///
    /// # Arguments
    ///
    /// * `upstream` - The residue whose `next` becomes `downstream`.
    /// * `downstream` - The residue whose `previous` becomes `upstream`.
    /// * `upstream_atom` - The tail link atom, owned by `upstream`.
    /// * `downstream_atom` - The head link atom, owned by `downstream`.
    ///
    /// # Return
    ///
    /// The key of the bond carrying the link.
    pub fn link_residues(
        &mut self,
        upstream: ResidueKey,
        downstream: ResidueKey,
        upstream_atom: AtomKey,
        downstream_atom: AtomKey,
    ) -> Result<BondKey, ModelError> {
        for (residue, atom) in [(upstream, upstream_atom), (downstream, downstream_atom)] {
            let owner = self.residues.get(residue).ok_or(ModelError::ForeignEntity {
                kind: EntityKind::Residue,
            })?;
            if !owner.atoms.contains(&atom) {
                return Err(ModelError::AtomNotInResidue {
                    atom,
                    residue: owner.id.clone(),
                });
            }
        }
        if upstream == downstream {
            return Err(bond::BondError::SelfBond.into());
        }

        let bond_key = match self.bond_between(upstream_atom, downstream_atom) {
            Some(existing) => existing,
            None => self.create_bond(upstream_atom, downstream_atom)?,
        };

        if self.residues[upstream].next != Some(downstream) {
            self.unlink_downstream(upstream);
        }
        if let Some(old) = self.residues[downstream].previous.filter(|&p| p != upstream) {
            self.unlink_downstream(old);
        }
        let up = &mut self.residues[upstream];
        up.next = Some(downstream);
        up.link_bond = Some(bond_key);
        self.residues[downstream].previous = Some(upstream);
        Ok(bond_key)
    }

    fn unlink_downstream(&mut self, upstream: ResidueKey) {
        let Some(up) = self.residues.get_mut(upstream) else {
            return;
        };
        up.link_bond = None;
        if let Some(down) = up.next.take().and_then(|d| self.residues.get_mut(d)) {
            down.previous = None;
        }
    }

    // ----- Entity construction -----

    /// Builds an unregistered chain after proving the residues form one linked path in the
    /// given order.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError::BrokenChain`](super::connectivity::ConnectivityError)
    /// wrapped in [`ModelError::Connectivity`] for a gap, a repeat or an unknown residue.
    pub fn create_chain(
        &self,
        id: Option<&str>,
        residues: Vec<ResidueKey>,
    ) -> Result<Chain, ModelError> {
        connectivity::validate_chain(&self.residues, &residues)?;
        Ok(Chain::new(id, residues, self.id))
    }

    /// Orders an unordered set of residues along their links.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Connectivity`] if the residues are not one linear path.
    pub fn verify_sequence(&self, residues: &[ResidueKey]) -> Result<Vec<ResidueKey>, ModelError> {
        Ok(connectivity::verify_sequence(&self.residues, residues)?)
    }

    /// Groups unowned atoms into an unregistered small molecule backed by a hetero residue.
    pub fn create_small_molecule(
        &mut self,
        id: &str,
        name: &str,
        atoms: Vec<AtomKey>,
    ) -> Result<SmallMolecule, ModelError> {
        let residue = self.insert_residue(id, name, atoms, true)?;
        Ok(SmallMolecule::new(id, name, residue, self.id))
    }

    /// Builds an unregistered bind site selecting the given residues and all of their atoms.
    pub fn create_bind_site(
        &self,
        id: &str,
        residues: Vec<ResidueKey>,
    ) -> Result<BindSite, ModelError> {
        let mut atoms = Vec::new();
        for &key in &residues {
            let residue = self.residues.get(key).ok_or(ModelError::ForeignEntity {
                kind: EntityKind::BindSite,
            })?;
            atoms.extend_from_slice(&residue.atoms);
        }
        Ok(BindSite::new(id, residues, atoms, self.id))
    }

    // ----- Small molecules -----

    /// Registers a small molecule with this model.
    ///
    /// # Errors
    ///
    /// * [`ModelError::DuplicateSmallMolecules`] - a registered molecule has the same ID.
    /// * [`ModelError::ForeignEntity`] - the molecule was created by another model.
    /// * [`ModelError::ResidueAlreadyOwned`] - the backing residue already backs a registered
    ///   molecule or belongs to a chain.
    /// * [`ModelError::IdInUse`] - an atom ID of the molecule was taken while it was removed.
    pub fn add_small_molecule(&mut self, molecule: SmallMolecule) -> Result<MoleculeKey, ModelError> {
        if self.small_molecules.contains_id(&molecule.id) {
            return Err(ModelError::DuplicateSmallMolecules(molecule.id));
        }
        let foreign = ModelError::ForeignEntity {
            kind: EntityKind::SmallMolecule,
        };
        if molecule.origin != self.id {
            return Err(foreign);
        }
        let residue = self.residues.get(molecule.residue).ok_or(foreign)?;
        let backs_another = self
            .small_molecules
            .iter()
            .any(|(_, m)| m.residue == molecule.residue);
        if backs_another || residue.chain.is_some() {
            return Err(ModelError::ResidueAlreadyOwned(residue.id.clone()));
        }
        self.claim_atoms(&[molecule.residue])?;
        self.small_molecules
            .insert(molecule, self.id)
            .map_err(ModelError::DuplicateSmallMolecules)
    }

    /// Unregisters a small molecule and returns it with its back-reference cleared.
    ///
    /// Its atoms can no longer be found by ID until the molecule is added again.
    pub fn remove_small_molecule(&mut self, key: MoleculeKey) -> Result<SmallMolecule, ModelError> {
        let molecule = self.small_molecules.remove(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::SmallMolecule,
        })?;
        self.release_atoms(&[molecule.residue]);
        Ok(molecule)
    }

    registry_lookups!(
        small_molecules, MoleculeKey, SmallMolecule,
        small_molecule, small_molecule_mut, small_molecules_iter,
        find_small_molecule_by_id, find_small_molecule_by_name, find_small_molecules_by_name
    );

    // ----- Chains -----

    /// Registers a chain and makes it the owner of its residues.
    ///
    /// The residue path is validated again, since the chain may have been built against
    /// another model.
    ///
    /// # Errors
    ///
    /// * [`ModelError::DuplicateChains`] - a registered chain has the same ID.
    /// * [`ModelError::ForeignEntity`] - the chain was created by another model, or one of
    ///   its residues is gone.
    /// * [`ModelError::ResidueAlreadyOwned`] - a residue belongs to another chain.
    /// * [`ModelError::Connectivity`] - the residues are no longer one linked path.
    /// * [`ModelError::IdInUse`] - an atom ID of the chain was taken while it was removed.
    pub fn add_chain(&mut self, chain: Chain) -> Result<ChainKey, ModelError> {
        if let Some(id) = chain.id() {
            if self.chains.contains_id(id) {
                return Err(ModelError::DuplicateChains(id.to_string()));
            }
        }
        if chain.origin != self.id {
            return Err(ModelError::ForeignEntity {
                kind: EntityKind::Chain,
            });
        }
        for &key in &chain.residues {
            let residue = self.residues.get(key).ok_or(ModelError::ForeignEntity {
                kind: EntityKind::Chain,
            })?;
            if residue.chain.is_some() {
                return Err(ModelError::ResidueAlreadyOwned(residue.id.clone()));
            }
        }
        connectivity::validate_chain(&self.residues, &chain.residues)?;
        self.claim_atoms(&chain.residues)?;

        let residues = chain.residues.clone();
        let chain_key = self
            .chains
            .insert(chain, self.id)
            .map_err(ModelError::DuplicateChains)?;
        for key in residues {
            self.residues[key].chain = Some(chain_key);
        }
        Ok(chain_key)
    }

    /// Unregisters a chain, releasing its residues, and returns it.
    ///
    /// As with [`remove_small_molecule`](Self::remove_small_molecule), the atoms leave the ID
    /// index until the chain is added again.
    pub fn remove_chain(&mut self, key: ChainKey) -> Result<Chain, ModelError> {
        let chain = self.chains.remove(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::Chain,
        })?;
        self.release_atoms(&chain.residues);
        for &residue in &chain.residues {
            if let Some(residue) = self.residues.get_mut(residue) {
                if residue.chain == Some(key) {
                    residue.chain = None;
                }
            }
        }
        Ok(chain)
    }

    registry_lookups!(
        chains, ChainKey, Chain,
        chain, chain_mut, chains_iter,
        find_chain_by_id, find_chain_by_name, find_chains_by_name
    );

    // ----- Bind sites -----

    pub fn add_bind_site(&mut self, site: BindSite) -> Result<SiteKey, ModelError> {
        if self.bind_sites.contains_id(&site.id) {
            return Err(ModelError::DuplicateBindSites(site.id));
        }
        let residues_known = site.residues.iter().all(|&r| self.residues.contains_key(r));
        let atoms_known = site.atoms.iter().all(|&a| self.atoms.contains_key(a));
        if site.origin != self.id || !residues_known || !atoms_known {
            return Err(ModelError::ForeignEntity {
                kind: EntityKind::BindSite,
            });
        }
        self.bind_sites
            .insert(site, self.id)
            .map_err(ModelError::DuplicateBindSites)
    }

    pub fn remove_bind_site(&mut self, key: SiteKey) -> Result<BindSite, ModelError> {
        self.bind_sites.remove(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::BindSite,
        })
    }

    registry_lookups!(
        bind_sites, SiteKey, BindSite,
        bind_site, bind_site_mut, bind_sites_iter,
        find_bind_site_by_id, find_bind_site_by_name, find_bind_sites_by_name
    );

    // ----- Complexes -----

    /// Registers a complex. Every chain it groups must already be registered here.
    ///
    /// A complex that was once registered with another model is rejected, even if its chain
    /// keys happen to name chains of this one.
    pub fn add_complex(&mut self, mut complex: Complex) -> Result<ComplexKey, ModelError> {
        if self.complexes.contains_id(&complex.id) {
            return Err(ModelError::DuplicateComplexes(complex.id));
        }
        let known_chains = complex.chains.iter().all(|&c| self.chains.contains_key(c));
        if complex.origin.is_some_and(|origin| origin != self.id) || !known_chains {
            return Err(ModelError::ForeignEntity {
                kind: EntityKind::Complex,
            });
        }
        complex.origin = Some(self.id);
        self.complexes
            .insert(complex, self.id)
            .map_err(ModelError::DuplicateComplexes)
    }

    pub fn remove_complex(&mut self, key: ComplexKey) -> Result<Complex, ModelError> {
        self.complexes.remove(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::Complex,
        })
    }

    registry_lookups!(
        complexes, ComplexKey, Complex,
        complex, complex_mut, complexes_iter,
        find_complex_by_id, find_complex_by_name, find_complexes_by_name
    );

    // ----- Duplication -----

    /// Copies a registered small molecule, with its internal bonds, and registers the copy.
    ///
    /// Atoms of the copy receive contiguous IDs starting at the model's largest atom ID plus
    /// one, in the order the source lists them.
    ///
    /// # Arguments
    ///
    /// * `key` - The molecule to duplicate.
    /// * `new_id` - ID for the copy. When `None`, the numeric suffix of the source ID is
    ///   incremented until a free ID is found (`"A500"` becomes `"A501"`).
    ///
    /// # Errors
    ///
    /// * [`ModelError::NotOwned`] - `key` is not a registered molecule of this model.
    /// * [`ModelError::IdInUse`] - `new_id` is already taken.
    /// * [`ModelError::MalformedId`] - no `new_id` was given and the source ID does not end
    ///   in a sequence number.
    pub fn duplicate_small_molecule(
        &mut self,
        key: MoleculeKey,
        new_id: Option<&str>,
    ) -> Result<MoleculeKey, ModelError> {
        let source = self.small_molecules.get(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::SmallMolecule,
        })?;
        let molecule_id = match new_id {
            Some(id) if self.small_molecules.contains_id(id) => {
                return Err(ModelError::IdInUse {
                    kind: EntityKind::SmallMolecule,
                    id: id.to_string(),
                });
            }
            Some(id) => id.to_string(),
            None => next_numbered_id(&source.id, |id| self.small_molecules.contains_id(id))
                .ok_or_else(|| ModelError::MalformedId {
                    kind: EntityKind::SmallMolecule,
                    id: source.id.clone(),
                })?,
        };
        let name = source.name.clone();
        let source_atoms = self
            .residues
            .get(source.residue)
            .map(|r| r.atoms.clone())
            .unwrap_or_default();

        let mapping = self.clone_atoms(&source_atoms);
        self.copy_bonds_within(&mapping)?;
        let atoms = source_atoms.iter().filter_map(|a| mapping.get(a).copied()).collect();
        let molecule = self.create_small_molecule(&molecule_id, &name, atoms)?;
        let new_key = self.add_small_molecule(molecule)?;

        debug!(
            "Duplicated small molecule into {} ({} atoms).",
            molecule_id,
            mapping.len()
        );
        Ok(new_key)
    }

    /// Copies a registered chain, with its internal bonds and residue links, and registers
    /// the copy.
    ///
    /// Residue IDs of the copy carry the new chain ID in place of the old one and keep their
    /// sequence numbers. Atom IDs are allocated as in
    /// [`duplicate_small_molecule`](Self::duplicate_small_molecule), residue by residue.
    ///
    /// # Arguments
    ///
    /// * `key` - The chain to duplicate.
    /// * `new_id` - ID for the copy. When `None`, the first free letter from `A` is used.
    ///
    /// # Errors
    ///
    /// * [`ModelError::NotOwned`] - `key` is not a registered chain of this model.
    /// * [`ModelError::IdInUse`] - `new_id` is already taken.
    /// * [`ModelError::ChainIdsExhausted`] - every letter from `A` to `Z` is taken.
    /// * [`ModelError::MalformedId`] - a residue ID is not a chain ID plus sequence number.
    pub fn duplicate_chain(
        &mut self,
        key: ChainKey,
        new_id: Option<&str>,
    ) -> Result<ChainKey, ModelError> {
        let source = self.chains.get(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::Chain,
        })?;
        let chain_id = match new_id {
            Some(id) if self.chains.contains_id(id) => {
                return Err(ModelError::IdInUse {
                    kind: EntityKind::Chain,
                    id: id.to_string(),
                });
            }
            Some(id) => id.to_string(),
            None => next_chain_letter(|id| self.chains.contains_id(id))
                .ok_or(ModelError::ChainIdsExhausted)?,
        };

        let mut plan = Vec::with_capacity(source.residues.len());
        for &residue_key in &source.residues {
            let residue = self.residues.get(residue_key).ok_or(ModelError::ForeignEntity {
                kind: EntityKind::Chain,
            })?;
            let label = residue.label().ok_or_else(|| ModelError::MalformedId {
                kind: EntityKind::Residue,
                id: residue.id.clone(),
            })?;
            plan.push((residue_key, label.with_chain(&chain_id).to_string()));
        }
        let name = source.name.clone();
        let declared_sequence = source.declared_sequence.clone();

        let source_atoms: Vec<AtomKey> = plan
            .iter()
            .flat_map(|(r, _)| self.residues[*r].atoms.iter().copied())
            .collect();
        let mapping = self.clone_atoms(&source_atoms);
        self.copy_bonds_within(&mapping)?;

        let mut new_residues = Vec::with_capacity(plan.len());
        for (old_key, new_residue_id) in &plan {
            let old = &self.residues[*old_key];
            let (residue_name, hetero) = (old.name.clone(), old.hetero);
            let atoms = old.atoms.iter().filter_map(|a| mapping.get(a).copied()).collect();
            new_residues.push(self.insert_residue(new_residue_id, &residue_name, atoms, hetero)?);
        }

        for (i, pair) in plan.windows(2).enumerate() {
            let (old_up, old_down) = (pair[0].0, pair[1].0);
            let Some([up_atom, down_atom]) = self.link_atoms(old_up, old_down) else {
                continue;
            };
            let (Some(&new_up_atom), Some(&new_down_atom)) =
                (mapping.get(&up_atom), mapping.get(&down_atom))
            else {
                continue;
            };
            self.link_residues(new_residues[i], new_residues[i + 1], new_up_atom, new_down_atom)?;
        }

        let mut chain = self.create_chain(Some(&chain_id), new_residues)?;
        chain.name = name;
        chain.declared_sequence = declared_sequence;
        let new_key = self.add_chain(chain)?;

        debug!(
            "Duplicated chain into {} ({} residues, {} atoms).",
            chain_id,
            plan.len(),
            mapping.len()
        );
        Ok(new_key)
    }

    /// Registers a copy of a complex grouping the same chains.
    ///
    /// The copy's ID is the source ID with the next free `_<n>` iteration suffix (`"X1"`
    /// becomes `"X1_1"`, `"X1_1"` becomes `"X1_2"`), and its name is
    /// [`DUPLICATE_COMPLEX_NAME`].
    pub fn duplicate_complex(&mut self, key: ComplexKey) -> Result<ComplexKey, ModelError> {
        let source = self.complexes.get(key).ok_or(ModelError::NotOwned {
            kind: EntityKind::Complex,
        })?;
        let complex_id = next_iteration_id(&source.id, |id| self.complexes.contains_id(id));
        let complex = Complex::new(&complex_id, DUPLICATE_COMPLEX_NAME, source.chains.clone());
        let new_key = self.add_complex(complex)?;

        debug!("Duplicated complex into {}.", complex_id);
        Ok(new_key)
    }

    /// The tail and head atoms of the bond linking `upstream` to `downstream`.
    fn link_atoms(&self, upstream: ResidueKey, downstream: ResidueKey) -> Option<[AtomKey; 2]> {
        let up = self.residues.get(upstream)?;
        if up.next != Some(downstream) {
            return None;
        }
        let [a, b] = self.bonds.get(up.link_bond?)?.atoms();
        if self.atoms.get(a)?.residue == Some(upstream) {
            Some([a, b])
        } else {
            Some([b, a])
        }
    }

    /// Clones atoms with fresh contiguous IDs above the model's current maximum.
    ///
    /// Returns the mapping from each source atom to its copy.
    fn clone_atoms(&mut self, sources: &[AtomKey]) -> HashMap<AtomKey, AtomKey> {
        let mut next_id = self.max_atom_id().map_or(1, |id| id + 1);
        let mut mapping = HashMap::with_capacity(sources.len());
        for &source in sources {
            let Some(atom) = self.atoms.get(source) else {
                continue;
            };
            let copy = atom.duplicate_with_id(next_id);
            let key = self.atoms.insert(copy);
            self.atom_index.insert(next_id, key);
            mapping.insert(source, key);
            next_id += 1;
        }
        mapping
    }

    /// Re-creates, between the copies, every bond whose endpoints were both cloned.
    fn copy_bonds_within(&mut self, mapping: &HashMap<AtomKey, AtomKey>) -> Result<(), ModelError> {
        let internal: HashSet<BondKey> = mapping
            .keys()
            .filter_map(|&a| self.atoms.get(a))
            .flat_map(|atom| atom.bonds())
            .filter(|&b| {
                self.bonds
                    .get(b)
                    .is_some_and(|bond| bond.atoms().iter().all(|a| mapping.contains_key(a)))
            })
            .collect();

        for bond_key in internal {
            let [a, b] = self.bonds[bond_key].atoms();
            if let (Some(&copy_a), Some(&copy_b)) = (mapping.get(&a), mapping.get(&b)) {
                self.create_bond(copy_a, copy_b)?;
            }
        }
        Ok(())
    }
}
