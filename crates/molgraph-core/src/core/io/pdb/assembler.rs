use super::dict::{AtomRecord, Connection, ModelBlock, PdbDict, PdbHeader, SiteRecord};
use crate::core::models::atom::Atom;
use crate::core::models::bond::BondError;
use crate::core::models::complex::Complex;
use crate::core::models::connectivity::ConnectivityError;
use crate::core::models::error::ModelError;
use crate::core::models::ids::{AtomKey, ResidueKey};
use crate::core::models::model::Model;
use crate::core::topology::links::LinkRegistry;
use crate::core::utils::identifiers::ResidueLabel;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};

/// Longest distance, in ångström, at which the link atoms of consecutive residues count as
/// bonded when the file declares no connection between them.
pub const MAX_LINK_LENGTH: f64 = 2.0;

/// A decoded PDB file: its metadata and one [`Model`] per model block.
#[derive(Debug, Default)]
pub struct Pdb {
    pub header: PdbHeader,
    pub models: Vec<Model>,
}

impl Pdb {
    /// The first model, which is the only one for most files.
    pub fn model(&self) -> Option<&Model> {
        self.models.first()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.models.first_mut()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Atom ID {id} appears more than once in model {model}")]
    DuplicateAtomId { model: i64, id: u32 },
    #[error("Connection refers to atom {0}, which is not in the model")]
    UnresolvedAtom(u32),
    #[error("Site {site} refers to residue {residue}, which is not in the model")]
    UnresolvedResidue { site: String, residue: String },
    #[error("Compound {compound} refers to chain {chain}, which is not in the model")]
    UnresolvedChain { compound: String, chain: String },
    #[error("The file declares an entity twice: {0}")]
    DuplicateOnLoad(ModelError),
    #[error(transparent)]
    Connectivity(ConnectivityError),
    #[error(transparent)]
    Bond(BondError),
    #[error(transparent)]
    Model(ModelError),
}

impl From<ModelError> for AssemblyError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::DuplicateSmallMolecules(_)
            | ModelError::DuplicateChains(_)
            | ModelError::DuplicateBindSites(_)
            | ModelError::DuplicateComplexes(_) => AssemblyError::DuplicateOnLoad(error),
            ModelError::Connectivity(source) => AssemblyError::Connectivity(source),
            ModelError::Bond(source) => AssemblyError::Bond(source),
            other => AssemblyError::Model(other),
        }
    }
}

impl From<BondError> for AssemblyError {
    fn from(error: BondError) -> Self {
        AssemblyError::Bond(error)
    }
}

/// Atoms sharing a chain, residue number and insertion code, in file order.
struct ResidueGroup {
    label: ResidueLabel,
    name: String,
    hetero: bool,
    atoms: Vec<AtomKey>,
}

/// Builds the entity graph for every model block of a [`PdbDict`].
///
/// Polymer residues are joined into one chain per chain identifier, linking consecutive
/// residues through the link atoms named by `links`. Two residues are only linked when their
/// link atoms are already bonded or lie within [`MAX_LINK_LENGTH`]. Residues made of `HETATM`
/// records become small molecules unless their head atom bonds to the tail of the chain read
/// so far, in which case they stay in the chain. Atoms with no residue information stay loose. Connections, sites and
/// compounds apply to every model.
///
/// # Errors
///
/// Fails on the first unresolvable reference, broken chain or duplicated entity. The file is
/// never partially assembled.
#[instrument(skip_all, name = "pdb_assembly")]
pub fn pdb_dict_to_pdb(dict: &PdbDict, links: &LinkRegistry) -> Result<Pdb, AssemblyError> {
    let models = dict
        .models
        .iter()
        .map(|block| assemble_model(dict, block, links))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Pdb {
        header: dict.header.clone(),
        models,
    })
}

fn assemble_model(
    dict: &PdbDict,
    block: &ModelBlock,
    links: &LinkRegistry,
) -> Result<Model, AssemblyError> {
    let mut model = Model::new();
    let groups = create_atoms(&mut model, block)?;
    create_bonds(&mut model, &dict.connections)?;

    let mut residue_ids: HashMap<String, ResidueKey> = HashMap::new();
    let mut chains: Vec<(String, Vec<(ResidueKey, String)>)> = Vec::new();
    let mut molecules = Vec::new();

    for group in groups {
        let id = group.label.to_string();
        let chain = chains.iter().position(|(chain_id, _)| *chain_id == group.label.chain);
        let last = chain.and_then(|i| chains[i].1.last());
        if group.hetero && !continues_chain(&model, last, &group, links) {
            let molecule = model.create_small_molecule(&id, &group.name, group.atoms)?;
            residue_ids.insert(id, molecule.residue());
            molecules.push(molecule);
            continue;
        }
        let key = model.insert_residue(&id, &group.name, group.atoms, group.hetero)?;
        residue_ids.insert(id, key);
        match chain {
            Some(i) => chains[i].1.push((key, group.name)),
            None => chains.push((group.label.chain.clone(), vec![(key, group.name)])),
        }
    }

    for (chain_id, residues) in &chains {
        link_chain(&mut model, residues, links)?;
        let order = residues.iter().map(|(key, _)| *key).collect();
        let id = (!chain_id.is_empty()).then_some(chain_id.as_str());
        let mut chain = model.create_chain(id, order)?;
        chain.name = dict
            .compounds
            .iter()
            .find(|c| c.chains.contains(chain_id))
            .and_then(|c| c.molecule.clone());
        if let Some(sequence) = dict.sequences.iter().find(|s| s.chain_id == *chain_id) {
            chain.declared_sequence = sequence.residues.clone();
        }
        model.add_chain(chain)?;
    }
    for molecule in molecules {
        model.add_small_molecule(molecule)?;
    }
    for site in &dict.sites {
        create_site(&mut model, site, &residue_ids)?;
    }
    for compound in &dict.compounds {
        let mut chain_keys = Vec::with_capacity(compound.chains.len());
        for chain in &compound.chains {
            chain_keys.push(model.find_chain_by_id(chain).ok_or_else(|| {
                AssemblyError::UnresolvedChain {
                    compound: compound.mol_id.clone(),
                    chain: chain.clone(),
                }
            })?);
        }
        let name = compound.molecule.as_deref().unwrap_or("");
        model.add_complex(Complex::new(&compound.mol_id, name, chain_keys))?;
    }

    debug!(
        "Assembled model {}: {} atoms, {} chains, {} small molecules, {} sites.",
        block.number,
        model.all_atoms().len(),
        model.chains_iter().count(),
        model.small_molecules_iter().count(),
        model.bind_sites_iter().count()
    );
    Ok(model)
}

fn atom_from_record(record: &AtomRecord) -> Atom {
    let element = record.element.clone().unwrap_or_else(|| {
        record
            .atom_name
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_string())
            .unwrap_or_default()
    });
    let position = Point3::new(record.x, record.y, record.z);
    let mut atom = Atom::new(record.atom_id, &element, &record.atom_name, position);
    atom.alt_loc = record.alt_loc;
    atom.occupancy = record.occupancy;
    atom.temperature_factor = record.temperature_factor;
    atom.charge = record.charge;
    atom
}

fn create_atoms(model: &mut Model, block: &ModelBlock) -> Result<Vec<ResidueGroup>, AssemblyError> {
    let mut groups: Vec<ResidueGroup> = Vec::new();
    let mut index: HashMap<ResidueLabel, usize> = HashMap::new();

    for record in &block.atoms {
        let duplicate = || AssemblyError::DuplicateAtomId {
            model: block.number,
            id: record.atom_id,
        };
        if record.residue_name.is_none() && record.residue_number.is_none() {
            model.add_atom(atom_from_record(record)).map_err(|_| duplicate())?;
            continue;
        }
        let key = model
            .create_atom(atom_from_record(record))
            .map_err(|_| duplicate())?;

        let label = ResidueLabel::new(
            record.chain_id.as_deref().unwrap_or(""),
            record.residue_number.unwrap_or(0),
            record.insert_code,
        );
        let position = *index.entry(label.clone()).or_insert_with(|| {
            groups.push(ResidueGroup {
                label,
                name: record.residue_name.clone().unwrap_or_default(),
                hetero: false,
                atoms: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[position];
        group.hetero |= record.hetero;
        group.atoms.push(key);
    }
    Ok(groups)
}

fn create_bonds(model: &mut Model, connections: &[Connection]) -> Result<(), AssemblyError> {
    for connection in connections {
        let atom = model
            .find_atom_by_id(connection.atom)
            .ok_or(AssemblyError::UnresolvedAtom(connection.atom))?;
        for &partner_id in &connection.bonded {
            let partner = model
                .find_atom_by_id(partner_id)
                .ok_or(AssemblyError::UnresolvedAtom(partner_id))?;
            if model.bond_between(atom, partner).is_none() {
                model.create_bond(atom, partner)?;
            }
        }
    }
    Ok(())
}

/// Whether two link atoms are bonded, either by a declared connection or by lying within
/// [`MAX_LINK_LENGTH`] of each other.
fn can_link(model: &Model, tail: AtomKey, head: AtomKey) -> bool {
    if model.bond_between(tail, head).is_some() {
        return true;
    }
    match (model.atom(tail), model.atom(head)) {
        (Some(a), Some(b)) => a.distance_to(b).is_some_and(|d| d <= MAX_LINK_LENGTH),
        _ => false,
    }
}

/// Whether a `HETATM` group is a modified polymer residue (MSE, for instance) bonded to the
/// end of its chain rather than a separate small molecule.
fn continues_chain(
    model: &Model,
    last: Option<&(ResidueKey, String)>,
    group: &ResidueGroup,
    links: &LinkRegistry,
) -> bool {
    let Some((up, up_name)) = last else {
        return false;
    };
    let Some(tail) = model.find_atom_in_residue(*up, &links.links_for(up_name).tail) else {
        return false;
    };
    let head_name = &links.links_for(&group.name).head;
    group
        .atoms
        .iter()
        .filter(|&&a| model.atom(a).is_some_and(|atom| atom.name == *head_name))
        .any(|&head| can_link(model, tail, head))
}

fn link_chain(
    model: &mut Model,
    residues: &[(ResidueKey, String)],
    links: &LinkRegistry,
) -> Result<(), AssemblyError> {
    for pair in residues.windows(2) {
        let ((up, up_name), (down, down_name)) = (&pair[0], &pair[1]);
        let tail = model.find_atom_in_residue(*up, &links.links_for(up_name).tail);
        let head = model.find_atom_in_residue(*down, &links.links_for(down_name).head);
        let link = tail.zip(head).filter(|&(t, h)| can_link(model, t, h));
        let Some((tail, head)) = link else {
            let residue = model.residue(*up).map(|r| r.id().to_string()).unwrap_or_default();
            debug!("No backbone bond between {} and the residue after it.", residue);
            return Err(AssemblyError::Connectivity(ConnectivityError::BrokenChain {
                residue,
            }));
        };
        model.link_residues(*up, *down, tail, head)?;
    }
    Ok(())
}

fn create_site(
    model: &mut Model,
    site: &SiteRecord,
    residue_ids: &HashMap<String, ResidueKey>,
) -> Result<(), AssemblyError> {
    let mut residues = Vec::with_capacity(site.residues.len());
    for residue in &site.residues {
        let id = ResidueLabel::new(&residue.chain_id, residue.residue_number, residue.insert_code)
            .to_string();
        let key = residue_ids
            .get(&id)
            .copied()
            .ok_or_else(|| AssemblyError::UnresolvedResidue {
                site: site.id.clone(),
                residue: id,
            })?;
        residues.push(key);
    }

    let mut bind_site = model.create_bind_site(&site.id, residues)?;
    bind_site.name = site.description.clone();
    bind_site.ligand = site.description.as_deref().and_then(ligand_id);
    model.add_bind_site(bind_site)?;
    Ok(())
}

/// The residue ID named by a description such as `"BINDING SITE FOR RESIDUE HEM A 142"`.
fn ligand_id(description: &str) -> Option<String> {
    let (_, rest) = description.split_once("RESIDUE ")?;
    let mut tokens = rest.split_whitespace().skip(1);
    let first = tokens.next()?;
    let label: ResidueLabel = match first.parse() {
        Ok(label) => label,
        Err(_) => format!("{first}{}", tokens.next()?).parse().ok()?,
    };
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::dict::{Compound, SequenceRecord, SiteResidue};

    fn record(id: u32, name: &str, residue: &str, chain: &str, number: i64) -> AtomRecord {
        AtomRecord {
            hetero: false,
            atom_id: id,
            atom_name: name.to_string(),
            alt_loc: None,
            residue_name: Some(residue.to_string()),
            chain_id: Some(chain.to_string()),
            residue_number: Some(number),
            insert_code: None,
            x: id as f64,
            y: 0.0,
            z: 0.0,
            occupancy: Some(1.0),
            temperature_factor: Some(20.0),
            element: None,
            charge: None,
        }
    }

    fn backbone(first_id: u32, residue: &str, chain: &str, number: i64) -> Vec<AtomRecord> {
        ["N", "CA", "C", "O"]
            .iter()
            .enumerate()
            .map(|(i, name)| record(first_id + i as u32, name, residue, chain, number))
            .collect()
    }

    fn heme(id: u32) -> AtomRecord {
        AtomRecord {
            hetero: true,
            element: Some("FE".to_string()),
            ..record(id, "FE", "HEM", "A", 142)
        }
    }

    fn tripeptide_dict() -> PdbDict {
        let mut atoms = backbone(1, "MET", "A", 1);
        atoms.extend(backbone(5, "ALA", "A", 2));
        atoms.extend(backbone(9, "GLY", "A", 3));
        atoms.push(heme(13));
        PdbDict {
            models: vec![ModelBlock { number: 1, atoms }],
            ..PdbDict::default()
        }
    }

    fn assemble(dict: &PdbDict) -> Result<Pdb, AssemblyError> {
        pdb_dict_to_pdb(dict, &LinkRegistry::default())
    }

    #[test]
    fn polymer_residues_form_a_linked_chain() {
        let pdb = assemble(&tripeptide_dict()).unwrap();
        let model = pdb.model().unwrap();

        let chain_key = model.find_chain_by_id("A").unwrap();
        let chain = model.chain(chain_key).unwrap();
        assert_eq!(chain.sequence(model), "MAG");

        let first = model.residue(chain.residues()[0]).unwrap();
        assert_eq!(first.id(), "A1");
        assert_eq!(first.next(), Some(chain.residues()[1]));

        let c = model.find_atom_by_id(3).unwrap();
        let n = model.find_atom_by_id(5).unwrap();
        assert!(model.bond_between(c, n).is_some());
    }

    #[test]
    fn hetero_residues_become_small_molecules() {
        let pdb = assemble(&tripeptide_dict()).unwrap();
        let model = pdb.model().unwrap();

        let key = model.find_small_molecule_by_id("A142").unwrap();
        let molecule = model.small_molecule(key).unwrap();
        assert_eq!(molecule.name, "HEM");
        assert_eq!(molecule.atoms(model).len(), 1);
        assert_eq!(model.chain(model.find_chain_by_id("A").unwrap()).unwrap().len(), 3);
    }

    #[test]
    fn element_falls_back_to_first_letter_of_name() {
        let pdb = assemble(&tripeptide_dict()).unwrap();
        let model = pdb.model().unwrap();
        let ca = model.atom(model.find_atom_by_id(2).unwrap()).unwrap();
        assert_eq!(ca.element, "C");
        let fe = model.atom(model.find_atom_by_id(13).unwrap()).unwrap();
        assert_eq!(fe.element, "FE");
    }

    #[test]
    fn atoms_without_residue_information_stay_loose() {
        let mut dict = tripeptide_dict();
        dict.models[0].atoms.push(AtomRecord {
            residue_name: None,
            residue_number: None,
            chain_id: None,
            ..record(99, "ZN", "", "", 0)
        });
        let pdb = assemble(&dict).unwrap();
        let model = pdb.model().unwrap();
        let zn = model.find_atom_by_id(99).unwrap();
        assert_eq!(model.loose_atoms(), &[zn]);
        assert!(model.atom(zn).unwrap().residue().is_none());
    }

    #[test]
    fn connections_create_bonds_once() {
        let mut dict = tripeptide_dict();
        dict.connections = vec![
            Connection { atom: 13, bonded: vec![12] },
            Connection { atom: 12, bonded: vec![13] },
        ];
        let pdb = assemble(&dict).unwrap();
        let model = pdb.model().unwrap();
        let fe = model.find_atom_by_id(13).unwrap();
        assert_eq!(model.atom(fe).unwrap().bond_count(), 1);
    }

    #[test]
    fn connection_to_missing_atom_is_rejected() {
        let mut dict = tripeptide_dict();
        dict.connections = vec![Connection { atom: 13, bonded: vec![500] }];
        assert_eq!(assemble(&dict).unwrap_err(), AssemblyError::UnresolvedAtom(500));
    }

    #[test]
    fn repeated_atom_id_is_rejected() {
        let mut dict = tripeptide_dict();
        dict.models[0].atoms.push(heme(2));
        assert_eq!(
            assemble(&dict).unwrap_err(),
            AssemblyError::DuplicateAtomId { model: 1, id: 2 }
        );
    }

    #[test]
    fn missing_link_atom_breaks_the_chain() {
        let mut dict = tripeptide_dict();
        dict.models[0].atoms.retain(|a| a.atom_id != 7);
        assert_eq!(
            assemble(&dict).unwrap_err(),
            AssemblyError::Connectivity(ConnectivityError::BrokenChain {
                residue: "A2".to_string()
            })
        );
    }

    fn dict_of(atoms: Vec<AtomRecord>) -> PdbDict {
        PdbDict {
            models: vec![ModelBlock { number: 1, atoms }],
            ..PdbDict::default()
        }
    }

    fn shifted(mut atoms: Vec<AtomRecord>, dx: f64) -> Vec<AtomRecord> {
        for atom in &mut atoms {
            atom.x += dx;
        }
        atoms
    }

    fn hetero(mut atoms: Vec<AtomRecord>) -> Vec<AtomRecord> {
        for atom in &mut atoms {
            atom.hetero = true;
        }
        atoms
    }

    #[test]
    fn distant_residues_are_not_bonded_across_a_gap() {
        let mut atoms = backbone(1, "ALA", "A", 1);
        atoms.extend(shifted(backbone(5, "ALA", "A", 50), 56.0));
        assert_eq!(
            assemble(&dict_of(atoms)).unwrap_err(),
            AssemblyError::Connectivity(ConnectivityError::BrokenChain {
                residue: "A1".to_string()
            })
        );
    }

    #[test]
    fn declared_connection_links_residues_beyond_the_cutoff() {
        let mut atoms = backbone(1, "ALA", "A", 1);
        atoms.extend(shifted(backbone(5, "ALA", "A", 2), 1.0));
        let mut dict = dict_of(atoms);
        dict.connections = vec![Connection { atom: 3, bonded: vec![5] }];

        let pdb = assemble(&dict).unwrap();
        let model = pdb.model().unwrap();
        let chain = model.chain(model.find_chain_by_id("A").unwrap()).unwrap();
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn modified_residue_stays_in_the_chain() {
        let mut atoms = backbone(1, "ALA", "A", 1);
        atoms.extend(hetero(backbone(5, "MSE", "A", 2)));
        atoms.extend(backbone(9, "ALA", "A", 3));
        let pdb = assemble(&dict_of(atoms)).unwrap();
        let model = pdb.model().unwrap();

        let chain = model.chain(model.find_chain_by_id("A").unwrap()).unwrap();
        assert_eq!(chain.sequence(model), "AMA");
        assert!(model.residue(chain.residues()[1]).unwrap().is_hetero());
        assert!(model.find_small_molecule_by_id("A2").is_none());

        let c = model.find_atom_by_id(3).unwrap();
        let far_n = model.find_atom_by_id(9).unwrap();
        assert!(model.bond_between(c, far_n).is_none());
    }

    #[test]
    fn detached_hetero_residue_does_not_bridge_its_neighbours() {
        let mut atoms = backbone(1, "ALA", "A", 1);
        atoms.extend(shifted(hetero(backbone(5, "MSE", "A", 2)), 40.0));
        atoms.extend(backbone(9, "ALA", "A", 3));
        assert_eq!(
            assemble(&dict_of(atoms)).unwrap_err(),
            AssemblyError::Connectivity(ConnectivityError::BrokenChain {
                residue: "A1".to_string()
            })
        );
    }

    #[test]
    fn sites_resolve_residues_and_ligand() {
        let mut dict = tripeptide_dict();
        dict.sites = vec![SiteRecord {
            id: "AC1".to_string(),
            residues: vec![SiteResidue {
                residue_name: "ALA".to_string(),
                chain_id: "A".to_string(),
                residue_number: 2,
                insert_code: None,
            }],
            description: Some("BINDING SITE FOR RESIDUE HEM A 142".to_string()),
        }];
        let pdb = assemble(&dict).unwrap();
        let model = pdb.model().unwrap();
        let site = model.bind_site(model.find_bind_site_by_id("AC1").unwrap()).unwrap();
        assert_eq!(site.ligand.as_deref(), Some("A142"));
        assert_eq!(site.atoms().len(), 4);
    }

    #[test]
    fn site_with_unknown_residue_is_rejected() {
        let mut dict = tripeptide_dict();
        dict.sites = vec![SiteRecord {
            id: "AC1".to_string(),
            residues: vec![SiteResidue {
                residue_name: "TRP".to_string(),
                chain_id: "B".to_string(),
                residue_number: 7,
                insert_code: None,
            }],
            description: None,
        }];
        assert_eq!(
            assemble(&dict).unwrap_err(),
            AssemblyError::UnresolvedResidue {
                site: "AC1".to_string(),
                residue: "B7".to_string()
            }
        );
    }

    #[test]
    fn compounds_name_chains_and_form_complexes() {
        let mut dict = tripeptide_dict();
        dict.compounds = vec![Compound {
            mol_id: "1".to_string(),
            molecule: Some("TRIPEPTIDE".to_string()),
            chains: vec!["A".to_string()],
        }];
        dict.sequences = vec![SequenceRecord {
            chain_id: "A".to_string(),
            residues: vec!["MET".into(), "ALA".into(), "GLY".into(), "SER".into()],
        }];
        let pdb = assemble(&dict).unwrap();
        let model = pdb.model().unwrap();

        let chain = model.chain(model.find_chain_by_id("A").unwrap()).unwrap();
        assert_eq!(chain.name.as_deref(), Some("TRIPEPTIDE"));
        assert_eq!(chain.declared_sequence.len(), 4);

        let complex = model.complex(model.find_complex_by_id("1").unwrap()).unwrap();
        assert_eq!(complex.name, "TRIPEPTIDE");
        assert_eq!(complex.chains().len(), 1);
    }

    #[test]
    fn compound_with_unknown_chain_is_rejected() {
        let mut dict = tripeptide_dict();
        dict.compounds = vec![Compound {
            mol_id: "1".to_string(),
            molecule: None,
            chains: vec!["Z".to_string()],
        }];
        assert_eq!(
            assemble(&dict).unwrap_err(),
            AssemblyError::UnresolvedChain {
                compound: "1".to_string(),
                chain: "Z".to_string()
            }
        );
    }

    #[test]
    fn repeated_compound_is_a_duplicate_on_load() {
        let mut dict = tripeptide_dict();
        let compound = Compound {
            mol_id: "1".to_string(),
            molecule: None,
            chains: vec!["A".to_string()],
        };
        dict.compounds = vec![compound.clone(), compound];
        assert_eq!(
            assemble(&dict).unwrap_err(),
            AssemblyError::DuplicateOnLoad(ModelError::DuplicateComplexes("1".to_string()))
        );
    }

    #[test]
    fn each_model_block_becomes_a_model() {
        let mut dict = tripeptide_dict();
        let mut second = dict.models[0].clone();
        second.number = 2;
        dict.models.push(second);
        let pdb = assemble(&dict).unwrap();
        assert_eq!(pdb.models.len(), 2);
        assert_ne!(pdb.models[0].id(), pdb.models[1].id());
        assert!(pdb.models[1].find_chain_by_id("A").is_some());
    }

    #[test]
    fn ligand_id_handles_missing_chain() {
        assert_eq!(ligand_id("BINDING SITE FOR RESIDUE HOH 301").as_deref(), Some("301"));
        assert_eq!(ligand_id("BINDING SITE FOR RESIDUE NAG B 1"), Some("B1".to_string()));
        assert_eq!(ligand_id("CATALYTIC TRIAD"), None);
    }
}
