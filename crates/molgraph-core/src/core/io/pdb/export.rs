use super::assembler::Pdb;
use super::dict::{
    AtomRecord, Compound, Connection, ModelBlock, PdbDict, SequenceRecord, SiteRecord, SiteResidue,
};
use super::writer::pdb_dict_to_pdb_string;
use crate::core::models::ids::{AtomKey, BondKey};
use crate::core::models::model::Model;
use crate::core::models::residue::Residue;
use std::collections::HashSet;
use tracing::warn;

/// Atom records for every placed atom a model owns, ordered by atom ID.
///
/// Ghost atoms have no coordinates and are left out.
pub fn model_to_atom_records(model: &Model) -> Vec<AtomRecord> {
    sorted_atoms(model)
        .into_iter()
        .filter_map(|key| {
            let atom = model.atom(key)?;
            let position = atom.position?;
            let residue = atom.residue().and_then(|r| model.residue(r));
            let label = residue.and_then(Residue::label);
            Some(AtomRecord {
                hetero: residue.map_or(true, Residue::is_hetero),
                atom_id: atom.id(),
                atom_name: atom.name.clone(),
                alt_loc: atom.alt_loc,
                residue_name: residue.map(|r| r.name.clone()),
                chain_id: label
                    .as_ref()
                    .map(|l| l.chain.clone())
                    .filter(|c| !c.is_empty()),
                residue_number: label.as_ref().map(|l| l.number),
                insert_code: label.as_ref().and_then(|l| l.insert_code),
                x: position.x,
                y: position.y,
                z: position.z,
                occupancy: atom.occupancy,
                temperature_factor: atom.temperature_factor,
                element: Some(atom.element.clone()).filter(|e| !e.is_empty()),
                charge: atom.charge,
            })
        })
        .collect()
}

/// Connection records for every bond between owned atoms that does not carry a residue link.
///
/// Links are rebuilt from residue order and link atoms on decoding. Every other bond, ligand
/// contacts and disulfides alike, can only come back from a `CONECT` record, so each one is
/// listed from both of its atoms.
pub fn model_connections(model: &Model) -> Vec<Connection> {
    let owned = model.all_atoms();
    let links: HashSet<BondKey> = model
        .residues_iter()
        .filter_map(|(_, residue)| residue.link_bond)
        .collect();

    sorted_atoms(model)
        .into_iter()
        .filter_map(|key| {
            let atom = model.atom(key)?;
            let mut bonded: Vec<u32> = atom
                .bonds()
                .filter(|bond| !links.contains(bond))
                .filter_map(|bond| model.bond(bond)?.partner(key))
                .filter(|partner| owned.contains(partner))
                .filter_map(|partner| model.atom(partner).map(|a| a.id()))
                .collect();
            bonded.sort_unstable();
            (!bonded.is_empty()).then(|| Connection {
                atom: atom.id(),
                bonded,
            })
        })
        .collect()
}

fn sorted_atoms(model: &Model) -> Vec<AtomKey> {
    let mut atoms: Vec<AtomKey> = model.all_atoms().into_iter().collect();
    atoms.sort_by_key(|&key| model.atom(key).map_or(u32::MAX, |a| a.id()));
    atoms
}

fn compounds(model: &Model) -> Vec<Compound> {
    model
        .complexes_iter()
        .map(|(_, complex)| Compound {
            mol_id: complex.id().to_string(),
            molecule: Some(complex.name.clone()).filter(|n| !n.is_empty()),
            chains: complex
                .chains()
                .iter()
                .filter_map(|&c| model.chain(c)?.id().map(str::to_string))
                .collect(),
        })
        .collect()
}

fn sequences(model: &Model) -> Vec<SequenceRecord> {
    model
        .chains_iter()
        .filter(|(_, chain)| !chain.declared_sequence.is_empty())
        .filter_map(|(_, chain)| {
            Some(SequenceRecord {
                chain_id: chain.id()?.to_string(),
                residues: chain.declared_sequence.clone(),
            })
        })
        .collect()
}

fn sites(model: &Model) -> Vec<SiteRecord> {
    model
        .bind_sites_iter()
        .map(|(_, site)| SiteRecord {
            id: site.id().to_string(),
            residues: site
                .residues()
                .iter()
                .filter_map(|&key| {
                    let residue = model.residue(key)?;
                    let label = residue.label()?;
                    Some(SiteResidue {
                        residue_name: residue.name.clone(),
                        chain_id: label.chain,
                        residue_number: label.number,
                        insert_code: label.insert_code,
                    })
                })
                .collect(),
            description: site.name.clone(),
        })
        .collect()
}

impl Pdb {
    /// Wraps a single model with an empty header.
    pub fn from_model(model: Model) -> Self {
        Self {
            models: vec![model],
            ..Self::default()
        }
    }

    /// Converts back to the record-level dictionary.
    ///
    /// Compounds, sequences, sites and connections are taken from the first model, since the
    /// format stores them once for the whole file.
    pub fn to_pdb_dict(&self) -> PdbDict {
        let mut dict = PdbDict {
            header: self.header.clone(),
            models: self
                .models
                .iter()
                .enumerate()
                .map(|(i, model)| ModelBlock {
                    number: i as i64 + 1,
                    atoms: model_to_atom_records(model),
                })
                .collect(),
            ..PdbDict::default()
        };
        if let Some(first) = self.models.first() {
            for (_, chain) in first.chains_iter() {
                if let Some(id) = chain.id().filter(|id| id.chars().count() > 1) {
                    warn!(
                        "Chain ID '{}' does not fit the one-column chain field and is cut to '{}'.",
                        id,
                        id.chars().next().unwrap_or(' ')
                    );
                }
            }
            dict.compounds = compounds(first);
            dict.sequences = sequences(first);
            dict.sites = sites(first);
            dict.connections = model_connections(first);
        }
        dict
    }

    pub fn to_pdb_string(&self) -> String {
        pdb_dict_to_pdb_string(&self.to_pdb_dict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::ids::ResidueKey;
    use nalgebra::Point3;

    fn model_with_ligand() -> Model {
        let mut model = Model::new();
        let names = ["N", "CA", "C"];
        let mut atoms = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let atom = Atom::new(i as u32 + 1, &name[..1], name, Point3::new(i as f64, 0.0, 0.0));
            atoms.push(model.create_atom(atom).unwrap());
        }
        let residue = model.create_residue("A1", "GLY", atoms).unwrap();
        let chain = model.create_chain(Some("A"), vec![residue]).unwrap();
        model.add_chain(chain).unwrap();

        let fe = model
            .create_atom(Atom::new(10, "FE", "FE", Point3::new(5.0, 5.0, 5.0)))
            .unwrap();
        let molecule = model.create_small_molecule("A142", "HEM", vec![fe]).unwrap();
        model.add_small_molecule(molecule).unwrap();
        let ca = model.find_atom_by_id(2).unwrap();
        model.create_bond(fe, ca).unwrap();
        model
            .add_atom(Atom::ghost(11, "H", "H1"))
            .unwrap();
        model
    }

    #[test]
    fn atom_records_carry_residue_labels_in_id_order() {
        let records = model_to_atom_records(&model_with_ligand());
        let ids: Vec<u32> = records.iter().map(|r| r.atom_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 10]);

        assert!(!records[0].hetero);
        assert_eq!(records[0].chain_id.as_deref(), Some("A"));
        assert_eq!(records[0].residue_number, Some(1));
        assert!(records[3].hetero);
        assert_eq!(records[3].residue_name.as_deref(), Some("HEM"));
        assert_eq!(records[3].residue_number, Some(142));
    }

    #[test]
    fn connections_list_each_bond_from_both_atoms() {
        let connections = model_connections(&model_with_ligand());
        assert_eq!(
            connections,
            vec![
                Connection {
                    atom: 2,
                    bonded: vec![10]
                },
                Connection {
                    atom: 10,
                    bonded: vec![2]
                }
            ]
        );
    }

    fn cysteine(model: &mut Model, id: &str, first_atom: u32, x: f64) -> ResidueKey {
        let atoms = ["N", "C", "SG"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let position = Point3::new(x + i as f64, 0.0, 0.0);
                let atom = Atom::new(first_atom + i as u32, &name[..1], name, position);
                model.create_atom(atom).unwrap()
            })
            .collect();
        model.create_residue(id, "CYS", atoms).unwrap()
    }

    #[test]
    fn residue_links_are_not_written_but_disulfides_are() {
        let mut model = Model::new();
        let a1 = cysteine(&mut model, "A1", 1, 0.0);
        let a2 = cysteine(&mut model, "A2", 4, 3.0);
        let b1 = cysteine(&mut model, "B1", 7, 10.0);
        let c = model.find_atom_in_residue(a1, "C").unwrap();
        let n = model.find_atom_in_residue(a2, "N").unwrap();
        model.link_residues(a1, a2, c, n).unwrap();
        for (id, residues) in [("A", vec![a1, a2]), ("B", vec![b1])] {
            let chain = model.create_chain(Some(id), residues).unwrap();
            model.add_chain(chain).unwrap();
        }
        let sg_a = model.find_atom_in_residue(a1, "SG").unwrap();
        let sg_b = model.find_atom_in_residue(b1, "SG").unwrap();
        model.create_bond(sg_a, sg_b).unwrap();

        assert_eq!(
            model_connections(&model),
            vec![
                Connection {
                    atom: 3,
                    bonded: vec![9]
                },
                Connection {
                    atom: 9,
                    bonded: vec![3]
                }
            ]
        );
    }

    #[test]
    fn long_chain_ids_are_cut_to_one_column() {
        let mut model = model_with_ligand();
        let chain = model.find_chain_by_id("A").unwrap();
        model.duplicate_chain(chain, Some("AB")).unwrap();
        let pdb = Pdb::from_model(model);

        let dict = pdb.to_pdb_dict();
        assert!(dict.models[0].atoms.iter().any(|a| a.chain_id.as_deref() == Some("AB")));
        let text = pdb.to_pdb_string();
        assert!(!text.contains("GLY AB"));
        assert_eq!(text.matches("GLY A   1").count(), 6);
    }

    #[test]
    fn single_model_text_has_no_model_records() {
        let pdb = Pdb::from_model(model_with_ligand());
        let text = pdb.to_pdb_string();
        assert!(!text.contains("MODEL"));
        assert!(text.contains("CONECT   10    2"));
    }
}
