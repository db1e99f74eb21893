use molgraph::core::io::pdb::{pdb_string_to_pdb_dict, Pdb};
use molgraph::core::io::utils::{pdb_from_string, xyz_from_string};
use molgraph::core::io::xyz::Xyz;

// Writes each text at its 0-based column.
fn line(fields: &[(usize, &str)]) -> String {
    let mut chars = vec![' '; 80];
    for (start, text) in fields {
        for (i, c) in text.chars().enumerate() {
            chars[start + i] = c;
        }
    }
    chars.into_iter().collect::<String>().trim_end().to_string()
}

fn atom(
    record: &str,
    chain: &str,
    id: u32,
    name: &str,
    residue: &str,
    number: i64,
    xyz: [f64; 3],
    element: &str,
) -> String {
    let name_column = if element.len() == 2 { 12 } else { 13 };
    line(&[
        (0, record),
        (6, &format!("{id:>5}")),
        (name_column, name),
        (17, residue),
        (21, chain),
        (22, &format!("{number:>4}")),
        (30, &format!("{:>8.3}", xyz[0])),
        (38, &format!("{:>8.3}", xyz[1])),
        (46, &format!("{:>8.3}", xyz[2])),
        (54, "  1.00"),
        (60, " 20.00"),
        (76, &format!("{element:>2}")),
    ])
}

fn heme_fragment() -> String {
    let mut lines = vec![
        line(&[(0, "HEADER"), (10, "OXYGEN TRANSPORT"), (50, "07-MAR-84"), (62, "1HHO")]),
        line(&[(0, "TITLE"), (10, "A SMALL HEME PROTEIN FRAGMENT")]),
        line(&[(0, "COMPND"), (10, "MOL_ID: 1;")]),
        line(&[(0, "COMPND"), (7, "  2"), (11, "MOLECULE: HEMOGLOBIN;")]),
        line(&[(0, "COMPND"), (7, "  3"), (11, "CHAIN: A;")]),
        line(&[(0, "SEQRES"), (7, "  1"), (11, "A"), (13, "   3"), (19, "HIS GLY ALA")]),
        line(&[(0, "REMARK 800 SITE_IDENTIFIER: AC1")]),
        line(&[(0, "REMARK 800 SITE_DESCRIPTION: BINDING SITE FOR RESIDUE HEM A 142")]),
        line(&[(0, "SITE"), (7, "  1"), (11, "AC1"), (15, " 2"), (18, "HIS A  87"), (29, "GLY A  88")]),
    ];

    let residues = [("HIS", 87), ("GLY", 88), ("ALA", 89)];
    let mut id = 1;
    for (r, (residue, number)) in residues.iter().enumerate() {
        let offset = 3.8 * r as f64;
        for (name, element, dx) in [("N", "N", 0.0), ("CA", "C", 1.46), ("C", "C", 2.0), ("O", "O", 2.3)] {
            lines.push(atom("ATOM", "A", id, name, residue, *number, [offset + dx, 1.0, -2.5], element));
            id += 1;
        }
        if *residue == "HIS" {
            lines.push(atom("ATOM", "A", id, "NE2", residue, *number, [1.2, 4.1, -1.0], "N"));
            id += 1;
        }
    }
    lines.push(atom("HETATM", "A", 14, "FE", "HEM", 142, [1.5, 6.0, -0.5], "FE"));
    lines.push(atom("HETATM", "A", 15, "O", "HOH", 301, [9.0, 9.0, 9.0], "O"));
    lines.push(line(&[(0, "CONECT"), (6, "    5"), (11, "   14")]));
    lines.push(line(&[(0, "CONECT"), (6, "   14"), (11, "    5")]));
    lines.push("END".to_string());
    lines.join("\n")
}

fn disulfide_pair() -> String {
    let mut lines = Vec::new();
    for (chain, first, y) in [("A", 1, 0.0), ("B", 5, 4.0)] {
        let placed = [("N", "N", [0.0, y, 0.0]), ("CA", "C", [1.46, y, 0.0]), ("C", "C", [2.0, y, 1.4])];
        for (i, (name, element, xyz)) in placed.into_iter().enumerate() {
            lines.push(atom("ATOM", chain, first + i as u32, name, "CYS", 1, xyz, element));
        }
        let sg_y = if chain == "A" { 0.98 } else { 3.02 };
        lines.push(atom("ATOM", chain, first + 3, "SG", "CYS", 1, [1.46, sg_y, -1.2], "S"));
    }
    lines.push(line(&[(0, "CONECT"), (6, "    4"), (11, "    8")]));
    lines.push(line(&[(0, "CONECT"), (6, "    8"), (11, "    4")]));
    lines.push("END".to_string());
    lines.join("\n")
}

#[test]
fn assembled_file_exposes_the_entity_graph() {
    let pdb = pdb_from_string(&heme_fragment()).unwrap();
    assert_eq!(pdb.header.code.as_deref(), Some("1HHO"));
    assert_eq!(pdb.models.len(), 1);
    let model = pdb.model().unwrap();

    let chain = model.chain(model.find_chain_by_id("A").unwrap()).unwrap();
    assert_eq!(chain.sequence(model), "HGA");
    assert_eq!(chain.name.as_deref(), Some("HEMOGLOBIN"));
    assert_eq!(chain.declared_sequence, vec!["HIS", "GLY", "ALA"]);

    assert!(model.find_small_molecule_by_id("A142").is_some());
    assert!(model.find_small_molecule_by_id("A301").is_some());
    assert_eq!(model.find_small_molecules_by_name("HOH").len(), 1);

    let site = model.bind_site(model.find_bind_site_by_id("AC1").unwrap()).unwrap();
    assert_eq!(site.ligand.as_deref(), Some("A142"));
    assert_eq!(site.residues().len(), 2);

    let complex = model.complex(model.find_complex_by_id("1").unwrap()).unwrap();
    assert_eq!(complex.name, "HEMOGLOBIN");

    let fe = model.find_atom_by_id(14).unwrap();
    let ne2 = model.find_atom_by_id(5).unwrap();
    assert!(model.bond_between(fe, ne2).is_some());
    assert_eq!(model.all_atoms().len(), 15);
}

#[test]
fn written_text_decodes_to_the_same_records() {
    let text = heme_fragment();
    let original = pdb_string_to_pdb_dict(&text).unwrap();
    let pdb = pdb_from_string(&text).unwrap();

    let written = pdb.to_pdb_string();
    assert!(written.lines().all(|l| l.len() == 80));
    assert_eq!(pdb_string_to_pdb_dict(&written).unwrap(), original);

    let again = pdb_from_string(&written).unwrap();
    assert_eq!(again.to_pdb_string(), written);
}

#[test]
fn disulfide_between_chains_survives_a_round_trip() {
    let pdb = pdb_from_string(&disulfide_pair()).unwrap();
    let model = pdb.model().unwrap();
    let (sg_a, sg_b) = (model.find_atom_by_id(4).unwrap(), model.find_atom_by_id(8).unwrap());
    assert!(model.bond_between(sg_a, sg_b).is_some());

    let written = pdb.to_pdb_string();
    assert_eq!(written.lines().filter(|l| l.starts_with("CONECT")).count(), 2);

    let reread = pdb_from_string(&written).unwrap();
    let model = reread.model().unwrap();
    assert!(model.find_chain_by_id("B").is_some());
    let (sg_a, sg_b) = (model.find_atom_by_id(4).unwrap(), model.find_atom_by_id(8).unwrap());
    assert!(model.bond_between(sg_a, sg_b).is_some());
}

#[test]
fn duplicated_entities_survive_a_round_trip() {
    let mut pdb = pdb_from_string(&heme_fragment()).unwrap();
    let model = pdb.model_mut().unwrap();

    let chain = model.find_chain_by_id("A").unwrap();
    let copy = model.duplicate_chain(chain, None).unwrap();
    assert_eq!(model.chain(copy).unwrap().id(), Some("B"));

    let heme = model.find_small_molecule_by_id("A142").unwrap();
    let heme_copy = model.duplicate_small_molecule(heme, None).unwrap();
    assert_eq!(model.small_molecule(heme_copy).unwrap().id(), "A143");

    let text = pdb.to_pdb_string();
    let reread = pdb_from_string(&text).unwrap();
    let model = reread.model().unwrap();
    let chain_b = model.chain(model.find_chain_by_id("B").unwrap()).unwrap();
    assert_eq!(chain_b.sequence(model), "HGA");
    assert!(model.find_small_molecule_by_id("A143").is_some());
    assert_eq!(model.all_atoms().len(), 15 + 13 + 1);
}

#[test]
fn xyz_round_trip_keeps_elements_and_coordinates() {
    let xyz: Xyz = xyz_from_string("3\nwater\nO 0 0 0.1173\nH 0 0.7572 -0.4692\nH 0 -0.7572 -0.4692").unwrap();
    let text = xyz.to_xyz_string();
    let reread = xyz_from_string(&text).unwrap();
    assert_eq!(reread.to_xyz_dict(), xyz.to_xyz_dict());
    assert_eq!(reread.comment.as_deref(), Some("water"));
}

#[test]
fn single_model_wraps_without_header() {
    let pdb = pdb_from_string(&heme_fragment()).unwrap();
    let dict = pdb.to_pdb_dict();
    let mut other = pdb_from_string(&heme_fragment()).unwrap();
    let bare = Pdb::from_model(other.models.remove(0));
    assert_eq!(bare.to_pdb_dict().models, dict.models);
    assert_eq!(bare.header.code, None);
}
