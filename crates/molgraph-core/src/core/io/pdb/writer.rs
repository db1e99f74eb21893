use super::dict::{AtomRecord, Connection, PdbDict, SiteResidue};
use crate::core::io::record::RECORD_WIDTH;

const TEXT_WIDTH: usize = 69;
const SEQRES_NAMES_PER_LINE: usize = 13;
const SITE_RESIDUES_PER_LINE: usize = 4;
const CONECT_PARTNERS_PER_LINE: usize = 4;

/// Renders a [`PdbDict`] as PDB text, one 80-column line per record.
///
/// `MODEL`/`ENDMDL` records are only written when there is more than one model. The chain
/// identifier has a single column, so only the first character of a longer chain ID is
/// written.
pub fn pdb_dict_to_pdb_string(dict: &PdbDict) -> String {
    let mut lines = Vec::new();
    write_header(dict, &mut lines);
    write_compounds(dict, &mut lines);
    write_sequences(dict, &mut lines);
    write_sites(dict, &mut lines);

    let multi_model = dict.models.len() > 1;
    for model in &dict.models {
        if multi_model {
            lines.push(format!("MODEL     {:>4}", model.number));
        }
        lines.extend(model.atoms.iter().map(atom_line));
        if multi_model {
            lines.push("ENDMDL".to_string());
        }
    }
    lines.extend(dict.connections.iter().flat_map(conect_lines));
    lines.push("END".to_string());

    lines
        .iter()
        .map(|line| format!("{line:<RECORD_WIDTH$}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_header(dict: &PdbDict, lines: &mut Vec<String>) {
    let header = &dict.header;
    if header.classification.is_some() || header.deposition_date.is_some() || header.code.is_some()
    {
        lines.push(format!(
            "HEADER    {:<40}{:<9}   {}",
            header.classification.as_deref().unwrap_or(""),
            header.deposition_date.as_deref().unwrap_or(""),
            header.code.as_deref().unwrap_or("")
        ));
    }
    if let Some(title) = &header.title {
        for (i, chunk) in wrap_words(title).iter().enumerate() {
            if i == 0 {
                lines.push(format!("TITLE     {chunk}"));
            } else {
                lines.push(format!("TITLE   {:>2} {chunk}", i + 1));
            }
        }
    }
}

fn write_compounds(dict: &PdbDict, lines: &mut Vec<String>) {
    let mut entries = Vec::new();
    for compound in &dict.compounds {
        entries.push(format!("MOL_ID: {};", compound.mol_id));
        if let Some(molecule) = &compound.molecule {
            entries.push(format!("MOLECULE: {molecule};"));
        }
        if !compound.chains.is_empty() {
            entries.push(format!("CHAIN: {};", compound.chains.join(", ")));
        }
    }
    for (i, entry) in entries.iter().enumerate() {
        if i == 0 {
            lines.push(format!("COMPND    {entry}"));
        } else {
            lines.push(format!("COMPND {:>3} {entry}", i + 1));
        }
    }
}

fn write_sequences(dict: &PdbDict, lines: &mut Vec<String>) {
    for sequence in &dict.sequences {
        let total = sequence.residues.len();
        for (i, chunk) in sequence.residues.chunks(SEQRES_NAMES_PER_LINE).enumerate() {
            let names: Vec<String> = chunk.iter().map(|name| format!("{name:>3}")).collect();
            lines.push(format!(
                "SEQRES {:>3} {} {:>4}  {}",
                i + 1,
                first_char(&sequence.chain_id),
                total,
                names.join(" ")
            ));
        }
    }
}

fn write_sites(dict: &PdbDict, lines: &mut Vec<String>) {
    for site in &dict.sites {
        if let Some(description) = &site.description {
            lines.push(format!("REMARK 800 SITE_IDENTIFIER: {}", site.id));
            lines.push(format!("REMARK 800 SITE_DESCRIPTION: {description}"));
        }
    }
    for site in &dict.sites {
        let total = site.residues.len();
        for (i, chunk) in site.residues.chunks(SITE_RESIDUES_PER_LINE).enumerate() {
            let residues: Vec<String> = chunk.iter().map(site_residue).collect();
            lines.push(format!(
                "SITE   {:>3} {:>3} {:>2} {}",
                i + 1,
                site.id,
                total,
                residues.join(" ")
            ));
        }
    }
}

fn site_residue(residue: &SiteResidue) -> String {
    format!(
        "{:>3} {}{:>4}{}",
        residue.residue_name,
        first_char(&residue.chain_id),
        residue.residue_number,
        residue.insert_code.unwrap_or(' ')
    )
}

fn atom_line(atom: &AtomRecord) -> String {
    format!(
        "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{}{}          {:>2}{}",
        if atom.hetero { "HETATM" } else { "ATOM" },
        atom.atom_id,
        atom_name_field(&atom.atom_name, atom.element.as_deref()),
        atom.alt_loc.unwrap_or(' '),
        atom.residue_name.as_deref().unwrap_or(""),
        first_char(atom.chain_id.as_deref().unwrap_or("")),
        atom.residue_number.map(|n| n.to_string()).unwrap_or_default(),
        atom.insert_code.unwrap_or(' '),
        atom.x,
        atom.y,
        atom.z,
        optional_float(atom.occupancy),
        optional_float(atom.temperature_factor),
        atom.element.as_deref().unwrap_or(""),
        charge_field(atom.charge)
    )
}

fn conect_lines(connection: &Connection) -> Vec<String> {
    connection
        .bonded
        .chunks(CONECT_PARTNERS_PER_LINE)
        .map(|chunk| {
            let partners: String = chunk.iter().map(|id| format!("{id:>5}")).collect();
            format!("CONECT{:>5}{partners}", connection.atom)
        })
        .collect()
}

// Names start in the second column of the field unless they fill it or begin with a
// two-letter element symbol.
fn atom_name_field(name: &str, element: Option<&str>) -> String {
    let two_letter_element = element.is_some_and(|e| e.len() == 2 && name.starts_with(e));
    if name.chars().count() >= 4 || two_letter_element {
        name.to_string()
    } else {
        format!(" {name}")
    }
}

fn optional_float(value: Option<f64>) -> String {
    value.map_or_else(|| " ".repeat(6), |v| format!("{v:>6.2}"))
}

fn charge_field(charge: Option<f64>) -> String {
    match charge {
        Some(c) if c != 0.0 => {
            let sign = if c > 0.0 { '+' } else { '-' };
            format!("{}{sign}", c.abs().round() as i64)
        }
        _ => "  ".to_string(),
    }
}

/// The character written to a one-column field such as the chain identifier.
fn first_char(text: &str) -> char {
    text.chars().next().unwrap_or(' ')
}

fn wrap_words(text: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > TEXT_WIDTH {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
