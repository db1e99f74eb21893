use super::dict::{
    AtomRecord, Compound, Connection, ModelBlock, PdbDict, PdbHeader, SequenceRecord, SiteRecord,
    SiteResidue,
};
use crate::core::io::record::{Record, RecordError};
use std::collections::HashMap;
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, instrument, trace};

const SITE_RESIDUE_STARTS: [usize; 4] = [18, 29, 40, 51];
const CONECT_PARTNER_COLUMNS: [Range<usize>; 4] = [11..16, 16..21, 21..26, 26..31];
const SEQRES_NAMES_PER_LINE: usize = 13;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdbError {
    #[error("Record error on line {line}: {source}")]
    Record { line: usize, source: RecordError },
    #[error("Parse error on line {line}: {details}")]
    Parse { line: usize, details: String },
}

impl PdbError {
    fn record(record: &Record, source: RecordError) -> Self {
        PdbError::Record {
            line: record.number(),
            source,
        }
    }

    fn parse(record: &Record, details: impl Into<String>) -> Self {
        PdbError::Parse {
            line: record.number(),
            details: details.into(),
        }
    }
}

/// Splits a file into records, one per non-empty line, numbered by physical line.
pub fn string_to_records(text: &str) -> Result<Vec<Record>, PdbError> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.is_empty())
        .map(|(number, line)| {
            Record::new(line, number).map_err(|source| PdbError::Record {
                line: number,
                source,
            })
        })
        .collect()
}

/// Parses PDB text into a [`PdbDict`].
#[instrument(skip_all, name = "pdb_decode")]
pub fn pdb_string_to_pdb_dict(text: &str) -> Result<PdbDict, PdbError> {
    let records = string_to_records(text)?;
    let dict = pdb_dict_from_records(&records)?;
    debug!(
        "Decoded {} records into {} model(s), {} connection(s).",
        records.len(),
        dict.models.len(),
        dict.connections.len()
    );
    Ok(dict)
}

/// Gathers decoded records into a [`PdbDict`].
///
/// Records with unknown names are skipped. Atoms outside any `MODEL` block belong to the
/// implicit model 1. Decoding stops at the first `END` record.
///
/// # Errors
///
/// Returns [`PdbError`] when a numeric field of a recognised record is malformed, or when an
/// atom or connection record lacks its atom serial number.
pub fn pdb_dict_from_records(records: &[Record]) -> Result<PdbDict, PdbError> {
    let mut dict = PdbDict::default();
    let mut title: Vec<String> = Vec::new();
    let mut compound_text: Vec<String> = Vec::new();
    let mut current_model: Option<usize> = None;
    let mut remark_site: Option<String> = None;
    let mut site_descriptions: HashMap<String, String> = HashMap::new();

    for record in records {
        match record.name() {
            "HEADER" => parse_header(record, &mut dict.header),
            "TITLE" => title.extend(record.get_as_string(10..80)),
            "COMPND" => compound_text.extend(record.get_as_string(10..80)),
            "SEQRES" => parse_seqres(record, &mut dict.sequences),
            "SITE" => parse_site(record, &mut dict.sites)?,
            "REMARK" => parse_site_remark(record, &mut remark_site, &mut site_descriptions),
            "MODEL" => {
                let number = record
                    .get_int(10..14)
                    .map_err(|e| PdbError::record(record, e))?
                    .unwrap_or(dict.models.len() as i64 + 1);
                dict.models.push(ModelBlock::new(number));
                current_model = Some(dict.models.len() - 1);
            }
            "ENDMDL" => current_model = None,
            "ATOM" | "HETATM" => {
                let atom = parse_atom(record)?;
                let index = match current_model {
                    Some(index) => index,
                    None => {
                        if dict.models.is_empty() {
                            dict.models.push(ModelBlock::new(1));
                        }
                        dict.models.len() - 1
                    }
                };
                dict.models[index].atoms.push(atom);
            }
            "CONECT" => dict.connections.push(parse_conect(record)?),
            "END" => break,
            _ => trace!("Skipping {}", record),
        }
    }

    if !title.is_empty() {
        dict.header.title = Some(title.join(" "));
    }
    dict.compounds = parse_compounds(&compound_text.join(" "));
    for site in &mut dict.sites {
        site.description = site_descriptions.remove(&site.id);
    }
    Ok(dict)
}

fn parse_header(record: &Record, header: &mut PdbHeader) {
    header.classification = record.get_as_string(10..50);
    header.deposition_date = record.get_as_string(50..59);
    header.code = record.get_as_string(62..66);
}

fn serial(record: &Record, columns: Range<usize>) -> Result<Option<u32>, PdbError> {
    let Some(value) = record
        .get_int(columns.clone())
        .map_err(|e| PdbError::record(record, e))?
    else {
        return Ok(None);
    };
    u32::try_from(value).map(Some).map_err(|_| {
        PdbError::parse(
            record,
            format!(
                "atom serial {} in columns {}-{} is out of range",
                value,
                columns.start + 1,
                columns.end
            ),
        )
    })
}

fn coordinate(record: &Record, columns: Range<usize>, axis: char) -> Result<f64, PdbError> {
    record
        .get_float(columns)
        .map_err(|e| PdbError::record(record, e))?
        .ok_or_else(|| PdbError::parse(record, format!("missing {axis} coordinate")))
}

fn optional_char(record: &Record, column: usize) -> Option<char> {
    record.char_at(column).filter(|c| !c.is_whitespace())
}

// Formal charges are written as magnitude then sign ("2+", "1-").
fn parse_charge(record: &Record) -> Result<Option<f64>, PdbError> {
    let Some(value) = record.get_str(78..80) else {
        return Ok(None);
    };
    let (magnitude, sign) = match value.strip_suffix('+') {
        Some(magnitude) => (magnitude, 1.0),
        None => match value.strip_suffix('-') {
            Some(magnitude) => (magnitude, -1.0),
            None => (value, 1.0),
        },
    };
    let magnitude = if magnitude.is_empty() { "1" } else { magnitude };
    magnitude
        .parse::<f64>()
        .map(|m| Some(sign * m))
        .map_err(|_| PdbError::parse(record, format!("invalid charge '{value}' in columns 79-80")))
}

fn parse_atom(record: &Record) -> Result<AtomRecord, PdbError> {
    let atom_id = serial(record, 6..11)?
        .ok_or_else(|| PdbError::parse(record, "missing atom serial in columns 7-11"))?;
    let float = |columns: Range<usize>| {
        record
            .get_float(columns)
            .map_err(|e| PdbError::record(record, e))
    };

    Ok(AtomRecord {
        hetero: record.name() == "HETATM",
        atom_id,
        atom_name: record.get_as_string(12..16).unwrap_or_default(),
        alt_loc: optional_char(record, 16),
        residue_name: record.get_as_string(17..20),
        chain_id: record.get_as_string(21..22),
        residue_number: record
            .get_int(22..26)
            .map_err(|e| PdbError::record(record, e))?,
        insert_code: optional_char(record, 26),
        x: coordinate(record, 30..38, 'x')?,
        y: coordinate(record, 38..46, 'y')?,
        z: coordinate(record, 46..54, 'z')?,
        occupancy: float(54..60)?,
        temperature_factor: float(60..66)?,
        element: record.get_as_string(76..78),
        charge: parse_charge(record)?,
    })
}

fn parse_conect(record: &Record) -> Result<Connection, PdbError> {
    let atom = serial(record, 6..11)?
        .ok_or_else(|| PdbError::parse(record, "missing atom serial in columns 7-11"))?;
    let mut bonded = Vec::with_capacity(CONECT_PARTNER_COLUMNS.len());
    for columns in CONECT_PARTNER_COLUMNS {
        bonded.extend(serial(record, columns)?);
    }
    Ok(Connection { atom, bonded })
}

fn parse_seqres(record: &Record, sequences: &mut Vec<SequenceRecord>) {
    let chain_id = record.get_as_string(11..12).unwrap_or_default();
    let names = (0..SEQRES_NAMES_PER_LINE).filter_map(|i| {
        let start = 19 + 4 * i;
        record.get_as_string(start..start + 3)
    });

    match sequences.iter_mut().find(|s| s.chain_id == chain_id) {
        Some(sequence) => sequence.residues.extend(names),
        None => sequences.push(SequenceRecord {
            chain_id,
            residues: names.collect(),
        }),
    }
}

fn parse_site(record: &Record, sites: &mut Vec<SiteRecord>) -> Result<(), PdbError> {
    let Some(id) = record.get_as_string(11..14) else {
        return Err(PdbError::parse(record, "missing site identifier in columns 12-14"));
    };

    let mut residues = Vec::new();
    for start in SITE_RESIDUE_STARTS {
        let Some(residue_name) = record.get_as_string(start..start + 3) else {
            continue;
        };
        let residue_number = record
            .get_int(start + 5..start + 9)
            .map_err(|e| PdbError::record(record, e))?
            .ok_or_else(|| {
                PdbError::parse(record, format!("site residue {residue_name} has no number"))
            })?;
        residues.push(SiteResidue {
            residue_name,
            chain_id: record.get_as_string(start + 4..start + 5).unwrap_or_default(),
            residue_number,
            insert_code: optional_char(record, start + 9),
        });
    }

    match sites.iter_mut().find(|s| s.id == id) {
        Some(site) => site.residues.extend(residues),
        None => sites.push(SiteRecord {
            id,
            residues,
            description: None,
        }),
    }
    Ok(())
}

fn parse_site_remark(
    record: &Record,
    current_site: &mut Option<String>,
    descriptions: &mut HashMap<String, String>,
) {
    if record.get(7..10).and_then(|f| f.as_int()) != Some(800) {
        return;
    }
    let Some(text) = record.get_as_string(11..80) else {
        return;
    };
    if let Some(id) = text.strip_prefix("SITE_IDENTIFIER:") {
        *current_site = Some(id.trim().to_string());
    } else if let Some(description) = text.strip_prefix("SITE_DESCRIPTION:") {
        if let Some(id) = current_site.as_ref() {
            descriptions.insert(id.clone(), description.trim().to_string());
        }
    }
}

fn parse_compounds(text: &str) -> Vec<Compound> {
    let mut compounds: Vec<Compound> = Vec::new();
    for entry in text.split(';') {
        let Some((key, value)) = entry.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key == "MOL_ID" {
            compounds.push(Compound {
                mol_id: value.to_string(),
                ..Compound::default()
            });
            continue;
        }
        match (key, compounds.last_mut()) {
            ("MOLECULE", Some(compound)) => compound.molecule = Some(value.to_string()),
            ("CHAIN", Some(compound)) => {
                compound.chains = value
                    .split(',')
                    .map(str::trim)
                    .filter(|chain| !chain.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
    }
    compounds
}
