//! The intermediate PDB representation: decoded records grouped by category and model.

/// File-level metadata from `HEADER` and `TITLE` records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdbHeader {
    pub classification: Option<String>,
    pub deposition_date: Option<String>,
    pub code: Option<String>,
    pub title: Option<String>,
}

/// One `ATOM` or `HETATM` record.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub hetero: bool,
    pub atom_id: u32,
    pub atom_name: String,
    pub alt_loc: Option<char>,
    pub residue_name: Option<String>,
    pub chain_id: Option<String>,
    pub residue_number: Option<i64>,
    pub insert_code: Option<char>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: Option<f64>,
    pub temperature_factor: Option<f64>,
    pub element: Option<String>,
    pub charge: Option<f64>,
}

/// The atoms of one `MODEL` block, or of the implicit model 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBlock {
    pub number: i64,
    pub atoms: Vec<AtomRecord>,
}

impl ModelBlock {
    pub fn new(number: i64) -> Self {
        Self {
            number,
            atoms: Vec::new(),
        }
    }
}

/// A `CONECT` record: an atom and the atoms bonded to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub atom: u32,
    pub bonded: Vec<u32>,
}

/// A residue reference inside a `SITE` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteResidue {
    pub residue_name: String,
    pub chain_id: String,
    pub residue_number: i64,
    pub insert_code: Option<char>,
}

/// A site assembled from its `SITE` records and `REMARK 800` description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRecord {
    pub id: String,
    pub residues: Vec<SiteResidue>,
    pub description: Option<String>,
}

/// One `MOL_ID` entry of the `COMPND` records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub mol_id: String,
    pub molecule: Option<String>,
    pub chains: Vec<String>,
}

/// The residue names declared by the `SEQRES` records of one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub chain_id: String,
    pub residues: Vec<String>,
}

/// Everything decoded from a PDB file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbDict {
    pub header: PdbHeader,
    pub compounds: Vec<Compound>,
    pub sequences: Vec<SequenceRecord>,
    pub sites: Vec<SiteRecord>,
    pub models: Vec<ModelBlock>,
    pub connections: Vec<Connection>,
}
