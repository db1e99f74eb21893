use super::pdb::{AssemblyError, Pdb, PdbDict, PdbError, pdb_dict_to_pdb, pdb_string_to_pdb_dict};
use super::xyz::{Xyz, XyzError, xyz_dict_to_xyz, xyz_string_to_xyz_dict};
use crate::core::topology::links::LinkRegistry;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Pdb(#[from] PdbError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Xyz(#[from] XyzError),
    #[error("PDB code '{0}' is not four characters long")]
    InvalidCode(String),
}

/// Reads a whole file into a string.
pub fn string_from_file<P: AsRef<Path>>(path: P) -> Result<String, IoError> {
    Ok(fs::read_to_string(path)?)
}

/// Writes a string to a file, replacing any existing contents.
pub fn string_to_file<P: AsRef<Path>>(text: &str, path: P) -> Result<(), IoError> {
    Ok(fs::write(path, text)?)
}

pub fn pdb_dict_from_file<P: AsRef<Path>>(path: P) -> Result<PdbDict, IoError> {
    Ok(pdb_string_to_pdb_dict(&string_from_file(path)?)?)
}

/// Decodes and assembles PDB text with the default link registry.
pub fn pdb_from_string(text: &str) -> Result<Pdb, IoError> {
    pdb_from_string_with(text, &LinkRegistry::default())
}

/// Decodes and assembles PDB text, joining polymer residues through the atoms `links` names.
pub fn pdb_from_string_with(text: &str, links: &LinkRegistry) -> Result<Pdb, IoError> {
    let dict = pdb_string_to_pdb_dict(text)?;
    Ok(pdb_dict_to_pdb(&dict, links)?)
}

pub fn pdb_from_file<P: AsRef<Path>>(path: P) -> Result<Pdb, IoError> {
    pdb_from_string(&string_from_file(path)?)
}

pub fn xyz_from_string(text: &str) -> Result<Xyz, IoError> {
    Ok(xyz_dict_to_xyz(&xyz_string_to_xyz_dict(text)?)?)
}

pub fn xyz_from_file<P: AsRef<Path>>(path: P) -> Result<Xyz, IoError> {
    xyz_from_string(&string_from_file(path)?)
}

/// Where remote PDB files are downloaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchSource {
    #[default]
    Rcsb,
    Pdbe,
}

impl FetchSource {
    /// The download URL for a four-character PDB code.
    pub fn url(self, code: &str) -> String {
        let code = code.to_lowercase();
        match self {
            FetchSource::Rcsb => format!("https://files.rcsb.org/view/{code}.pdb"),
            FetchSource::Pdbe => format!("https://www.ebi.ac.uk/pdbe/entry-files/pdb{code}.ent"),
        }
    }
}

#[cfg_attr(not(feature = "fetch"), allow(dead_code))]
fn check_code(code: &str) -> Result<(), IoError> {
    if code.chars().count() == 4 {
        Ok(())
    } else {
        Err(IoError::InvalidCode(code.to_string()))
    }
}

/// Downloads the text of a PDB entry from RCSB.
///
/// # Return
///
/// `Ok(None)` if the server does not answer with the file.
///
/// # Errors
///
/// Returns [`IoError::InvalidCode`] if the code is not four characters long.
#[cfg(feature = "fetch")]
pub fn fetch_string(code: &str) -> Result<Option<String>, IoError> {
    fetch_string_from(code, FetchSource::Rcsb)
}

#[cfg(feature = "fetch")]
pub fn fetch_string_from(code: &str, source: FetchSource) -> Result<Option<String>, IoError> {
    use tracing::{debug, warn};

    check_code(code)?;
    let url = source.url(code);
    debug!("Fetching {}", url);
    match ureq::get(&url).call() {
        Ok(response) => Ok(Some(response.into_string()?)),
        Err(ureq::Error::Status(status, _)) => {
            warn!("Fetching {} returned status {}.", url, status);
            Ok(None)
        }
        Err(error) => {
            warn!("Fetching {} failed: {}", url, error);
            Ok(None)
        }
    }
}

/// Downloads and assembles a PDB entry, or `Ok(None)` if it could not be downloaded.
#[cfg(feature = "fetch")]
pub fn fetch(code: &str, source: FetchSource) -> Result<Option<Pdb>, IoError> {
    fetch_string_from(code, source)?
        .map(|text| pdb_from_string(&text))
        .transpose()
}
