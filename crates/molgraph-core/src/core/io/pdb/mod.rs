//! The PDB format: fixed-column records decoded into a [`PdbDict`] and assembled into one
//! [`Model`](crate::core::models::model::Model) per model block.

pub mod assembler;
pub mod builder;
pub mod dict;
pub mod export;
pub mod writer;

pub use assembler::{AssemblyError, Pdb, pdb_dict_to_pdb};
pub use builder::{PdbError, pdb_string_to_pdb_dict};
pub use dict::PdbDict;
pub use writer::pdb_dict_to_pdb_string;

use super::traits::StructureFile;
use super::utils::IoError;
use crate::core::topology::links::LinkRegistry;
use std::io::{self, BufRead, Write};

/// [`StructureFile`] implementation for PDB text, using the default link registry.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Structure = Pdb;
    type Error = IoError;

    fn read_from(reader: &mut impl BufRead) -> Result<Pdb, IoError> {
        let text = io::read_to_string(reader)?;
        let dict = pdb_string_to_pdb_dict(&text)?;
        Ok(pdb_dict_to_pdb(&dict, &LinkRegistry::default())?)
    }

    fn write_to(pdb: &Pdb, writer: &mut impl Write) -> Result<(), IoError> {
        writer.write_all(pdb.to_pdb_string().as_bytes())?;
        writeln!(writer)?;
        Ok(())
    }
}
