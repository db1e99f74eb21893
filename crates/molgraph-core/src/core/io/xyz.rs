//! The XYZ coordinate-list format: an optional atom count, an optional comment line, then one
//! `element x y z` line per atom. Decoded atoms have no residues and are held by the model as
//! loose atoms.

use super::traits::StructureFile;
use super::utils::IoError;
use crate::core::models::atom::Atom;
use crate::core::models::error::ModelError;
use crate::core::models::model::Model;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XyzError {
    #[error("Parse error on line {line}: {details}")]
    Parse { line: usize, details: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub element: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzDict {
    /// The count on the first line, when present.
    pub declared_count: Option<usize>,
    pub comment: Option<String>,
    pub atoms: Vec<XyzAtom>,
}

/// A decoded XYZ file.
#[derive(Debug, Default)]
pub struct Xyz {
    pub comment: Option<String>,
    pub model: Model,
}

fn parse_atom_line(line: &str) -> Option<XyzAtom> {
    let mut fields = line.split_whitespace();
    let element = fields.next()?.to_string();
    let mut coordinate = || fields.next()?.parse::<f64>().ok();
    let (x, y, z) = (coordinate()?, coordinate()?, coordinate()?);
    Some(XyzAtom { element, x, y, z })
}

/// Parses XYZ text into an [`XyzDict`].
///
/// Empty lines are ignored. The count line and the comment line are both optional; a line is
/// taken as the comment only if it does not read as an atom.
///
/// # Errors
///
/// Returns [`XyzError::Parse`] for any later line that is not `element x y z`.
pub fn xyz_string_to_xyz_dict(text: &str) -> Result<XyzDict, XyzError> {
    let mut lines = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .peekable();

    let mut dict = XyzDict::default();
    if let Some((_, line)) = lines.peek() {
        if let Ok(count) = line.trim().parse::<usize>() {
            dict.declared_count = Some(count);
            lines.next();
        }
    }
    if let Some((_, line)) = lines.peek() {
        if parse_atom_line(line).is_none() {
            dict.comment = Some(line.trim().to_string());
            lines.next();
        }
    }
    for (number, line) in lines {
        let atom = parse_atom_line(line).ok_or_else(|| XyzError::Parse {
            line: number,
            details: format!("expected 'element x y z', found '{}'", line.trim()),
        })?;
        dict.atoms.push(atom);
    }

    if let Some(count) = dict.declared_count.filter(|&c| c != dict.atoms.len()) {
        warn!(
            "XYZ header declares {} atoms but {} were read.",
            count,
            dict.atoms.len()
        );
    }
    Ok(dict)
}

/// Builds an [`Xyz`] whose model holds one loose atom per line, with IDs counting from 1.
#[instrument(skip_all, name = "xyz_assembly")]
pub fn xyz_dict_to_xyz(dict: &XyzDict) -> Result<Xyz, XyzError> {
    let mut model = Model::new();
    for (id, atom) in (1u32..).zip(&dict.atoms) {
        let position = Point3::new(atom.x, atom.y, atom.z);
        model.add_atom(Atom::new(id, &atom.element, &atom.element, position))?;
    }
    debug!("Assembled {} loose atoms from XYZ data.", dict.atoms.len());
    Ok(Xyz {
        comment: dict.comment.clone(),
        model,
    })
}

impl Xyz {
    /// Every placed atom of the model in atom ID order. Ghost atoms have no coordinates and are
    /// left out.
    pub fn to_xyz_dict(&self) -> XyzDict {
        let mut atoms: Vec<&Atom> = self
            .model
            .all_atoms()
            .into_iter()
            .filter_map(|key| self.model.atom(key))
            .collect();
        atoms.sort_by_key(|atom| atom.id());

        let atoms: Vec<XyzAtom> = atoms
            .into_iter()
            .filter_map(|atom| {
                let position = atom.position?;
                Some(XyzAtom {
                    element: atom.element.clone(),
                    x: position.x,
                    y: position.y,
                    z: position.z,
                })
            })
            .collect();
        XyzDict {
            declared_count: Some(atoms.len()),
            comment: self.comment.clone(),
            atoms,
        }
    }

    pub fn to_xyz_string(&self) -> String {
        xyz_dict_to_xyz_string(&self.to_xyz_dict())
    }
}

/// Renders an [`XyzDict`] as text. The count line always reflects the atoms written.
pub fn xyz_dict_to_xyz_string(dict: &XyzDict) -> String {
    let mut lines = Vec::with_capacity(dict.atoms.len() + 2);
    lines.push(dict.atoms.len().to_string());
    lines.push(dict.comment.clone().unwrap_or_default());
    lines.extend(
        dict.atoms
            .iter()
            .map(|a| format!("{} {} {} {}", a.element, a.x, a.y, a.z)),
    );
    lines.join("\n")
}

/// [`StructureFile`] implementation for XYZ text.
pub struct XyzFile;

impl StructureFile for XyzFile {
    type Structure = Xyz;
    type Error = IoError;

    fn read_from(reader: &mut impl BufRead) -> Result<Xyz, IoError> {
        let text = io::read_to_string(reader)?;
        Ok(xyz_dict_to_xyz(&xyz_string_to_xyz_dict(&text)?)?)
    }

    fn write_to(xyz: &Xyz, writer: &mut impl Write) -> Result<(), IoError> {
        writeln!(writer, "{}", xyz.to_xyz_string())?;
        Ok(())
    }
}
