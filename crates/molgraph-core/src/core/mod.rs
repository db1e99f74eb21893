//! # Core Module
//!
//! The building blocks of molgraph: the entity graph, the file codecs that populate it and the
//! small amount of structural knowledge needed to connect polymer residues.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, residues, chains, small molecules,
//!   binding sites, complexes and the `Model` container that owns them
//! - **File I/O** ([`io`]) - Fixed-column PDB records, coordinate lists, round-trip writers
//! - **Structural Knowledge** ([`topology`]) - Designated link atoms per residue name
//! - **Utilities** ([`utils`]) - Identifier parsing and residue one-letter codes

pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
