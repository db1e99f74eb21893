//! # molgraph Core Library
//!
//! Decodes macromolecular structure files into an editable relational model of atoms,
//! bonds, residues, chains, small molecules, binding sites and complexes.
//!
//! ## Architectural Philosophy
//!
//! Everything lives under [`core`], split by concern:
//!
//! - **[`core::io`]: Text In, Text Out.** The fixed-column record decoder, the builder that
//!   groups decoded records into a per-model dictionary, the assembler that turns that
//!   dictionary into models, and the writers that go back to text.
//!
//! - **[`core::models`]: The Entity Graph.** Arena-backed `Model` containers that own atoms,
//!   bonds and residues, enforce per-kind ID uniqueness for top-level entities and implement
//!   deterministic duplication.
//!
//! - **[`core::topology`]: Structural Knowledge.** The residue link-atom registry that decides
//!   which atoms join consecutive polymer residues.

pub mod core;
