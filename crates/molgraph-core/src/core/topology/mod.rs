//! # Topology Module
//!
//! Residue-level topology needed to join residues into chains.
//!
//! ## Overview
//!
//! Consecutive residues of a polymer are joined by a bond between the *tail* link atom of the
//! upstream residue and the *head* link atom of the downstream residue: `C` to `N` for
//! peptides, `O3'` to `P` for nucleic acids. The assembler consults a [`links::LinkRegistry`]
//! to find these atoms.
//!
//! ## Usage
//!
//! The built-in registry covers standard peptides and nucleotides. Other residue types can be
//! described in a TOML file:
//!
//! ```ignore
//! use molgraph::core::topology::links::LinkRegistry;
//!
//! let registry = LinkRegistry::load(Path::new("links.toml"))?;
//! let links = registry.links_for("DA");
//! ```

pub mod links;
