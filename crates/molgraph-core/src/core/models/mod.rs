//! # Core Models Module
//!
//! Data structures that represent one structural model of a macromolecule.
//!
//! ## Overview
//!
//! A [`model::Model`] is an arena: atoms, bonds and residues are stored in slot maps and
//! addressed through the typed keys in [`ids`]. Top-level entities ([`chain::Chain`],
//! [`molecule::SmallMolecule`], [`site::BindSite`], [`complex::Complex`]) are plain values
//! built against a model and then registered with it through the uniqueness-checked `add_*`
//! operations.
//!
//! ## Key Components
//!
//! - [`atom`] - Atoms, including coordinate-less ghost atoms
//! - [`bond`] - Symmetric bonds that register themselves on both atoms
//! - [`residue`] - Named atom groups with previous/next sequence links
//! - [`connectivity`] - Proof that residues form one unbroken bonded path
//! - [`chain`], [`molecule`], [`site`], [`complex`] - Top-level entities
//! - [`model`] - The owning container and its duplication algorithms
//! - [`ids`] - Slot map keys and model identities
//!
//! ## Usage
//!
//! ```ignore
//! use molgraph::core::models::{atom::Atom, model::Model};
//! use nalgebra::Point3;
//!
//! let mut model = Model::new();
//! let n = model.create_atom(Atom::new(1, "N", "N", Point3::new(0.0, 0.0, 0.0)));
//! let ca = model.create_atom(Atom::new(2, "C", "CA", Point3::new(1.5, 0.0, 0.0)));
//! model.create_bond(n, ca)?;
//! let residue = model.create_residue("A1", "GLY", vec![n, ca])?;
//! let chain = model.create_chain(Some("A"), vec![residue])?;
//! model.add_chain(chain)?;
//! ```

pub mod atom;
pub mod bond;
pub mod chain;
pub mod complex;
pub mod connectivity;
pub mod error;
pub mod ids;
pub mod model;
pub mod molecule;
pub(crate) mod registry;
pub mod residue;
pub mod site;
