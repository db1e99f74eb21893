//! Provides input/output functionality for structure file formats.
//!
//! Decoding happens in three stages. Raw text is cut into fixed-column [`record::Record`]s,
//! the records are gathered into a format dictionary grouped by model, and the dictionary is
//! assembled into the entity graph rooted at [`Model`](crate::core::models::model::Model).
//! Writing runs the same stages in reverse. The [`utils`] functions wrap the stages for files,
//! strings and (with the `fetch` feature) remote PDB codes.

pub mod pdb;
pub mod record;
pub mod traits;
pub mod utils;
pub mod xyz;
