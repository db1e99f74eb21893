pub mod identifiers;
pub mod sequence;
