use slotmap::new_key_type;
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    pub struct AtomKey;
    pub struct BondKey;
    pub struct ResidueKey;
    pub struct ChainKey;
    pub struct MoleculeKey;
    pub struct SiteKey;
    pub struct ComplexKey;
}

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Model`](super::model::Model) instance, used as the back-reference held by
/// every registered top-level entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    pub(crate) fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_are_never_reused() {
        let first = ModelId::next();
        let second = ModelId::next();
        assert_ne!(first, second);
        assert!(second > first);
    }
}
