use super::ids::{ChainKey, ModelId};
use super::registry::Registered;

/// A named grouping of chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub(crate) id: String,
    pub name: String,
    pub(crate) chains: Vec<ChainKey>,
    pub(crate) model: Option<ModelId>,
    /// The model the complex was first registered with.
    pub(crate) origin: Option<ModelId>,
}

impl Complex {
    /// Groups chains under an ID. The chains must be registered with the model the complex is
    /// added to.
    pub fn new(id: &str, name: &str, chains: Vec<ChainKey>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            chains,
            model: None,
            origin: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chains(&self) -> &[ChainKey] {
        &self.chains
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }
}

impl Registered for Complex {
    fn registry_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn registry_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn set_model(&mut self, model: Option<ModelId>) {
        self.model = model;
    }
}
