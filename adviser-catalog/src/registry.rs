use crate::kinds;
use adviser_api::AdviceFactory;
use std::collections::BTreeMap;

/// Maps manifest `kind` names to the factories that build them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    kinds: BTreeMap<&'static str, AdviceFactory>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(kinds::command::KIND, kinds::command::build)
            .register(kinds::rename::KIND, kinds::rename::build)
            .register(kinds::replace::KIND, kinds::replace::build)
            .register(kinds::write_file::KIND, kinds::write_file::build);
        registry
    }

    /// Add or replace a kind.
    pub fn register(&mut self, kind: &'static str, factory: AdviceFactory) -> &mut Self {
        self.kinds.insert(kind, factory);
        self
    }

    pub fn get(&self, kind: &str) -> Option<AdviceFactory> {
        self.kinds.get(kind).copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }
}
