use lifegrid_sim::SimConfig;

use crate::demo::Demo;
use crate::demos::{LifeCpu, LifeGpu};

pub type DemoFactory = fn(&SimConfig) -> Box<dyn Demo>;

/// Demos selectable by name. The first registered entry is the default.
pub struct DemoRegistry {
    entries: Vec<(&'static str, DemoFactory)>,
}

impl DemoRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry with the built-in demos, GPU first.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(LifeGpu::NAME, |cfg| Box::new(LifeGpu::new(cfg)));
        registry.register(LifeCpu::NAME, |cfg| Box::new(LifeCpu::new(cfg)));
        registry
    }

    /// Adds a demo; a later entry with the same name replaces the earlier one.
    pub fn register(&mut self, name: &'static str, factory: DemoFactory) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    pub fn default_name(&self) -> Option<&'static str> {
        self.entries.first().map(|(n, _)| *n)
    }

    /// Maps a requested name to a registered one, falling back to the default.
    pub fn resolve(&self, requested: Option<&str>) -> Option<&'static str> {
        if let Some(name) = requested {
            if let Some((n, _)) = self.entries.iter().find(|(n, _)| *n == name) {
                return Some(*n);
            }
            log::warn!("unknown demo '{name}', using default");
        }
        self.default_name()
    }

    /// Name after `name` in registration order, wrapping around.
    pub fn next_after(&self, name: &str) -> Option<&'static str> {
        let i = self.entries.iter().position(|(n, _)| *n == name)?;
        self.entries
            .get((i + 1) % self.entries.len())
            .map(|(n, _)| *n)
    }

    pub fn create(&self, name: &str, config: &SimConfig) -> Option<Box<dyn Demo>> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| factory(config))
    }
}

impl Default for DemoRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
