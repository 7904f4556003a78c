//! Class registry for looking up declared classes by name

use crate::class::{ClassBuilder, ClassRef};
use crate::error::{ScopeError, ScopeResult};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Thread-safe table of declared classes
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<FxHashMap<String, ClassRef>>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared class; names must be unique
    pub fn register(&self, class: &ClassRef) -> ScopeResult<()> {
        let mut classes = self.classes.write();
        if classes.contains_key(class.name()) {
            return Err(ScopeError::declaration(class.name(), "class is already registered"));
        }
        classes.insert(class.name().to_string(), Arc::clone(class));
        Ok(())
    }

    /// Build and register in one step
    pub fn declare(&self, builder: ClassBuilder) -> ScopeResult<ClassRef> {
        if self.contains(builder.name()) {
            return Err(ScopeError::declaration(builder.name(), "class is already registered"));
        }
        let class = builder.build()?;
        self.register(&class)?;
        Ok(class)
    }

    /// Get class by name
    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.classes.read().get(name).cloned()
    }

    /// Check if a class is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_class() {
        let registry = ClassRegistry::new();
        let class = ClassBuilder::new("Point").build().unwrap();

        registry.register(&class).unwrap();
        assert!(registry.contains("Point"));
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("Point").unwrap(), &class));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let registry = ClassRegistry::new();
        registry.declare(ClassBuilder::new("Point")).unwrap();

        assert!(matches!(
            registry.declare(ClassBuilder::new("Point")),
            Err(ScopeError::Declaration { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_parents_resolved_by_name() {
        let registry = ClassRegistry::new();
        registry.declare(ClassBuilder::new("Shape")).unwrap();

        let shape = registry.get("Shape").unwrap();
        let circle = registry
            .declare(ClassBuilder::new("Circle").parent(&shape))
            .unwrap();

        assert!(circle.is_subclass_of("Shape"));
        assert_eq!(registry.names(), vec!["Circle".to_string(), "Shape".to_string()]);
        assert!(registry.get("Square").is_none());
    }
}
