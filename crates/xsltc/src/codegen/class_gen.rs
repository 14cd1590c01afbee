use crate::bytecode::ConstantPool;
use crate::config::CompilerConfig;
use crate::model::{FIRST_NAMED_TYPE, QName};
use std::collections::HashMap;
use string_cache::DefaultAtom;

/// Type ids for named elements and attributes.
///
/// Elements and attributes share one id space; attribute keys carry an `@`
/// so `item` and `@item` get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    ids: HashMap<DefaultAtom, i32>,
    names: Vec<DefaultAtom>,
}

impl TypeRegistry {
    fn register(&mut self, key: String) -> i32 {
        let key = DefaultAtom::from(key);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = FIRST_NAMED_TYPE + self.names.len() as i32;
        self.names.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    pub fn register_element(&mut self, name: &QName) -> i32 {
        self.register(name.expanded_key())
    }

    pub fn register_attribute(&mut self, name: &QName) -> i32 {
        self.register(format!("@{}", name.expanded_key()))
    }

    /// Registered names in id order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|a| a.as_ref())
    }
}

/// Per-class generation state: the constant pool and the name registry,
/// shared by every method of the class.
#[derive(Debug, Clone)]
pub struct ClassGenerator {
    class_name: String,
    config: CompilerConfig,
    pool: ConstantPool,
    types: TypeRegistry,
}

impl ClassGenerator {
    pub fn new(class_name: impl Into<String>, config: CompilerConfig) -> Self {
        let pool = ConstantPool::with_capacity_limit(config.max_pool_entries);
        Self {
            class_name: class_name.into(),
            config,
            pool,
            types: TypeRegistry::default(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn constant_pool(&self) -> &ConstantPool {
        &self.pool
    }

    pub fn constant_pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.pool
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_and_attribute_ids_are_distinct() {
        let mut reg = TypeRegistry::default();
        let q = QName::local("item");
        let e = reg.register_element(&q);
        let a = reg.register_attribute(&q);
        assert_eq!(e, FIRST_NAMED_TYPE);
        assert_eq!(a, FIRST_NAMED_TYPE + 1);
        assert_eq!(reg.register_element(&q), e);
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["item", "@item"]);
    }

    #[test]
    fn pool_limit_comes_from_config() {
        let cfg = crate::config::CompilerConfigBuilder::new().with_max_pool_entries(2).build();
        let mut cg = ClassGenerator::new("T", cfg);
        assert!(cg.constant_pool_mut().add_class("a/B").is_ok());
        assert!(cg.constant_pool_mut().add_integer(1).is_err());
    }
}
