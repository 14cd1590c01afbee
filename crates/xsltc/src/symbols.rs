use crate::model::QName;
use crate::types::Type;
use std::collections::HashMap;

/// Static types of the variables and parameters visible to a call site.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    variables: HashMap<QName, Type>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable; a later declaration of the same name replaces the
    /// earlier one.
    pub fn declare(&mut self, name: QName, ty: Type) {
        self.variables.insert(name, ty);
    }

    pub fn lookup(&self, name: &QName) -> Option<Type> {
        self.variables.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
