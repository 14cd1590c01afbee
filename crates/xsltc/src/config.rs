use crate::model::QName;
use crate::error::{Error, ErrorCode};
use std::collections::HashMap;

pub const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";
pub const FNS: &str = "http://www.w3.org/2005/xpath-functions";

pub const DOM_INTF: &str = "com/sun/org/apache/xalan/internal/xsltc/DOM";
pub const NODE_ITERATOR: &str = "com/sun/org/apache/xml/internal/dtm/DTMAxisIterator";
pub const BASIS_LIBRARY_CLASS: &str = "com/sun/org/apache/xalan/internal/xsltc/runtime/BasisLibrary";

/// Largest number of constant pool entries a class file can hold:
/// `constant_pool_count` is a u16 and index 0 is reserved.
pub const MAX_POOL_ENTRIES: usize = 65534;

#[derive(Debug, Clone, Default)]
pub struct NamespaceBindings {
    pub by_prefix: HashMap<String, String>,
}

/// Settings shared by every translation in one compile unit.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    pub dom_interface: String,
    pub node_iterator_interface: String,
    pub basis_library_class: String,
    /// Local slot holding the DOM receiver.
    pub dom_slot: u16,
    /// Local slot holding the current (context) node.
    pub current_node_slot: u16,
    /// First local slot available for stylesheet variables.
    pub first_free_slot: u16,
    pub max_pool_entries: usize,
    pub namespaces: NamespaceBindings,
    pub default_function_namespace: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let mut ns = NamespaceBindings::default();
        // Implicit xml binding, cannot be overridden
        ns.by_prefix.insert("xml".to_string(), XML_URI.to_string());
        Self {
            dom_interface: DOM_INTF.to_string(),
            node_iterator_interface: NODE_ITERATOR.to_string(),
            basis_library_class: BASIS_LIBRARY_CLASS.to_string(),
            dom_slot: 1,
            current_node_slot: 4,
            first_free_slot: 5,
            max_pool_entries: MAX_POOL_ENTRIES,
            namespaces: ns,
            default_function_namespace: Some(FNS.to_string()),
        }
    }
}

impl CompilerConfig {
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespaces.by_prefix.get(prefix).map(String::as_str)
    }

    /// Fill in the namespace URI of a lexical name. Unprefixed names stay in no
    /// namespace.
    pub fn resolve_qname(&self, q: &QName) -> Result<QName, Error> {
        let Some(prefix) = q.prefix.as_deref() else {
            return Ok(q.clone());
        };
        let uri = self.resolve_prefix(prefix).ok_or_else(|| {
            Error::static_err(
                ErrorCode::XPST0081,
                format!("namespace prefix '{prefix}' is not bound"),
            )
        })?;
        Ok(QName::new(Some(prefix), q.local.clone(), Some(uri)))
    }
}

/// Builder for `CompilerConfig`: allows explicit namespace registrations and
/// slot layouts while preserving the implicit `xml` binding.
pub struct CompilerConfigBuilder {
    cfg: CompilerConfig,
}

impl Default for CompilerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: CompilerConfig::default(),
        }
    }

    pub fn with_dom_interface(mut self, name: impl Into<String>) -> Self {
        self.cfg.dom_interface = name.into();
        self
    }

    pub fn with_node_iterator_interface(mut self, name: impl Into<String>) -> Self {
        self.cfg.node_iterator_interface = name.into();
        self
    }

    pub fn with_basis_library_class(mut self, name: impl Into<String>) -> Self {
        self.cfg.basis_library_class = name.into();
        self
    }

    pub fn with_dom_slot(mut self, slot: u16) -> Self {
        self.cfg.dom_slot = slot;
        self
    }

    pub fn with_current_node_slot(mut self, slot: u16) -> Self {
        self.cfg.current_node_slot = slot;
        self
    }

    pub fn with_first_free_slot(mut self, slot: u16) -> Self {
        self.cfg.first_free_slot = slot;
        self
    }

    pub fn with_max_pool_entries(mut self, max: usize) -> Self {
        self.cfg.max_pool_entries = max.min(MAX_POOL_ENTRIES);
        self
    }

    /// Register a namespace prefix → URI mapping. Attempts to override the
    /// reserved `xml` prefix are ignored.
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let p = prefix.into();
        if p == "xml" {
            return self;
        }
        self.cfg.namespaces.by_prefix.insert(p, uri.into());
        self
    }

    pub fn with_default_function_namespace(mut self, uri: impl Into<String>) -> Self {
        self.cfg.default_function_namespace = Some(uri.into());
        self
    }

    pub fn build(self) -> CompilerConfig {
        self.cfg
    }
}
