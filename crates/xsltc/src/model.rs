use compact_str::CompactString;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A qualified name as written in the stylesheet.
///
/// Equality and hashing follow the expanded name (namespace URI + local part);
/// the prefix is kept only for diagnostics.
#[derive(Debug, Clone, Eq)]
pub struct QName {
    pub prefix: Option<CompactString>,
    pub local: CompactString,
    pub ns_uri: Option<CompactString>,
}

impl QName {
    pub fn local(local: impl Into<CompactString>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
            ns_uri: None,
        }
    }

    pub fn new(
        prefix: Option<&str>,
        local: impl Into<CompactString>,
        ns_uri: Option<&str>,
    ) -> Self {
        Self {
            prefix: prefix.map(CompactString::from),
            local: local.into(),
            ns_uri: ns_uri.map(CompactString::from),
        }
    }

    /// Split a lexical QName (`p:local` or `local`) without resolving the prefix.
    pub fn parse_lexical(lexical: &str) -> Self {
        match lexical.split_once(':') {
            Some((p, l)) => Self::new(Some(p), l, None),
            None => Self::local(lexical),
        }
    }

    /// Key used by the runtime type tables: `uri:local`, or just `local`
    /// when the name is in no namespace.
    pub fn expanded_key(&self) -> String {
        match &self.ns_uri {
            Some(ns) if !ns.is_empty() => format!("{ns}:{}", self.local),
            _ => self.local.to_string(),
        }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.local == other.local && self.ns_uri == other.ns_uri
    }
}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local.hash(state);
        self.ns_uri.hash(state);
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{p}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// DTM node kinds with the numeric ids the runtime uses for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Attribute,
    Text,
    ProcessingInstruction,
    Comment,
    Document,
    Namespace,
}

impl NodeKind {
    pub fn type_id(self) -> i32 {
        match self {
            NodeKind::Element => 1,
            NodeKind::Attribute => 2,
            NodeKind::Text => 3,
            NodeKind::ProcessingInstruction => 7,
            NodeKind::Comment => 8,
            NodeKind::Document => 9,
            NodeKind::Namespace => 13,
        }
    }
}

/// First type id available for named elements and attributes.
pub const FIRST_NAMED_TYPE: i32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Namespace,
    Parent,
    Preceding,
    PrecedingSibling,
    SelfAxis,
}

impl Axis {
    /// Numeric axis id understood by the DOM iterator factory.
    pub fn id(self) -> i32 {
        match self {
            Axis::Ancestor => 0,
            Axis::AncestorOrSelf => 1,
            Axis::Attribute => 2,
            Axis::Child => 3,
            Axis::Descendant => 4,
            Axis::DescendantOrSelf => 5,
            Axis::Following => 6,
            Axis::FollowingSibling => 7,
            Axis::Namespace => 9,
            Axis::Parent => 10,
            Axis::Preceding => 11,
            Axis::PrecedingSibling => 12,
            Axis::SelfAxis => 13,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "attribute" => Axis::Attribute,
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "following" => Axis::Following,
            "following-sibling" => Axis::FollowingSibling,
            "namespace" => Axis::Namespace,
            "parent" => Axis::Parent,
            "preceding" => Axis::Preceding,
            "preceding-sibling" => Axis::PrecedingSibling,
            "self" => Axis::SelfAxis,
            _ => return None,
        })
    }

    /// Node kind a `*` name test selects on this axis.
    pub fn principal_kind(self) -> NodeKind {
        match self {
            Axis::Attribute => NodeKind::Attribute,
            Axis::Namespace => NodeKind::Namespace,
            _ => NodeKind::Element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_prefix() {
        let a = QName::new(Some("a"), "item", Some("urn:x"));
        let b = QName::new(Some("b"), "item", Some("urn:x"));
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn expanded_key_uses_namespace() {
        assert_eq!(QName::local("item").expanded_key(), "item");
        assert_eq!(QName::new(None, "item", Some("urn:x")).expanded_key(), "urn:x:item");
    }

    #[test]
    fn lexical_split() {
        let q = QName::parse_lexical("fn:name");
        assert_eq!(q.prefix.as_deref(), Some("fn"));
        assert_eq!(q.local, "name");
        assert!(q.ns_uri.is_none());
    }
}
