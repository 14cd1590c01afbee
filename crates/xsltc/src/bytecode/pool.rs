//! Constant pool with deduplicating reference interning.
//!
//! Entries follow the class-file layout: method references point at a
//! `Class` and a `NameAndType` entry, which in turn point at `Utf8` entries.
//! Every entry is created at most once; asking for an existing entry returns
//! its index.

use crate::error::{Error, ErrorCode};
use crate::types::MethodSignature;
use core::fmt;
use std::collections::HashMap;
use string_cache::DefaultAtom;
use tracing::trace;

/// Index of an entry in the constant pool. Index 0 is never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolIndex(pub u16);

impl fmt::Display for PoolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoolEntry {
    Utf8(DefaultAtom),
    Integer(i32),
    String { utf8: PoolIndex },
    Class { name: PoolIndex },
    NameAndType { name: PoolIndex, descriptor: PoolIndex },
    MethodRef { class: PoolIndex, name_and_type: PoolIndex },
    InterfaceMethodRef { class: PoolIndex, name_and_type: PoolIndex },
}

/// Resolved view of a (interface) method reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRefInfo<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub interface: bool,
}

impl fmt::Display for MethodRefInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.owner.rsplit('/').next().unwrap_or(self.owner);
        write!(f, "{simple}.{}{}", self.name, self.descriptor)
    }
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    // entries[0] corresponds to index 1
    entries: Vec<PoolEntry>,
    lookup: HashMap<PoolEntry, PoolIndex>,
    max_entries: usize,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::with_capacity_limit(crate::config::MAX_POOL_ENTRIES)
    }
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool that refuses to grow past `max_entries` slots. The limit is
    /// clamped to what a class file can address.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
            max_entries: max_entries.min(crate::config::MAX_POOL_ENTRIES),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: PoolIndex) -> Option<&PoolEntry> {
        (index.0 as usize).checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolIndex, &PoolEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (PoolIndex((i + 1) as u16), e))
    }

    fn intern(&mut self, entry: PoolEntry) -> Result<PoolIndex, Error> {
        if let Some(&idx) = self.lookup.get(&entry) {
            return Ok(idx);
        }
        let exhausted = || {
            Error::internal(
                ErrorCode::XSLTC0001,
                format!("constant pool exhausted ({} entries)", self.max_entries),
            )
        };
        if self.entries.len() >= self.max_entries {
            return Err(exhausted());
        }
        let idx = PoolIndex(u16::try_from(self.entries.len() + 1).map_err(|_| exhausted())?);
        self.entries.push(entry.clone());
        self.lookup.insert(entry, idx);
        Ok(idx)
    }

    pub fn add_utf8(&mut self, value: &str) -> Result<PoolIndex, Error> {
        self.intern(PoolEntry::Utf8(DefaultAtom::from(value)))
    }

    pub fn add_integer(&mut self, value: i32) -> Result<PoolIndex, Error> {
        self.intern(PoolEntry::Integer(value))
    }

    pub fn add_string(&mut self, value: &str) -> Result<PoolIndex, Error> {
        let utf8 = self.add_utf8(value)?;
        self.intern(PoolEntry::String { utf8 })
    }

    pub fn add_class(&mut self, name: &str) -> Result<PoolIndex, Error> {
        let name = self.add_utf8(name)?;
        self.intern(PoolEntry::Class { name })
    }

    pub fn add_name_and_type(&mut self, name: &str, descriptor: &str) -> Result<PoolIndex, Error> {
        let name = self.add_utf8(name)?;
        let descriptor = self.add_utf8(descriptor)?;
        self.intern(PoolEntry::NameAndType { name, descriptor })
    }

    /// Intern a reference to a method declared by the class `owner`.
    pub fn add_methodref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<PoolIndex, Error> {
        let (class, name_and_type) = self.method_parts(owner, name, descriptor)?;
        let idx = self.intern(PoolEntry::MethodRef { class, name_and_type })?;
        trace!(index = idx.0, owner, name, descriptor, "interned method reference");
        Ok(idx)
    }

    /// Intern a reference to a method declared by the interface `owner`.
    pub fn add_interface_methodref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<PoolIndex, Error> {
        let (class, name_and_type) = self.method_parts(owner, name, descriptor)?;
        let idx = self.intern(PoolEntry::InterfaceMethodRef { class, name_and_type })?;
        trace!(index = idx.0, owner, name, descriptor, "interned interface method reference");
        Ok(idx)
    }

    fn method_parts(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<(PoolIndex, PoolIndex), Error> {
        // reject before touching the pool so a bad descriptor leaves no entries behind
        MethodSignature::parse(descriptor)?;
        let class = self.add_class(owner)?;
        let name_and_type = self.add_name_and_type(name, descriptor)?;
        Ok((class, name_and_type))
    }

    pub fn utf8(&self, index: PoolIndex) -> Option<&str> {
        match self.get(index)? {
            PoolEntry::Utf8(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Resolve a `MethodRef` or `InterfaceMethodRef` entry to its names.
    pub fn method_ref(&self, index: PoolIndex) -> Option<MethodRefInfo<'_>> {
        let (class, nat, interface) = match self.get(index)? {
            PoolEntry::MethodRef { class, name_and_type } => (*class, *name_and_type, false),
            PoolEntry::InterfaceMethodRef { class, name_and_type } => {
                (*class, *name_and_type, true)
            }
            _ => return None,
        };
        let owner = match self.get(class)? {
            PoolEntry::Class { name } => self.utf8(*name)?,
            _ => return None,
        };
        let (name, descriptor) = match self.get(nat)? {
            PoolEntry::NameAndType { name, descriptor } => {
                (self.utf8(*name)?, self.utf8(*descriptor)?)
            }
            _ => return None,
        };
        Some(MethodRefInfo {
            owner,
            name,
            descriptor,
            interface,
        })
    }

    /// Like [`ConstantPool::method_ref`] but reports a missing or mismatched
    /// entry as an internal error.
    pub fn expect_method_ref(&self, index: PoolIndex) -> Result<MethodRefInfo<'_>, Error> {
        self.method_ref(index).ok_or_else(|| {
            Error::internal(
                ErrorCode::XSLTC0003,
                format!("{index} is not a method reference"),
            )
        })
    }

    /// Number of method reference entries (either kind) naming `name`.
    pub fn count_method_refs(&self, name: &str) -> usize {
        self.iter()
            .filter(|(idx, _)| self.method_ref(*idx).is_some_and(|m| m.name == name))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DOM_INTF;

    const SIG: &str = "(I)Ljava/lang/String;";

    #[test]
    fn interface_refs_are_deduplicated() {
        let mut pool = ConstantPool::new();
        let a = pool.add_interface_methodref(DOM_INTF, "getNodeName", SIG).unwrap();
        let len = pool.len();
        let b = pool.add_interface_methodref(DOM_INTF, "getNodeName", SIG).unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.len(), len);
        assert_eq!(pool.count_method_refs("getNodeName"), 1);
    }

    #[test]
    fn shared_parts_are_reused() {
        let mut pool = ConstantPool::new();
        pool.add_interface_methodref(DOM_INTF, "getNodeName", SIG).unwrap();
        let before = pool.len();
        // same owner and descriptor: only a new Utf8 name, NameAndType and ref
        pool.add_interface_methodref(DOM_INTF, "getNamespaceName", SIG).unwrap();
        assert_eq!(pool.len(), before + 3);
    }

    #[test]
    fn interface_and_class_refs_are_distinct() {
        let mut pool = ConstantPool::new();
        let i = pool.add_interface_methodref("a/B", "m", "()V").unwrap();
        let c = pool.add_methodref("a/B", "m", "()V").unwrap();
        assert_ne!(i, c);
        assert!(pool.method_ref(i).unwrap().interface);
        assert!(!pool.method_ref(c).unwrap().interface);
    }

    #[test]
    fn resolves_method_ref_names() {
        let mut pool = ConstantPool::new();
        let idx = pool.add_interface_methodref(DOM_INTF, "getNodeName", SIG).unwrap();
        let info = pool.method_ref(idx).unwrap();
        assert_eq!(info.owner, DOM_INTF);
        assert_eq!(info.name, "getNodeName");
        assert_eq!(info.descriptor, SIG);
        assert_eq!(info.to_string(), "DOM.getNodeName(I)Ljava/lang/String;");
    }

    #[test]
    fn last_addressable_index_then_exhausted() {
        let mut pool = ConstantPool::with_capacity_limit(70_000);
        let mut last = PoolIndex(0);
        for v in 0..65_534 {
            last = pool.add_integer(v).unwrap();
        }
        assert_eq!(last, PoolIndex(65_534));
        assert_eq!(pool.get(last), Some(&PoolEntry::Integer(65_533)));
        let err = pool.add_integer(65_534).unwrap_err();
        assert_eq!(err.code, ErrorCode::XSLTC0001);
        // existing entries still resolve
        assert_eq!(pool.add_integer(0).unwrap(), PoolIndex(1));
    }

    #[test]
    fn exhaustion_is_internal_error() {
        let mut pool = ConstantPool::with_capacity_limit(4);
        let err = pool.add_interface_methodref(DOM_INTF, "getNodeName", SIG).unwrap_err();
        assert_eq!(err.code, ErrorCode::XSLTC0001);
        assert!(err.is_internal());
    }

    #[test]
    fn malformed_descriptor_leaves_pool_untouched() {
        let mut pool = ConstantPool::new();
        let err = pool.add_interface_methodref(DOM_INTF, "getNodeName", "(I").unwrap_err();
        assert_eq!(err.code, ErrorCode::XSLTC0002);
        assert!(pool.is_empty());
    }

    #[test]
    fn index_zero_is_never_valid() {
        let mut pool = ConstantPool::new();
        pool.add_integer(7).unwrap();
        assert!(pool.get(PoolIndex(0)).is_none());
        assert_eq!(pool.get(PoolIndex(1)), Some(&PoolEntry::Integer(7)));
        assert!(pool.expect_method_ref(PoolIndex(1)).is_err());
    }
}
