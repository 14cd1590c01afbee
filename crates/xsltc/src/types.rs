//! XPath value types and their JVM stack representation.

use crate::config::CompilerConfig;
use crate::error::{Error, ErrorCode};
use core::fmt;
use itertools::Itertools;
use smallvec::SmallVec;
use string_cache::DefaultAtom;

pub const STRING_SIG: &str = "Ljava/lang/String;";
pub const OBJECT_SIG: &str = "Ljava/lang/Object;";

/// Static type of an XPath value as seen by the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// A single node, represented on the stack by its integer handle.
    Node,
    /// An iterator over nodes.
    NodeSet,
    /// A value of unknown type (untyped parameter or variable).
    Reference,
    String,
    Boolean,
    Int,
    Real,
    Void,
}

impl Type {
    /// JVM field descriptor for this type.
    pub fn descriptor(self, cfg: &CompilerConfig) -> String {
        match self {
            Type::Node | Type::Int => "I".to_string(),
            Type::NodeSet => format!("L{};", cfg.node_iterator_interface),
            Type::Reference => OBJECT_SIG.to_string(),
            Type::String => STRING_SIG.to_string(),
            Type::Boolean => "Z".to_string(),
            Type::Real => "D".to_string(),
            Type::Void => "V".to_string(),
        }
    }

    /// Number of operand stack (and local variable) slots a value occupies.
    pub fn slots(self) -> usize {
        match self {
            Type::Void => 0,
            Type::Real => 2,
            _ => 1,
        }
    }

    /// Whether `name()`-like functions accept this type as their argument.
    pub fn is_node_like(self) -> bool {
        matches!(self, Type::Node | Type::NodeSet | Type::Reference)
    }

    pub fn method_descriptor(params: &[Type], ret: Type, cfg: &CompilerConfig) -> String {
        format!(
            "({}){}",
            params.iter().map(|t| t.descriptor(cfg)).join(""),
            ret.descriptor(cfg)
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Node => "node",
            Type::NodeSet => "node-set",
            Type::Reference => "reference",
            Type::String => "string",
            Type::Boolean => "boolean",
            Type::Int => "int",
            Type::Real => "real",
            Type::Void => "void",
        })
    }
}

impl core::str::FromStr for Type {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "node" => Type::Node,
            "node-set" | "nodeset" => Type::NodeSet,
            "reference" => Type::Reference,
            "string" => Type::String,
            "boolean" => Type::Boolean,
            "int" => Type::Int,
            "real" | "number" => Type::Real,
            "void" => Type::Void,
            other => return Err(format!("unknown type: {other}")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Object(DefaultAtom),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn slots(&self) -> usize {
        match self {
            FieldType::Long | FieldType::Double => 2,
            _ => 1,
        }
    }
}

/// A parsed JVM method descriptor such as `(I)Ljava/lang/String;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub params: SmallVec<[FieldType; 4]>,
    /// `None` for `V`.
    pub ret: Option<FieldType>,
}

impl MethodSignature {
    pub fn parse(descriptor: &str) -> Result<Self, Error> {
        let malformed = || {
            Error::internal(
                ErrorCode::XSLTC0002,
                format!("malformed method descriptor '{descriptor}'"),
            )
        };
        let body = descriptor.strip_prefix('(').ok_or_else(malformed)?;
        let (params_src, ret_src) = body.split_once(')').ok_or_else(malformed)?;

        let mut params = SmallVec::new();
        let mut rest = params_src;
        while !rest.is_empty() {
            let (ty, tail) = parse_field(rest).ok_or_else(malformed)?;
            params.push(ty);
            rest = tail;
        }

        let ret = if ret_src == "V" {
            None
        } else {
            match parse_field(ret_src) {
                Some((ty, "")) => Some(ty),
                _ => return Err(malformed()),
            }
        };
        Ok(Self { params, ret })
    }

    pub fn argument_slots(&self) -> usize {
        self.params.iter().map(FieldType::slots).sum()
    }

    pub fn return_slots(&self) -> usize {
        self.ret.as_ref().map_or(0, FieldType::slots)
    }
}

fn parse_field(s: &str) -> Option<(FieldType, &str)> {
    let ty = match s.chars().next()? {
        'B' => FieldType::Byte,
        'C' => FieldType::Char,
        'D' => FieldType::Double,
        'F' => FieldType::Float,
        'I' => FieldType::Int,
        'J' => FieldType::Long,
        'S' => FieldType::Short,
        'Z' => FieldType::Boolean,
        'L' => {
            let end = s.find(';')?;
            let class = &s[1..end];
            if class.is_empty() {
                return None;
            }
            return Some((FieldType::Object(DefaultAtom::from(class)), &s[end + 1..]));
        }
        '[' => {
            let (inner, tail) = parse_field(&s[1..])?;
            return Some((FieldType::Array(Box::new(inner)), tail));
        }
        _ => return None,
    };
    Some((ty, &s[1..]))
}
