use crate::model::{Axis, NodeKind, QName};
use core::fmt;

/// Operand expressions accepted by the name-function family.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `.`
    ContextNode,
    /// `$name`
    VariableRef(QName),
    /// `axis::test`, `@test` or an abbreviated child step.
    Step(Step),
    /// A string literal; never valid as a node argument but parsed so the
    /// type checker can reject it.
    Literal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    /// `node()`
    AnyNode,
    /// `text()`, `comment()`, `processing-instruction()`
    Kind(NodeKind),
    /// `*`
    Wildcard,
    Name(QName),
}

/// One static call site: `name()`, `local-name($v)`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: QName,
    pub args: Vec<Expression>,
}

impl FunctionCall {
    pub fn new(name: QName, args: Vec<Expression>) -> Self {
        Self { name, args }
    }

    pub fn argument_count(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::AnyNode => f.write_str("node()"),
            NodeTest::Kind(NodeKind::Text) => f.write_str("text()"),
            NodeTest::Kind(NodeKind::Comment) => f.write_str("comment()"),
            NodeTest::Kind(NodeKind::ProcessingInstruction) => {
                f.write_str("processing-instruction()")
            }
            NodeTest::Kind(k) => write!(f, "{k:?}"),
            NodeTest::Wildcard => f.write_str("*"),
            NodeTest::Name(q) => write!(f, "{q}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::ContextNode => f.write_str("."),
            Expression::VariableRef(q) => write!(f, "${q}"),
            Expression::Step(s) => write!(f, "{:?}::{}", s.axis, s.test),
            Expression::Literal(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{a}")?;
        }
        f.write_str(")")
    }
}
