pub mod ast;
pub mod bytecode;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod functions;
pub mod model;
pub mod parser;
pub mod symbols;
pub mod types;

pub use ast::{Expression, FunctionCall, NodeTest, Step};
pub use bytecode::{ConstantPool, Instruction, InstructionList, PoolIndex};
pub use codegen::{ClassGenerator, MethodGenerator, Translate};
pub use compiler::{CompiledMethod, Compiler, compile_call};
pub use config::{CompilerConfig, CompilerConfigBuilder};
pub use error::{Error, ErrorCode};
pub use functions::{NameCall, NameFunction, resolve_call};
pub use model::{Axis, NodeKind, QName};
pub use parser::parse_call;
pub use symbols::SymbolTable;
pub use types::Type;
