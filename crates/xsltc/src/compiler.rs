use crate::bytecode::{InstructionList, verify};
use crate::codegen::{ClassGenerator, MethodGenerator, Translate};
use crate::config::CompilerConfig;
use crate::error::Error;
use crate::functions::{NameCall, NameFunction, resolve_call};
use crate::model::QName;
use crate::parser::parse_call;
use crate::symbols::SymbolTable;
use crate::types::Type;
use core::fmt;
use tracing::debug;

/// Result of compiling one call site into its own method body.
#[derive(Debug, Clone)]
pub struct CompiledMethod {
    pub name: String,
    pub function: NameFunction,
    pub instrs: InstructionList,
    pub result_type: Type,
    pub max_stack: usize,
    pub source: String,
}

impl fmt::Display for CompiledMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.instrs)
    }
}

/// One compile unit: a class whose methods each evaluate one call site.
///
/// The constant pool is shared by all methods, so repeated calls intern each
/// runtime reference once.
pub struct Compiler {
    class_gen: ClassGenerator,
    symbols: SymbolTable,
    variables: Vec<(QName, Type)>,
    methods: usize,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_class_name("Translet", config)
    }

    pub fn with_class_name(class_name: impl Into<String>, config: CompilerConfig) -> Self {
        Self {
            class_gen: ClassGenerator::new(class_name, config),
            symbols: SymbolTable::new(),
            variables: Vec::new(),
            methods: 0,
        }
    }

    /// Make a variable (or parameter) visible to subsequent calls. The name
    /// is resolved against the configured namespace bindings.
    pub fn declare_variable(&mut self, name: &QName, ty: Type) -> Result<(), Error> {
        let name = self.class_gen.config().resolve_qname(name)?;
        self.symbols.declare(name.clone(), ty);
        self.variables.retain(|(n, _)| n != &name);
        self.variables.push((name, ty));
        Ok(())
    }

    pub fn class_generator(&self) -> &ClassGenerator {
        &self.class_gen
    }

    pub fn config(&self) -> &CompilerConfig {
        self.class_gen.config()
    }

    fn new_method(&mut self) -> Result<MethodGenerator, Error> {
        let name = format!("call{}", self.methods);
        self.methods += 1;
        let mut mg = MethodGenerator::new(name, self.class_gen.config());
        for (name, ty) in &self.variables {
            mg.add_local(name.clone(), *ty)?;
        }
        Ok(mg)
    }

    /// Parse, check and translate `source` into a fresh method.
    pub fn compile(&mut self, source: &str) -> Result<CompiledMethod, Error> {
        let call = parse_call(source)?;
        let mut call = resolve_call(call, self.class_gen.config())?;
        self.compile_call(&mut call, source)
    }

    /// Check and translate an already resolved call into a fresh method.
    pub fn compile_call(&mut self, call: &mut NameCall, source: &str) -> Result<CompiledMethod, Error> {
        let result_type = call.type_check(&self.symbols)?;
        let mut mg = self.new_method()?;
        call.translate(&mut self.class_gen, &mut mg)?;
        let summary = verify(mg.instruction_list(), self.class_gen.constant_pool())?;
        debug!(method = mg.name(), %call, max_stack = summary.max_stack, "compiled call");
        Ok(CompiledMethod {
            name: mg.name().to_string(),
            function: call.function(),
            instrs: mg.into_instruction_list(),
            result_type,
            max_stack: summary.max_stack,
            source: source.to_string(),
        })
    }

    /// Disassembly of a compiled method against this unit's pool.
    pub fn disassemble(&self, method: &CompiledMethod) -> String {
        method.instrs.disassemble(self.class_gen.constant_pool())
    }
}

/// Compile a single call with the default configuration and no variables.
pub fn compile_call(source: &str) -> Result<(CompiledMethod, ClassGenerator), Error> {
    let mut compiler = Compiler::new(CompilerConfig::default());
    let method = compiler.compile(source)?;
    Ok((method, compiler.class_gen))
}
