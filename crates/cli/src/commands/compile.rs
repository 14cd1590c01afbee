use crate::OutputFormat;
use crate::util::{CliResult, parse_namespace_arg, parse_variable_arg};
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::fmt::Write;
use xsltc::compiler::{CompiledMethod, Compiler};
use xsltc::config::CompilerConfigBuilder;
use xsltc::model::QName;
use xsltc::types::Type;

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    #[arg(value_name = "CALL", help = "Call to translate, e.g. \"local-name(child::item)\".")]
    pub call: String,
    #[arg(
        long = "var",
        value_name = "NAME=TYPE",
        value_parser = parse_variable_arg,
        help = "Declare a variable visible to the call (node, node-set, reference, string, ...)."
    )]
    pub variables: Vec<(String, Type)>,
    #[arg(long = "namespace", value_name = "PREFIX=URI", value_parser = parse_namespace_arg)]
    pub namespaces: Vec<(String, String)>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct CompileSummary {
    source: String,
    function: String,
    method: String,
    result_type: String,
    max_stack: usize,
    pool_entries: usize,
    instructions: Vec<String>,
}

pub fn run(args: &CompileArgs) -> CliResult<String> {
    let mut builder = CompilerConfigBuilder::new();
    for (prefix, uri) in &args.namespaces {
        builder = builder.with_namespace(prefix, uri);
    }
    let mut compiler = Compiler::new(builder.build());
    for (name, ty) in &args.variables {
        compiler.declare_variable(&QName::parse_lexical(name), *ty)?;
    }

    let method = compiler.compile(&args.call)?;
    let summary = CompileSummary::from_method(&compiler, &method);

    let output = match args.format {
        OutputFormat::Text => render_compile_text(&summary),
        OutputFormat::Json => render_compile_json(&summary)?,
    };
    Ok(output)
}

impl CompileSummary {
    fn from_method(compiler: &Compiler, method: &CompiledMethod) -> Self {
        let pool = compiler.class_generator().constant_pool();
        Self {
            source: method.source.clone(),
            function: method.function.to_string(),
            method: method.name.clone(),
            result_type: method.result_type.to_string(),
            max_stack: method.max_stack,
            pool_entries: pool.len(),
            instructions: method.instrs.iter().map(|i| i.display_with(pool).to_string()).collect(),
        }
    }
}

fn render_compile_text(summary: &CompileSummary) -> String {
    let mut output = String::new();
    let header = format!("{} -> {}", summary.source, summary.result_type);
    let _ = writeln!(
        &mut output,
        "{}",
        header.if_supports_color(Stream::Stdout, |text| text.bold().to_string())
    );
    let stats = format!(
        "method {}, max stack {}, {} pool entries",
        summary.method, summary.max_stack, summary.pool_entries
    );
    let _ = writeln!(
        &mut output,
        "{}",
        stats.if_supports_color(Stream::Stdout, |text| text.dimmed().to_string())
    );
    for (pc, instr) in summary.instructions.iter().enumerate() {
        let _ = writeln!(&mut output, "{pc:>4}: {instr}");
    }
    output.trim_end().to_owned()
}

fn render_compile_json(summary: &CompileSummary) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
