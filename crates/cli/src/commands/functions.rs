use crate::OutputFormat;
use crate::util::CliResult;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::fmt::Write;
use xsltc::config::CompilerConfig;
use xsltc::functions::NameFunction;

#[derive(Args, Debug, Clone)]
pub struct FunctionsArgs {
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct FunctionSummary {
    name: String,
    signature: String,
    operations: Vec<String>,
}

pub fn run(args: &FunctionsArgs) -> CliResult<String> {
    let cfg = CompilerConfig::default();
    let summaries: Vec<FunctionSummary> =
        NameFunction::ALL.iter().map(|f| FunctionSummary::from_function(*f, &cfg)).collect();
    let output = match args.format {
        OutputFormat::Text => render_functions_text(&summaries),
        OutputFormat::Json => serde_json::to_string_pretty(&summaries)?,
    };
    Ok(output)
}

impl FunctionSummary {
    fn from_function(function: NameFunction, cfg: &CompilerConfig) -> Self {
        Self {
            name: function.local_name().to_owned(),
            signature: format!("{function}(node()?) as string"),
            operations: function
                .final_operations()
                .iter()
                .map(|op| format!("{}.{}{}", simple_name(op.owner.class_name(cfg)), op.name, op.descriptor(cfg)))
                .collect(),
        }
    }
}

fn simple_name(class: &str) -> &str {
    class.rsplit('/').next().unwrap_or(class)
}

fn render_functions_text(summaries: &[FunctionSummary]) -> String {
    let mut output = String::new();
    for summary in summaries {
        let _ = writeln!(
            &mut output,
            "{}",
            summary.signature.if_supports_color(Stream::Stdout, |text| text.bold().to_string())
        );
        for op in &summary.operations {
            let _ = writeln!(&mut output, "  {op}");
        }
    }
    output.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn local_name_has_two_operations() {
        let cfg = CompilerConfig::default();
        let summary = FunctionSummary::from_function(NameFunction::LocalName, &cfg);
        assert_eq!(
            summary.operations,
            vec![
                "DOM.getNodeName(I)Ljava/lang/String;".to_owned(),
                "BasisLibrary.getLocalName(Ljava/lang/String;)Ljava/lang/String;".to_owned(),
            ]
        );
    }

    #[rstest]
    fn json_lists_all_functions() {
        let out = run(&FunctionsArgs { format: OutputFormat::Json }).expect("run");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        let names: Vec<&str> =
            value.as_array().unwrap().iter().filter_map(|f| f["name"].as_str()).collect();
        assert_eq!(names, vec!["name", "local-name", "namespace-uri"]);
    }
}
