use std::error::Error;
use xsltc::types::Type;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// `NAME=TYPE`, e.g. `items=node-set`.
pub fn parse_variable_arg(value: &str) -> Result<(String, Type), String> {
    let (name, ty) = split_pair(value, "NAME=TYPE")?;
    let ty = ty.parse::<Type>()?;
    Ok((name.to_owned(), ty))
}

/// `PREFIX=URI`, e.g. `p=urn:example`.
pub fn parse_namespace_arg(value: &str) -> Result<(String, String), String> {
    let (prefix, uri) = split_pair(value, "PREFIX=URI")?;
    Ok((prefix.to_owned(), uri.to_owned()))
}

fn split_pair<'a>(value: &'a str, shape: &str) -> Result<(&'a str, &'a str), String> {
    match value.split_once('=') {
        Some((left, right)) if !left.trim().is_empty() && !right.trim().is_empty() => {
            Ok((left.trim(), right.trim()))
        }
        _ => Err(format!("expected {shape}, got '{value}'")),
    }
}
