//! Resolution of function calls onto their translators.

pub mod name;
pub mod name_base;

pub use name::{NameCall, NameFunction};

use crate::ast::{Expression, FunctionCall, NodeTest, Step};
use crate::config::CompilerConfig;
use crate::error::{Error, ErrorCode};

/// Map a parsed call onto the translator for its function.
///
/// The name must be unprefixed (XSLT 1.0 core functions) or in the default
/// function namespace.
pub fn resolve_call(call: FunctionCall, cfg: &CompilerConfig) -> Result<NameCall, Error> {
    let name = cfg.resolve_qname(&call.name)?;
    let in_fn_namespace = match name.ns_uri.as_deref() {
        None => true,
        Some(ns) => cfg.default_function_namespace.as_deref() == Some(ns),
    };
    let function = in_fn_namespace
        .then(|| NameFunction::from_local_name(&name.local))
        .flatten()
        .ok_or_else(|| {
            Error::static_err(
                ErrorCode::XPST0017,
                format!("unknown function {}#{}", call.name, call.args.len()),
            )
        })?;

    let mut args = call
        .args
        .into_iter()
        .map(|a| resolve_expression(a, cfg))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    match (args.next(), args.len()) {
        (None, _) => Ok(NameCall::new(function, name)),
        (Some(arg), 0) => Ok(NameCall::with_argument(function, name, arg)),
        (Some(_), extra) => Err(Error::static_err(
            ErrorCode::XPST0017,
            format!("{function}() takes zero or one argument, got {}", extra + 1),
        )),
    }
}

/// Resolve the prefixes of variable names and name tests inside an argument.
fn resolve_expression(expr: Expression, cfg: &CompilerConfig) -> Result<Expression, Error> {
    Ok(match expr {
        Expression::VariableRef(q) => Expression::VariableRef(cfg.resolve_qname(&q)?),
        Expression::Step(Step {
            axis,
            test: NodeTest::Name(q),
        }) => Expression::Step(Step {
            axis,
            test: NodeTest::Name(cfg.resolve_qname(&q)?),
        }),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::config::CompilerConfigBuilder;
    use crate::model::QName;
    use rstest::rstest;

    #[rstest]
    #[case("name", NameFunction::Name)]
    #[case("local-name", NameFunction::LocalName)]
    #[case("namespace-uri", NameFunction::NamespaceUri)]
    fn resolves_family_members(#[case] local: &str, #[case] expected: NameFunction) {
        let call = FunctionCall::new(QName::local(local), vec![]);
        let resolved = resolve_call(call, &CompilerConfig::default()).unwrap();
        assert_eq!(resolved.function(), expected);
        assert_eq!(resolved.argument_count(), 0);
    }

    #[test]
    fn prefixed_name_in_function_namespace() {
        let cfg = CompilerConfigBuilder::new()
            .with_namespace("fn", crate::config::FNS)
            .build();
        let call = FunctionCall::new(QName::parse_lexical("fn:name"), vec![Expression::ContextNode]);
        let resolved = resolve_call(call, &cfg).unwrap();
        assert_eq!(resolved.function(), NameFunction::Name);
        assert_eq!(resolved.argument(), Some(&Expression::ContextNode));
    }

    #[test]
    fn foreign_namespace_is_unknown() {
        let cfg = CompilerConfigBuilder::new().with_namespace("x", "urn:x").build();
        let call = FunctionCall::new(QName::parse_lexical("x:name"), vec![]);
        assert_eq!(resolve_call(call, &cfg).unwrap_err().code, ErrorCode::XPST0017);
    }

    #[test]
    fn unknown_local_name() {
        let call = FunctionCall::new(QName::local("string"), vec![]);
        let err = resolve_call(call, &CompilerConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::XPST0017);
    }

    #[test]
    fn argument_names_are_resolved() {
        let cfg = CompilerConfigBuilder::new().with_namespace("p", "urn:p").build();
        let call = FunctionCall::new(
            QName::local("name"),
            vec![Expression::Step(Step {
                axis: crate::model::Axis::Child,
                test: NodeTest::Name(QName::parse_lexical("p:item")),
            })],
        );
        let resolved = resolve_call(call, &cfg).unwrap();
        let Some(Expression::Step(step)) = resolved.argument() else {
            panic!("expected a step argument");
        };
        assert_eq!(step.test, NodeTest::Name(QName::new(None, "item", Some("urn:p"))));
    }

    #[test]
    fn unbound_argument_prefix() {
        let call = FunctionCall::new(
            QName::local("name"),
            vec![Expression::VariableRef(QName::parse_lexical("q:v"))],
        );
        let err = resolve_call(call, &CompilerConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::XPST0081);
    }

    #[test]
    fn two_arguments_rejected() {
        let call = FunctionCall::new(
            QName::local("name"),
            vec![Expression::ContextNode, Expression::ContextNode],
        );
        let err = resolve_call(call, &CompilerConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::XPST0017);
    }
}
