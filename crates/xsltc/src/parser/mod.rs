use crate::ast::{Expression, FunctionCall, NodeTest, Step};
use crate::error::{Error, ErrorCode};
use crate::model::{Axis, NodeKind, QName};
use pest::Parser;
use pest::iterators::Pair;
use std::sync::Arc;

#[derive(pest_derive::Parser)]
#[grammar = "call.pest"]
pub struct CallParser;

pub type ParseError = pest::error::Error<Rule>;

/// Parse a single call site such as `name()` or `local-name(child::item)`.
pub fn parse_call(input: &str) -> Result<FunctionCall, Error> {
    CallParser::parse_to_ast(input).map_err(|e| {
        Error::static_err(ErrorCode::XPST0003, e.to_string())
            .with_source(Some(Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>))
    })
}

impl CallParser {
    pub fn parse_to_ast(input: &str) -> Result<FunctionCall, ParseError> {
        let mut pairs = Self::parse(Rule::call, input)?;
        let call = pairs.next().map(|p| p.into_inner());
        let Some(func) = call.and_then(|mut inner| inner.next()) else {
            return Err(custom_error(input, "empty call"));
        };
        Ok(Self::build_call(func))
    }

    fn build_call(pair: Pair<'_, Rule>) -> FunctionCall {
        debug_assert_eq!(pair.as_rule(), Rule::function_call);
        let mut inner = pair.into_inner();
        let name = inner
            .next()
            .map(|q| QName::parse_lexical(q.as_str()))
            .unwrap_or_else(|| QName::local(""));
        let args = inner.map(Self::build_argument).collect();
        FunctionCall::new(name, args)
    }

    fn build_argument(pair: Pair<'_, Rule>) -> Expression {
        match pair.as_rule() {
            Rule::context_item => Expression::ContextNode,
            Rule::var_ref => {
                let q = pair.into_inner().next().map(|q| q.as_str()).unwrap_or_default();
                Expression::VariableRef(QName::parse_lexical(q))
            }
            Rule::string_literal => {
                let s = match pair.into_inner().next() {
                    Some(content) => match content.as_rule() {
                        Rule::dbl_string_inner => content.as_str().replace("\"\"", "\""),
                        _ => content.as_str().replace("''", "'"),
                    },
                    None => String::new(),
                };
                Expression::Literal(s)
            }
            _ => Expression::Step(Self::build_step(pair)),
        }
    }

    fn build_step(pair: Pair<'_, Rule>) -> Step {
        let mut axis = Axis::Child;
        let mut test = NodeTest::AnyNode;
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::abbrev_attribute => axis = Axis::Attribute,
                Rule::axis_name => axis = Axis::from_name(p.as_str()).unwrap_or(Axis::Child),
                Rule::kind_test => {
                    let kind = p.into_inner().next().map(|k| k.as_str()).unwrap_or("node");
                    test = match kind {
                        "text" => NodeTest::Kind(NodeKind::Text),
                        "comment" => NodeTest::Kind(NodeKind::Comment),
                        "processing-instruction" => {
                            NodeTest::Kind(NodeKind::ProcessingInstruction)
                        }
                        _ => NodeTest::AnyNode,
                    };
                }
                Rule::wildcard => test = NodeTest::Wildcard,
                Rule::qname => test = NodeTest::Name(QName::parse_lexical(p.as_str())),
                _ => {}
            }
        }
        Step { axis, test }
    }
}

fn custom_error(input: &str, message: &str) -> ParseError {
    ParseError::new_from_pos(
        pest::error::ErrorVariant::CustomError {
            message: message.into(),
        },
        pest::Position::from_start(input),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("name()", 0)]
    #[case("name( . )", 1)]
    #[case("local-name($v)", 1)]
    #[case("namespace-uri(child::item)", 1)]
    #[case("name(., .)", 2)]
    fn argument_counts(#[case] src: &str, #[case] argc: usize) {
        assert_eq!(parse_call(src).unwrap().argument_count(), argc);
    }

    #[test]
    fn axis_and_name_test() {
        let call = parse_call("name(descendant-or-self::p:item)").unwrap();
        assert_eq!(
            call.args,
            vec![Expression::Step(Step {
                axis: Axis::DescendantOrSelf,
                test: NodeTest::Name(QName::parse_lexical("p:item")),
            })]
        );
    }

    #[rstest]
    #[case("name(@id)", Axis::Attribute, NodeTest::Name(QName::local("id")))]
    #[case("name(@*)", Axis::Attribute, NodeTest::Wildcard)]
    #[case("name(item)", Axis::Child, NodeTest::Name(QName::local("item")))]
    #[case("name(text())", Axis::Child, NodeTest::Kind(NodeKind::Text))]
    #[case("name(parent::node())", Axis::Parent, NodeTest::AnyNode)]
    #[case("name(self::textual)", Axis::SelfAxis, NodeTest::Name(QName::local("textual")))]
    #[case("name(children)", Axis::Child, NodeTest::Name(QName::local("children")))]
    fn step_forms(#[case] src: &str, #[case] axis: Axis, #[case] test: NodeTest) {
        let call = parse_call(src).unwrap();
        assert_eq!(call.args, vec![Expression::Step(Step { axis, test })]);
    }

    #[test]
    fn prefixed_function_name() {
        let call = parse_call("fn:local-name()").unwrap();
        assert_eq!(call.name.prefix.as_deref(), Some("fn"));
        assert_eq!(call.name.local, "local-name");
    }

    #[test]
    fn string_literal_unescapes_quotes() {
        let call = parse_call("name('it''s')").unwrap();
        assert_eq!(call.args, vec![Expression::Literal("it's".to_string())]);
    }

    #[rstest]
    #[case("name(")]
    #[case("name)")]
    #[case("(.)")]
    #[case("name(.) extra")]
    #[case("name(..)")]
    fn syntax_errors(#[case] src: &str) {
        let err = parse_call(src).unwrap_err();
        assert_eq!(err.code, ErrorCode::XPST0003);
        assert!(err.source.is_some());
    }
}
