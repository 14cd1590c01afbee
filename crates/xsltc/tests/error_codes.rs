use rstest::rstest;
use xsltc::ast::Expression;
use xsltc::codegen::{ClassGenerator, MethodGenerator, Translate};
use xsltc::compiler::Compiler;
use xsltc::config::{CompilerConfig, CompilerConfigBuilder};
use xsltc::error::ErrorCode;
use xsltc::functions::{NameCall, NameFunction};
use xsltc::model::QName;
use xsltc::types::Type;

fn compile_err(src: &str) -> xsltc::Error {
    let mut c = Compiler::new(CompilerConfig::default());
    c.declare_variable(&QName::local("s"), Type::String).unwrap();
    c.compile(src).expect_err("expected failure")
}

#[rstest]
#[case("name('x')", ErrorCode::XPTY0004)]
#[case("local-name($s)", ErrorCode::XPTY0004)]
#[case("name($missing)", ErrorCode::XPST0008)]
#[case("name(., .)", ErrorCode::XPST0017)]
#[case("string()", ErrorCode::XPST0017)]
#[case("name(", ErrorCode::XPST0003)]
#[case("p:name()", ErrorCode::XPST0081)]
fn static_errors(#[case] src: &str, #[case] code: ErrorCode) {
    let err = compile_err(src);
    assert_eq!(err.code, code);
    assert!(!err.is_internal());
}

#[rstest]
fn failed_check_emits_nothing() {
    let mut c = Compiler::new(CompilerConfig::default());
    assert!(c.compile("name('x')").is_err());
    assert!(c.class_generator().constant_pool().is_empty());
}

#[rstest]
fn translate_before_type_check_is_internal() {
    let cfg = CompilerConfig::default();
    let mut cg = ClassGenerator::new("T", cfg.clone());
    let mut mg = MethodGenerator::new("m", &cfg);
    let call = NameCall::with_argument(NameFunction::Name, QName::local("name"), Expression::ContextNode);
    let err = call.translate(&mut cg, &mut mg).unwrap_err();
    assert_eq!(err.code, ErrorCode::XSLTC0006);
    assert!(err.is_internal());
    assert!(mg.instruction_list().is_empty());
}

#[rstest]
fn pool_exhaustion_propagates() {
    let cfg = CompilerConfigBuilder::new().with_max_pool_entries(3).build();
    let mut c = Compiler::new(cfg);
    let err = c.compile("name()").unwrap_err();
    assert_eq!(err.code, ErrorCode::XSLTC0001);
    assert!(err.is_internal());
}

#[rstest]
fn local_slot_overflow_propagates() {
    let cfg = CompilerConfigBuilder::new().with_first_free_slot(u16::MAX).build();
    let mut c = Compiler::new(cfg);
    c.declare_variable(&QName::local("n"), Type::Node).unwrap();
    let err = c.compile("name($n)").unwrap_err();
    assert_eq!(err.code, ErrorCode::XSLTC0007);
    assert!(err.is_internal());
    assert!(c.class_generator().constant_pool().is_empty());
}

#[rstest]
fn error_display_carries_code() {
    let err = compile_err("name('x')");
    let text = err.to_string();
    assert!(text.starts_with("error: "));
    assert!(text.ends_with("(XPTY0004)"));
}

#[rstest]
#[case("XPST0017", ErrorCode::XPST0017)]
#[case("err:XPTY0004", ErrorCode::XPTY0004)]
#[case("XSLTC0001", ErrorCode::XSLTC0001)]
#[case("XSLTC0007", ErrorCode::XSLTC0007)]
#[case("FOAR0001", ErrorCode::Unknown)]
fn codes_round_trip_from_strings(#[case] s: &str, #[case] code: ErrorCode) {
    assert_eq!(ErrorCode::from_code(s), code);
}
