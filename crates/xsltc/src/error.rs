use core::fmt;
use std::sync::Arc;

/// Error codes emitted while compiling a name-function call.
///
/// The `XP*` codes are the standard XPath static/type error codes; the
/// `XSLTC*` codes are compiler-internal failures of the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    XPST0003, // syntax error
    XPST0008, // undeclared variable
    XPST0017, // unknown function / wrong number of arguments
    XPST0081, // unbound namespace prefix
    XPTY0004, // argument type does not match
    XSLTC0001, // constant pool exhausted
    XSLTC0002, // malformed method descriptor
    XSLTC0003, // pool index does not name the expected entry
    XSLTC0004, // operand stack underflow
    XSLTC0005, // invocation argument count disagrees with descriptor
    XSLTC0006, // translate before type check
    XSLTC0007, // local variable slots exhausted
    // Fallback / unknown (kept last)
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::XPST0003 => "XPST0003",
            ErrorCode::XPST0008 => "XPST0008",
            ErrorCode::XPST0017 => "XPST0017",
            ErrorCode::XPST0081 => "XPST0081",
            ErrorCode::XPTY0004 => "XPTY0004",
            ErrorCode::XSLTC0001 => "XSLTC0001",
            ErrorCode::XSLTC0002 => "XSLTC0002",
            ErrorCode::XSLTC0003 => "XSLTC0003",
            ErrorCode::XSLTC0004 => "XSLTC0004",
            ErrorCode::XSLTC0005 => "XSLTC0005",
            ErrorCode::XSLTC0006 => "XSLTC0006",
            ErrorCode::XSLTC0007 => "XSLTC0007",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Parse a code string as produced by [`ErrorCode::as_str`], with or without
    /// the `err:` prefix.
    pub fn from_code(s: &str) -> Self {
        use ErrorCode::*;
        match s.strip_prefix("err:").unwrap_or(s) {
            "XPST0003" => XPST0003,
            "XPST0008" => XPST0008,
            "XPST0017" => XPST0017,
            "XPST0081" => XPST0081,
            "XPTY0004" => XPTY0004,
            "XSLTC0001" => XSLTC0001,
            "XSLTC0002" => XSLTC0002,
            "XSLTC0003" => XSLTC0003,
            "XSLTC0004" => XSLTC0004,
            "XSLTC0005" => XSLTC0005,
            "XSLTC0006" => XSLTC0006,
            "XSLTC0007" => XSLTC0007,
            _ => Unknown,
        }
    }

    /// Compiler-internal failures abort the pass; they never describe a fault in
    /// the stylesheet itself.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ErrorCode::XSLTC0001
                | ErrorCode::XSLTC0002
                | ErrorCode::XSLTC0003
                | ErrorCode::XSLTC0004
                | ErrorCode::XSLTC0005
                | ErrorCode::XSLTC0006
                | ErrorCode::XSLTC0007
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[source]
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>, // optional chained cause
}

impl Error {
    pub fn from_code(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            source: None,
        }
    }

    pub fn static_err(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::from_code(code, msg)
    }

    pub fn internal(code: ErrorCode, msg: impl Into<String>) -> Self {
        debug_assert!(code.is_internal(), "{code} is not an internal error code");
        Self::from_code(code, msg)
    }

    /// Compose an error with a source cause.
    pub fn with_source(
        mut self,
        source: impl Into<Option<Arc<dyn std::error::Error + Send + Sync>>>,
    ) -> Self {
        self.source = source.into();
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn is_internal(&self) -> bool {
        self.code.is_internal()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} ({})", self.message, self.code)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("XPST0017", ErrorCode::XPST0017)]
    #[case("err:XPTY0004", ErrorCode::XPTY0004)]
    #[case("XSLTC0001", ErrorCode::XSLTC0001)]
    #[case("nope", ErrorCode::Unknown)]
    fn parses_codes(#[case] raw: &str, #[case] expected: ErrorCode) {
        assert_eq!(ErrorCode::from_code(raw), expected);
    }

    #[rstest]
    fn display_includes_code() {
        let err = Error::from_code(ErrorCode::XPTY0004, "argument is not a node");
        assert_eq!(err.to_string(), "error: argument is not a node (XPTY0004)");
    }

    #[rstest]
    fn internal_codes_are_flagged() {
        assert!(ErrorCode::XSLTC0005.is_internal());
        assert!(!ErrorCode::XPST0008.is_internal());
    }
}
