//! cppman-args: declarative command-line schema and single-pass parser.
//!
//! This crate turns raw process arguments into a validated mapping:
//! - `Registry`: an ordered table of argument `Definition`s (name, alias, kind, level, dependencies)
//! - `Parser`: a stack-based tokenizer/validator bound to a registry
//! - `Diagnostic`: advisory reports for malformed input; parsing never aborts
//!
//! This crate contains NO scaffolding logic and never terminates the process.

use serde::{Deserialize, Serialize};

pub mod diagnostic {
    use thiserror::Error;

    /// Wrap `text` in double quotes, escaping `"` and `\` with a backslash.
    pub fn quoted(text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for c in text.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        out
    }

    /// Advisory report produced while parsing.
    ///
    /// The `Display` form of each variant is the exact single line written to
    /// stderr. None of these abort a parse.
    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    pub enum Diagnostic {
        #[error("IGNORING UNRECOGNIZED ARGUMENT: {}", quoted(.0))]
        UnrecognizedArgument(String),

        #[error("IGNORING EXTRANEOUS ARGUMENT VALUE: {}", quoted(.0))]
        ExtraneousValue(String),

        #[error("MISSING THE FOLLOWING ARGUMENT [ {dependency} ] REQUIRED BY {}", quoted(.required_by))]
        MissingDependency {
            dependency: String,
            required_by: String,
        },

        #[error("MISSING REQUIRED ARGUMENT {}", quoted(.0))]
        MissingRequired(String),

        #[error("MISSING VALUE FOR NON-FLAG ARGUMENT {}", quoted(.0))]
        MissingValue(String),
    }
}

pub use diagnostic::Diagnostic;

pub mod value {
    use serde::{Deserialize, Serialize};

    /// The value carried by a non-flag argument instance.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum Value {
        Boolean(bool),
        Integer(i64),
        Decimal(f64),
        String(String),
    }

    impl Value {
        pub fn kind(&self) -> super::Kind {
            match self {
                Value::Boolean(_) => super::Kind::Boolean,
                Value::Integer(_) => super::Kind::Integer,
                Value::Decimal(_) => super::Kind::Decimal,
                Value::String(_) => super::Kind::String,
            }
        }

        pub fn as_bool(&self) -> Option<bool> {
            match self {
                Value::Boolean(b) => Some(*b),
                _ => None,
            }
        }
        pub fn as_int(&self) -> Option<i64> {
            match self {
                Value::Integer(n) => Some(*n),
                _ => None,
            }
        }
        pub fn as_decimal(&self) -> Option<f64> {
            match self {
                Value::Decimal(d) => Some(*d),
                _ => None,
            }
        }
        pub fn as_str(&self) -> Option<&str> {
            match self {
                Value::String(s) => Some(s),
                _ => None,
            }
        }
    }

    /// Best-effort text to integer conversion.
    ///
    /// Leading whitespace is skipped and the longest `[+-]?[0-9]+` prefix is
    /// used. No prefix, or a prefix that overflows `i64`, yields 0.
    pub fn parse_integer(text: &str) -> i64 {
        let s = text.trim_start();
        let end = signed_digits_end(s, 0);
        s[..end].parse().unwrap_or(0)
    }

    /// Best-effort text to decimal conversion.
    ///
    /// Uses the longest `[+-]?digits[.digits][(e|E)[+-]?digits]` prefix; yields 0.0
    /// when there is none or when the prefix is out of `f64` range.
    pub fn parse_decimal(text: &str) -> f64 {
        let s = text.trim_start();
        let bytes = s.as_bytes();

        let mut end = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            end = 1;
        }
        let int_end = digits_end(bytes, end);
        let mut mantissa_digits = int_end - end;
        end = int_end;

        if bytes.get(end) == Some(&b'.') {
            let frac_end = digits_end(bytes, end + 1);
            mantissa_digits += frac_end - (end + 1);
            if mantissa_digits > 0 {
                end = frac_end;
            }
        }
        if mantissa_digits == 0 {
            return 0.0;
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let exp_end = signed_digits_end(s, end + 1);
            if exp_end > end + 1 && bytes[exp_end - 1].is_ascii_digit() {
                end = exp_end;
            }
        }

        match s[..end].parse::<f64>() {
            Ok(d) if d.is_finite() => d,
            _ => 0.0,
        }
    }

    /// Best-effort text to boolean conversion.
    ///
    /// A leading `true` (case-insensitive) or an integer prefix equal to 1
    /// gives true. Everything else, including other integers, is false.
    pub fn parse_boolean(text: &str) -> bool {
        let s = text.trim_start();
        match s.get(..4) {
            Some(word) if word.eq_ignore_ascii_case("true") => true,
            _ => parse_integer(s) == 1,
        }
    }

    fn digits_end(bytes: &[u8], start: usize) -> usize {
        let mut i = start;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    }

    // Returns `start` when no digit follows the optional sign.
    fn signed_digits_end(s: &str, start: usize) -> usize {
        let bytes = s.as_bytes();
        let mut i = start;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits_end(bytes, i);
        if end == i {
            start
        } else {
            end
        }
    }
}

pub use value::Value;

/// What a registered argument carries after its marker token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// No payload; presence alone is the information.
    #[default]
    Flag,
    Boolean,
    Integer,
    Decimal,
    String,
}

impl Kind {
    pub fn is_flag(self) -> bool {
        self == Kind::Flag
    }

    /// Convert raw token text into a value of this kind.
    ///
    /// Numeric and boolean conversion is permissive: malformed text yields the
    /// zero value rather than an error. Flags carry no value and return `None`.
    pub fn parse_value(self, text: &str) -> Option<Value> {
        match self {
            Kind::Flag => None,
            Kind::Boolean => Some(Value::Boolean(value::parse_boolean(text))),
            Kind::Integer => Some(Value::Integer(value::parse_integer(text))),
            Kind::Decimal => Some(Value::Decimal(value::parse_decimal(text))),
            Kind::String => Some(Value::String(text.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Flag => "flag",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Decimal => "decimal",
            Kind::String => "string",
        }
    }
}

/// Whether a registered argument must appear in the parsed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Optional,
    Required,
}

pub mod argument;
pub mod parser;
pub mod registry;

pub use argument::{Argument, Definition, Dependency};
pub use parser::{ArgumentKeys, ParsedArguments, Parser, ParserConfig};
pub use registry::Registry;

/// Serializable snapshot of one parse: the committed mapping plus every
/// diagnostic line, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseTrace {
    pub arguments: indexmap::IndexMap<String, TraceArgument>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceArgument {
    pub kind: Kind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ParseTrace {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
