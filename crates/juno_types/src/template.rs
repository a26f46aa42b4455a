//! Expression templates for later code generation.
//!
//! Every operator and cast entry in the type tables carries a template
//! describing how the application would be rendered by a code generator.
//! The placeholder convention is `$1` for the left/only operand and `$2`
//! for the right operand; substitution is verbatim. The templates form a
//! small closed set of shapes rather than free-form strings, so the
//! substitution step can be checked exhaustively, but `pattern()` yields
//! the exact `$1`/`$2` text an existing consumer expects.

/// One operator/cast rendering shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTemplate {
    /// `$1` — the operand is representable as-is.
    Identity,
    /// `$1 <op> $2`
    Infix(&'static str),
    /// `<op>$1`
    Prefix(&'static str),
    /// `$1<op>`
    Postfix(&'static str),
    /// `<name>($1)`
    Call1(&'static str),
    /// `<name>($1, $2)`
    Call2(&'static str),
}

impl OpTemplate {
    /// The placeholder-bearing template text.
    pub fn pattern(&self) -> String {
        match self {
            OpTemplate::Identity => "$1".to_string(),
            OpTemplate::Infix(op) => format!("$1 {op} $2"),
            OpTemplate::Prefix(op) => format!("{op}$1"),
            OpTemplate::Postfix(op) => format!("$1{op}"),
            OpTemplate::Call1(name) => format!("{name}($1)"),
            OpTemplate::Call2(name) => format!("{name}($1, $2)"),
        }
    }

    /// Substitute operand text into the template. `second` is ignored by
    /// unary shapes.
    pub fn apply(&self, first: &str, second: Option<&str>) -> String {
        let second = second.unwrap_or("");
        match self {
            OpTemplate::Identity => first.to_string(),
            OpTemplate::Infix(op) => format!("{first} {op} {second}"),
            OpTemplate::Prefix(op) => format!("{op}{first}"),
            OpTemplate::Postfix(op) => format!("{first}{op}"),
            OpTemplate::Call1(name) => format!("{name}({first})"),
            OpTemplate::Call2(name) => format!("{name}({first}, {second})"),
        }
    }

    /// Whether the template consumes a second operand.
    pub fn is_binary(&self) -> bool {
        matches!(self, OpTemplate::Infix(_) | OpTemplate::Call2(_))
    }
}
