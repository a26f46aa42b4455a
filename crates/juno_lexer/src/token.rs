//! Token types for the Juno lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::ColorAnnotation;

/// A single token produced by the lexer.
///
/// `line` and `column` are 1-based. `length` is the number of *source*
/// characters the token consumed, even when the payload is a decoded,
/// shorter representation (an escaped character, a comment with flattened
/// indentation). Summing `length` over a full token stream reproduces the
/// character count of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32, column: u32, length: u32) -> Self {
        Self {
            kind,
            line,
            column,
            length,
        }
    }
}

/// Every possible token kind in Juno.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    CharLiteral(char),
    BoolLiteral(bool),

    // === Identifier and annotation ===
    Identifier(String),
    Annotation(String), // @Name

    // === Keywords ===
    Class,
    Extends,
    Implements,
    Interface,
    Enum,
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
    New,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    This,
    Super,
    Null,
    Instanceof,
    Void,
    Var,
    Print,
    Println,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,

    // === Operators ===
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusPlus,   // ++
    MinusMinus, // --
    Assign,     // =
    PlusAssign, // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=
    Eq,         // ==
    NotEq,      // !=
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    AndAnd,     // &&
    OrOr,       // ||
    Not,        // !
    Ampersand,  // &
    Pipe,       // |
    Caret,      // ^
    Tilde,      // ~
    AndAssign,  // &=
    OrAssign,   // |=
    XorAssign,  // ^=
    Shl,        // <<
    Shr,        // >>
    UShr,       // >>>
    ShlAssign,  // <<=
    ShrAssign,  // >>=
    UShrAssign, // >>>=

    // === Delimiters ===
    LParen,        // (
    RParen,        // )
    LBrace,        // {
    RBrace,        // }
    LBracket,      // [
    RBracket,      // ]
    EmptyBrackets, // [] as a single token (array type marker)
    Semicolon,     // ;
    Colon,         // :
    Comma,         // ,
    Dot,           // .
    Question,      // ?

    // === Trivia (kept in the stream for position accounting) ===
    Whitespace, // one token per contiguous run of spaces/tabs
    Newline,
    LineComment(String),
    BlockComment(String),

    // === Meta ===
    EndOfText,
}

impl TokenKind {
    /// Keyword table lookup. `true`/`false` decode to boolean literals
    /// rather than keywords.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "class" => TokenKind::Class,
            "extends" => TokenKind::Extends,
            "implements" => TokenKind::Implements,
            "interface" => TokenKind::Interface,
            "enum" => TokenKind::Enum,
            "public" => TokenKind::Public,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "static" => TokenKind::Static,
            "final" => TokenKind::Final,
            "abstract" => TokenKind::Abstract,
            "new" => TokenKind::New,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "return" => TokenKind::Return,
            "this" => TokenKind::This,
            "super" => TokenKind::Super,
            "null" => TokenKind::Null,
            "instanceof" => TokenKind::Instanceof,
            "void" => TokenKind::Void,
            "var" => TokenKind::Var,
            "print" => TokenKind::Print,
            "println" => TokenKind::Println,
            "int" => TokenKind::Int,
            "long" => TokenKind::Long,
            "float" => TokenKind::Float,
            "double" => TokenKind::Double,
            "boolean" => TokenKind::Boolean,
            "char" => TokenKind::Char,
            "true" => TokenKind::BoolLiteral(true),
            "false" => TokenKind::BoolLiteral(false),
            _ => return None,
        };
        Some(kind)
    }

    /// Keywords that are also valid member names. Immediately after a `.`
    /// they are demoted back to plain identifiers.
    pub fn demotable_after_dot(&self) -> bool {
        matches!(self, TokenKind::Print | TokenKind::Println)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLiteral(n) => write!(f, "integer `{n}`"),
            TokenKind::FloatLiteral(n) => write!(f, "float `{n}`"),
            TokenKind::StringLiteral(s) => write!(f, "string `\"{s}\"`"),
            TokenKind::CharLiteral(c) => write!(f, "char `'{c}'`"),
            TokenKind::BoolLiteral(b) => write!(f, "`{b}`"),
            TokenKind::Identifier(s) => write!(f, "identifier `{s}`"),
            TokenKind::Annotation(s) => write!(f, "annotation `@{s}`"),
            TokenKind::Class => write!(f, "`class`"),
            TokenKind::Extends => write!(f, "`extends`"),
            TokenKind::Implements => write!(f, "`implements`"),
            TokenKind::Interface => write!(f, "`interface`"),
            TokenKind::Enum => write!(f, "`enum`"),
            TokenKind::Public => write!(f, "`public`"),
            TokenKind::Private => write!(f, "`private`"),
            TokenKind::Protected => write!(f, "`protected`"),
            TokenKind::Static => write!(f, "`static`"),
            TokenKind::Final => write!(f, "`final`"),
            TokenKind::Abstract => write!(f, "`abstract`"),
            TokenKind::New => write!(f, "`new`"),
            TokenKind::If => write!(f, "`if`"),
            TokenKind::Else => write!(f, "`else`"),
            TokenKind::For => write!(f, "`for`"),
            TokenKind::While => write!(f, "`while`"),
            TokenKind::Do => write!(f, "`do`"),
            TokenKind::Switch => write!(f, "`switch`"),
            TokenKind::Case => write!(f, "`case`"),
            TokenKind::Default => write!(f, "`default`"),
            TokenKind::Break => write!(f, "`break`"),
            TokenKind::Continue => write!(f, "`continue`"),
            TokenKind::Return => write!(f, "`return`"),
            TokenKind::This => write!(f, "`this`"),
            TokenKind::Super => write!(f, "`super`"),
            TokenKind::Null => write!(f, "`null`"),
            TokenKind::Instanceof => write!(f, "`instanceof`"),
            TokenKind::Void => write!(f, "`void`"),
            TokenKind::Var => write!(f, "`var`"),
            TokenKind::Print => write!(f, "`print`"),
            TokenKind::Println => write!(f, "`println`"),
            TokenKind::Int => write!(f, "`int`"),
            TokenKind::Long => write!(f, "`long`"),
            TokenKind::Float => write!(f, "`float`"),
            TokenKind::Double => write!(f, "`double`"),
            TokenKind::Boolean => write!(f, "`boolean`"),
            TokenKind::Char => write!(f, "`char`"),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Minus => write!(f, "`-`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Slash => write!(f, "`/`"),
            TokenKind::Percent => write!(f, "`%`"),
            TokenKind::PlusPlus => write!(f, "`++`"),
            TokenKind::MinusMinus => write!(f, "`--`"),
            TokenKind::Assign => write!(f, "`=`"),
            TokenKind::PlusAssign => write!(f, "`+=`"),
            TokenKind::MinusAssign => write!(f, "`-=`"),
            TokenKind::StarAssign => write!(f, "`*=`"),
            TokenKind::SlashAssign => write!(f, "`/=`"),
            TokenKind::PercentAssign => write!(f, "`%=`"),
            TokenKind::Eq => write!(f, "`==`"),
            TokenKind::NotEq => write!(f, "`!=`"),
            TokenKind::Lt => write!(f, "`<`"),
            TokenKind::Gt => write!(f, "`>`"),
            TokenKind::LtEq => write!(f, "`<=`"),
            TokenKind::GtEq => write!(f, "`>=`"),
            TokenKind::AndAnd => write!(f, "`&&`"),
            TokenKind::OrOr => write!(f, "`||`"),
            TokenKind::Not => write!(f, "`!`"),
            TokenKind::Ampersand => write!(f, "`&`"),
            TokenKind::Pipe => write!(f, "`|`"),
            TokenKind::Caret => write!(f, "`^`"),
            TokenKind::Tilde => write!(f, "`~`"),
            TokenKind::AndAssign => write!(f, "`&=`"),
            TokenKind::OrAssign => write!(f, "`|=`"),
            TokenKind::XorAssign => write!(f, "`^=`"),
            TokenKind::Shl => write!(f, "`<<`"),
            TokenKind::Shr => write!(f, "`>>`"),
            TokenKind::UShr => write!(f, "`>>>`"),
            TokenKind::ShlAssign => write!(f, "`<<=`"),
            TokenKind::ShrAssign => write!(f, "`>>=`"),
            TokenKind::UShrAssign => write!(f, "`>>>=`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::LBrace => write!(f, "`{{`"),
            TokenKind::RBrace => write!(f, "`}}`"),
            TokenKind::LBracket => write!(f, "`[`"),
            TokenKind::RBracket => write!(f, "`]`"),
            TokenKind::EmptyBrackets => write!(f, "`[]`"),
            TokenKind::Semicolon => write!(f, "`;`"),
            TokenKind::Colon => write!(f, "`:`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Dot => write!(f, "`.`"),
            TokenKind::Question => write!(f, "`?`"),
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::LineComment(_) => write!(f, "line comment"),
            TokenKind::BlockComment(_) => write!(f, "block comment"),
            TokenKind::EndOfText => write!(f, "end of text"),
        }
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A lexical diagnostic with location. Diagnostics are accumulated in
/// emission order and never deduplicated; scanning always continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The first bracket mismatch of a lexical pass. At most one is reported;
/// later mismatches stemming from the same root cause are suppressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketError {
    /// Human-readable name of the bracket that was expected.
    pub expected: String,
    /// Human-readable name of what was found instead.
    pub found: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: expected {} but found {}",
            self.line, self.column, self.expected, self.found
        )
    }
}

/// Result of lexing one source unit.
///
/// Tokens, diagnostics, the first bracket error (if any), and color
/// annotations; all four are always present, even for malformed input —
/// the lexer is a total function.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub bracket_error: Option<BracketError>,
    pub colors: Vec<ColorAnnotation>,
}
