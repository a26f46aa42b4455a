//! Core lexer implementation.
//!
//! Scans Juno source text character by character, producing a stream of
//! tokens plus diagnostics, the first bracket error, and color
//! annotations. The scan is a total function: malformed constructs
//! degrade to a best partial token and a diagnostic, and every character
//! of the input is consumed by exactly one token.

use crate::color::{parse_string_color, scan_color_literals, Color, ColorAnnotation};
use crate::token::*;

/// The Juno lexer.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    bracket_error: Option<BracketError>,
    /// Open brackets with their positions, innermost last.
    bracket_stack: Vec<(TokenKind, u32, u32)>,
    /// Token indices of `Color` identifiers, for the color post-pass.
    color_idents: Vec<usize>,
    /// Annotations found during scanning (hex strings, packed literals).
    colors: Vec<ColorAnnotation>,
}

/// Tokenize one complete source unit.
///
/// Callable repeatedly and independently; all working state lives in the
/// [`Lexer`] instance created per call.
pub fn lex(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}

/// Start position of a token being scanned: (pos, line, column).
#[derive(Clone, Copy)]
struct Start {
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            bracket_error: None,
            bracket_stack: Vec::new(),
            color_idents: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self) -> LexResult {
        while !self.is_at_end() {
            self.lex_token();
        }

        // Unclosed brackets: report the innermost one, first-error-wins.
        if self.bracket_error.is_none() {
            if let Some((opener, line, column)) = self.bracket_stack.last().cloned() {
                self.bracket_error = Some(BracketError {
                    expected: closer_of(&opener).to_string(),
                    found: TokenKind::EndOfText.to_string(),
                    line,
                    column,
                });
            }
        }

        self.tokens.push(Token::new(
            TokenKind::EndOfText,
            self.line,
            self.column,
            0,
        ));

        let mut colors = self.colors;
        colors.extend(scan_color_literals(&self.tokens, &self.color_idents));

        LexResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
            bracket_error: self.bracket_error,
            colors,
        }
    }

    // === Character navigation ===

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> char {
        self.input.get(self.pos).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.input.get(self.pos + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.input[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn eat(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.input[self.pos] == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn start(&self) -> Start {
        Start {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn push_token(&mut self, kind: TokenKind, start: Start) {
        let length = (self.pos - start.pos) as u32;
        self.tokens
            .push(Token::new(kind, start.line, start.column, length));
    }

    fn diagnostic(&mut self, message: impl Into<String>, severity: Severity, start: Start) {
        self.diagnostics.push(Diagnostic {
            message: message.into(),
            severity,
            line: start.line,
            column: start.column,
            length: (self.pos - start.pos) as u32,
        });
    }

    /// Last emitted token, skipping whitespace runs. This is the lookback
    /// used by sign fusion and keyword demotion.
    fn prev_non_space(&self) -> Option<&TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|t| &t.kind)
            .find(|k| **k != TokenKind::Whitespace)
    }

    // === Main token dispatch ===

    fn lex_token(&mut self) {
        let start = self.start();
        let ch = self.peek();

        match ch {
            ' ' | '\t' | '\r' => self.lex_whitespace(start),
            '\n' => {
                self.advance();
                self.push_token(TokenKind::Newline, start);
            }
            '"' => self.lex_string(start),
            '\'' => self.lex_char(start),
            '@' => self.lex_annotation(start),
            '0'..='9' => self.lex_number(start, 1),
            '+' | '-' => self.lex_plus_minus(start),
            '/' => self.lex_slash(start),
            _ => {
                if char_category(ch).is_some() {
                    self.lex_operator(start);
                } else {
                    self.lex_identifier(start);
                }
            }
        }
    }

    fn lex_whitespace(&mut self, start: Start) {
        while matches!(self.peek(), ' ' | '\t' | '\r') && !self.is_at_end() {
            self.advance();
        }
        self.push_token(TokenKind::Whitespace, start);
    }

    // === Sign fusion ===

    /// A leading `+`/`-` belongs to a numeric literal exactly when the
    /// lexical context indicates "value expected": the preceding
    /// non-space token must not be one that ends an operand. String
    /// literals are excluded only for `-`.
    fn sign_fuses(&self, sign: char) -> bool {
        match self.prev_non_space() {
            None => true,
            Some(kind) => {
                let operand_end = matches!(
                    kind,
                    TokenKind::Identifier(_)
                        | TokenKind::IntLiteral(_)
                        | TokenKind::FloatLiteral(_)
                        | TokenKind::RParen
                        | TokenKind::RBracket
                ) || (sign == '-' && matches!(kind, TokenKind::StringLiteral(_)));
                !operand_end
            }
        }
    }

    fn lex_plus_minus(&mut self, start: Start) {
        let ch = self.peek();
        if self.peek_next() == ch {
            self.advance();
            self.advance();
            let kind = if ch == '+' {
                TokenKind::PlusPlus
            } else {
                TokenKind::MinusMinus
            };
            self.push_token(kind, start);
            return;
        }
        if self.peek_next() == '=' {
            self.advance();
            self.advance();
            let kind = if ch == '+' {
                TokenKind::PlusAssign
            } else {
                TokenKind::MinusAssign
            };
            self.push_token(kind, start);
            return;
        }
        if self.peek_next().is_ascii_digit() && self.sign_fuses(ch) {
            self.advance(); // consume the sign
            let sign = if ch == '-' { -1 } else { 1 };
            self.lex_number(start, sign);
            return;
        }
        self.advance();
        let kind = if ch == '+' {
            TokenKind::Plus
        } else {
            TokenKind::Minus
        };
        self.push_token(kind, start);
    }

    // === Numeric literals ===

    /// Scan a numeric literal. The optional sign has already been
    /// consumed by the caller; `start` still covers it.
    fn lex_number(&mut self, start: Start, sign: i64) {
        let mut radix: u32 = 10;

        // Radix prefix: `0b`, `0x`, or a leading `0` before an octal digit.
        if self.peek() == '0' {
            match self.peek_next() {
                'b' | 'B' => {
                    self.advance();
                    self.advance();
                    radix = 2;
                }
                'x' | 'X' => {
                    self.advance();
                    self.advance();
                    radix = 16;
                }
                '0'..='7' => {
                    self.advance();
                    radix = 8;
                }
                _ => {}
            }
        }

        let mut digits = String::new();
        while !self.is_at_end() && self.peek().is_digit(radix) {
            digits.push(self.advance());
        }
        let digit_count = digits.len();

        if digits.is_empty() {
            // `0b` / `0x` with no digits after the prefix.
            self.diagnostic(
                format!("expected base-{radix} digits in numeric literal"),
                Severity::Error,
                start,
            );
            self.push_token(TokenKind::IntLiteral(0), start);
            return;
        }

        let mut is_float = false;
        let mut fraction = String::new();
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            if radix != 10 {
                self.diagnostic(
                    "fractional part is only valid in decimal literals",
                    Severity::Error,
                    start,
                );
            }
            is_float = true;
            self.advance(); // .
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                fraction.push(self.advance());
            }
        }

        let mut exponent: i32 = 0;
        let mut has_exponent = false;
        if matches!(self.peek(), 'e' | 'E')
            && (self.peek_next().is_ascii_digit()
                || (matches!(self.peek_next(), '+' | '-')
                    && self
                        .input
                        .get(self.pos + 2)
                        .is_some_and(|c| c.is_ascii_digit())))
        {
            if radix != 10 {
                self.diagnostic(
                    "exponent is only valid in decimal literals",
                    Severity::Error,
                    start,
                );
            }
            has_exponent = true;
            self.advance(); // e
            let negative = match self.peek() {
                '-' => {
                    self.advance();
                    true
                }
                '+' => {
                    self.advance();
                    false
                }
                _ => false,
            };
            let mut exp_digits = String::new();
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                exp_digits.push(self.advance());
            }
            exponent = exp_digits.parse::<i32>().unwrap_or(i32::MAX);
            if negative {
                exponent = -exponent;
            }
        }

        // Suffixes: `d`/`f` force float classification, `l` marks a long
        // literal. None contributes digits. For radix 16 the letters are
        // already consumed as hex digits above.
        if matches!(self.peek(), 'd' | 'D' | 'f' | 'F') {
            self.advance();
            is_float = true;
        } else if matches!(self.peek(), 'l' | 'L') {
            self.advance();
        }

        let kind = if is_float || (has_exponent && exponent < 0) {
            let text = if fraction.is_empty() {
                digits.clone()
            } else {
                format!("{digits}.{fraction}")
            };
            let mut value: f64 = text.parse().unwrap_or(0.0);
            value *= 10f64.powi(exponent);
            TokenKind::FloatLiteral(value * sign as f64)
        } else {
            let mut value = match i128::from_str_radix(&digits, radix) {
                Ok(v) => v,
                Err(_) => {
                    self.diagnostic("integer literal overflow", Severity::Error, start);
                    0
                }
            };
            for _ in 0..exponent {
                // Once the value leaves the i64 range (or is zero) further
                // multiplications cannot change the clamped outcome.
                if value == 0 || value > i64::MAX as i128 || value < i64::MIN as i128 {
                    break;
                }
                value = value.saturating_mul(10);
            }
            value *= sign as i128;
            if value > i64::MAX as i128 || value < i64::MIN as i128 {
                self.diagnostic("integer literal overflow", Severity::Error, start);
                value = value.clamp(i64::MIN as i128, i64::MAX as i128);
            }
            let value = value as i64;

            // An 8-hex-digit literal doubles as a packed RGB color.
            if radix == 16 && digit_count == 8 {
                self.colors.push(ColorAnnotation {
                    color: Color::from_packed_rgb(value),
                    line: start.line,
                    column: start.column,
                    length: (self.pos - start.pos) as u32,
                });
            }
            TokenKind::IntLiteral(value)
        };

        self.push_token(kind, start);
    }

    // === String and char literals ===

    fn lex_string(&mut self, start: Start) {
        self.advance(); // opening "

        let mut value = String::new();
        let mut closed = false;

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                self.diagnostic("unterminated string literal", Severity::Error, start);
                break;
            }
            match self.peek() {
                '"' => {
                    self.advance();
                    closed = true;
                    break;
                }
                '\\' => {
                    let esc_start = self.start();
                    self.advance(); // backslash
                    if self.is_at_end() || self.peek() == '\n' {
                        self.diagnostic("unterminated escape sequence", Severity::Error, esc_start);
                        continue;
                    }
                    let ch = self.advance();
                    match decode_escape(ch) {
                        Some(decoded) => value.push(decoded),
                        None => {
                            self.diagnostic(
                                format!("invalid escape sequence: \\{ch}"),
                                Severity::Error,
                                esc_start,
                            );
                            value.push(ch);
                        }
                    }
                }
                _ => value.push(self.advance()),
            }
        }

        let length = (self.pos - start.pos) as u32;

        // A closed string may spell a color ("#ff0000", "red").
        if closed {
            if let Some(color) = parse_string_color(&value) {
                self.colors.push(ColorAnnotation {
                    color,
                    line: start.line,
                    column: start.column,
                    length,
                });
            }
        }

        self.push_token(TokenKind::StringLiteral(value), start);
    }

    fn lex_char(&mut self, start: Start) {
        self.advance(); // opening '

        if self.is_at_end() || self.peek() == '\n' {
            self.diagnostic("unterminated character literal", Severity::Error, start);
            self.push_token(TokenKind::CharLiteral('\0'), start);
            return;
        }

        let ch = if self.peek() == '\\' {
            let esc_start = self.start();
            self.advance();
            if self.is_at_end() || self.peek() == '\n' {
                self.diagnostic("unterminated escape sequence", Severity::Error, esc_start);
                '\0'
            } else {
                let raw = self.advance();
                match decode_escape(raw) {
                    Some(decoded) => decoded,
                    None => {
                        self.diagnostic(
                            format!("invalid escape sequence: \\{raw}"),
                            Severity::Error,
                            esc_start,
                        );
                        raw
                    }
                }
            }
        } else {
            self.advance()
        };

        if !self.eat('\'') {
            if !self.is_at_end() && self.peek() != '\n' {
                // More than one character before the closing quote.
                while !self.is_at_end() && self.peek() != '\'' && self.peek() != '\n' {
                    self.advance();
                }
                self.eat('\'');
                self.diagnostic(
                    "character literal must contain exactly one character",
                    Severity::Error,
                    start,
                );
            } else {
                self.diagnostic("unterminated character literal", Severity::Error, start);
            }
        }

        self.push_token(TokenKind::CharLiteral(ch), start);
    }

    // === Comments ===

    fn lex_slash(&mut self, start: Start) {
        match self.peek_next() {
            '/' => {
                self.advance();
                self.advance();
                let mut text = String::new();
                while !self.is_at_end() && self.peek() != '\n' {
                    text.push(self.advance());
                }
                // The line simply ends; no diagnostic at end of input.
                self.push_token(TokenKind::LineComment(text), start);
            }
            '*' => {
                self.advance();
                self.advance();
                let mut text = String::new();
                let mut closed = false;
                while !self.is_at_end() {
                    if self.peek() == '*' && self.peek_next() == '/' {
                        self.advance();
                        self.advance();
                        closed = true;
                        break;
                    }
                    let ch = self.advance();
                    text.push(ch);
                    // Flatten indentation: a run of spaces right after a
                    // newline collapses to a single space in the stored
                    // text. The token length still counts source chars.
                    if ch == '\n' && matches!(self.peek(), ' ' | '\t') {
                        while matches!(self.peek(), ' ' | '\t') && !self.is_at_end() {
                            self.advance();
                        }
                        text.push(' ');
                    }
                }
                if !closed {
                    self.diagnostic("unterminated block comment", Severity::Error, start);
                }
                self.push_token(TokenKind::BlockComment(text), start);
            }
            '=' => {
                self.advance();
                self.advance();
                self.push_token(TokenKind::SlashAssign, start);
            }
            _ => {
                self.advance();
                self.push_token(TokenKind::Slash, start);
            }
        }
    }

    // === Annotations ===

    fn lex_annotation(&mut self, start: Start) {
        self.advance(); // @
        let mut name = String::new();
        while !self.is_at_end() && !is_special(self.peek()) && !is_space_or_newline(self.peek()) {
            name.push(self.advance());
        }
        self.push_token(TokenKind::Annotation(name), start);
    }

    // === Identifiers and keywords ===

    fn lex_identifier(&mut self, start: Start) {
        let mut text = String::new();
        while !self.is_at_end() && !is_special(self.peek()) && !is_space_or_newline(self.peek()) {
            text.push(self.advance());
        }

        let kind = match TokenKind::keyword(&text) {
            // Keywords that double as member names revert to identifiers
            // right after a `.`.
            Some(kw)
                if kw.demotable_after_dot()
                    && self.prev_non_space() == Some(&TokenKind::Dot) =>
            {
                TokenKind::Identifier(text)
            }
            Some(kw) => kw,
            None => {
                if text == "Color" {
                    self.color_idents.push(self.tokens.len());
                }
                TokenKind::Identifier(text)
            }
        };

        self.push_token(kind, start);
    }

    // === Operators, delimiters, brackets ===

    fn lex_operator(&mut self, start: Start) {
        let ch = self.advance();
        let kind = match ch {
            '*' => {
                if self.eat('=') {
                    TokenKind::StarAssign
                } else {
                    TokenKind::Star
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentAssign
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::ShlAssign
                    } else {
                        TokenKind::Shl
                    }
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            TokenKind::UShrAssign
                        } else {
                            TokenKind::UShr
                        }
                    } else if self.eat('=') {
                        TokenKind::ShrAssign
                    } else {
                        TokenKind::Shr
                    }
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AndAnd
                } else if self.eat('=') {
                    TokenKind::AndAssign
                } else {
                    TokenKind::Ampersand
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::OrOr
                } else if self.eat('=') {
                    TokenKind::OrAssign
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::XorAssign
                } else {
                    TokenKind::Caret
                }
            }
            '~' => TokenKind::Tilde,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '(' => {
                self.open_bracket(TokenKind::LParen, start);
                TokenKind::LParen
            }
            '{' => {
                self.open_bracket(TokenKind::LBrace, start);
                TokenKind::LBrace
            }
            '[' => {
                // `[]` is a single array marker token and never touches
                // the bracket stack.
                if self.eat(']') {
                    TokenKind::EmptyBrackets
                } else {
                    self.open_bracket(TokenKind::LBracket, start);
                    TokenKind::LBracket
                }
            }
            ')' => {
                self.close_bracket(TokenKind::RParen, start);
                TokenKind::RParen
            }
            '}' => {
                self.close_bracket(TokenKind::RBrace, start);
                TokenKind::RBrace
            }
            ']' => {
                self.close_bracket(TokenKind::RBracket, start);
                TokenKind::RBracket
            }
            // char_category covers everything that reaches lex_operator.
            _ => unreachable!("lex_operator called on non-special `{ch}`"),
        };

        self.push_token(kind, start);
    }

    fn open_bracket(&mut self, opener: TokenKind, start: Start) {
        self.bracket_stack.push((opener, start.line, start.column));
    }

    fn close_bracket(&mut self, found: TokenKind, start: Start) {
        match self.bracket_stack.pop() {
            Some((opener, _, _)) => {
                let expected = closer_of(&opener);
                if expected != found && self.bracket_error.is_none() {
                    self.bracket_error = Some(BracketError {
                        expected: expected.to_string(),
                        found: found.to_string(),
                        line: start.line,
                        column: start.column,
                    });
                }
            }
            None => {
                if self.bracket_error.is_none() {
                    self.bracket_error = Some(BracketError {
                        expected: "no closing bracket".to_string(),
                        found: found.to_string(),
                        line: start.line,
                        column: start.column,
                    });
                }
            }
        }
    }
}

// === Static character tables ===

/// Character → provisional token category. Characters absent from the
/// table start numeric literals (digits) or identifier/keyword runs.
/// Multi-character operators are resolved from the provisional category
/// by one-character lookahead in the scanner.
pub fn char_category(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ';' => TokenKind::Semicolon,
        ':' => TokenKind::Colon,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        '?' => TokenKind::Question,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '=' => TokenKind::Assign,
        '!' => TokenKind::Not,
        '<' => TokenKind::Lt,
        '>' => TokenKind::Gt,
        '&' => TokenKind::Ampersand,
        '|' => TokenKind::Pipe,
        '^' => TokenKind::Caret,
        '~' => TokenKind::Tilde,
        _ => return None,
    };
    Some(kind)
}

/// Characters that terminate an identifier/annotation run.
fn is_special(ch: char) -> bool {
    char_category(ch).is_some() || matches!(ch, '"' | '\'' | '@')
}

fn is_space_or_newline(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Shared escape table for string and char literals.
fn decode_escape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'b' => Some('\u{0008}'),
        'f' => Some('\u{000C}'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// The closing bracket that matches an opener.
fn closer_of(opener: &TokenKind) -> TokenKind {
    match opener {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBrace => TokenKind::RBrace,
        TokenKind::LBracket => TokenKind::RBracket,
        other => unreachable!("not an opening bracket: {other}"),
    }
}
