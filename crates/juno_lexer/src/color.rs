//! Color-literal recognition for editor tooling.
//!
//! Juno's editor renders inline color swatches next to expressions that
//! denote colors. The lexer spots three literal shapes and attaches a
//! [`ColorAnnotation`] for each: `new Color(r, g, b)` / `new Color(r, g,
//! b, a)` constructor calls, `Color.<name>` named-constant accesses, and
//! color text embedded in string literals (`"#ff0000"`, `"red"`). An
//! 8-hex-digit integer literal is additionally treated as a packed RGB
//! value. Annotations are derived data: they never influence tokenization
//! and a shape mismatch silently yields nothing.

use serde::{Deserialize, Serialize};

use crate::token::{Token, TokenKind};

/// An RGBA color with all channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Build a color from 0–255 channel values. Out-of-range values are
    /// clamped.
    pub fn from_bytes(r: i64, g: i64, b: i64, a: i64) -> Self {
        Self {
            red: channel(r),
            green: channel(g),
            blue: channel(b),
            alpha: channel(a),
        }
    }

    /// Interpret the low 24 bits of `value` as packed RGB, full opacity.
    pub fn from_packed_rgb(value: i64) -> Self {
        let v = (value & 0xFF_FFFF) as u32;
        Self::opaque(
            ((v >> 16) & 0xFF) as f64 / 255.0,
            ((v >> 8) & 0xFF) as f64 / 255.0,
            (v & 0xFF) as f64 / 255.0,
        )
    }
}

fn channel(v: i64) -> f64 {
    v.clamp(0, 255) as f64 / 255.0
}

/// A color value attached to a source range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAnnotation {
    pub color: Color,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

/// Named colors reachable as `Color.<name>` or as plain string content.
pub fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0x00, 0x00, 0x00),
        "white" => (0xFF, 0xFF, 0xFF),
        "red" => (0xFF, 0x00, 0x00),
        "green" => (0x00, 0x80, 0x00),
        "blue" => (0x00, 0x00, 0xFF),
        "yellow" => (0xFF, 0xFF, 0x00),
        "orange" => (0xFF, 0xA5, 0x00),
        "purple" => (0x80, 0x00, 0x80),
        "magenta" => (0xFF, 0x00, 0xFF),
        "cyan" => (0x00, 0xFF, 0xFF),
        "pink" => (0xFF, 0xC0, 0xCB),
        "brown" => (0xA5, 0x2A, 0x2A),
        "gray" | "grey" => (0x80, 0x80, 0x80),
        "lightgray" | "lightgrey" => (0xD3, 0xD3, 0xD3),
        "darkgray" | "darkgrey" => (0xA9, 0xA9, 0xA9),
        _ => return None,
    };
    Some(Color::from_bytes(r, g, b, 255))
}

/// Decode color text embedded in a string literal: `#rrggbb`,
/// `#rrggbbaa`, or a named color.
pub fn parse_string_color(content: &str) -> Option<Color> {
    if let Some(hex) = content.strip_prefix('#') {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            6 => {
                let v = i64::from_str_radix(hex, 16).ok()?;
                Some(Color::from_packed_rgb(v))
            }
            8 => {
                let v = u32::from_str_radix(hex, 16).ok()? as i64;
                Some(Color::from_bytes(
                    (v >> 24) & 0xFF,
                    (v >> 16) & 0xFF,
                    (v >> 8) & 0xFF,
                    v & 0xFF,
                ))
            }
            _ => None,
        };
    }
    named_color(content)
}

/// Post-pass over the emitted token stream.
///
/// For every remembered `Color` identifier position, check the two
/// recognized shapes and emit an annotation on a match:
///
/// * `new Color ( int , int , int [, int] )` — constructor form;
/// * `Color . <name>` — named-constant form.
///
/// Trivia tokens between the structural tokens are skipped. Anything else
/// yields no annotation.
pub fn scan_color_literals(tokens: &[Token], color_idents: &[usize]) -> Vec<ColorAnnotation> {
    let mut out = Vec::new();

    for &idx in color_idents {
        if let Some(annotation) = match_constructor(tokens, idx) {
            out.push(annotation);
        } else if let Some(annotation) = match_named_constant(tokens, idx) {
            out.push(annotation);
        }
    }

    out
}

fn is_trivia(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Whitespace
            | TokenKind::Newline
            | TokenKind::LineComment(_)
            | TokenKind::BlockComment(_)
    )
}

/// Next non-trivia token index after `idx`.
fn next_solid(tokens: &[Token], idx: usize) -> Option<usize> {
    let mut i = idx + 1;
    while i < tokens.len() {
        if !is_trivia(&tokens[i].kind) {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Previous non-trivia token index before `idx`.
fn prev_solid(tokens: &[Token], idx: usize) -> Option<usize> {
    let mut i = idx;
    while i > 0 {
        i -= 1;
        if !is_trivia(&tokens[i].kind) {
            return Some(i);
        }
    }
    None
}

/// Source range covered by tokens `start..=end`, as (line, column, length).
/// Tokens tile the source, so the covered length is the sum of the token
/// lengths in the range.
fn span_of(tokens: &[Token], start: usize, end: usize) -> (u32, u32, u32) {
    let length = tokens[start..=end].iter().map(|t| t.length).sum();
    (tokens[start].line, tokens[start].column, length)
}

fn match_constructor(tokens: &[Token], idx: usize) -> Option<ColorAnnotation> {
    let new_idx = prev_solid(tokens, idx)?;
    if tokens[new_idx].kind != TokenKind::New {
        return None;
    }

    let lparen = next_solid(tokens, idx)?;
    if tokens[lparen].kind != TokenKind::LParen {
        return None;
    }

    let mut values: Vec<i64> = Vec::new();
    let mut cursor = lparen;
    loop {
        let arg = next_solid(tokens, cursor)?;
        let value = match tokens[arg].kind {
            TokenKind::IntLiteral(v) => v,
            _ => return None,
        };
        values.push(value);
        if values.len() > 4 {
            return None;
        }

        let sep = next_solid(tokens, arg)?;
        match tokens[sep].kind {
            TokenKind::Comma => cursor = sep,
            TokenKind::RParen => {
                if values.len() < 3 {
                    return None;
                }
                let alpha = if values.len() == 4 { values[3] } else { 255 };
                let color = Color::from_bytes(values[0], values[1], values[2], alpha);
                let (line, column, length) = span_of(tokens, new_idx, sep);
                return Some(ColorAnnotation {
                    color,
                    line,
                    column,
                    length,
                });
            }
            _ => return None,
        }
    }
}

fn match_named_constant(tokens: &[Token], idx: usize) -> Option<ColorAnnotation> {
    let dot = next_solid(tokens, idx)?;
    if tokens[dot].kind != TokenKind::Dot {
        return None;
    }

    let name_idx = next_solid(tokens, dot)?;
    let color = match &tokens[name_idx].kind {
        TokenKind::Identifier(name) => named_color(name)?,
        _ => return None,
    };

    let (line, column, length) = span_of(tokens, idx, name_idx);
    Some(ColorAnnotation {
        color,
        line,
        column,
        length,
    })
}
