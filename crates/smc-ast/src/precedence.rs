//! Operator precedence shared by the parser and the generator.
//!
//! Higher binds tighter. The parser builds trees from these levels and the
//! generator inserts parentheses wherever a child binds looser than its
//! position requires.

use crate::{node::Node, tag::Tag};

pub const COMMA: u8 = 1;
pub const ASSIGNMENT: u8 = 2;
pub const CONDITIONAL: u8 = 3;
pub const LOGICAL_OR: u8 = 4;
pub const UNARY: u8 = 15;
pub const POSTFIX: u8 = 16;
pub const PRIMARY: u8 = 17;

/// Precedence of a binary operator, `None` if `op` is not one.
pub fn binary_precedence(op: &str) -> Option<u8> {
    let level = match op {
        "," => COMMA,
        "||" => LOGICAL_OR,
        "^^" => 5,
        "&&" => 6,
        "|" => 7,
        "^" => 8,
        "&" => 9,
        "==" | "!=" => 10,
        "<" | ">" | "<=" | ">=" => 11,
        "<<" | ">>" => 12,
        "+" | "-" => 13,
        "*" | "/" | "%" => 14,
        _ => return None,
    };
    Some(level)
}

pub fn is_assignment_operator(op: &str) -> bool {
    matches!(
        op,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "<<=" | ">>=" | "&=" | "|=" | "^="
    )
}

pub fn is_prefix_operator(op: &str) -> bool {
    matches!(op, "++" | "--" | "+" | "-" | "!" | "~")
}

/// Precedence of an expression node.
pub fn precedence(node: &Node) -> u8 {
    match node.tag() {
        Tag::Binary => binary_precedence(node.value()).unwrap_or(COMMA),
        Tag::Assignment => ASSIGNMENT,
        Tag::Ternary => CONDITIONAL,
        Tag::Unary => UNARY,
        Tag::Postfix | Tag::FunctionCall | Tag::FieldSelection | Tag::Index => POSTFIX,
        _ => PRIMARY,
    }
}
