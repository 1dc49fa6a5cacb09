//! Source generation.
//!
//! Renders a tree back to GLSL with as little whitespace as possible.
//! Parentheses are derived from operator precedence and spaces are only
//! written where two adjacent tokens would otherwise lex as one.

use alloc::string::String;
use core::fmt;

use crate::{
    node::{Node, NodeRef},
    precedence::{self, ASSIGNMENT, COMMA, CONDITIONAL, LOGICAL_OR, POSTFIX, UNARY},
    tag::Tag,
};

/// Render `node` as GLSL source.
///
/// `line_separator` is written after every top-level declaration; pass `""`
/// for the most compact output.
pub fn render(node: &Node, line_separator: &str) -> String {
    let mut renderer = Renderer {
        out: TokenWriter::default(),
        line_separator,
    };
    if node.tag() == Tag::TranslationUnit {
        renderer.translation_unit(node);
    } else if node.tag().is_expression() {
        renderer.expression(node, COMMA);
    } else {
        renderer.statement(node);
    }
    renderer.out.finish()
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, "\n"))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True if `left` followed directly by `right` would lex differently.
fn needs_space(left: char, right: char) -> bool {
    (is_word_char(left) && is_word_char(right))
        || (left == '+' && right == '+')
        || (left == '-' && right == '-')
}

/// Output buffer that separates tokens only where required.
#[derive(Default)]
struct TokenWriter {
    text: String,
}

impl TokenWriter {
    fn token(&mut self, token: &str) {
        let Some(first) = token.chars().next() else {
            return;
        };
        if let Some(last) = self.text.chars().next_back() {
            if needs_space(last, first) {
                self.text.push(' ');
            }
        }
        self.text.push_str(token);
    }

    /// Raw text, no spacing logic applied.
    fn raw(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn at_line_start(&self) -> bool {
        self.text.is_empty() || self.text.ends_with('\n')
    }

    fn finish(self) -> String {
        self.text
    }
}

struct Renderer<'a> {
    out: TokenWriter,
    line_separator: &'a str,
}

impl Renderer<'_> {
    fn translation_unit(&mut self, node: &Node) {
        for declaration in node.list(0) {
            self.statement(declaration);
            if declaration.tag() != Tag::Preprocessor {
                self.out.raw(self.line_separator);
            }
        }
    }

    fn directive(&mut self, text: &str) {
        if !self.out.at_line_start() {
            self.out.raw("\n");
        }
        self.out.raw(text);
        self.out.raw("\n");
    }

    fn qualifiers(&mut self, node: &Node) {
        for qualifier in node.qualifiers() {
            self.out.token(qualifier);
        }
    }

    fn type_specifier(&mut self, node: &Node) {
        if node.tag() == Tag::StructDefinition {
            self.out.token("struct");
            self.out.token(node.value());
            self.out.token("{");
            for member in node.list(0) {
                self.declaration(member);
            }
            self.out.token("}");
        } else {
            self.out.token(node.value());
        }
    }

    fn array_size(&mut self, size: Option<&NodeRef>) {
        if let Some(size) = size {
            self.out.token("[");
            self.expression(size, COMMA);
            self.out.token("]");
        }
    }

    /// Declaration including its `;`
    fn declaration(&mut self, node: &Node) {
        self.qualifiers(node);
        if let Some(ty) = node.child(0) {
            self.type_specifier(ty);
        }
        for (i, declarator) in node.list(1).iter().enumerate() {
            if i > 0 {
                self.out.token(",");
            }
            self.out.token(declarator.value());
            self.array_size(declarator.child(0));
            if let Some(initializer) = declarator.child(1) {
                self.out.token("=");
                self.expression(initializer, ASSIGNMENT);
            }
        }
        self.out.token(";");
    }

    fn function_header(&mut self, node: &Node) {
        self.qualifiers(node);
        if let Some(return_type) = node.child(0) {
            self.type_specifier(return_type);
        }
        self.out.token(node.value());
        self.out.token("(");
        for (i, parameter) in node.list(1).iter().enumerate() {
            if i > 0 {
                self.out.token(",");
            }
            self.qualifiers(parameter);
            if let Some(ty) = parameter.child(0) {
                self.type_specifier(ty);
            }
            self.out.token(parameter.value());
            self.array_size(parameter.child(1));
        }
        self.out.token(")");
    }

    fn statement(&mut self, node: &Node) {
        match node.tag() {
            Tag::Preprocessor => self.directive(node.value()),
            Tag::Precision => {
                self.out.token("precision");
                self.qualifiers(node);
                if let Some(ty) = node.child(0) {
                    self.type_specifier(ty);
                }
                self.out.token(";");
            }
            Tag::Declaration => self.declaration(node),
            Tag::FunctionPrototype => {
                self.function_header(node);
                self.out.token(";");
            }
            Tag::FunctionDeclaration => {
                self.function_header(node);
                if let Some(body) = node.child(2) {
                    self.statement(body);
                }
            }
            Tag::Scope => {
                self.out.token("{");
                for statement in node.list(0) {
                    self.statement(statement);
                }
                self.out.token("}");
            }
            Tag::ExpressionStatement => {
                if let Some(expression) = node.child(0) {
                    self.expression(expression, COMMA);
                }
                self.out.token(";");
            }
            Tag::If => {
                self.out.token("if");
                self.condition(node.child(0));
                self.optional_statement(node.child(1));
                if let Some(else_branch) = node.child(2) {
                    self.out.token("else");
                    self.statement(else_branch);
                }
            }
            Tag::For => {
                self.out.token("for");
                self.out.token("(");
                match node.child(0) {
                    Some(init) if init.tag() == Tag::Declaration => self.declaration(init),
                    Some(init) => {
                        self.expression(init, COMMA);
                        self.out.token(";");
                    }
                    None => self.out.token(";"),
                }
                if let Some(condition) = node.child(1) {
                    self.expression(condition, COMMA);
                }
                self.out.token(";");
                if let Some(step) = node.child(2) {
                    self.expression(step, COMMA);
                }
                self.out.token(")");
                self.optional_statement(node.child(3));
            }
            Tag::While => {
                self.out.token("while");
                self.condition(node.child(0));
                self.optional_statement(node.child(1));
            }
            Tag::DoWhile => {
                self.out.token("do");
                self.optional_statement(node.child(0));
                self.out.token("while");
                self.condition(node.child(1));
                self.out.token(";");
            }
            Tag::Return => {
                self.out.token("return");
                if let Some(value) = node.child(0) {
                    self.expression(value, COMMA);
                }
                self.out.token(";");
            }
            Tag::Jump => {
                self.out.token(node.value());
                self.out.token(";");
            }
            Tag::TranslationUnit => self.translation_unit(node),
            _ => {
                self.expression(node, COMMA);
                self.out.token(";");
            }
        }
    }

    fn optional_statement(&mut self, node: Option<&NodeRef>) {
        match node {
            Some(node) => self.statement(node),
            None => self.out.token(";"),
        }
    }

    fn condition(&mut self, node: Option<&NodeRef>) {
        self.out.token("(");
        if let Some(node) = node {
            self.expression(node, COMMA);
        }
        self.out.token(")");
    }

    /// Render an expression, parenthesized if it binds looser than
    /// `min_precedence`.
    fn expression(&mut self, node: &Node, min_precedence: u8) {
        let own = precedence::precedence(node);
        let parenthesize = own < min_precedence;
        if parenthesize {
            self.out.token("(");
        }
        match node.tag() {
            Tag::Binary => {
                self.operand(node.child(0), own);
                self.out.token(node.value());
                self.operand(node.child(1), own + 1);
            }
            Tag::Assignment => {
                self.operand(node.child(0), own + 1);
                self.out.token(node.value());
                self.operand(node.child(1), own);
            }
            Tag::Ternary => {
                self.operand(node.child(0), LOGICAL_OR);
                self.out.token("?");
                self.operand(node.child(1), COMMA);
                self.out.token(":");
                self.operand(node.child(2), CONDITIONAL);
            }
            Tag::Unary => {
                self.out.token(node.value());
                self.operand(node.child(0), UNARY);
            }
            Tag::Postfix => {
                self.operand(node.child(0), POSTFIX);
                self.out.token(node.value());
            }
            Tag::FunctionCall => {
                self.out.token(node.value());
                self.out.token("(");
                for (i, argument) in node.list(0).iter().enumerate() {
                    if i > 0 {
                        self.out.token(",");
                    }
                    self.expression(argument, ASSIGNMENT);
                }
                self.out.token(")");
            }
            Tag::FieldSelection => {
                self.operand(node.child(0), POSTFIX);
                self.out.token(".");
                self.out.token(node.value());
            }
            Tag::Index => {
                self.operand(node.child(0), POSTFIX);
                self.out.token("[");
                self.operand(node.child(1), COMMA);
                self.out.token("]");
            }
            _ => self.out.token(node.value()),
        }
        if parenthesize {
            self.out.token(")");
        }
    }

    fn operand(&mut self, node: Option<&NodeRef>, min_precedence: u8) {
        if let Some(node) = node {
            self.expression(node, min_precedence);
        }
    }
}
