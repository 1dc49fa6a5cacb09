//! Node tags and their slot layouts.
//!
//! Every tag declares the shape of its children: an ordered list of slots,
//! each of which is a required child, an optional child or a child list.
//! Generic traversal relies on this layout to recurse into nodes it has no
//! dedicated handler for.

use core::fmt;

/// Shape of a single slot in a node's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Exactly one child, never absent
    Required,
    /// Zero or one child
    Optional,
    /// Ordered list of children
    List,
}

use SlotKind::{List, Optional, Required};

/// Syntactic category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// Whole shader: list of external declarations
    TranslationUnit,
    /// `#...` directive, kept verbatim in the node value
    Preprocessor,
    /// `precision mediump float;`
    Precision,
    /// Qualified type followed by declarators
    Declaration,
    /// Reference to a builtin or struct type by name
    TypeName,
    /// `struct Name { members }`
    StructDefinition,
    /// One declared name with optional array size and initializer
    Declarator,
    /// Function signature terminated by `;`
    FunctionPrototype,
    /// Function signature with a body
    FunctionDeclaration,
    /// Function parameter
    Parameter,
    /// Compound statement `{ ... }`
    Scope,
    /// Expression followed by `;`, or the empty statement
    ExpressionStatement,
    If,
    For,
    While,
    DoWhile,
    Return,
    /// `break`, `continue` or `discard`
    Jump,
    /// `=` and the compound assignment operators
    Assignment,
    /// Binary operator, including the comma operator
    Binary,
    /// Prefix operator
    Unary,
    /// Postfix `++` / `--`
    Postfix,
    /// `cond ? a : b`
    Ternary,
    /// Call of a function or constructor by name
    FunctionCall,
    /// `base.field`, also swizzles
    FieldSelection,
    /// `base[index]`
    Index,
    Identifier,
    Int,
    Float,
    Bool,
}

impl Tag {
    /// Slot layout for this tag.
    pub fn layout(self) -> &'static [SlotKind] {
        match self {
            Tag::TranslationUnit => &[List],
            Tag::Preprocessor => &[],
            Tag::Precision => &[Required],
            Tag::Declaration => &[Required, List],
            Tag::TypeName => &[],
            Tag::StructDefinition => &[List],
            Tag::Declarator => &[Optional, Optional],
            Tag::FunctionPrototype => &[Required, List],
            Tag::FunctionDeclaration => &[Required, List, Required],
            Tag::Parameter => &[Required, Optional],
            Tag::Scope => &[List],
            Tag::ExpressionStatement => &[Optional],
            Tag::If => &[Required, Required, Optional],
            Tag::For => &[Optional, Optional, Optional, Required],
            Tag::While => &[Required, Required],
            Tag::DoWhile => &[Required, Required],
            Tag::Return => &[Optional],
            Tag::Jump => &[],
            Tag::Assignment => &[Required, Required],
            Tag::Binary => &[Required, Required],
            Tag::Unary => &[Required],
            Tag::Postfix => &[Required],
            Tag::Ternary => &[Required, Required, Required],
            Tag::FunctionCall => &[List],
            Tag::FieldSelection => &[Required],
            Tag::Index => &[Required, Required],
            Tag::Identifier | Tag::Int | Tag::Float | Tag::Bool => &[],
        }
    }

    /// Snake-case name of the tag.
    pub fn name(self) -> &'static str {
        match self {
            Tag::TranslationUnit => "translation_unit",
            Tag::Preprocessor => "preprocessor",
            Tag::Precision => "precision",
            Tag::Declaration => "declaration",
            Tag::TypeName => "type_name",
            Tag::StructDefinition => "struct_definition",
            Tag::Declarator => "declarator",
            Tag::FunctionPrototype => "function_prototype",
            Tag::FunctionDeclaration => "function_declaration",
            Tag::Parameter => "parameter",
            Tag::Scope => "scope",
            Tag::ExpressionStatement => "expression_statement",
            Tag::If => "if",
            Tag::For => "for",
            Tag::While => "while",
            Tag::DoWhile => "do_while",
            Tag::Return => "return",
            Tag::Jump => "jump",
            Tag::Assignment => "assignment",
            Tag::Binary => "binary",
            Tag::Unary => "unary",
            Tag::Postfix => "postfix",
            Tag::Ternary => "ternary",
            Tag::FunctionCall => "function_call",
            Tag::FieldSelection => "field_selection",
            Tag::Index => "index",
            Tag::Identifier => "identifier",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Bool => "bool",
        }
    }

    /// True for tags that can stand in a statement list.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Tag::Preprocessor
                | Tag::Declaration
                | Tag::Scope
                | Tag::ExpressionStatement
                | Tag::If
                | Tag::For
                | Tag::While
                | Tag::DoWhile
                | Tag::Return
                | Tag::Jump
        )
    }

    /// True for expression tags.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Tag::Assignment
                | Tag::Binary
                | Tag::Unary
                | Tag::Postfix
                | Tag::Ternary
                | Tag::FunctionCall
                | Tag::FieldSelection
                | Tag::Index
                | Tag::Identifier
                | Tag::Int
                | Tag::Float
                | Tag::Bool
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
