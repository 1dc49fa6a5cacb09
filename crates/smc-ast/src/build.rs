//! Constructors for well-formed nodes.
//!
//! Each function builds a node whose slots match its tag's layout.

use alloc::{string::String, vec, vec::Vec};

use crate::{
    node::{Node, NodeRef, Slot},
    tag::Tag,
};

pub fn translation_unit(declarations: Vec<NodeRef>) -> NodeRef {
    Node::new(Tag::TranslationUnit, "", Vec::new(), vec![Slot::List(declarations)])
}

pub fn preprocessor(text: impl Into<String>) -> NodeRef {
    Node::leaf(Tag::Preprocessor, text)
}

pub fn precision(qualifier: impl Into<String>, ty: NodeRef) -> NodeRef {
    Node::new(
        Tag::Precision,
        "",
        vec![qualifier.into()],
        vec![Slot::some(ty)],
    )
}

pub fn declaration(qualifiers: Vec<String>, ty: NodeRef, declarators: Vec<NodeRef>) -> NodeRef {
    Node::new(
        Tag::Declaration,
        "",
        qualifiers,
        vec![Slot::some(ty), Slot::List(declarators)],
    )
}

pub fn type_name(name: impl Into<String>) -> NodeRef {
    Node::leaf(Tag::TypeName, name)
}

pub fn struct_definition(name: impl Into<String>, members: Vec<NodeRef>) -> NodeRef {
    Node::new(Tag::StructDefinition, name, Vec::new(), vec![Slot::List(members)])
}

pub fn declarator(
    name: impl Into<String>,
    array_size: Option<NodeRef>,
    initializer: Option<NodeRef>,
) -> NodeRef {
    Node::new(
        Tag::Declarator,
        name,
        Vec::new(),
        vec![Slot::opt(array_size), Slot::opt(initializer)],
    )
}

pub fn function_prototype(
    qualifiers: Vec<String>,
    return_type: NodeRef,
    name: impl Into<String>,
    parameters: Vec<NodeRef>,
) -> NodeRef {
    Node::new(
        Tag::FunctionPrototype,
        name,
        qualifiers,
        vec![Slot::some(return_type), Slot::List(parameters)],
    )
}

pub fn function_declaration(
    qualifiers: Vec<String>,
    return_type: NodeRef,
    name: impl Into<String>,
    parameters: Vec<NodeRef>,
    body: NodeRef,
) -> NodeRef {
    Node::new(
        Tag::FunctionDeclaration,
        name,
        qualifiers,
        vec![
            Slot::some(return_type),
            Slot::List(parameters),
            Slot::some(body),
        ],
    )
}

pub fn parameter(
    qualifiers: Vec<String>,
    ty: NodeRef,
    name: impl Into<String>,
    array_size: Option<NodeRef>,
) -> NodeRef {
    Node::new(
        Tag::Parameter,
        name,
        qualifiers,
        vec![Slot::some(ty), Slot::opt(array_size)],
    )
}

pub fn scope(statements: Vec<NodeRef>) -> NodeRef {
    Node::new(Tag::Scope, "", Vec::new(), vec![Slot::List(statements)])
}

pub fn expression_statement(expression: Option<NodeRef>) -> NodeRef {
    Node::new(
        Tag::ExpressionStatement,
        "",
        Vec::new(),
        vec![Slot::opt(expression)],
    )
}

pub fn if_statement(condition: NodeRef, then_branch: NodeRef, else_branch: Option<NodeRef>) -> NodeRef {
    Node::new(
        Tag::If,
        "",
        Vec::new(),
        vec![
            Slot::some(condition),
            Slot::some(then_branch),
            Slot::opt(else_branch),
        ],
    )
}

pub fn for_statement(
    init: Option<NodeRef>,
    condition: Option<NodeRef>,
    step: Option<NodeRef>,
    body: NodeRef,
) -> NodeRef {
    Node::new(
        Tag::For,
        "",
        Vec::new(),
        vec![
            Slot::opt(init),
            Slot::opt(condition),
            Slot::opt(step),
            Slot::some(body),
        ],
    )
}

pub fn while_statement(condition: NodeRef, body: NodeRef) -> NodeRef {
    Node::new(
        Tag::While,
        "",
        Vec::new(),
        vec![Slot::some(condition), Slot::some(body)],
    )
}

pub fn do_while(body: NodeRef, condition: NodeRef) -> NodeRef {
    Node::new(
        Tag::DoWhile,
        "",
        Vec::new(),
        vec![Slot::some(body), Slot::some(condition)],
    )
}

pub fn return_statement(value: Option<NodeRef>) -> NodeRef {
    Node::new(Tag::Return, "", Vec::new(), vec![Slot::opt(value)])
}

pub fn jump(keyword: impl Into<String>) -> NodeRef {
    Node::leaf(Tag::Jump, keyword)
}

pub fn assignment(operator: impl Into<String>, target: NodeRef, value: NodeRef) -> NodeRef {
    Node::new(
        Tag::Assignment,
        operator,
        Vec::new(),
        vec![Slot::some(target), Slot::some(value)],
    )
}

pub fn binary(operator: impl Into<String>, lhs: NodeRef, rhs: NodeRef) -> NodeRef {
    Node::new(
        Tag::Binary,
        operator,
        Vec::new(),
        vec![Slot::some(lhs), Slot::some(rhs)],
    )
}

pub fn unary(operator: impl Into<String>, operand: NodeRef) -> NodeRef {
    Node::new(Tag::Unary, operator, Vec::new(), vec![Slot::some(operand)])
}

pub fn postfix(operator: impl Into<String>, operand: NodeRef) -> NodeRef {
    Node::new(Tag::Postfix, operator, Vec::new(), vec![Slot::some(operand)])
}

pub fn ternary(condition: NodeRef, if_true: NodeRef, if_false: NodeRef) -> NodeRef {
    Node::new(
        Tag::Ternary,
        "",
        Vec::new(),
        vec![
            Slot::some(condition),
            Slot::some(if_true),
            Slot::some(if_false),
        ],
    )
}

pub fn function_call(name: impl Into<String>, arguments: Vec<NodeRef>) -> NodeRef {
    Node::new(Tag::FunctionCall, name, Vec::new(), vec![Slot::List(arguments)])
}

pub fn field_selection(base: NodeRef, field: impl Into<String>) -> NodeRef {
    Node::new(Tag::FieldSelection, field, Vec::new(), vec![Slot::some(base)])
}

pub fn index(base: NodeRef, index: NodeRef) -> NodeRef {
    Node::new(
        Tag::Index,
        "",
        Vec::new(),
        vec![Slot::some(base), Slot::some(index)],
    )
}

pub fn identifier(name: impl Into<String>) -> NodeRef {
    Node::leaf(Tag::Identifier, name)
}

pub fn int(literal: impl Into<String>) -> NodeRef {
    Node::leaf(Tag::Int, literal)
}

pub fn float(literal: impl Into<String>) -> NodeRef {
    Node::leaf(Tag::Float, literal)
}

pub fn boolean(value: bool) -> NodeRef {
    Node::leaf(Tag::Bool, if value { "true" } else { "false" })
}
