//! Expression parsers.
//!
//! Binary operators are parsed by precedence climbing over the levels in
//! [`crate::precedence`]; parentheses only steer tree construction and are
//! not kept as nodes.

use alloc::vec::Vec;

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, peek},
    multi::separated_list0,
    sequence::{delimited, terminated},
};

use super::{
    error::IResult,
    primitives::{float_literal, identifier, int_literal, keyword, operator, punct, word},
    whitespace::blank,
};
use crate::{
    build,
    node::NodeRef,
    precedence::{self, binary_precedence, is_assignment_operator, is_prefix_operator},
};

/// Parse a full expression, including the comma operator
pub(crate) fn expression(input: &str) -> IResult<&str, NodeRef> {
    let (mut input, mut lhs) = assignment_expression(input)?;
    while let Ok((rest, _)) = punct(',')(input) {
        let (rest, rhs) = assignment_expression(rest)?;
        lhs = build::binary(",", lhs, rhs);
        input = rest;
    }
    Ok((input, lhs))
}

/// Parse an assignment or conditional expression (no top-level comma)
pub(crate) fn assignment_expression(input: &str) -> IResult<&str, NodeRef> {
    let (input, lhs) = conditional_expression(input)?;
    if precedence::precedence(&lhs) >= precedence::UNARY {
        if let Ok((rest, op)) = operator(input) {
            if is_assignment_operator(op) {
                let (rest, rhs) = assignment_expression(rest)?;
                return Ok((rest, build::assignment(op, lhs, rhs)));
            }
        }
    }
    Ok((input, lhs))
}

/// Parse `cond ? a : b` or anything binding tighter
pub(crate) fn conditional_expression(input: &str) -> IResult<&str, NodeRef> {
    let (input, condition) = binary_expression(input, precedence::LOGICAL_OR)?;
    match punct('?')(input) {
        Ok((rest, _)) => {
            let (rest, if_true) = expression(rest)?;
            let (rest, _) = punct(':')(rest)?;
            let (rest, if_false) = assignment_expression(rest)?;
            Ok((rest, build::ternary(condition, if_true, if_false)))
        }
        Err(_) => Ok((input, condition)),
    }
}

fn binary_expression(input: &str, min_precedence: u8) -> IResult<&str, NodeRef> {
    let (mut input, mut lhs) = unary_expression(input)?;
    loop {
        let Ok((rest, op)) = operator(input) else {
            break;
        };
        let Some(level) = binary_precedence(op) else {
            break;
        };
        if level < min_precedence {
            break;
        }
        let (rest, rhs) = binary_expression(rest, level + 1)?;
        lhs = build::binary(op, lhs, rhs);
        input = rest;
    }
    Ok((input, lhs))
}

fn unary_expression(input: &str) -> IResult<&str, NodeRef> {
    if let Ok((rest, op)) = operator(input) {
        if is_prefix_operator(op) {
            let (rest, operand) = unary_expression(rest)?;
            return Ok((rest, build::unary(op, operand)));
        }
    }
    postfix_expression(input)
}

fn postfix_expression(input: &str) -> IResult<&str, NodeRef> {
    let (mut input, mut base) = primary_expression(input)?;
    loop {
        if let Ok((rest, _)) = punct('[')(input) {
            let (rest, index) = expression(rest)?;
            let (rest, _) = punct(']')(rest)?;
            base = build::index(base, index);
            input = rest;
        } else if let Ok((rest, _)) = punct('.')(input) {
            let (rest, field) = word(rest)?;
            base = build::field_selection(base, field);
            input = rest;
        } else if let Ok((rest, op)) = terminated(alt((tag("++"), tag("--"))), blank)(input) {
            base = build::postfix(op, base);
            input = rest;
        } else {
            return Ok((input, base));
        }
    }
}

fn primary_expression(input: &str) -> IResult<&str, NodeRef> {
    alt((
        map(float_literal, build::float),
        map(int_literal, build::int),
        map(keyword("true"), |_| build::boolean(true)),
        map(keyword("false"), |_| build::boolean(false)),
        function_call,
        map(identifier, build::identifier),
        delimited(punct('('), expression, punct(')')),
    ))(input)
}

/// Parse `name(args)`, also constructors such as `vec3(1.0)`
fn function_call(input: &str) -> IResult<&str, NodeRef> {
    let (input, name) = identifier(input)?;
    let (input, _) = punct('(')(input)?;
    let (input, arguments) = alt((
        map(terminated(keyword("void"), peek(punct(')'))), |_| Vec::new()),
        separated_list0(punct(','), assignment_expression),
    ))(input)?;
    let (input, _) = punct(')')(input)?;
    Ok((input, build::function_call(name, arguments)))
}
