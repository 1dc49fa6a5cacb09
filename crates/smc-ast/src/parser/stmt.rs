//! Statement parsers.

use nom::{
    branch::alt,
    combinator::{map, opt},
    multi::many_till,
    sequence::{delimited, preceded, terminated},
};

use super::{
    error::IResult,
    decl::{declaration, declaration_body},
    expr::expression,
    primitives::{directive, keyword, punct},
};
use crate::{build, node::NodeRef};

/// Parse `{ statement* }`
///
/// A statement that fails before the closing brace fails the block, so the
/// error points into the statement.
pub(crate) fn compound_statement(input: &str) -> IResult<&str, NodeRef> {
    map(
        preceded(punct('{'), many_till(statement, punct('}'))),
        |(statements, _)| build::scope(statements),
    )(input)
}

/// Parse a single statement
pub(crate) fn statement(input: &str) -> IResult<&str, NodeRef> {
    alt((
        compound_statement,
        if_statement,
        for_statement,
        while_statement,
        do_while_statement,
        return_statement,
        jump_statement,
        map(directive, build::preprocessor),
        map(punct(';'), |_| build::expression_statement(None)),
        declaration,
        map(terminated(expression, punct(';')), |e| {
            build::expression_statement(Some(e))
        }),
    ))(input)
}

fn parenthesized(input: &str) -> IResult<&str, NodeRef> {
    delimited(punct('('), expression, punct(')'))(input)
}

fn if_statement(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("if")(input)?;
    let (input, condition) = parenthesized(input)?;
    let (input, then_branch) = statement(input)?;
    let (input, else_branch) = match keyword("else")(input) {
        Ok((rest, _)) => {
            let (rest, branch) = statement(rest)?;
            (rest, Some(branch))
        }
        Err(_) => (input, None),
    };
    Ok((
        input,
        build::if_statement(condition, then_branch, else_branch),
    ))
}

fn for_statement(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("for")(input)?;
    let (input, _) = punct('(')(input)?;
    let (input, init) = opt(alt((declaration_body, expression)))(input)?;
    let (input, _) = punct(';')(input)?;
    let (input, condition) = opt(expression)(input)?;
    let (input, _) = punct(';')(input)?;
    let (input, step) = opt(expression)(input)?;
    let (input, _) = punct(')')(input)?;
    let (input, body) = statement(input)?;
    Ok((
        input,
        build::for_statement(init, condition, step, body),
    ))
}

fn while_statement(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("while")(input)?;
    let (input, condition) = parenthesized(input)?;
    let (input, body) = statement(input)?;
    Ok((input, build::while_statement(condition, body)))
}

fn do_while_statement(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("do")(input)?;
    let (input, body) = statement(input)?;
    let (input, _) = keyword("while")(input)?;
    let (input, condition) = parenthesized(input)?;
    let (input, _) = punct(';')(input)?;
    Ok((input, build::do_while(body, condition)))
}

fn return_statement(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("return")(input)?;
    let (input, value) = opt(expression)(input)?;
    let (input, _) = punct(';')(input)?;
    Ok((input, build::return_statement(value)))
}

fn jump_statement(input: &str) -> IResult<&str, NodeRef> {
    map(
        terminated(
            alt((keyword("break"), keyword("continue"), keyword("discard"))),
            punct(';'),
        ),
        build::jump,
    )(input)
}
