//! Whitespace and comment parsing.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until},
    character::complete::multispace1,
    combinator::{map, recognize},
    multi::many0,
    sequence::{pair, tuple},
};

use super::error::IResult;

/// Whitespace and comments; returns the consumed text.
pub(crate) fn blank_space(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((
        map(multispace1, |_| ()),
        map(pair(tag("//"), take_till(|c| c == '\n')), |_| ()),
        map(tuple((tag("/*"), take_until("*/"), tag("*/"))), |_| ()),
    ))))(input)
}

/// Skip whitespace and comments.
/// Every token parser ends with this.
pub(crate) fn blank(input: &str) -> IResult<&str, ()> {
    map(blank_space, |_| ())(input)
}
