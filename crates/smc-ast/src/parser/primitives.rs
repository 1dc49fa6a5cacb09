//! Primitive parsers for words, names, punctuation, operators and literals.

use alloc::string::{String, ToString};

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_while},
    character::complete::{char, digit0, digit1, hex_digit1, one_of, satisfy},
    combinator::{not, opt, recognize, verify},
    sequence::{pair, preceded, terminated, tuple},
};

use super::{error::IResult, whitespace::blank};
use crate::keywords::is_structural_keyword;

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse any word (identifier or keyword)
pub(crate) fn word(input: &str) -> IResult<&str, &str> {
    terminated(
        recognize(pair(satisfy(is_word_start), take_while(is_word_char))),
        blank,
    )(input)
}

/// Parse exactly the keyword `kw`
pub(crate) fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    verify(word, move |w: &str| w == kw)
}

/// Parse a word that may name a symbol or a type
pub(crate) fn identifier(input: &str) -> IResult<&str, String> {
    let (input, name) = verify(word, |w: &str| !is_structural_keyword(w))(input)?;
    Ok((input, name.to_string()))
}

/// Parse a single punctuation character
pub(crate) fn punct<'a>(c: char) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    terminated(char(c), blank)
}

/// Parse `=` when it is not the start of `==`
pub(crate) fn assign_eq(input: &str) -> IResult<&str, char> {
    terminated(terminated(char('='), not(char('='))), blank)(input)
}

/// Parse the longest operator token at the start of the input
pub(crate) fn operator(input: &str) -> IResult<&str, &str> {
    terminated(
        alt((
            alt((tag("<<="), tag(">>="))),
            alt((
                tag("++"),
                tag("--"),
                tag("<<"),
                tag(">>"),
                tag("<="),
                tag(">="),
                tag("=="),
                tag("!="),
                tag("&&"),
                tag("||"),
                tag("^^"),
                tag("+="),
                tag("-="),
                tag("*="),
                tag("/="),
                tag("%="),
                tag("&="),
                tag("|="),
                tag("^="),
            )),
            alt((
                tag("+"),
                tag("-"),
                tag("*"),
                tag("/"),
                tag("%"),
                tag("<"),
                tag(">"),
                tag("&"),
                tag("|"),
                tag("^"),
                tag("!"),
                tag("~"),
                tag("="),
            )),
        )),
        blank,
    )(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

/// Parse a floating point literal, keeping its source text
pub(crate) fn float_literal(input: &str) -> IResult<&str, String> {
    let (input, text) = terminated(
        recognize(pair(
            alt((
                recognize(tuple((digit1, char('.'), digit0, opt(exponent)))),
                recognize(tuple((char('.'), digit1, opt(exponent)))),
                recognize(pair(digit1, exponent)),
            )),
            opt(one_of("fF")),
        )),
        pair(not(satisfy(is_word_char)), blank),
    )(input)?;
    Ok((input, text.to_string()))
}

/// Parse an integer literal (decimal, octal or hex), keeping its source text
pub(crate) fn int_literal(input: &str) -> IResult<&str, String> {
    let (input, text) = terminated(
        recognize(pair(
            alt((recognize(pair(tag_no_case("0x"), hex_digit1)), digit1)),
            opt(one_of("uU")),
        )),
        pair(not(satisfy(|c| is_word_char(c) || c == '.')), blank),
    )(input)?;
    Ok((input, text.to_string()))
}

/// Parse a preprocessor directive line, returning it without surrounding
/// whitespace
pub(crate) fn directive(input: &str) -> IResult<&str, String> {
    let (input, text) = terminated(
        recognize(preceded(char('#'), take_till(|c| c == '\n'))),
        blank,
    )(input)?;
    Ok((input, text.trim_end().to_string()))
}
