use winnow::ascii::multispace0;
use winnow::combinator::{alt, preceded, repeat, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

// -- Quoted segments --------------------------------------------------------

fn single_quoted(input: &mut &str) -> ModalResult<String> {
    ('\'', take_till(0.., '\''), '\'')
        .map(|(_, body, _): (char, &str, char)| body.to_owned())
        .parse_next(input)
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

fn double_quoted(input: &mut &str) -> ModalResult<String> {
    preceded('"', double_quoted_body).parse_next(input)
}

fn double_quoted_body(input: &mut &str) -> ModalResult<String> {
    let mut s = String::new();
    loop {
        match next_char(input)? {
            '"' => return Ok(s),
            '\\' => {
                let esc = next_char(input)?;
                // Inside double quotes a backslash only escapes these.
                if !matches!(esc, '"' | '\\' | '$' | '`' | '\n') {
                    s.push('\\');
                }
                s.push(esc);
            }
            c => s.push(c),
        }
    }
}

// -- Bare segments ----------------------------------------------------------

/// The word separators `multispace0` skips. Other whitespace is word content.
pub(crate) fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn escaped(input: &mut &str) -> ModalResult<String> {
    preceded('\\', any)
        .map(|c: char| c.to_string())
        .parse_next(input)
}

fn bare(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| {
        !is_blank(c) && !matches!(c, '\'' | '"' | '\\')
    })
    .map(str::to_owned)
    .parse_next(input)
}

// -- Words & lines ----------------------------------------------------------

/// One shell-style word: adjacent quoted and bare segments joined together.
fn word(input: &mut &str) -> ModalResult<String> {
    repeat(1.., alt((single_quoted, double_quoted, escaped, bare)))
        .map(|parts: Vec<String>| parts.concat())
        .context(StrContext::Expected(StrContextValue::Description("word")))
        .parse_next(input)
}

/// Split a line into whitespace-separated words, stripping quotes.
pub(crate) fn fields(input: &mut &str) -> ModalResult<Vec<String>> {
    terminated(repeat(0.., preceded(multispace0, word)), multispace0).parse_next(input)
}
