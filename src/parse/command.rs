use std::borrow::Cow;

use winnow::{
    ascii::multispace0,
    combinator::{alt, delimited, preceded, repeat},
    token::{any, take_till, take_until},
    ModalResult, Parser,
};

use super::Stream;

const SPECIAL: [char; 7] = [' ', '\t', '\r', '\n', '\\', '\'', '"'];

pub(super) fn word(stream: &mut Stream) -> ModalResult<String> {
    preceded(multispace0, repeat(1.., piece).fold(String::new, push_piece)).parse_next(stream)
}

fn piece<'i>(stream: &mut Stream<'i>) -> ModalResult<Cow<'i, str>> {
    alt((
        take_till(1.., SPECIAL).map(Cow::Borrowed),
        preceded('\\', any).map(|c: char| Cow::Owned(c.to_string())),
        delimited('\'', take_until(0.., "'"), '\'').map(Cow::Borrowed),
        delimited('"', double_quoted, '"').map(Cow::Owned),
    ))
    .parse_next(stream)
}

fn double_quoted(stream: &mut Stream) -> ModalResult<String> {
    repeat(
        0..,
        alt((
            take_till(1.., ['"', '\\']).map(Cow::Borrowed),
            // any other escaped character keeps its backslash
            preceded('\\', any).map(|c: char| match c {
                '$' | '`' | '"' | '\\' | '\n' => Cow::Owned(c.to_string()),
                c => Cow::Owned(format!("\\{c}")),
            }),
        )),
    )
    .fold(String::new, push_piece)
    .parse_next(stream)
}

fn push_piece(mut acc: String, piece: Cow<'_, str>) -> String {
    acc.push_str(&piece);
    acc
}
