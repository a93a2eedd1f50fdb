use anyhow::anyhow;
use command::word;
use winnow::{ascii::multispace0, combinator::repeat, Parser};

mod command;

pub(crate) type Stream<'i> = &'i str;

pub(crate) fn parse_words(line: &str) -> anyhow::Result<Vec<String>> {
    (repeat(0.., word), multispace0)
        .map(|(words, _): (Vec<String>, _)| words)
        .parse(line)
        .map_err(|e| {
            anyhow!(
                "cannot parse `{}`: unexpected input at column {}",
                line.trim_end(),
                e.offset() + 1
            )
        })
}
