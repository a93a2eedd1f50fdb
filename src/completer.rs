use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    Completer, Context, Helper, Hinter, Validator,
};
use strum::IntoEnumIterator;

use crate::command::BuiltinCommand;

#[derive(Helper, Completer, Hinter, Validator)]
pub(crate) struct ShellHelper {
    #[rustyline(Completer)]
    pub completer: ShellCompleter,
}

impl Highlighter for ShellHelper {}

pub(crate) struct ShellCompleter {}
impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let line = &line[..pos];
        let word = line.rsplit(char::is_whitespace).next().unwrap_or_default();
        let start = line.len() - word.len();

        let candidates = match line[..start].split_whitespace().count() {
            0 => complete_builtin(word),
            1 => complete_variable(
                word,
                std::env::vars_os().filter_map(|(k, _)| k.into_string().ok()),
            ),
            _ => vec![],
        };
        Ok((start, candidates))
    }
}

fn complete_builtin(word: &str) -> Vec<Pair> {
    if word.is_empty() {
        return vec![];
    }
    BuiltinCommand::iter()
        .filter_map(|command| {
            let command = command.as_ref();
            if command.starts_with(word) {
                Some(Pair {
                    display: command.into(),
                    replacement: command.to_string() + " ",
                })
            } else {
                None
            }
        })
        .collect()
}

fn complete_variable<I: Iterator<Item = String>>(word: &str, names: I) -> Vec<Pair> {
    let mut names: Vec<String> = names.filter(|name| name.starts_with(word)).collect();
    names.sort();
    names
        .into_iter()
        .map(|name| Pair {
            replacement: name.clone() + " ",
            display: name,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn replacements(pairs: Vec<Pair>) -> Vec<String> {
        pairs.into_iter().map(|p| p.replacement).collect()
    }

    #[test]
    fn builtins() {
        assert_eq!(replacements(complete_builtin("s")), vec!["show ", "search ", "separator "]);
        assert_eq!(replacements(complete_builtin("ap")), vec!["append "]);
        assert!(complete_builtin("").is_empty());
        assert!(complete_builtin("zzz").is_empty());
    }

    #[test]
    fn variables() {
        let names = ["PATH", "MANPATH", "PAGER"].into_iter().map(String::from);
        assert_eq!(
            replacements(complete_variable("PA", names)),
            vec!["PAGER ", "PATH "]
        );
    }
}
