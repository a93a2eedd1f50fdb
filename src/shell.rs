use std::io::{BufRead, Write};

use anyhow::Result;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use tracing::debug;

use crate::{
    command::{write_all_and_flush, Command, Execute, Session},
    completer::{ShellCompleter, ShellHelper},
    env::Environment,
    parse::parse_words,
    probe::FsProbe,
};

#[cfg(windows)]
pub const DEFAULT_SEPARATOR: &str = ";";
#[cfg(not(windows))]
pub const DEFAULT_SEPARATOR: &str = ":";

const PROMPT: &str = "$ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Exit(i32),
}

#[derive(Debug, Clone)]
pub struct ShellOption {
    separator: String,
    print_prompt: bool,
    print_input: bool,
}

impl Default for ShellOption {
    fn default() -> ShellOption {
        ShellOption {
            separator: DEFAULT_SEPARATOR.to_string(),
            print_prompt: true,
            print_input: false,
        }
    }
}

impl ShellOption {
    pub fn from_env() -> ShellOption {
        let opts = ShellOption::default();
        match std::env::var("ENVPATH_SEPARATOR") {
            Ok(separator) if !separator.is_empty() => opts.with_separator(&separator),
            _ => opts,
        }
    }

    pub fn with_separator(mut self, separator: &str) -> ShellOption {
        self.separator = separator.to_string();
        self
    }

    pub fn with_print_prompt(mut self, print_prompt: bool) -> ShellOption {
        self.print_prompt = print_prompt;
        self
    }

    #[cfg(test)]
    pub fn with_print_input(mut self, print_input: bool) -> ShellOption {
        self.print_input = print_input;
        self
    }
}

pub struct Shell<E, O: Write, Er: Write> {
    session: Session<E, FsProbe>,
    pub(crate) writer: O,
    pub(crate) error_writer: Er,
    opts: ShellOption,
}

impl<E: Environment, O: Write, Er: Write> Shell<E, O, Er> {
    pub fn new(env: E, writer: O, error_writer: Er) -> Shell<E, O, Er> {
        let opts = ShellOption::default();
        Shell {
            session: Session::new(env, FsProbe, &opts.separator),
            writer,
            error_writer,
            opts,
        }
    }

    pub fn with_option(mut self, opts: ShellOption) -> Shell<E, O, Er> {
        self.session.separator = opts.separator.clone();
        self.opts = opts;
        self
    }

    pub fn env(&self) -> &E {
        &self.session.env
    }

    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<i32> {
        loop {
            if self.opts.print_prompt {
                self.write_and_flush(PROMPT)?;
            }

            let mut raw_input = String::new();
            if input.read_line(&mut raw_input)? == 0 {
                break Ok(0);
            }
            if self.opts.print_input {
                self.write_and_flush(&raw_input)?;
            }

            if let Status::Exit(code) = self.execute_line(&raw_input)? {
                break Ok(code);
            }
        }
    }

    pub fn run_interactive(&mut self) -> Result<i32> {
        let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(ShellHelper {
            completer: ShellCompleter {},
        }));

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    if let Status::Exit(code) = self.execute_line(&line)? {
                        break Ok(code);
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break Ok(0),
                Err(e) => break Err(e.into()),
            }
        }
    }

    // command failures are reported and the session goes on
    pub fn execute_line(&mut self, line: &str) -> Result<Status> {
        let words = match parse_words(line) {
            Ok(words) => words,
            Err(e) => {
                self.report(None, &e)?;
                return Ok(Status::Continue);
            }
        };

        let Some(mut command) = Command::resolve(words, &self.session) else {
            return Ok(Status::Continue);
        };
        debug!(?command, "execute");

        match command.execute(&mut self.session, &mut self.writer, &mut self.error_writer) {
            Ok(status) => Ok(status),
            Err(e) => {
                let name = match &command {
                    Command::Builtin(builtin) => builtin.as_ref().to_string(),
                    Command::Path(path) => path.path.display().to_string(),
                    Command::Invalid(invalid) => invalid.0.clone(),
                };
                self.report(Some(&name), &e)?;
                Ok(Status::Continue)
            }
        }
    }

    fn report(&mut self, name: Option<&str>, e: &anyhow::Error) -> Result<()> {
        let message = match name {
            Some(name) => format!("{name}: {e:#}\n"),
            None => format!("{e:#}\n"),
        };
        write_all_and_flush(&mut self.error_writer, message.as_bytes())
    }

    fn write_and_flush(&mut self, data: &str) -> Result<()> {
        write_all_and_flush(&mut self.writer, data.as_bytes())
    }
}

#[cfg(test)]
fn run_test_with_input<E: Environment>(env: E, input: &str) -> anyhow::Result<(String, String, E)> {
    use std::io::BufReader;

    let input = BufReader::new(input.as_bytes());
    let mut shell = Shell::new(env, Vec::new(), Vec::new())
        .with_option(ShellOption::default().with_print_input(true));
    shell.run(input)?;

    let Shell {
        session,
        writer,
        error_writer,
        ..
    } = shell;
    Ok((
        String::from_utf8(writer)?,
        String::from_utf8(error_writer)?,
        session.env,
    ))
}
