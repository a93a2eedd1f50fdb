use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use strum::{AsRefStr, EnumIter, EnumString};
use tracing::warn;

use crate::{env::Environment, path_list, probe::Probe};

mod execute;

pub(crate) use execute::{write_all_and_flush, Execute, Session};

#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Builtin(BuiltinCommand),
    Invalid(InvalidCommand),
    Path(PathCommand),
}

impl Command {
    pub fn resolve<E, P>(words: Vec<String>, session: &Session<E, P>) -> Option<Command>
    where
        E: Environment,
        P: Probe,
    {
        let mut words = words.into_iter();
        let name = words.next()?;
        let args = CommandArgs(words.collect());

        let command = match BuiltinCommand::from_str(&name) {
            Ok(builtin) => Command::Builtin(builtin.with_args(args)),
            Err(_) => match session.lookup_program(&name) {
                Some(path) => Command::Path(PathCommand { path, args }),
                None => Command::Invalid(InvalidCommand(name)),
            },
        };
        Some(command)
    }
}

// only regular files count as programs
struct ProgramProbe<'a, P>(&'a P);

impl<P: Probe> Probe for ProgramProbe<'_, P> {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.0.is_file(path)
    }
}

impl<E: Environment, P: Probe> Session<E, P> {
    pub fn lookup_program(&self, name: &str) -> Option<PathBuf> {
        let probe = ProgramProbe(&self.probe);
        if name.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(name);
            return matches!(probe.exists(&path), Ok(true)).then_some(path);
        }
        match path_list::search(&self.env, &probe, "PATH", &self.separator, name) {
            Ok(found) => found,
            Err(e) => {
                warn!(name, error = %e, "program lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct CommandArgs(pub Vec<String>);

#[derive(Debug, Default, PartialEq)]
pub(crate) struct InvalidCommand(pub String);

#[derive(Debug, Default, PartialEq)]
pub(crate) struct PathCommand {
    pub path: PathBuf,
    pub args: CommandArgs,
}

#[derive(Debug, PartialEq, EnumString, EnumIter, AsRefStr)]
pub(crate) enum BuiltinCommand {
    #[strum(serialize = "show")]
    Show(CommandArgs),
    #[strum(serialize = "search")]
    Search(CommandArgs),
    #[strum(serialize = "append")]
    Append(CommandArgs),
    #[strum(serialize = "prepend")]
    Prepend(CommandArgs),
    #[strum(serialize = "remove")]
    Remove(CommandArgs),
    #[strum(serialize = "separator")]
    Separator(CommandArgs),
    #[strum(serialize = "type")]
    Type(CommandArgs),
    #[strum(serialize = "exit")]
    Exit(CommandArgs),
}

impl BuiltinCommand {
    pub fn with_args(self, args: CommandArgs) -> BuiltinCommand {
        match self {
            BuiltinCommand::Show(_) => BuiltinCommand::Show(args),
            BuiltinCommand::Search(_) => BuiltinCommand::Search(args),
            BuiltinCommand::Append(_) => BuiltinCommand::Append(args),
            BuiltinCommand::Prepend(_) => BuiltinCommand::Prepend(args),
            BuiltinCommand::Remove(_) => BuiltinCommand::Remove(args),
            BuiltinCommand::Separator(_) => BuiltinCommand::Separator(args),
            BuiltinCommand::Type(_) => BuiltinCommand::Type(args),
            BuiltinCommand::Exit(_) => BuiltinCommand::Exit(args),
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            BuiltinCommand::Show(_) => "show VARIABLE",
            BuiltinCommand::Search(_) => "search VARIABLE TARGET",
            BuiltinCommand::Append(_) => "append VARIABLE ENTRY",
            BuiltinCommand::Prepend(_) => "prepend VARIABLE ENTRY",
            BuiltinCommand::Remove(_) => "remove VARIABLE ENTRY",
            BuiltinCommand::Separator(_) => "separator [SEPARATOR]",
            BuiltinCommand::Type(_) => "type NAME...",
            BuiltinCommand::Exit(_) => "exit [CODE]",
        }
    }
}
