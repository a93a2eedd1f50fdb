use std::{io::Write, process, str::FromStr};

use anyhow::{bail, Context};

use super::{BuiltinCommand, Command, CommandArgs, InvalidCommand, PathCommand};
use crate::{env::Environment, path_list, probe::Probe, shell::Status};

#[derive(Debug)]
pub(crate) struct Session<E, P> {
    pub env: E,
    pub probe: P,
    pub separator: String,
}

impl<E, P> Session<E, P> {
    pub fn new(env: E, probe: P, separator: &str) -> Session<E, P> {
        Session {
            env,
            probe,
            separator: separator.to_string(),
        }
    }
}

pub(crate) trait Execute {
    fn execute<E, P, O, Er>(
        &mut self,
        session: &mut Session<E, P>,
        stdout: &mut O,
        stderr: &mut Er,
    ) -> anyhow::Result<Status>
    where
        E: Environment,
        P: Probe,
        O: Write,
        Er: Write;
}

impl Execute for Command {
    fn execute<E, P, O, Er>(
        &mut self,
        session: &mut Session<E, P>,
        stdout: &mut O,
        stderr: &mut Er,
    ) -> anyhow::Result<Status>
    where
        E: Environment,
        P: Probe,
        O: Write,
        Er: Write,
    {
        match self {
            Command::Builtin(builtin_command) => builtin_command.execute(session, stdout, stderr),
            Command::Invalid(invalid_command) => invalid_command.execute(session, stdout, stderr),
            Command::Path(path_command) => path_command.execute(session, stdout, stderr),
        }
    }
}

impl Execute for InvalidCommand {
    fn execute<E, P, O, Er>(
        &mut self,
        _: &mut Session<E, P>,
        stdout: &mut O,
        _: &mut Er,
    ) -> anyhow::Result<Status>
    where
        E: Environment,
        P: Probe,
        O: Write,
        Er: Write,
    {
        write_all_and_flush(stdout, format!("{}: command not found\n", self.0).as_bytes())?;
        Ok(Status::Continue)
    }
}

impl Execute for PathCommand {
    fn execute<E, P, O, Er>(
        &mut self,
        session: &mut Session<E, P>,
        stdout: &mut O,
        stderr: &mut Er,
    ) -> anyhow::Result<Status>
    where
        E: Environment,
        P: Probe,
        O: Write,
        Er: Write,
    {
        // children see the session's edits, not whatever the process started with
        let output = process::Command::new(&self.path)
            .args(&self.args.0)
            .env_clear()
            .envs(session.env.vars())
            .output()
            .with_context(|| format!("cannot run `{}`", self.path.display()))?;
        write_all_and_flush(stdout, &output.stdout)?;
        write_all_and_flush(stderr, &output.stderr)?;
        Ok(Status::Continue)
    }
}

impl Execute for BuiltinCommand {
    fn execute<E, P, O, Er>(
        &mut self,
        session: &mut Session<E, P>,
        stdout: &mut O,
        _: &mut Er,
    ) -> anyhow::Result<Status>
    where
        E: Environment,
        P: Probe,
        O: Write,
        Er: Write,
    {
        let usage = self.usage();
        match self {
            BuiltinCommand::Show(args) => match &args.0[..] {
                [variable] => show_command(session, variable, stdout),
                _ => bail!("usage: {usage}"),
            },
            BuiltinCommand::Search(args) => match &args.0[..] {
                [variable, target] => search_command(session, variable, target, stdout),
                _ => bail!("usage: {usage}"),
            },
            BuiltinCommand::Append(args) => match &args.0[..] {
                [variable, entry] => {
                    let entry = shellexpand::tilde(entry);
                    path_list::append(&mut session.env, variable, &session.separator, &entry)?;
                    Ok(Status::Continue)
                }
                _ => bail!("usage: {usage}"),
            },
            BuiltinCommand::Prepend(args) => match &args.0[..] {
                [variable, entry] => {
                    let entry = shellexpand::tilde(entry);
                    path_list::prepend(&mut session.env, variable, &session.separator, &entry)?;
                    Ok(Status::Continue)
                }
                _ => bail!("usage: {usage}"),
            },
            BuiltinCommand::Remove(args) => match &args.0[..] {
                [variable, entry] => {
                    let entry = shellexpand::tilde(entry);
                    path_list::remove(&mut session.env, variable, &session.separator, &entry)?;
                    Ok(Status::Continue)
                }
                _ => bail!("usage: {usage}"),
            },
            BuiltinCommand::Separator(args) => match &args.0[..] {
                [] => {
                    write_all_and_flush(stdout, format!("{}\n", session.separator).as_bytes())?;
                    Ok(Status::Continue)
                }
                [separator] if !separator.is_empty() => {
                    session.separator = separator.clone();
                    Ok(Status::Continue)
                }
                _ => bail!("usage: {usage}"),
            },
            BuiltinCommand::Type(args) => type_command(session, args, stdout),
            BuiltinCommand::Exit(args) => match &args.0[..] {
                [] => Ok(Status::Exit(0)),
                [code] => match code.parse::<i32>() {
                    Ok(code) => Ok(Status::Exit(code)),
                    Err(_) => bail!("numeric argument required, got `{code}`"),
                },
                _ => bail!("usage: {usage}"),
            },
        }
    }
}

fn show_command<E, P, O>(
    session: &Session<E, P>,
    variable: &str,
    stdout: &mut O,
) -> anyhow::Result<Status>
where
    E: Environment,
    O: Write,
{
    let value = session.env.get(variable)?.unwrap_or_default();
    for entry in path_list::split(&value, &session.separator) {
        write_all_and_flush(stdout, format!("{entry}\n").as_bytes())?;
    }
    Ok(Status::Continue)
}

fn search_command<E, P, O>(
    session: &Session<E, P>,
    variable: &str,
    target: &str,
    stdout: &mut O,
) -> anyhow::Result<Status>
where
    E: Environment,
    P: Probe,
    O: Write,
{
    match path_list::search(
        &session.env,
        &session.probe,
        variable,
        &session.separator,
        target,
    )? {
        Some(path) => {
            write_all_and_flush(stdout, format!("{}\n", path.display()).as_bytes())?
        }
        None => write_all_and_flush(
            stdout,
            format!("{target}: not found in {variable}\n").as_bytes(),
        )?,
    }
    Ok(Status::Continue)
}

fn type_command<E, P, O>(
    session: &Session<E, P>,
    args: &CommandArgs,
    stdout: &mut O,
) -> anyhow::Result<Status>
where
    E: Environment,
    P: Probe,
    O: Write,
{
    for arg in &args.0 {
        match BuiltinCommand::from_str(arg) {
            Ok(_) => write_all_and_flush(stdout, format!("{arg} is a shell builtin\n").as_bytes())?,
            Err(_) => match session.lookup_program(arg) {
                Some(path) => write_all_and_flush(
                    stdout,
                    format!("{arg} is {}\n", path.display()).as_bytes(),
                )?,
                None => write_all_and_flush(stdout, format!("{arg}: not found\n").as_bytes())?,
            },
        }
    }
    Ok(Status::Continue)
}

pub(crate) fn write_all_and_flush<W: Write>(w: &mut W, data: &[u8]) -> anyhow::Result<()> {
    w.write_all(data)?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{env::MemoryEnv, probe::FsProbe};

    fn run(
        session: &mut Session<MemoryEnv, FsProbe>,
        mut command: BuiltinCommand,
    ) -> anyhow::Result<(Status, String)> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = command.execute(session, &mut stdout, &mut stderr)?;
        Ok((status, String::from_utf8(stdout)?))
    }

    fn args(values: &[&str]) -> CommandArgs {
        CommandArgs(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn edit_builtins() -> anyhow::Result<()> {
        let env = MemoryEnv::new().with_var("PATH", "/usr/bin:/usr/local/bin");
        let mut session = Session::new(env, FsProbe, ":");

        run(&mut session, BuiltinCommand::Append(args(&["PATH", "/opt/bin"])))?;
        run(&mut session, BuiltinCommand::Prepend(args(&["PATH", "/first"])))?;
        run(&mut session, BuiltinCommand::Remove(args(&["PATH", "/usr/bin"])))?;
        assert_eq!(
            session.env.value("PATH"),
            Some("/first:/usr/local/bin:/opt/bin")
        );

        let (_, output) = run(&mut session, BuiltinCommand::Show(args(&["PATH"])))?;
        assert_eq!(output, "/first\n/usr/local/bin\n/opt/bin\n");
        Ok(())
    }

    #[test]
    fn separator_builtin() -> anyhow::Result<()> {
        let env = MemoryEnv::new().with_var("LIST", "a;b");
        let mut session = Session::new(env, FsProbe, ":");

        let (_, output) = run(&mut session, BuiltinCommand::Separator(args(&[])))?;
        assert_eq!(output, ":\n");

        run(&mut session, BuiltinCommand::Separator(args(&[";"])))?;
        run(&mut session, BuiltinCommand::Append(args(&["LIST", "c"])))?;
        assert_eq!(session.env.value("LIST"), Some("a;b;c"));

        assert!(run(&mut session, BuiltinCommand::Separator(args(&[""]))).is_err());
        assert_eq!(session.separator, ";");
        Ok(())
    }

    #[test]
    fn wrong_arity() {
        let mut session = Session::new(MemoryEnv::new(), FsProbe, ":");
        let err = run(&mut session, BuiltinCommand::Append(args(&["PATH"]))).unwrap_err();
        assert_eq!(err.to_string(), "usage: append VARIABLE ENTRY");
    }

    #[test]
    fn exit_codes() -> anyhow::Result<()> {
        let mut session = Session::new(MemoryEnv::new(), FsProbe, ":");
        assert_eq!(
            run(&mut session, BuiltinCommand::Exit(args(&[])))?.0,
            Status::Exit(0)
        );
        assert_eq!(
            run(&mut session, BuiltinCommand::Exit(args(&["3"])))?.0,
            Status::Exit(3)
        );
        assert!(run(&mut session, BuiltinCommand::Exit(args(&["x"]))).is_err());
        Ok(())
    }

    #[test]
    fn search_miss() -> anyhow::Result<()> {
        let env = MemoryEnv::new().with_var("PATH", "");
        let mut session = Session::new(env, FsProbe, ":");
        let (_, output) = run(&mut session, BuiltinCommand::Search(args(&["PATH", "ls"])))?;
        assert_eq!(output, "ls: not found in PATH\n");
        Ok(())
    }
}
