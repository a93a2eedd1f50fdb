//! Separator-delimited path lists kept in one environment variable.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    env::Environment,
    error::{Error, Result},
    probe::Probe,
};

fn check_separator(separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(Error::EmptySeparator);
    }
    Ok(())
}

// an empty value is an empty list, not one empty entry
pub fn split<'a>(value: &'a str, separator: &str) -> Vec<&'a str> {
    if value.is_empty() {
        return vec![];
    }
    value.split(separator).collect()
}

pub fn join<S: AsRef<str>>(entries: &[S], separator: &str) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(entry.as_ref());
    }
    out
}

pub fn appended(current: Option<&str>, separator: &str, entry: &str) -> String {
    match current {
        Some(current) if !current.is_empty() => format!("{current}{separator}{entry}"),
        _ => entry.to_string(),
    }
}

pub fn prepended(current: Option<&str>, separator: &str, entry: &str) -> String {
    match current {
        Some(current) if !current.is_empty() => format!("{entry}{separator}{current}"),
        _ => entry.to_string(),
    }
}

pub fn removed(current: Option<&str>, separator: &str, target: &str) -> Option<String> {
    let survivors: Vec<&str> = split(current.unwrap_or_default(), separator)
        .into_iter()
        .filter(|entry| *entry != target)
        .collect();
    // only empty entries left joins to "", which reads back as no entries at all
    Some(join(&survivors, separator)).filter(|value| !value.is_empty())
}

/// First existing `dir/target` for the directories listed in `variable`.
///
/// A probe error does not end the scan: it is only returned when no later
/// directory matches.
pub fn search<E, P>(
    env: &E,
    probe: &P,
    variable: &str,
    separator: &str,
    target: &str,
) -> Result<Option<PathBuf>>
where
    E: Environment + ?Sized,
    P: Probe + ?Sized,
{
    check_separator(separator)?;
    if target.is_empty() || Path::new(target).is_absolute() {
        return Err(Error::InvalidTarget(target.to_string()));
    }

    let value = env.get(variable)?.unwrap_or_default();
    let mut last_error: Option<(PathBuf, io::Error)> = None;

    for dir in split(&value, separator) {
        if dir.is_empty() {
            continue;
        }
        let path = PathBuf::from(dir).join(target);
        match probe.exists(&path) {
            Ok(true) => {
                debug!(variable, path = %path.display(), "match found");
                return Ok(Some(path));
            }
            Ok(false) => debug!(path = %path.display(), "no match"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "probe failed");
                last_error = Some((path, e));
            }
        }
    }

    match last_error {
        Some((path, source)) => Err(Error::Probe { path, source }),
        None => Ok(None),
    }
}

pub fn append<E>(env: &mut E, variable: &str, separator: &str, entry: &str) -> Result<()>
where
    E: Environment + ?Sized,
{
    check_separator(separator)?;
    let value = appended(env.get(variable)?.as_deref(), separator, entry);
    debug!(variable, value = %value, "append");
    env.set(variable, &value)?;
    Ok(())
}

pub fn prepend<E>(env: &mut E, variable: &str, separator: &str, entry: &str) -> Result<()>
where
    E: Environment + ?Sized,
{
    check_separator(separator)?;
    let value = prepended(env.get(variable)?.as_deref(), separator, entry);
    debug!(variable, value = %value, "prepend");
    env.set(variable, &value)?;
    Ok(())
}

pub fn remove<E>(env: &mut E, variable: &str, separator: &str, entry: &str) -> Result<()>
where
    E: Environment + ?Sized,
{
    check_separator(separator)?;
    match removed(env.get(variable)?.as_deref(), separator, entry) {
        Some(value) => {
            debug!(variable, value = %value, "remove");
            env.set(variable, &value)?;
        }
        None => {
            debug!(variable, "remove left no entries, unsetting");
            env.unset(variable)?;
        }
    }
    Ok(())
}
