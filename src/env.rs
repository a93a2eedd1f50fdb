use std::{collections::BTreeMap, ffi::OsString};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("invalid environment variable name `{0}`")]
    InvalidName(String),
    #[error("value for environment variable `{0}` contains a NUL byte")]
    InvalidValue(String),
    #[error("value of environment variable `{0}` is not valid unicode")]
    NotUnicode(String),
}

/// A read-modify-write through this trait is not atomic. Callers sharing one
/// environment across threads must serialize their edits.
pub trait Environment {
    fn get(&self, name: &str) -> Result<Option<String>, EnvError>;

    fn set(&mut self, name: &str, value: &str) -> Result<(), EnvError>;

    fn unset(&mut self, name: &str) -> Result<(), EnvError>;

    fn vars(&self) -> Vec<(OsString, OsString)>;
}

fn check_name(name: &str) -> Result<(), EnvError> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(EnvError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn check_value(name: &str, value: &str) -> Result<(), EnvError> {
    if value.contains('\0') {
        return Err(EnvError::InvalidValue(name.to_string()));
    }
    Ok(())
}

// `std::env::set_var` panics on malformed names and values
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, name: &str) -> Result<Option<String>, EnvError> {
        check_name(name)?;
        match std::env::var_os(name) {
            Some(value) => value
                .into_string()
                .map(Some)
                .map_err(|_| EnvError::NotUnicode(name.to_string())),
            None => Ok(None),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        check_name(name)?;
        check_value(name, value)?;
        std::env::set_var(name, value);
        Ok(())
    }

    fn unset(&mut self, name: &str) -> Result<(), EnvError> {
        check_name(name)?;
        std::env::remove_var(name);
        Ok(())
    }

    fn vars(&self) -> Vec<(OsString, OsString)> {
        std::env::vars_os().collect()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> MemoryEnv {
        MemoryEnv::default()
    }

    pub fn with_var(mut self, name: &str, value: &str) -> MemoryEnv {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl Environment for MemoryEnv {
    fn get(&self, name: &str) -> Result<Option<String>, EnvError> {
        check_name(name)?;
        Ok(self.vars.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        check_name(name)?;
        check_value(name, value)?;
        self.vars.insert(name.into(), value.into());
        Ok(())
    }

    fn unset(&mut self, name: &str) -> Result<(), EnvError> {
        check_name(name)?;
        self.vars.remove(name);
        Ok(())
    }

    fn vars(&self) -> Vec<(OsString, OsString)> {
        self.vars
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn memory_set_get_unset() {
        let mut env = MemoryEnv::new();
        assert_eq!(env.get("FOO"), Ok(None));

        env.set("FOO", "bar").unwrap();
        assert_eq!(env.get("FOO"), Ok(Some("bar".to_string())));

        env.unset("FOO").unwrap();
        assert!(!env.contains("FOO"));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut env = MemoryEnv::new();
        assert_eq!(env.set("", "x"), Err(EnvError::InvalidName("".into())));
        assert_eq!(
            env.set("A=B", "x"),
            Err(EnvError::InvalidName("A=B".into()))
        );
        assert_eq!(env.unset("A\0"), Err(EnvError::InvalidName("A\0".into())));

        let mut process = ProcessEnv;
        assert!(process.set("", "x").is_err());
        assert_eq!(process.get("A=B"), Err(EnvError::InvalidName("A=B".into())));
    }

    #[test]
    fn nul_in_value_is_rejected() {
        let mut env = MemoryEnv::new();
        assert_eq!(
            env.set("FOO", "a\0b"),
            Err(EnvError::InvalidValue("FOO".into()))
        );
        assert!(!env.contains("FOO"));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_value_is_an_error() {
        use std::os::unix::ffi::OsStrExt;

        let name = "ENVPATH_TEST_NON_UNICODE";
        std::env::set_var(name, std::ffi::OsStr::from_bytes(b"/keep\xff:/b"));
        assert_eq!(
            ProcessEnv.get(name),
            Err(EnvError::NotUnicode(name.into()))
        );
        std::env::remove_var(name);
    }

    #[test]
    fn vars_snapshot() {
        let env = MemoryEnv::new().with_var("A", "1").with_var("B", "2");
        assert_eq!(
            env.vars(),
            vec![("A".into(), "1".into()), ("B".into(), "2".into())]
        );
    }
}
