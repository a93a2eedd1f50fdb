//! Editing `PATH`-like environment variables.
//!
//! [`path_list`] holds the operations. They talk to the outside world through
//! the [`Environment`] and [`Probe`] traits, so they can run against the real
//! process ([`ProcessEnv`], [`FsProbe`]) or against an isolated
//! [`MemoryEnv`].
//!
//! ```
//! use envpath::{path_list, Environment, MemoryEnv};
//!
//! let mut env = MemoryEnv::new().with_var("PATH", "/a:/b:/a");
//! path_list::remove(&mut env, "PATH", ":", "/a").unwrap();
//! assert_eq!(env.get("PATH").unwrap().as_deref(), Some("/b"));
//! ```

pub mod env;
pub mod error;
pub mod path_list;
pub mod probe;

mod command;
mod completer;
mod parse;
mod shell;

pub use env::{EnvError, Environment, MemoryEnv, ProcessEnv};
pub use error::{Error, Result};
pub use probe::{FsProbe, Probe};
pub use shell::{Shell, ShellOption, Status, DEFAULT_SEPARATOR};
