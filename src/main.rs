use std::io::{self, BufReader, IsTerminal};

use envpath::{ProcessEnv, Shell, ShellOption};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let interactive = io::stdin().is_terminal();
    let opts = ShellOption::from_env().with_print_prompt(false);
    let mut shell = Shell::new(ProcessEnv, io::stdout(), io::stderr()).with_option(opts);

    let code = if interactive {
        shell.run_interactive()?
    } else {
        let input = BufReader::new(io::stdin().lock());
        shell.run(input)?
    };

    std::process::exit(code)
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("ENVPATH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
