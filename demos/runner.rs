//! Spawning a child process from a runner.
//!
//! The `ls` runner launches `/bin/ls` and polls the run context so the
//! dispatch deadline also bounds the child process. The `login` command
//! declares flags but no runner, so selecting it renders its help.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argtree-demos --example runner -- ls
//! cargo run -p argtree-demos --example runner -- login
//! ```

use std::process::{Command as Process, ExitCode};
use std::time::Duration;

use argtree_core::{BoxedError, Command, FlagSpec, Params, RunContext};
use argtree_runtime::run;

fn main() -> ExitCode {
    let ctx = RunContext::with_timeout(Duration::from_secs(20));

    let ls = Command::new("ls").with_short("Execute ls.").with_runner(run_ls);

    let login = Command::new("login")
        .with_short("Login to something.")
        .with_flag(FlagSpec::with_value(Some("u"), "user").with_description("User name"))
        .with_flag(FlagSpec::with_value(Some("p"), "pass").with_description("Password"));

    let root = Command::new("example-cli")
        .with_short("This is an example.")
        .with_long("This is an example.")
        .with_subcommand(ls)
        .with_subcommand(login);

    if let Err(err) = run(&ctx, &root) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_ls(ctx: &RunContext, _params: &Params) -> Result<(), BoxedError> {
    let mut child = Process::new("/bin/ls").spawn()?;
    loop {
        if let Some(status) = child.try_wait()? {
            if !status.success() {
                return Err(format!("ls exited with {status}").into());
            }
            return Ok(());
        }
        if ctx.is_cancelled() {
            child.kill()?;
            return Err("deadline exceeded".into());
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}
