//! Minimal command tree with a required flag.
//!
//! Declares a root command with one runnable sub-command, dispatches the
//! process arguments, and bounds the whole run with a deadline.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argtree-demos --example basic -- print -u alice
//! cargo run -p argtree-demos --example basic -- print --help
//! ```

use std::process::ExitCode;
use std::time::Duration;

use argtree_core::{Command, FlagSpec, RunContext};
use argtree_runtime::run;

fn main() -> ExitCode {
    let ctx = RunContext::with_timeout(Duration::from_secs(20));

    let print = Command::new("print")
        .with_short("Print the passed user.")
        .with_flag(
            FlagSpec::with_value(Some("u"), "user")
                .required()
                .with_description("User to run with."),
        )
        .with_runner(|_ctx, params| {
            println!("The passed user was: {}.", params.str_value("user")?);
            Ok(())
        });

    let root = Command::new("example-cli")
        .with_long("This is an example")
        .with_subcommand(print);

    if let Err(err) = run(&ctx, &root) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
