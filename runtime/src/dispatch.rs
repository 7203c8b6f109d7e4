//! Top-level dispatch: from raw tokens to a runner, help text, or version
//! string.
//!
//! [`Dispatcher`] owns the output sinks and drives one invocation:
//!
//! - `lint` as the first token runs the structural checks and reports
//!   warnings on the error sink.
//! - Otherwise the token stream is resolved against the tree, with a
//!   hidden `-v`/`--version` flag available at the root level.
//! - The resolved command's runner executes, or its help renders when no
//!   runner is attached.

use std::fmt;
use std::io::{self, Write};

use argtree_core::{BoxedError, Command, FlagSpec, RunContext, lint};
use thiserror::Error;
use tracing::debug;

use crate::help::render_help;
use crate::resolve::{ResolveError, resolve_with_root_flags};

/// Version string printed when the root command declares none.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Error returned by a dispatch run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The token stream did not satisfy the command tree.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The resolved command's runner failed.
    #[error("{0}")]
    Handler(BoxedError),

    /// Writing to an output sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Drives command invocations against a pair of output sinks.
///
/// # Examples
///
/// ```no_run
/// use argtree_core::{Command, RunContext};
/// use argtree_runtime::Dispatcher;
///
/// let root = Command::new("tool")
///     .with_subcommand(Command::new("sync").with_runner(|_ctx, _params| Ok(())));
///
/// let mut dispatcher = Dispatcher::new();
/// if let Err(err) = dispatcher.run(&RunContext::new(), &root) {
///     eprintln!("{err}");
///     std::process::exit(1);
/// }
/// ```
pub struct Dispatcher {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Dispatcher {
    /// Creates a dispatcher writing to standard output and standard error.
    pub fn new() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Creates a dispatcher writing to the given sinks.
    pub fn with_sinks(
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        Self {
            out: Box::new(out),
            err: Box::new(err),
        }
    }

    /// Runs `root` against the process arguments (program name excluded).
    pub fn run(&mut self, ctx: &RunContext, root: &Command) -> Result<(), RunError> {
        let tokens: Vec<String> = std::env::args().skip(1).collect();
        self.run_with_tokens(ctx, root, &tokens)
    }

    /// Runs `root` against an explicit token stream.
    ///
    /// The first token `lint` is reserved: it triggers the structural
    /// checks from [`argtree_core::lint`] instead of resolution, shadowing
    /// any user sub-command of the same name.
    pub fn run_with_tokens(
        &mut self,
        ctx: &RunContext,
        root: &Command,
        tokens: &[String],
    ) -> Result<(), RunError> {
        if tokens.first().map(String::as_str) == Some("lint") {
            return self.report_lint(root);
        }

        let resolution = resolve_with_root_flags(root, tokens, &[version_flag()], &mut self.err)?;

        if tokens.is_empty() || resolution.help_requested {
            debug!(command = %resolution.command.name, "rendering help");
            return self.print_help(resolution.command);
        }

        if let Some(runner) = &resolution.command.runner {
            debug!(command = %resolution.command.name, "invoking runner");
            return (**runner)(ctx, &resolution.params).map_err(RunError::Handler);
        }

        if resolution.at_root() {
            if resolution.params.contains("version") {
                let version = root.version.as_deref().unwrap_or(DEFAULT_VERSION);
                writeln!(self.out, "{version}")?;
            }
            return Ok(());
        }

        self.print_help(resolution.command)
    }

    fn report_lint(&mut self, root: &Command) -> Result<(), RunError> {
        let warnings = lint(root);
        debug!(count = warnings.len(), "lint pass finished");
        for warning in &warnings {
            writeln!(self.err, "[WARN] {warning}")?;
        }
        Ok(())
    }

    fn print_help(&mut self, cmd: &Command) -> Result<(), RunError> {
        self.out.write_all(render_help(cmd).as_bytes())?;
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

/// Runs `root` against the process arguments with standard output sinks.
pub fn run(ctx: &RunContext, root: &Command) -> Result<(), RunError> {
    Dispatcher::new().run(ctx, root)
}

// Matched at the root level only, and not listed in help output.
fn version_flag() -> FlagSpec {
    FlagSpec::boolean(Some("v"), "version").with_description("Print the version.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn dispatcher() -> (Dispatcher, SharedBuf, SharedBuf) {
        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let dispatcher = Dispatcher::with_sinks(out.clone(), err.clone());
        (dispatcher, out, err)
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_version_flag_prints_default_version() {
        let root = Command::new("tool").with_subcommand(Command::new("sync"));
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["-v"]))
            .unwrap();

        assert_eq!(out.contents(), "0.1.0\n");
    }

    #[test]
    fn test_version_flag_prints_declared_version() {
        let root = Command::new("tool")
            .with_version("2.3.4")
            .with_subcommand(Command::new("sync"));
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["--version"]))
            .unwrap();

        assert_eq!(out.contents(), "2.3.4\n");
    }

    #[test]
    fn test_unconsumed_root_tokens_are_silent() {
        let root = Command::new("tool").with_subcommand(Command::new("sync"));
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["stray"]))
            .unwrap();

        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_empty_tokens_render_root_help() {
        let root = Command::new("tool").with_subcommand(Command::new("sync"));
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &[])
            .unwrap();

        assert!(out.contents().contains("Usage:\n  tool"));
    }

    #[test]
    fn test_help_request_bypasses_runner() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let root = Command::new("tool").with_runner(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["--help"]))
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(out.contents().contains("Usage:"));
    }

    #[test]
    fn test_runner_receives_resolved_params() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let root = Command::new("tool").with_subcommand(
            Command::new("greet")
                .with_flag(FlagSpec::with_value(Some("u"), "user"))
                .with_runner(move |_, params| {
                    *sink.lock().unwrap() = Some(params.str_value("user")?.to_string());
                    Ok(())
                }),
        );
        let (mut dispatcher, _, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["greet", "-u", "ada"]))
            .unwrap();

        assert_eq!(seen.lock().unwrap().as_deref(), Some("ada"));
    }

    #[test]
    fn test_handler_error_propagates() {
        let root = Command::new("tool").with_subcommand(
            Command::new("fail").with_runner(|_, _| Err("boom".into())),
        );
        let (mut dispatcher, _, _) = dispatcher();

        let err = dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["fail"]))
            .unwrap_err();

        assert!(matches!(err, RunError::Handler(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_missing_required_flag_is_an_error() {
        let root = Command::new("tool").with_subcommand(
            Command::new("login")
                .with_flag(FlagSpec::with_value(Some("u"), "user").required())
                .with_runner(|_, _| Ok(())),
        );
        let (mut dispatcher, _, _) = dispatcher();

        let err = dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["login"]))
            .unwrap_err();

        assert!(matches!(err, RunError::Resolve(_)));
        assert_eq!(err.to_string(), "required flag [user] not set");
    }

    #[test]
    fn test_lint_reports_warnings_to_err_sink() {
        let root = Command::new("tool").with_subcommand(Command::new("sync"));
        let (mut dispatcher, out, err) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["lint"]))
            .unwrap();

        assert_eq!(out.contents(), "");
        assert!(err.contents().contains("[WARN] missing short description"));
    }

    #[test]
    fn test_lint_clean_tree_writes_nothing() {
        let root = Command::new("tool")
            .with_subcommand(Command::new("sync").with_short("Synchronize state."));
        let (mut dispatcher, _, err) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["lint"]))
            .unwrap();

        assert_eq!(err.contents(), "");
    }

    #[test]
    fn test_non_runnable_subcommand_renders_its_help() {
        let root = Command::new("tool").with_subcommand(
            Command::new("remote").with_subcommand(Command::new("add")),
        );
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["remote"]))
            .unwrap();

        assert!(out.contents().contains("Usage:\n  remote <command>"));
    }

    #[test]
    fn test_declared_version_flag_wins_over_hidden_one() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let root = Command::new("tool")
            .with_flag(FlagSpec::boolean(None, "version"))
            .with_runner(move |_, params| {
                *sink.lock().unwrap() = Some(params.bool_value("version")?);
                Ok(())
            });
        let (mut dispatcher, out, _) = dispatcher();

        dispatcher
            .run_with_tokens(&RunContext::new(), &root, &tokens(&["--version"]))
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), Some(true));
        assert_eq!(out.contents(), "");
    }
}
