//! Argument resolution over a command tree.
//!
//! Resolution walks the tree from the root, one token pass per command
//! level: flag-looking tokens go to the flag matcher, everything else to
//! the positional consumer, and tokens matching neither are retained in
//! order as the level's residual. The first residual token selects the
//! sub-command to descend into; resolution terminates at the deepest
//! matched command.
//!
//! Value-parse failures are non-fatal: the error is written to the error
//! sink and the parser's fallback value is stored. Missing required flags
//! or arguments abort the whole resolution.

use std::io::Write;

use thiserror::Error;
use tracing::{debug, warn};

use argtree_core::{
    ArgSpec, Command, FlagSpec, ParamValue, Params, RAW_ARGS_KEY, ValueParser, parse_string,
};

use crate::help::is_help_token;

/// Error aborting a resolution.
///
/// Raised by the required-field check that runs after each level's
/// matching; nothing deeper is resolved and no runner is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A required positional argument was not passed.
    #[error("required argument <{0}> not set")]
    MissingArgument(String),
    /// A required flag was not passed.
    #[error("required flag [{0}] not set")]
    MissingFlag(String),
}

/// Outcome of resolving a token stream against a command tree.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// The deepest matched command.
    pub command: &'a Command,
    /// Parameters accumulated across all resolved levels; deeper levels
    /// overwrite parent keys of the same name.
    pub params: Params,
    /// Depth of the matched command; zero is the root.
    pub depth: usize,
    /// Whether a help trigger terminated the resolution.
    pub help_requested: bool,
}

impl Resolution<'_> {
    /// Whether resolution terminated at the root command.
    pub fn at_root(&self) -> bool {
        self.depth == 0
    }
}

/// Whether a token looks like a flag (leading dash).
///
/// Classification only: whether the token actually selects a declared flag
/// is decided by [`FlagSpec::matches`]. There is no `--flag=value`
/// splitting; a token containing `=` is matched literally.
pub fn flag_like(token: &str) -> bool {
    token.starts_with('-')
}

/// Resolves a token stream against a command tree.
///
/// Descends level by level: each level consumes its flags and positionals,
/// the first unconsumed token is matched against sub-command names in
/// declaration order, and the remaining tokens carry into the matched
/// child. When exactly one token is left at a level's entry and it is a
/// help trigger (`-h`, `--help`, `help`), resolution terminates there with
/// [`Resolution::help_requested`] set and skips that level's matching and
/// required-field checks.
///
/// Parse diagnostics are written to `err`; the tree is never mutated, so
/// repeated resolutions over the same tree are independent.
///
/// # Examples
///
/// ```
/// use argtree_core::{ArgSpec, Command, FlagSpec};
/// use argtree_runtime::resolve;
///
/// let tree = Command::new("tool").with_subcommand(
///     Command::new("copy")
///         .with_short("Copy a file")
///         .with_arg(ArgSpec::required("source"))
///         .with_flag(FlagSpec::boolean(Some("f"), "force").with_description("Overwrite")),
/// );
///
/// let tokens: Vec<String> = ["copy", "a.txt", "-f"].iter().map(|s| s.to_string()).collect();
/// let mut err = Vec::new();
/// let resolution = resolve(&tree, &tokens, &mut err).unwrap();
///
/// assert_eq!(resolution.command.name, "copy");
/// assert_eq!(resolution.params.str_value("source").unwrap(), "a.txt");
/// assert!(resolution.params.bool_value("force").unwrap());
/// assert!(err.is_empty());
/// ```
pub fn resolve<'a>(
    root: &'a Command,
    tokens: &[String],
    err: &mut dyn Write,
) -> Result<Resolution<'a>, ResolveError> {
    resolve_with_root_flags(root, tokens, &[], err)
}

/// Like [`resolve`], with extra flag candidates considered at the root
/// level only. The dispatcher uses this to match the synthetic version
/// flag without mutating the tree; extras are tried after the root's own
/// flags, so user declarations win on collision.
pub(crate) fn resolve_with_root_flags<'a>(
    root: &'a Command,
    tokens: &[String],
    root_flags: &[FlagSpec],
    err: &mut dyn Write,
) -> Result<Resolution<'a>, ResolveError> {
    let mut params = Params::new();
    let (command, depth, help_requested) =
        walk(root, tokens, root_flags, 0, &mut params, err)?;
    Ok(Resolution {
        command,
        params,
        depth,
        help_requested,
    })
}

fn walk<'a>(
    cmd: &'a Command,
    tokens: &[String],
    extra_flags: &[FlagSpec],
    depth: usize,
    acc: &mut Params,
    err: &mut dyn Write,
) -> Result<(&'a Command, usize, bool), ResolveError> {
    if tokens.len() == 1 && is_help_token(&tokens[0]) {
        debug!(command = %cmd.name, depth, "help requested");
        return Ok((cmd, depth, true));
    }

    let (level, residual) = resolve_level(cmd, tokens, extra_flags, err);
    validate_required(cmd, &level)?;
    let level = apply_defaults(cmd, level);
    acc.merge(level);

    if let Some(first) = residual.first() {
        if let Some(sub) = cmd.find_subcommand(first) {
            debug!(command = %sub.name, depth = depth + 1, "descending into sub-command");
            return walk(sub, &residual[1..], &[], depth + 1, acc, err);
        }
    }
    debug!(command = %cmd.name, depth, residual = residual.len(), "resolution terminated");
    Ok((cmd, depth, false))
}

/// One matching pass over a level's token stream. Returns the level's
/// parameters and the residual tokens in their original order.
fn resolve_level(
    cmd: &Command,
    tokens: &[String],
    extra_flags: &[FlagSpec],
    err: &mut dyn Write,
) -> (Params, Vec<String>) {
    let mut params = Params::new();
    params.insert(RAW_ARGS_KEY, ParamValue::RawArgs(tokens.to_vec()));

    let mut residual = Vec::new();
    let mut skip = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        let step = if flag_like(token) {
            match_flag(
                cmd.flags.iter().chain(extra_flags),
                &mut params,
                tokens,
                index,
                err,
            )
        } else {
            match_positional(&cmd.args, &mut params, tokens, index, err)
        };
        skip = step.consumed_ahead;
        if !step.matched {
            residual.push(token.clone());
        }
    }
    (params, residual)
}

/// Transient result of matching one token.
struct MatchStep {
    matched: bool,
    /// Tokens after the current one that the match consumed.
    consumed_ahead: usize,
}

impl MatchStep {
    fn none() -> Self {
        Self {
            matched: false,
            consumed_ahead: 0,
        }
    }
}

/// Tries the candidate flags in order against the current token. Flags
/// whose key is already set are skipped, so a repeated flag token matches
/// nothing and falls to the residual.
fn match_flag<'f>(
    flags: impl Iterator<Item = &'f FlagSpec>,
    params: &mut Params,
    tokens: &[String],
    index: usize,
    err: &mut dyn Write,
) -> MatchStep {
    for flag in flags {
        if params.contains(&flag.name) || !flag.matches(&tokens[index]) {
            continue;
        }
        if !flag.takes_value {
            params.insert(flag.name.clone(), true);
            return MatchStep {
                matched: true,
                consumed_ahead: 0,
            };
        }
        // The next token is the value whatever it looks like; at the end
        // of the stream the empty string is parsed instead.
        let raw = tokens.get(index + 1).map(String::as_str).unwrap_or("");
        let value = run_parser(flag.parser, raw, err);
        params.insert(flag.name.clone(), value);
        return MatchStep {
            matched: true,
            consumed_ahead: 1,
        };
    }
    MatchStep::none()
}

/// Assigns the current token to the first unfilled positional, in
/// declaration order. A variadic positional takes over collection from the
/// current token onward.
fn match_positional(
    args: &[ArgSpec],
    params: &mut Params,
    tokens: &[String],
    index: usize,
    err: &mut dyn Write,
) -> MatchStep {
    for arg in args {
        if params.contains(&arg.name) {
            continue;
        }
        if arg.variadic {
            return collect_variadic(arg, params, tokens, index);
        }
        let value = run_parser(arg.parser, &tokens[index], err);
        params.insert(arg.name.clone(), value);
        return MatchStep {
            matched: true,
            consumed_ahead: 0,
        };
    }
    MatchStep::none()
}

/// Collects non-flag-looking tokens from the current index into an ordered
/// string list, stopping without consuming at the first flag-looking token
/// or the end of the stream. Scalar parsers do not apply to the collected
/// entries.
fn collect_variadic(
    arg: &ArgSpec,
    params: &mut Params,
    tokens: &[String],
    index: usize,
) -> MatchStep {
    let mut collected = Vec::new();
    for token in &tokens[index..] {
        if flag_like(token) {
            break;
        }
        collected.push(token.clone());
    }
    if collected.is_empty() {
        return MatchStep::none();
    }
    let consumed_ahead = collected.len() - 1;
    params.insert(arg.name.clone(), ParamValue::Values(collected));
    MatchStep {
        matched: true,
        consumed_ahead,
    }
}

fn run_parser(parser: Option<ValueParser>, raw: &str, err: &mut dyn Write) -> ParamValue {
    match parser.unwrap_or(parse_string)(raw) {
        Ok(value) => value,
        Err(parse_err) => {
            // Non-fatal: report and store the parser's fallback value.
            warn!(raw, error = %parse_err, "value parse failed");
            let _ = writeln!(err, "{parse_err}");
            parse_err.into_fallback()
        }
    }
}

/// Checks the level's required flags and arguments after matching, before
/// any descent. The first violation aborts the resolution.
fn validate_required(cmd: &Command, level: &Params) -> Result<(), ResolveError> {
    for arg in &cmd.args {
        if arg.required && !level.contains(&arg.name) {
            return Err(ResolveError::MissingArgument(arg.name.clone()));
        }
    }
    for flag in &cmd.flags {
        if flag.required && !level.contains(&flag.name) {
            return Err(ResolveError::MissingFlag(flag.name.clone()));
        }
    }
    Ok(())
}

/// Fills declared defaults for keys the level left absent. Runs after the
/// required check, so a required spec with a default still fails when
/// unmatched.
fn apply_defaults(cmd: &Command, mut level: Params) -> Params {
    for arg in &cmd.args {
        if let Some(default) = &arg.default {
            if !level.contains(&arg.name) {
                level.insert(arg.name.clone(), default.clone());
            }
        }
    }
    for flag in &cmd.flags {
        if let Some(default) = &flag.default {
            if !level.contains(&flag.name) {
                level.insert(flag.name.clone(), default.clone());
            }
        }
    }
    level
}
