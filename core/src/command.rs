//! Command tree definitions: commands, flags, and positional arguments.
//!
//! This module defines the declarative model consumed by the resolution
//! engine. The types serialize with [`serde`] (runner and parser functions
//! excluded) so trees can round-trip through JSON and YAML for
//! documentation export.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ParamValue, Params, RunContext, ValueParser};

/// Error type returned by command runners, propagated verbatim.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Handler executed when resolution terminates on a runnable command.
///
/// Receives the caller's [`RunContext`] and the accumulated [`Params`];
/// the raw token list of the resolved level is available through
/// [`Params::raw_args`].
pub type Runner = Arc<dyn Fn(&RunContext, &Params) -> Result<(), BoxedError> + Send + Sync>;

/// Spec for a command flag.
///
/// A flag has an optional single-letter short form (matched as `-x`) and a
/// long name (matched as `--name` and used as the parameter-map key). Use
/// the constructors [`boolean`](FlagSpec::boolean) and
/// [`with_value`](FlagSpec::with_value), then chain builder methods.
///
/// # Examples
///
/// ```
/// use argtree_core::FlagSpec;
///
/// // Value-less flag, stored as `true` when present
/// let verbose = FlagSpec::boolean(Some("d"), "debug")
///     .with_description("Enable debug output");
/// assert!(!verbose.takes_value);
/// assert!(verbose.matches("-d"));
/// assert!(verbose.matches("--debug"));
///
/// // Flag that consumes the following token as its value
/// let user = FlagSpec::with_value(Some("u"), "user").required();
/// assert!(user.takes_value);
/// assert!(user.required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Single-letter short form, matched with one leading dash
    pub short: Option<String>,
    /// Long name, matched with two leading dashes; also the parameter-map key
    pub name: String,
    /// If true, the following token is consumed as the flag's value
    pub takes_value: bool,
    /// If true, resolution fails when the flag is not passed
    pub required: bool,
    /// Value stored when the flag is not passed
    pub default: Option<ParamValue>,
    /// Parser applied to the raw value ([`parse_string`](crate::parse_string)
    /// when unset)
    #[serde(skip)]
    pub parser: Option<ValueParser>,
    /// Description shown in help texts
    pub description: Option<String>,
}

impl FlagSpec {
    /// Creates a value-less flag. When matched, `true` is stored under the
    /// flag's name.
    pub fn boolean(short: Option<&str>, name: &str) -> Self {
        Self {
            short: short.map(String::from),
            name: name.to_string(),
            takes_value: false,
            required: false,
            default: None,
            parser: None,
            description: None,
        }
    }

    /// Creates a flag that consumes the following token as its value.
    ///
    /// The value token is taken verbatim, whether or not it looks like a
    /// flag; at the end of the stream the empty string is parsed instead.
    pub fn with_value(short: Option<&str>, name: &str) -> Self {
        Self {
            takes_value: true,
            ..Self::boolean(short, name)
        }
    }

    /// Marks the flag as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the value stored when the flag is not passed.
    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the parser applied to the raw value.
    pub fn with_parser(mut self, parser: ValueParser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Checks whether a token selects this flag (`-short` or `--name`).
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_core::FlagSpec;
    ///
    /// let flag = FlagSpec::boolean(Some("v"), "verbose");
    /// assert!(flag.matches("-v"));
    /// assert!(flag.matches("--verbose"));
    /// assert!(!flag.matches("-verbose"));
    /// assert!(!flag.matches("verbose"));
    /// ```
    pub fn matches(&self, token: &str) -> bool {
        if let (Some(short), Some(rest)) = (self.short.as_deref(), token.strip_prefix('-')) {
            if rest == short {
                return true;
            }
        }
        token.strip_prefix("--").is_some_and(|rest| rest == self.name)
    }
}

/// Spec for a positional argument.
///
/// Positionals are unnamed tokens assigned in declaration order to the
/// earliest unfilled spec. A variadic positional collects every following
/// non-flag-looking token into an ordered list; declare at most one per
/// command, as the last positional.
///
/// # Examples
///
/// ```
/// use argtree_core::ArgSpec;
///
/// let source = ArgSpec::required("source");
/// assert!(source.required);
///
/// let rest = ArgSpec::optional("files").variadic();
/// assert!(!rest.required);
/// assert!(rest.variadic);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Name used in help texts and as the parameter-map key
    pub name: String,
    /// Description shown in help texts
    pub description: Option<String>,
    /// If true, resolution fails when the argument is not passed
    pub required: bool,
    /// Value stored when the argument is not passed
    pub default: Option<ParamValue>,
    /// Parser applied to the raw token (scalar positionals only)
    #[serde(skip)]
    pub parser: Option<ValueParser>,
    /// If true, collects all following non-flag tokens as a string list
    pub variadic: bool,
}

impl ArgSpec {
    /// Creates a required positional argument.
    pub fn required(name: &str) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    /// Creates an optional positional argument.
    pub fn optional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            required: false,
            default: None,
            parser: None,
            variadic: false,
        }
    }

    /// Marks the argument as variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the value stored when the argument is not passed.
    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the parser applied to the raw token.
    pub fn with_parser(mut self, parser: ValueParser) -> Self {
        self.parser = Some(parser);
        self
    }
}

/// A command, or sub-command, that can be resolved and run.
///
/// Commands form a tree owned root to leaf; resolution matches the first
/// unconsumed token of each level against child names in declaration order.
/// A command with no runner renders its help when resolved.
///
/// `Command::default()` is the synthetic nameless root used by programs
/// whose top level only dispatches to sub-commands; every other command
/// should carry a name.
///
/// # Examples
///
/// ```
/// use argtree_core::{ArgSpec, Command, FlagSpec};
///
/// let tree = Command::new("deploy")
///     .with_short("Deploy services")
///     .with_flag(FlagSpec::with_value(Some("e"), "env").with_description("Target environment"))
///     .with_subcommand(
///         Command::new("status")
///             .with_short("Show deployment status")
///             .with_arg(ArgSpec::required("service")),
///     );
///
/// assert!(tree.find_subcommand("status").is_some());
/// assert!(tree.find_subcommand("rollback").is_none());
/// assert!(!tree.is_runnable());
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Command {
    /// Command name, matched against the first residual token of the parent
    pub name: String,
    /// Group label used to group sub-commands in the parent's help
    pub group: Option<String>,
    /// Short description, shown in the containing command's help
    pub short: Option<String>,
    /// Long description, shown at the top of this command's help
    pub long: Option<String>,
    /// Positional arguments
    pub args: Vec<ArgSpec>,
    /// Flags for this command
    pub flags: Vec<FlagSpec>,
    /// Sub-commands in declaration order
    pub subcommands: Vec<Command>,
    /// Version string, read from the root when the version flag is passed
    pub version: Option<String>,
    /// Handler executed when resolution terminates here
    #[serde(skip)]
    pub runner: Option<Runner>,
}

impl Command {
    /// Creates a command with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Sets the help group label.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Sets the short description.
    pub fn with_short(mut self, short: &str) -> Self {
        self.short = Some(short.to_string());
        self
    }

    /// Sets the long description.
    pub fn with_long(mut self, long: &str) -> Self {
        self.long = Some(long.to_string());
        self
    }

    /// Adds a flag.
    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// Adds a positional argument.
    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Adds a sub-command.
    pub fn with_subcommand(mut self, sub: Command) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Sets the version string reported by the root's version flag.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Attaches the handler to execute when resolution terminates here.
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_core::Command;
    ///
    /// let cmd = Command::new("greet").with_runner(|_ctx, params| {
    ///     println!("hello {}", params.str_value("name")?);
    ///     Ok(())
    /// });
    /// assert!(cmd.is_runnable());
    /// ```
    pub fn with_runner<F>(mut self, runner: F) -> Self
    where
        F: Fn(&RunContext, &Params) -> Result<(), BoxedError> + Send + Sync + 'static,
    {
        self.runner = Some(Arc::new(runner));
        self
    }

    /// Whether a handler is attached.
    pub fn is_runnable(&self) -> bool {
        self.runner.is_some()
    }

    /// Whether any flags are declared.
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Whether any positional arguments are declared.
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    /// Whether any sub-commands are declared.
    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Finds a direct sub-command by exact name, in declaration order.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|sub| sub.name == name)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("version", &self.version)
            .field("runner", &self.runner.as_ref().map(|_| "..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_spec_matches() {
        let flag = FlagSpec::boolean(Some("v"), "verbose");

        assert!(flag.matches("-v"));
        assert!(flag.matches("--verbose"));
        assert!(!flag.matches("-x"));
        assert!(!flag.matches("--v"));
        assert!(!flag.matches("-verbose"));
    }

    #[test]
    fn test_flag_spec_long_only() {
        let flag = FlagSpec::boolean(None, "force");

        assert!(flag.matches("--force"));
        assert!(!flag.matches("-f"));
    }

    #[test]
    fn test_flag_spec_builders() {
        let flag = FlagSpec::with_value(Some("u"), "user")
            .required()
            .with_description("User to act as")
            .with_default("nobody");

        assert!(flag.takes_value);
        assert!(flag.required);
        assert_eq!(flag.default, Some(ParamValue::Str("nobody".to_string())));
        assert_eq!(flag.description.as_deref(), Some("User to act as"));
    }

    #[test]
    fn test_arg_spec_builders() {
        let arg = ArgSpec::required("files").variadic().with_description("Input files");

        assert!(arg.required);
        assert!(arg.variadic);
        assert_eq!(arg.name, "files");
    }

    #[test]
    fn test_command_find_subcommand() {
        let cmd = Command::new("root")
            .with_subcommand(Command::new("first"))
            .with_subcommand(Command::new("second"));

        assert!(cmd.find_subcommand("first").is_some());
        assert!(cmd.find_subcommand("second").is_some());
        assert!(cmd.find_subcommand("third").is_none());
    }

    #[test]
    fn test_command_runner_invocation() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let cmd = Command::new("exec").with_runner(move |_ctx, _params| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert!(cmd.is_runnable());
        let runner = cmd.runner.as_ref().unwrap();
        (**runner)(&RunContext::new(), &Params::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_command_serialization_skips_runner() {
        let cmd = Command::new("run").with_runner(|_, _| Ok(()));
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();

        assert_eq!(back.name, "run");
        assert!(back.runner.is_none());
    }
}
