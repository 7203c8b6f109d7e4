//! Structural lint for command trees.
//!
//! Catches metadata gaps that make a command tree hard to use: missing
//! names, missing descriptions. Warnings are advisory and never abort a
//! run; the runtime's `lint` pseudo-command prints them to the error sink.

use thiserror::Error;

use crate::Command;

/// A structural problem found by [`lint`].
///
/// The `path` fields hold the space-joined command names from the root down
/// to the offending node, with `?` standing in for a missing name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintWarning {
    /// A command (the root included) has an empty name.
    #[error("missing name on command '{path}'")]
    MissingName {
        /// Path of the nameless command
        path: String,
    },
    /// A non-root command has no short description for its parent's help.
    #[error("missing short description on command '{path}'")]
    MissingShortDescription {
        /// Path of the undescribed command
        path: String,
    },
    /// A flag has an empty long name, identified by declaration index.
    #[error("missing name on flag {index} in command '{path}'")]
    MissingFlagName {
        /// Path of the declaring command
        path: String,
        /// Zero-based declaration index of the flag
        index: usize,
    },
    /// A flag has no description for help texts.
    #[error("missing description on flag [{flag}] in command '{path}'")]
    MissingFlagDescription {
        /// Path of the declaring command
        path: String,
        /// Long name of the flag
        flag: String,
    },
}

/// Checks a command tree for structural problems.
///
/// Walks the tree depth-first in declaration order: every command must have
/// a name, every non-root command a short description, and every flag both
/// a name and a description. Pure and deterministic — linting the same
/// unmodified tree twice yields identical warnings in identical order.
///
/// # Examples
///
/// ```
/// use argtree_core::{Command, FlagSpec, lint};
///
/// let tree = Command::new("tool")
///     .with_subcommand(Command::new("sync").with_short("Synchronize state"))
///     .with_flag(FlagSpec::boolean(Some("d"), "debug").with_description("Debug output"));
/// assert!(lint(&tree).is_empty());
///
/// let bare = Command::new("tool").with_subcommand(Command::new("sync"));
/// assert_eq!(lint(&bare).len(), 1); // sync has no short description
/// ```
pub fn lint(root: &Command) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let mut path = Vec::new();
    lint_command(root, true, &mut path, &mut warnings);
    warnings
}

fn lint_command(
    cmd: &Command,
    is_root: bool,
    path: &mut Vec<String>,
    warnings: &mut Vec<LintWarning>,
) {
    path.push(if cmd.name.is_empty() {
        "?".to_string()
    } else {
        cmd.name.clone()
    });
    let here = path.join(" ");

    if cmd.name.is_empty() {
        warnings.push(LintWarning::MissingName { path: here.clone() });
    }
    if !is_root && cmd.short.as_deref().unwrap_or("").is_empty() {
        warnings.push(LintWarning::MissingShortDescription { path: here.clone() });
    }
    for (index, flag) in cmd.flags.iter().enumerate() {
        if flag.name.is_empty() {
            warnings.push(LintWarning::MissingFlagName {
                path: here.clone(),
                index,
            });
        }
        if flag.description.as_deref().unwrap_or("").is_empty() {
            warnings.push(LintWarning::MissingFlagDescription {
                path: here.clone(),
                flag: flag.name.clone(),
            });
        }
    }
    for sub in &cmd.subcommands {
        lint_command(sub, false, path, warnings);
    }
    path.pop();
}
