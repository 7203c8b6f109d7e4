//! Documentation rendering for `argtree` command trees.
//!
//! Renders a declared [`Command`] tree as Markdown reference pages, or as
//! JSON/YAML for tooling that consumes the tree structurally. The runner
//! and parser functions are never part of the output; everything else on
//! the tree is.
//!
//! # Example
//!
//! ```
//! use argtree_core::Command;
//! use argtree_docgen::{OutputFormat, render};
//!
//! let root = Command::new("tool")
//!     .with_short("A small demonstration tool.")
//!     .with_subcommand(Command::new("sync").with_short("Synchronize state."));
//!
//! let page = render(&root, OutputFormat::Markdown)?;
//! assert!(page.starts_with("# tool"));
//! assert!(page.contains("## sync"));
//! # Ok::<(), argtree_docgen::DocError>(())
//! ```

use std::path::{Path, PathBuf};

use argtree_core::Command;
use argtree_runtime::usage_line;
use thiserror::Error;

/// Output format for rendered documentation.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
}

/// Error raised while rendering or writing documentation.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write documentation: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the command tree in the requested output format.
pub fn render(cmd: &Command, format: OutputFormat) -> Result<String, DocError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(cmd)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(cmd)?),
        OutputFormat::Markdown => Ok(render_markdown(cmd)),
    }
}

/// Renders the command tree as one Markdown document.
///
/// Each command becomes a section, nested one heading level below its
/// parent: the root at `#`, its sub-commands at `##`, and so on. Runnable
/// commands include their usage line in a fenced block; declared flags and
/// arguments render as tables.
pub fn render_markdown(cmd: &Command) -> String {
    let mut out = String::new();
    command_to_markdown(cmd, 1, &mut out);
    out
}

/// Writes the Markdown document for `cmd` into `dir` as `<name>.md`.
///
/// The directory is created when missing. Returns the path of the written
/// file.
pub fn write_markdown(cmd: &Command, dir: &Path) -> Result<PathBuf, DocError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.md", display_name(cmd)));
    std::fs::write(&path, render_markdown(cmd))?;
    Ok(path)
}

fn command_to_markdown(cmd: &Command, depth: usize, out: &mut String) {
    let heading = "#".repeat(depth.min(6));
    out.push_str(&format!("{heading} {}\n\n", display_name(cmd)));

    if let Some(short) = cmd.short.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("{short}\n\n"));
    }

    if let Some(version) = cmd.version.as_deref().filter(|v| !v.is_empty()) {
        out.push_str(&format!("**Version:** {version}\n\n"));
    }

    if let Some(long) = cmd.long.as_deref().filter(|l| !l.is_empty()) {
        let sub_heading = "#".repeat((depth + 1).min(6));
        out.push_str(&format!("{sub_heading} Synopsis\n\n{long}\n\n"));
    }

    if cmd.is_runnable() {
        out.push_str(&format!("```bash\n{}\n```\n\n", usage_line(cmd)));
    }

    if cmd.has_flags() {
        out.push_str("| Flag | Description |\n");
        out.push_str("|------|-------------|\n");
        for flag in &cmd.flags {
            let label = match flag.short.as_deref() {
                Some(short) => format!("-{short}, --{}", flag.name),
                None => format!("--{}", flag.name),
            };
            let desc = flag.description.as_deref().unwrap_or("");
            out.push_str(&format!("| `{label}` | {desc} |\n"));
        }
        out.push('\n');
    }

    if cmd.has_args() {
        out.push_str("| Argument | Required | Description |\n");
        out.push_str("|----------|----------|-------------|\n");
        for arg in &cmd.args {
            let display = if arg.variadic {
                format!("{}...", arg.name)
            } else {
                arg.name.clone()
            };
            let required = if arg.required { "yes" } else { "no" };
            let desc = arg.description.as_deref().unwrap_or("");
            out.push_str(&format!("| `{display}` | {required} | {desc} |\n"));
        }
        out.push('\n');
    }

    for sub in &cmd.subcommands {
        command_to_markdown(sub, depth + 1, out);
    }
}

fn display_name(cmd: &Command) -> &str {
    if cmd.name.is_empty() {
        "command"
    } else {
        &cmd.name
    }
}
