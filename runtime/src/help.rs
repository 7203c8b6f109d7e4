//! Help text rendering for command trees.
//!
//! A two-pass column renderer: the first pass computes the widest label of
//! a section, the second formats each row against that fixed width. Output
//! is deterministic; sub-command groups appear in first-appearance
//! declaration order.

use argtree_core::{Command, FlagSpec};

const HELP_TOKENS: [&str; 3] = ["-h", "--help", "help"];

/// Whether a token requests help (`-h`, `--help`, or the literal `help`).
///
/// A help trigger only takes effect when it is the single remaining token
/// at a command level; see [`resolve`](crate::resolve).
pub fn is_help_token(token: &str) -> bool {
    HELP_TOKENS.contains(&token)
}

/// Builds the one-line usage synopsis for a command.
///
/// # Examples
///
/// ```
/// use argtree_core::{ArgSpec, Command, FlagSpec};
/// use argtree_runtime::usage_line;
///
/// let cmd = Command::new("copy")
///     .with_flag(FlagSpec::boolean(Some("f"), "force"))
///     .with_arg(ArgSpec::required("source"))
///     .with_arg(ArgSpec::optional("dest"));
///
/// assert_eq!(usage_line(&cmd), "copy [flags] <source> <dest>");
/// ```
pub fn usage_line(cmd: &Command) -> String {
    let mut tokens = Vec::new();
    if !cmd.name.is_empty() {
        tokens.push(cmd.name.clone());
    }
    if cmd.has_flags() {
        tokens.push("[flags]".to_string());
    }
    if cmd.has_subcommands() {
        tokens.push("<command>".to_string());
    }
    for arg in &cmd.args {
        tokens.push(format!("<{}>", arg.name));
    }
    tokens.join(" ")
}

/// Renders the full help text for a command.
///
/// Sections in order: the long description (when set), the usage line, the
/// sub-command listing (ungrouped commands first under `Commands:`, then
/// each named group in first-appearance order), declared arguments, and
/// declared flags. Sections without content are omitted entirely.
pub fn render_help(cmd: &Command) -> String {
    let mut out = String::new();

    if let Some(long) = cmd.long.as_deref().filter(|l| !l.is_empty()) {
        out.push_str(&format!("{long}\n\n"));
    }

    out.push_str(&format!("Usage:\n  {}\n", usage_line(cmd)));

    if cmd.has_subcommands() {
        render_subcommands(cmd, &mut out);
    }

    if cmd.has_args() {
        let longest = cmd.args.iter().map(|a| a.name.len()).max().unwrap_or(0);
        let width = longest.max(3) + 6;
        out.push_str("\nArguments:\n");
        for arg in &cmd.args {
            let label = format!("<{}>:", arg.name);
            match arg.description.as_deref().filter(|d| !d.is_empty()) {
                Some(desc) => {
                    out.push_str(&format!("  {label:<width$}{desc}\n", width = width));
                }
                None => out.push_str(&format!("  {label}\n")),
            }
        }
    }

    if cmd.has_flags() {
        let longest = cmd
            .flags
            .iter()
            .map(|f| flag_label(f).len())
            .max()
            .unwrap_or(0);
        let width = longest.max(3) + 4;
        out.push_str("\nFlags:\n");
        for flag in &cmd.flags {
            let label = flag_label(flag);
            match flag.description.as_deref().filter(|d| !d.is_empty()) {
                Some(desc) => {
                    out.push_str(&format!("  {label:<width$}{desc}\n", width = width));
                }
                None => out.push_str(&format!("  {label}\n")),
            }
        }
    }

    out
}

fn render_subcommands(cmd: &Command, out: &mut String) {
    let longest = cmd
        .subcommands
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);
    let width = longest.max(3) + 4;

    // Group sub-commands by label, keeping first-appearance order; the
    // ungrouped section is always listed first.
    let mut sections: Vec<(&str, Vec<&Command>)> = Vec::new();
    for sub in &cmd.subcommands {
        let label = sub.group.as_deref().unwrap_or("");
        match sections.iter_mut().find(|(l, _)| *l == label) {
            Some((_, subs)) => subs.push(sub),
            None => sections.push((label, vec![sub])),
        }
    }
    sections.sort_by_key(|(label, _)| !label.is_empty());

    for (label, subs) in sections {
        if label.is_empty() {
            out.push_str("\nCommands:\n");
        } else {
            out.push_str(&format!("\n{label}:\n"));
        }
        for sub in subs {
            match sub.short.as_deref().filter(|s| !s.is_empty()) {
                Some(short) => {
                    out.push_str(&format!("  {:<width$}{short}\n", sub.name, width = width));
                }
                None => out.push_str(&format!("  {}\n", sub.name)),
            }
        }
    }
}

fn flag_label(flag: &FlagSpec) -> String {
    match flag.short.as_deref() {
        Some(short) => format!("-{short}, --{}", flag.name),
        None => format!("    --{}", flag.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argtree_core::ArgSpec;

    #[test]
    fn test_is_help_token() {
        assert!(is_help_token("-h"));
        assert!(is_help_token("--help"));
        assert!(is_help_token("help"));
        assert!(!is_help_token("-help"));
        assert!(!is_help_token("helper"));
    }

    #[test]
    fn test_usage_line_bare_command() {
        assert_eq!(usage_line(&Command::new("tool")), "tool");
    }

    #[test]
    fn test_usage_line_subcommands_and_flags() {
        let cmd = Command::new("tool")
            .with_flag(FlagSpec::boolean(Some("d"), "debug"))
            .with_subcommand(Command::new("sync"));

        assert_eq!(usage_line(&cmd), "tool [flags] <command>");
    }

    #[test]
    fn test_usage_line_nameless_root() {
        let cmd = Command::default().with_subcommand(Command::new("sync"));
        assert_eq!(usage_line(&cmd), "<command>");
    }

    #[test]
    fn test_render_usage_section() {
        let help = render_help(&Command::new("cmd"));
        assert!(help.contains("Usage:\n  cmd"));
    }

    #[test]
    fn test_render_long_description_first() {
        let cmd = Command::new("cmd").with_long("Does many things.");
        let help = render_help(&cmd);

        assert!(help.starts_with("Does many things.\n\nUsage:"));
    }

    #[test]
    fn test_render_subcommand_listing() {
        let cmd = Command::new("cmd").with_subcommand(
            Command::new("sub-cmd").with_short("description text"),
        );
        let help = render_help(&cmd);

        assert!(help.contains("Commands:\n"));
        assert!(help.contains("sub-cmd"));
        assert!(help.contains("description text"));
    }

    #[test]
    fn test_render_group_header() {
        let cmd = Command::new("cmd").with_subcommand(
            Command::new("sub-cmd").with_group("group-name"),
        );
        let help = render_help(&cmd);

        assert!(help.contains("group-name:\n"));
    }

    #[test]
    fn test_render_ungrouped_before_groups() {
        let cmd = Command::new("cmd")
            .with_subcommand(Command::new("grouped").with_group("extras"))
            .with_subcommand(Command::new("plain"));
        let help = render_help(&cmd);

        let commands_at = help.find("Commands:").unwrap();
        let group_at = help.find("extras:").unwrap();
        assert!(commands_at < group_at);
    }

    #[test]
    fn test_render_groups_in_first_appearance_order() {
        let cmd = Command::new("cmd")
            .with_subcommand(Command::new("b1").with_group("beta"))
            .with_subcommand(Command::new("a1").with_group("alpha"))
            .with_subcommand(Command::new("b2").with_group("beta"));
        let help = render_help(&cmd);

        let beta_at = help.find("beta:").unwrap();
        let alpha_at = help.find("alpha:").unwrap();
        assert!(beta_at < alpha_at);
        // Both beta members sit under the one header.
        assert_eq!(help.matches("beta:").count(), 1);
    }

    #[test]
    fn test_render_subcommand_alignment() {
        let cmd = Command::new("cmd")
            .with_subcommand(Command::new("ls").with_short("List"))
            .with_subcommand(Command::new("status").with_short("Show status"));
        let help = render_help(&cmd);

        // Longest name is 6 wide, padded by 4.
        assert!(help.contains("  ls        List\n"));
        assert!(help.contains("  status    Show status\n"));
    }

    #[test]
    fn test_render_arguments_section() {
        let cmd = Command::new("cmd")
            .with_arg(ArgSpec::required("arg1").with_description("desc1"));
        let help = render_help(&cmd);

        assert!(help.contains("Arguments:\n"));
        assert!(help.contains("<arg1>:"));
        assert!(help.contains("desc1"));
    }

    #[test]
    fn test_render_flags_section() {
        let cmd = Command::new("cmd")
            .with_flag(FlagSpec::boolean(Some("f"), "flag1").with_description("desc1"))
            .with_flag(FlagSpec::boolean(None, "long-only").with_description("desc2"));
        let help = render_help(&cmd);

        assert!(help.contains("Flags:\n"));
        assert!(help.contains("-f, --flag1"));
        assert!(help.contains("    --long-only"));
        assert!(help.contains("desc1"));
    }

    #[test]
    fn test_sections_omitted_without_content() {
        let help = render_help(&Command::new("cmd"));

        assert!(!help.contains("Commands:"));
        assert!(!help.contains("Arguments:"));
        assert!(!help.contains("Flags:"));
    }
}
