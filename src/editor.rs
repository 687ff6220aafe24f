//! External editor launcher.
//!
//! The editor comes from `$VISUAL`, then `$EDITOR`, then `vi`. Editors known
//! to accept a `+LINE` argument are opened at the line being read.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Editors that understand a leading `+LINE` argument.
const LINE_ARG_EDITORS: &[&str] = &[
    "vi", "vim", "nvim", "gvim", "nano", "emacs", "emacsclient", "micro", "kak", "hx", "helix",
    "joe", "mg", "ne",
];

/// Resolve the editor command line from the environment.
pub fn resolve_editor() -> String {
    resolve_editor_from(
        std::env::var("VISUAL").ok().as_deref(),
        std::env::var("EDITOR").ok().as_deref(),
    )
}

fn resolve_editor_from(visual: Option<&str>, editor: Option<&str>) -> String {
    visual
        .filter(|value| !value.trim().is_empty())
        .or_else(|| editor.filter(|value| !value.trim().is_empty()))
        .unwrap_or("vi")
        .trim()
        .to_string()
}

/// Build the process for `editor` opening `path` at `line`.
///
/// `editor` may carry its own arguments (`code --wait`). Line zero means
/// "top of file" and adds no line argument.
///
/// # Errors
/// Returns an error if `editor` is blank.
pub fn editor_command(editor: &str, path: &Path, line: usize) -> Result<Command> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("No editor configured");
    };
    let mut command = Command::new(program);
    command.args(parts);
    if line > 0 && supports_line_arg(program) {
        command.arg(format!("+{line}"));
    }
    command.arg(path);
    Ok(command)
}

fn supports_line_arg(program: &str) -> bool {
    let name = Path::new(program)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(program);
    LINE_ARG_EDITORS.contains(&name)
}

/// Run the user's editor on `path` and wait for it to exit.
///
/// The caller is responsible for handing the terminal over first.
///
/// # Errors
/// Returns an error if the editor cannot be started or exits unsuccessfully.
pub fn open(path: &Path, line: usize) -> Result<()> {
    let editor = resolve_editor();
    tracing::info!(%editor, path = %path.display(), line, "opening editor");
    let status = editor_command(&editor, path, line)?
        .status()
        .with_context(|| format!("Failed to run editor `{editor}`"))?;
    if !status.success() {
        bail!("Editor `{editor}` exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_visual_wins_over_editor() {
        assert_eq!(resolve_editor_from(Some("nvim"), Some("nano")), "nvim");
    }

    #[test]
    fn test_blank_visual_falls_back_to_editor() {
        assert_eq!(resolve_editor_from(Some("  "), Some("nano")), "nano");
    }

    #[test]
    fn test_defaults_to_vi() {
        assert_eq!(resolve_editor_from(None, None), "vi");
        assert_eq!(resolve_editor_from(None, Some("")), "vi");
    }

    #[test]
    fn test_line_argument_for_vi_family() {
        let command = editor_command("vim", Path::new("/tmp/doc.md"), 42).unwrap();
        assert_eq!(command.get_program(), "vim");
        assert_eq!(args(&command), vec!["+42", "/tmp/doc.md"]);
    }

    #[test]
    fn test_line_zero_opens_at_top() {
        let command = editor_command("vim", Path::new("/tmp/doc.md"), 0).unwrap();
        assert_eq!(args(&command), vec!["/tmp/doc.md"]);
    }

    #[test]
    fn test_editor_with_arguments_and_full_path() {
        let command = editor_command("/usr/bin/nvim -u NONE", Path::new("doc.md"), 3).unwrap();
        assert_eq!(command.get_program(), "/usr/bin/nvim");
        assert_eq!(args(&command), vec!["-u", "NONE", "+3", "doc.md"]);
    }

    #[test]
    fn test_unknown_editor_gets_no_line_argument() {
        let command = editor_command("code --wait", Path::new("doc.md"), 10).unwrap();
        assert_eq!(args(&command), vec!["--wait", "doc.md"]);
    }

    #[test]
    fn test_blank_editor_is_an_error() {
        assert!(editor_command("   ", Path::new("doc.md"), 1).is_err());
    }
}
