//! Terminal result of one execution and the parsing that produces it.

/// Identifies one execution within a session. Monotonically increasing.
pub type ExecutionId = u64;

/// How an execution ended. Produced exactly once per execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exit status zero.
    ///
    /// `output` is everything the command printed before the trailing `pwd`
    /// line (possibly empty). `directory` is `None` when the output did not
    /// contain a recoverable directory.
    Succeeded {
        output: String,
        directory: Option<String>,
    },
    /// Non-zero exit, killed by a signal, or the shell never ran.
    Failed {
        exit_code: Option<i32>,
        error_text: String,
    },
    Cancelled,
}

impl Outcome {
    /// Builds the outcome for a shell that exited on its own.
    ///
    /// `exit_code` is `None` when the process was terminated by a signal.
    pub fn from_exit(exit_code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Self {
        if exit_code == Some(0) {
            let stdout = String::from_utf8_lossy(stdout);
            let (output, directory) = split_output(&stdout);
            Outcome::Succeeded { output, directory }
        } else {
            let stderr = String::from_utf8_lossy(stderr);
            Outcome::Failed {
                exit_code,
                error_text: strip_trailing_newline(&stderr).to_string(),
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Succeeded { .. } => "succeeded",
            Outcome::Failed { .. } => "failed",
            Outcome::Cancelled => "cancelled",
        }
    }

    /// Exit code to record in the command log.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Succeeded { .. } => Some(0),
            Outcome::Failed { exit_code, .. } => *exit_code,
            Outcome::Cancelled => None,
        }
    }
}

/// Drops exactly one trailing newline (`\n` or `\r\n`), if present.
pub fn strip_trailing_newline(s: &str) -> &str {
    match s.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => s,
    }
}

/// Splits successful stdout into the command's own output and the directory
/// printed by the trailing `pwd`.
///
/// Stdout with no newline at all means `pwd` never ran; that is treated as
/// empty output with the directory left unchanged.
pub fn split_output(stdout: &str) -> (String, Option<String>) {
    if !stdout.contains('\n') {
        return (String::new(), None);
    }
    let body = strip_trailing_newline(stdout);
    let (output, directory) = match body.rfind('\n') {
        Some(idx) => (&body[..idx], &body[idx + 1..]),
        None => ("", body),
    };
    let output = output.strip_suffix('\r').unwrap_or(output);
    let directory = (!directory.is_empty()).then(|| directory.to_string());
    (output.to_string(), directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_output_with_command_output() {
        let (output, dir) = split_output("hi\n/tmp\n");
        assert_eq!(output, "hi");
        assert_eq!(dir.as_deref(), Some("/tmp"));
    }

    #[test]
    fn test_split_output_multiline() {
        let (output, dir) = split_output("a\nb\n\nc\n/home/user\n");
        assert_eq!(output, "a\nb\n\nc");
        assert_eq!(dir.as_deref(), Some("/home/user"));
    }

    #[test]
    fn test_split_output_keeps_blank_lines_in_output() {
        let (output, dir) = split_output("hi\n\n/tmp\n");
        assert_eq!(output, "hi\n");
        assert_eq!(dir.as_deref(), Some("/tmp"));
    }

    #[test]
    fn test_split_output_pwd_only() {
        let (output, dir) = split_output("/\n");
        assert_eq!(output, "");
        assert_eq!(dir.as_deref(), Some("/"));
    }

    #[test]
    fn test_split_output_without_newline_is_degenerate() {
        assert_eq!(split_output(""), (String::new(), None));
        assert_eq!(split_output("/tmp"), (String::new(), None));
    }

    #[test]
    fn test_split_output_crlf() {
        let (output, dir) = split_output("hi\r\n/tmp\r\n");
        assert_eq!(output, "hi");
        assert_eq!(dir.as_deref(), Some("/tmp"));
    }

    #[test]
    fn test_strip_only_one_newline() {
        assert_eq!(strip_trailing_newline("oops\n\n"), "oops\n");
        assert_eq!(strip_trailing_newline("oops"), "oops");
        assert_eq!(strip_trailing_newline(""), "");
    }

    #[test]
    fn test_from_exit_failure_uses_stderr() {
        let outcome = Outcome::from_exit(Some(2), b"ignored\n/tmp\n", b"ls: nope\n");
        assert_eq!(
            outcome,
            Outcome::Failed {
                exit_code: Some(2),
                error_text: "ls: nope".to_string()
            }
        );
    }

    #[test]
    fn test_from_exit_signal_is_failure() {
        let outcome = Outcome::from_exit(None, b"", b"");
        assert_eq!(outcome.kind(), "failed");
        assert_eq!(outcome.exit_code(), None);
    }
}
