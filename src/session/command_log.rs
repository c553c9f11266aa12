//! Bounded log of finished executions.
//!
//! Kept for structured logging and the status line. It is not a navigable
//! history: nothing here is ever fed back into the command line.

use std::collections::VecDeque;
use std::time::Duration;

use crate::shell::{ExecutionId, Outcome};

/// Maximum number of executions remembered.
const MAX_RECORDS: usize = 200;

/// One finished execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRecord {
    pub id: ExecutionId,
    pub command_line: String,
    /// `succeeded`, `failed` or `cancelled`.
    pub outcome: &'static str,
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct CommandLog {
    entries: VecDeque<CommandRecord>,
    max_len: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new(MAX_RECORDS)
    }
}

impl CommandLog {
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_len.min(MAX_RECORDS)),
            max_len,
        }
    }

    /// Records a finished execution, dropping the oldest entry when full.
    pub fn record(
        &mut self,
        id: ExecutionId,
        command_line: &str,
        outcome: &Outcome,
        elapsed: Duration,
    ) {
        if self.max_len == 0 {
            return;
        }
        while self.entries.len() >= self.max_len {
            self.entries.pop_front();
        }
        self.entries.push_back(CommandRecord {
            id,
            command_line: command_line.to_string(),
            outcome: outcome.kind(),
            exit_code: outcome.exit_code(),
            elapsed,
        });
    }

    pub fn last(&self) -> Option<&CommandRecord> {
        self.entries.back()
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&CommandRecord> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.range(start..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> Outcome {
        Outcome::Succeeded {
            output: String::new(),
            directory: None,
        }
    }

    #[test]
    fn test_record_keeps_kind_and_exit_code() {
        let mut log = CommandLog::new(10);
        log.record(1, "ls", &ok(), Duration::from_millis(5));
        log.record(
            2,
            "false",
            &Outcome::Failed {
                exit_code: Some(1),
                error_text: String::new(),
            },
            Duration::ZERO,
        );
        log.record(3, "sleep 9", &Outcome::Cancelled, Duration::ZERO);

        let recent = log.recent(3);
        assert_eq!(recent[0].outcome, "succeeded");
        assert_eq!(recent[0].exit_code, Some(0));
        assert_eq!(recent[1].exit_code, Some(1));
        assert_eq!(recent[2].outcome, "cancelled");
        assert_eq!(log.last().map(|r| r.id), Some(3));
    }

    #[test]
    fn test_bounded_log() {
        let mut log = CommandLog::new(3);
        for id in 1..=4 {
            log.record(id, &format!("cmd{id}"), &ok(), Duration::ZERO);
        }
        assert_eq!(log.len(), 3);
        let recent = log.recent(10);
        assert_eq!(recent[0].command_line, "cmd2");
        assert_eq!(recent[2].command_line, "cmd4");
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut log = CommandLog::new(0);
        log.record(1, "ls", &ok(), Duration::ZERO);
        assert!(log.is_empty());
    }
}
