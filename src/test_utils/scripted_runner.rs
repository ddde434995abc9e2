use std::cell::RefCell;
use std::ffi::OsString;
use std::path::Path;
use std::rc::Rc;

use crate::git::{errors::ProcessError, ProcessOutput, ProcessRunner};

struct Rule {
    prefix: Vec<String>,
    output: ProcessOutput,
}

/// A [`ProcessRunner`] that answers from canned outputs and records every
/// invocation, for asserting how often the engine was asked.
///
/// Rules match on the leading words of a command after any `-c key=value`
/// pairs; the longest matching prefix wins. Unscripted commands exit 129.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: CallLog,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `stdout` and exit code 0
    pub fn ok(self, prefix: &[&str], stdout: &str) -> Self {
        self.rule(
            prefix,
            ProcessOutput {
                stdout: stdout.as_bytes().to_vec(),
                stderr: Vec::new(),
                code: Some(0),
            },
        )
    }

    /// Answer commands starting with `prefix` with `stderr` and `code`
    pub fn fail(self, prefix: &[&str], code: i32, stderr: &str) -> Self {
        self.rule(
            prefix,
            ProcessOutput {
                stdout: Vec::new(),
                stderr: stderr.as_bytes().to_vec(),
                code: Some(code),
            },
        )
    }

    fn rule(mut self, prefix: &[&str], output: ProcessOutput) -> Self {
        self.rules.push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            output,
        });
        self
    }

    /// Shared handle on the invocation log; stays valid after the runner is
    /// moved into a repository
    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, args: &[OsString], _cwd: &Path) -> Result<ProcessOutput, ProcessError> {
        let words = command_words(args);
        self.calls.0.borrow_mut().push(words.clone());

        let best = self
            .rules
            .iter()
            .filter(|rule| words.starts_with(&rule.prefix))
            .max_by_key(|rule| rule.prefix.len());
        Ok(match best {
            Some(rule) => rule.output.clone(),
            None => ProcessOutput {
                stdout: Vec::new(),
                stderr: format!("unscripted command: git {}", words.join(" ")).into_bytes(),
                code: Some(129),
            },
        })
    }
}

/// Invocations seen by a [`ScriptedRunner`], `-c` pairs stripped
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Vec<String>>>>);

impl CallLog {
    /// How many invocations started with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|words| {
                words.len() >= prefix.len() && words.iter().zip(prefix).all(|(w, p)| w == p)
            })
            .count()
    }

    pub fn all(&self) -> Vec<Vec<String>> {
        self.0.borrow().clone()
    }
}

fn command_words(args: &[OsString]) -> Vec<String> {
    let mut words: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    while words.len() >= 2 && words[0] == "-c" {
        words.drain(..2);
    }
    words
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::Path;

    use super::*;

    fn argv(words: &[&str]) -> Vec<OsString> {
        words.iter().map(OsString::from).collect()
    }

    #[test]
    fn longest_prefix_wins_and_calls_are_logged() {
        let runner = ScriptedRunner::new()
            .ok(&["config"], "generic\n")
            .fail(&["config", "--get", "user.name"], 1, "");
        let calls = runner.calls();

        let name = runner
            .run(&argv(&["config", "--get", "user.name"]), Path::new("."))
            .unwrap();
        let other = runner
            .run(&argv(&["-c", "core.quotepath=false", "config", "--list"]), Path::new("."))
            .unwrap();
        let unknown = runner.run(&argv(&["gc"]), Path::new(".")).unwrap();

        assert_eq!(name.code, Some(1));
        assert_eq!(other.stdout, b"generic\n");
        assert_eq!(unknown.code, Some(129));
        assert_eq!(calls.count(&["config"]), 2);
        assert_eq!(calls.all()[1], vec!["config".to_string(), "--list".to_string()]);
    }
}
