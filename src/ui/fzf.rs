//! fzf selector implementation

use crate::types::MenuItem;
use std::io::Write;
use std::process::{Command, Stdio};

pub struct FzfSelector;

impl FzfSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick one item. `header` is pinned above the list (page info, filters).
    pub fn select<T: Clone>(
        &self,
        items: &[MenuItem<T>],
        prompt: &str,
        header: Option<&str>,
    ) -> Option<T> {
        if items.is_empty() {
            return None;
        }

        // Index-prefixed lines so labels may repeat
        let input: String = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}\t{}", i, item.label))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt_arg = format!("{} > ", prompt);
        let mut args = vec![
            "--prompt", prompt_arg.as_str(),
            "--height", "60%",
            "--reverse",
            "--ansi",
            "--no-sort",
            "--delimiter", "\t",
            "--with-nth", "2",
        ];
        if let Some(header) = header {
            args.extend(["--header", header]);
        }

        let mut child = Command::new("fzf")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .ok()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).ok()?;
        }

        let output = child.wait_with_output().ok()?;

        // Non-zero exit: Esc / Ctrl-C
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let index: usize = stdout.trim().split('\t').next()?.parse().ok()?;

        items.get(index).map(|item| item.value.clone())
    }

    pub fn is_available(&self) -> bool {
        Command::new("which")
            .arg("fzf")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
