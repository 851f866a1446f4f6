use std::{
    io::Write,
    process::{Command, Stdio},
};

use tracing::debug;

use crate::{
    error::{PlannerError, Result},
    types::{category_title, PackingList, TripSnapshot},
};

/// Platform share boundary: native share sheet with a clipboard fallback.
pub trait ShareTarget: std::fmt::Debug {
    /// Whether a native share mechanism is available
    fn can_share(&self) -> bool;

    fn share(&self, title: &str, text: &str) -> Result<()>;

    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// How a list left the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
}

pub fn share_title(trip: &TripSnapshot) -> String {
    format!("Popis za pakiranje: {}", trip.destination.trim())
}

/// Flat text rendering of a list, one section per group.
pub fn render_share_text(list: &PackingList, trip: &TripSnapshot) -> String {
    let mut lines = vec![
        share_title(trip),
        format!("Datumi: {} do {}", trip.start_date, trip.end_date),
        String::new(),
        format!("{}:", category_title("outfitSuggestions")),
    ];

    for outfit in &list.outfit_suggestions {
        lines.push(format!("- {}: {}", outfit.activity, outfit.rationale));
        lines.extend(outfit.items.iter().map(|item| format!("    * {item}")));
    }

    for (key, items) in list.item_groups() {
        lines.push(String::new());
        lines.push(format!("{}:", category_title(key)));
        lines.extend(items.iter().map(|item| format!("- {item}")));
    }

    lines.join("\n")
}

/// Writes the list to standard output as its "share sheet".
#[derive(Debug, Default)]
pub struct StdoutShare;

impl ShareTarget for StdoutShare {
    fn can_share(&self) -> bool {
        true
    }

    /// The rendered text already opens with the title line.
    fn share(&self, _title: &str, text: &str) -> Result<()> {
        write_text(&mut std::io::stdout().lock(), text)
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        write_text(&mut std::io::stdout().lock(), text)
    }
}

fn write_text(out: &mut impl Write, text: &str) -> Result<()> {
    writeln!(out, "{text}")?;
    Ok(())
}

/// Clipboard-only target that pipes into the first available system tool.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: Vec<Vec<String>>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        let commands: [&[&str]; 5] = [
            &["wl-copy"],
            &["xclip", "-selection", "clipboard"],
            &["xsel", "--clipboard", "--input"],
            &["pbcopy"],
            &["clip.exe"],
        ];
        Self {
            commands: commands
                .iter()
                .map(|cmd| cmd.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit command line instead of the probed defaults.
    pub fn with_command(program: impl Into<String>, args: &[&str]) -> Self {
        let mut command = vec![program.into()];
        command.extend(args.iter().map(|arg| arg.to_string()));
        Self {
            commands: vec![command],
        }
    }

    fn try_command(command: &[String], text: &str) -> std::io::Result<bool> {
        let Some((program, args)) = command.split_first() else {
            return Ok(false);
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        // reap the child even when the pipe broke
        let status = child.wait()?;
        written?;
        Ok(status.success())
    }
}

impl ShareTarget for SystemClipboard {
    fn can_share(&self) -> bool {
        false
    }

    fn share(&self, _title: &str, _text: &str) -> Result<()> {
        Err(PlannerError::Share(
            "native sharing is not available in a terminal".to_string(),
        ))
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        for command in &self.commands {
            match Self::try_command(command, text) {
                Ok(true) => return Ok(()),
                Ok(false) => debug!(target: "packing::share", command = ?command, "Clipboard command failed"),
                Err(err) => debug!(target: "packing::share", command = ?command, error = %err, "Clipboard command unavailable"),
            }
        }
        Err(PlannerError::Share(
            "no clipboard command succeeded".to_string(),
        ))
    }
}
