//! Terminal implementation of the editor host
//!
//! Answers given on the command line are used as-is; anything missing is
//! asked for on the input stream. End of input dismisses the prompt.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;

use code_anchor_core::{AnchorIcon, Host, NoticeLevel, Selection};
use colored::Colorize;

/// Answers supplied up front by command-line flags
#[derive(Debug, Clone, Default)]
pub struct Presets {
    pub label: Option<String>,
    pub icon: Option<AnchorIcon>,
    pub note: Option<String>,
    pub assume_yes: bool,
}

pub struct TerminalHost<R, W> {
    input: R,
    output: W,
    selection: Option<Selection>,
    presets: Presets,
    editor: Option<String>,
}

impl TerminalHost<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            selection: None,
            presets: Presets::default(),
            editor: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_presets(mut self, presets: Presets) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_editor(mut self, editor: Option<String>) -> Self {
        self.editor = editor;
        self
    }

    /// Print `question` and read one line; `None` on end of input
    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{} ", question.bright_white());
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Host for TerminalHost<R, W> {
    fn active_selection(&self) -> Option<Selection> {
        self.selection.clone()
    }

    fn pick_icon(&mut self, current: AnchorIcon) -> Option<AnchorIcon> {
        if let Some(icon) = self.presets.icon {
            return Some(icon);
        }

        let choices = AnchorIcon::ALL
            .iter()
            .enumerate()
            .map(|(i, icon)| format!("{}) {} {}", i + 1, icon.glyph(), icon))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(self.output, "{choices}");

        loop {
            let answer = self.ask(&format!("Icon [{current}]:"))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Some(current);
            }
            if let Ok(n) = answer.parse::<usize>() {
                if let Some(icon) = n.checked_sub(1).and_then(|i| AnchorIcon::ALL.get(i)) {
                    return Some(*icon);
                }
            }
            match answer.parse::<AnchorIcon>() {
                Ok(icon) => return Some(icon),
                Err(e) => {
                    let _ = writeln!(self.output, "  {} {}", "✗".red(), e);
                }
            }
        }
    }

    fn prompt_note(&mut self, current: &str) -> Option<String> {
        if let Some(note) = &self.presets.note {
            return Some(note.clone());
        }
        let answer = self.ask(&format!("Note [{current}]:"))?;
        if answer.trim().is_empty() {
            Some(current.to_string())
        } else {
            Some(answer.trim().to_string())
        }
    }

    fn prompt_label(&mut self, current: &str) -> Option<String> {
        if let Some(label) = &self.presets.label {
            return Some(label.clone());
        }
        let answer = self.ask(&format!("Label [{current}]:"))?;
        if answer.trim().is_empty() {
            Some(current.to_string())
        } else {
            Some(answer)
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.presets.assume_yes {
            return true;
        }
        matches!(
            self.ask(&format!("{message} [y/N]")).as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        )
    }

    fn open_at(&mut self, path: &Path, line: u32) -> Result<(), String> {
        if !path.is_file() {
            return Err("It may have been moved or deleted".to_string());
        }

        match &self.editor {
            Some(editor) => {
                let status = Command::new(editor)
                    .arg(format!("+{}", line + 1))
                    .arg(path)
                    .status()
                    .map_err(|e| format!("failed to run {editor}: {e}"))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(format!("{editor} exited with {status}"))
                }
            }
            None => {
                println!("{}:{}:1", path.display(), line + 1);
                Ok(())
            }
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let marker = match level {
            NoticeLevel::Info => "✓".green(),
            NoticeLevel::Warning => "⚠️".yellow(),
            NoticeLevel::Error => "✗".red(),
        };
        let _ = writeln!(self.output, "{marker} {message}");
    }
}
