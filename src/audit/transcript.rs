use chrono::Utc;
use crate::config::redact_credentials;
use crate::pipeline::stage::{Stage, STAGES};

/// The cumulative, user-facing log of one audit. Entries are append-only and
/// every entry is redacted against the configured secrets before it is stored.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<String>,
    secrets: Vec<String>,
}

impl Transcript {
    pub fn new(secrets: &[&str]) -> Self {
        Self {
            lines: Vec::new(),
            secrets: secrets.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn redact(&self, text: &str) -> String {
        let secrets: Vec<&str> = self.secrets.iter().map(String::as_str).collect();
        redact_credentials(text, &secrets)
    }

    pub fn stage(&mut self, stage: Stage) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let def = stage.definition();
        self.lines.push(format!("=== [{}/{}] {}: {} ===", stage.ordinal(), STAGES.len(), stage, def.display_name));
    }

    /// `[HH:MM:SS] message`
    pub fn event(&mut self, message: impl AsRef<str>) {
        let line = format!("[{}] {}", Utc::now().format("%H:%M:%S"), message.as_ref());
        self.lines.push(self.redact(&line));
    }

    /// Raw tool output, kept verbatim apart from redaction.
    pub fn output(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let redacted = self.redact(text);
        self.lines.extend(redacted.lines().map(str::to_string));
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
