//! Conversation history persistence
//!
//! History is an append-only sequence of (speech, response, persona) turns
//! stored under the profile's `conversation_history.yaml`. Logging a session
//! moves the current conversation into `logs.yaml` under a timestamp.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profiles::{write_yaml, HISTORY_FILE, LOGS_FILE};
use crate::Result;

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Turn {
    /// What the user said
    pub speech: String,

    /// What the assistant answered
    pub response: String,

    /// Persona name active for this turn
    pub persona: String,
}

/// On-disk schema of `conversation_history.yaml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryFile {
    /// Ordered turns, oldest first
    #[serde(default)]
    pub conversation: Vec<Turn>,
}

/// On-disk schema of `logs.yaml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogsFile {
    /// Archived conversations
    #[serde(default)]
    pub log_sessions: Vec<LogSession>,
}

/// One archived conversation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSession {
    /// When the session was logged
    pub logged_at: chrono::DateTime<chrono::Utc>,

    /// The archived turns
    pub conversation: Vec<Turn>,
}

/// Conversation history for one profile directory
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// History store over an existing profile directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Append one turn
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read or written.
    pub fn append(&self, speech: &str, response: &str, persona: &str) -> Result<()> {
        let mut file = self.load_file()?;
        file.conversation.push(Turn {
            speech: speech.to_string(),
            response: response.to_string(),
            persona: persona.to_string(),
        });
        write_yaml(&self.dir.join(HISTORY_FILE), &file)
    }

    /// All turns, oldest first. Empty if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(&self) -> Result<Vec<Turn>> {
        Ok(self.load_file()?.conversation)
    }

    /// The most recent `n` turns, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read.
    pub fn recent(&self, n: usize) -> Result<Vec<Turn>> {
        let turns = self.load()?;
        let skip = turns.len().saturating_sub(n);
        Ok(turns.into_iter().skip(skip).collect())
    }

    /// Clear the conversation
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be written.
    pub fn clear(&self) -> Result<()> {
        write_yaml(&self.dir.join(HISTORY_FILE), &HistoryFile::default())
    }

    /// Archive the current conversation into `logs.yaml` and clear it.
    /// An empty conversation logs nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or written.
    pub fn log_session(&self) -> Result<()> {
        let file = self.load_file()?;
        if file.conversation.is_empty() {
            return Ok(());
        }

        let mut logs = self.load_logs()?;
        logs.log_sessions.push(LogSession {
            logged_at: chrono::Utc::now(),
            conversation: file.conversation,
        });
        write_yaml(&self.dir.join(LOGS_FILE), &logs)?;
        self.clear()
    }

    /// Render the conversation as a speakable transcript
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read.
    pub fn render(&self) -> Result<String> {
        let turns = self.load()?;
        if turns.is_empty() {
            return Ok("There is no conversation history.".to_string());
        }
        let mut out = String::from("Here is the conversation history. ");
        for turn in turns {
            out.push_str(&format!(
                "You said: {}. {} said: {}. ",
                turn.speech, turn.persona, turn.response
            ));
        }
        Ok(out.trim_end().to_string())
    }

    fn load_file(&self) -> Result<HistoryFile> {
        load_or_default(&self.dir.join(HISTORY_FILE))
    }

    fn load_logs(&self) -> Result<LogsFile> {
        load_or_default(&self.dir.join(LOGS_FILE))
    }
}

fn load_or_default<T: Default + for<'de> Deserialize<'de>>(path: &std::path::Path) -> Result<T> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_yaml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}
