use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: String) -> Self {
        Self {
            speaker,
            text,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: String) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: String) -> Self {
        Self::new(Speaker::Assistant, text)
    }
}

/// Append-only record of one chat session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends the user's prompt followed by the reply shown for it.
    pub fn record_exchange(&mut self, prompt: String, reply: String) -> (TranscriptEntry, TranscriptEntry) {
        let user = TranscriptEntry::user(prompt);
        let assistant = TranscriptEntry::assistant(reply);
        self.entries.push(user.clone());
        self.entries.push(assistant.clone());
        (user, assistant)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub transcript: Transcript,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record_exchange(&mut self, prompt: String, reply: String) -> (TranscriptEntry, TranscriptEntry) {
        let exchange = self.transcript.record_exchange(prompt, reply);
        self.updated_at = Utc::now();
        exchange
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.transcript.is_empty());
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn test_record_exchange_appends_user_then_assistant() {
        let mut session = Session::new();
        session.record_exchange("Olá".to_string(), "Oi!".to_string());
        session.record_exchange("Tudo bem?".to_string(), "missing credential".to_string());

        let entries = session.transcript.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!((entries[0].speaker, entries[0].text.as_str()), (Speaker::User, "Olá"));
        assert_eq!((entries[1].speaker, entries[1].text.as_str()), (Speaker::Assistant, "Oi!"));
        assert_eq!(entries[2].speaker, Speaker::User);
        assert_eq!(entries[3].text, "missing credential");
        assert!(session.updated_at >= session.created_at);
    }
}
