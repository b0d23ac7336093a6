//! Messaging and identity collaborators.
//!
//! Delivery is best-effort: callers log failures and carry on.

use crate::core::error::CollabError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Sends text to players.
pub trait Messenger: Send + Sync {
    /// Sends a message to one player.
    fn tell(&self, player_id: &str, text: &str) -> Result<(), CollabError>;

    /// Broadcasts a message to everyone.
    fn announce(&self, text: &str) -> Result<(), CollabError>;
}

/// Resolves player ids to display names.
pub trait Directory: Send + Sync {
    fn display_name(&self, player_id: &str) -> Option<String>;
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMessenger;

impl Messenger for NullMessenger {
    fn tell(&self, _player_id: &str, _text: &str) -> Result<(), CollabError> {
        Ok(())
    }

    fn announce(&self, _text: &str) -> Result<(), CollabError> {
        Ok(())
    }
}

/// A message captured by [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Tell { player_id: String, text: String },
    Announce(String),
}

/// Keeps every message in memory, for tests and the simulator.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the captured messages.
    pub fn take(&self) -> Vec<Sent> {
        match self.sent.lock() {
            Ok(mut sent) => std::mem::take(&mut *sent),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn announcements(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter_map(|m| match m {
                Sent::Announce(text) => Some(text),
                Sent::Tell { .. } => None,
            })
            .collect()
    }

    pub fn told(&self, player_id: &str) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter_map(|m| match m {
                Sent::Tell { player_id: p, text } if p == player_id => Some(text),
                _ => None,
            })
            .collect()
    }

    fn snapshot(&self) -> Vec<Sent> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, message: Sent) -> Result<(), CollabError> {
        self.sent
            .lock()
            .map_err(|_| CollabError::BroadcastFailed("message log poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}

impl Messenger for RecordingMessenger {
    fn tell(&self, player_id: &str, text: &str) -> Result<(), CollabError> {
        self.push(Sent::Tell {
            player_id: player_id.to_string(),
            text: text.to_string(),
        })
    }

    fn announce(&self, text: &str) -> Result<(), CollabError> {
        self.push(Sent::Announce(text.to_string()))
    }
}

/// Fixed id -> name table.
#[derive(Debug, Default, Clone)]
pub struct StaticDirectory {
    names: HashMap<String, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, player_id: &str, name: &str) -> Self {
        self.names.insert(player_id.to_string(), name.to_string());
        self
    }
}

impl Directory for StaticDirectory {
    fn display_name(&self, player_id: &str) -> Option<String> {
        self.names.get(player_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_messenger_captures_in_order() {
        let messenger = RecordingMessenger::new();
        messenger.tell("alice", "hi").unwrap();
        messenger.announce("news").unwrap();

        assert_eq!(messenger.told("alice"), vec!["hi"]);
        assert_eq!(messenger.announcements(), vec!["news"]);
        assert_eq!(messenger.take().len(), 2);
        assert!(messenger.take().is_empty());
    }

    #[test]
    fn test_static_directory() {
        let directory = StaticDirectory::new().with("42", "Alice");
        assert_eq!(directory.display_name("42").as_deref(), Some("Alice"));
        assert!(directory.display_name("7").is_none());
    }
}
