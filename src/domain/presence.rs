//! Per-username presence table shared by all of a user's connections.

use std::collections::HashMap;

use super::model::{Timestamp, Username};

/// Presence facts for one username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPresence {
    pub online: bool,
    pub last_active: Timestamp,
}

/// Keyed by username; entries are created on first join and never deleted
/// for the coordinator's lifetime. When multiple connections share a
/// username, the most recent writer wins.
#[derive(Debug, Default)]
pub struct PresenceTable {
    users: HashMap<Username, UserPresence>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a username online, refreshing its last-active timestamp.
    pub fn mark_online(&mut self, username: &Username, now: Timestamp) {
        self.users.insert(
            username.clone(),
            UserPresence {
                online: true,
                last_active: now,
            },
        );
    }

    /// Mark a username offline. The entry is kept so `lastActive` survives
    /// the disconnect.
    pub fn mark_offline(&mut self, username: &Username, now: Timestamp) {
        self.users.insert(
            username.clone(),
            UserPresence {
                online: false,
                last_active: now,
            },
        );
    }

    /// Refresh last-active without changing the online flag. Used for
    /// activity pings and message sends.
    pub fn touch(&mut self, username: &Username, now: Timestamp) {
        self.users
            .entry(username.clone())
            .and_modify(|p| p.last_active = now)
            .or_insert(UserPresence {
                online: true,
                last_active: now,
            });
    }

    pub fn get(&self, username: &Username) -> Option<UserPresence> {
        self.users.get(username).copied()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
