//! Per-room, per-message read-receipt sets.

use std::collections::{BTreeSet, HashMap};

use super::model::{MessageId, RoomName, Username};

/// Result of an acknowledgment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckOutcome {
    /// The full, sorted set of usernames who have read the message.
    pub read_by: Vec<Username>,
    /// Whether this acknowledgment actually added a new username. Only a
    /// fresh addition is broadcast to the room.
    pub newly_added: bool,
}

/// Keyed by (room, messageId): the set of usernames who acknowledged the
/// message. A room's namespace is created when the room is created and
/// deleted with it, so acknowledgments for vanished rooms are absorbed.
#[derive(Debug, Default)]
pub struct ReadReceiptTracker {
    rooms: HashMap<RoomName, HashMap<MessageId, BTreeSet<Username>>>,
}

impl ReadReceiptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize an empty receipt namespace for a freshly created room.
    pub fn init_room(&mut self, room: RoomName) {
        self.rooms.entry(room).or_default();
    }

    /// Drop a room's entire receipt namespace. Called atomically with room
    /// deletion.
    pub fn drop_room(&mut self, room: &RoomName) {
        self.rooms.remove(room);
    }

    pub fn tracks_room(&self, room: &RoomName) -> bool {
        self.rooms.contains_key(room)
    }

    /// Seed a new message's receipt set with its author (self-implied read).
    /// No-op for untracked rooms.
    pub fn seed(&mut self, room: &RoomName, message_id: MessageId, author: Username) {
        if let Some(messages) = self.rooms.get_mut(room) {
            messages.entry(message_id).or_default().insert(author);
        }
    }

    /// Record that `username` has read `message_id`.
    ///
    /// An untracked room is a pure no-op returning an empty set. Within a
    /// tracked room an unknown message id gets a set created on the fly, and
    /// re-acknowledging is idempotent; only `newly_added` outcomes warrant a
    /// broadcast.
    pub fn acknowledge(
        &mut self,
        room: &RoomName,
        message_id: MessageId,
        username: Username,
    ) -> AckOutcome {
        let Some(messages) = self.rooms.get_mut(room) else {
            return AckOutcome {
                read_by: Vec::new(),
                newly_added: false,
            };
        };

        let readers = messages.entry(message_id).or_default();
        let newly_added = readers.insert(username);

        AckOutcome {
            read_by: readers.iter().cloned().collect(),
            newly_added,
        }
    }

    /// Sorted reader set for a message, empty when untracked.
    pub fn read_by(&self, room: &RoomName, message_id: MessageId) -> Vec<Username> {
        self.rooms
            .get(room)
            .and_then(|messages| messages.get(&message_id))
            .map(|readers| readers.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_seed_implies_author_read() {
        // given:
        let mut tracker = ReadReceiptTracker::new();
        tracker.init_room(room("general"));

        // when:
        tracker.seed(&room("general"), MessageId::new(1), user("alice"));

        // then: the author is present before any other acknowledgment
        assert_eq!(
            tracker.read_by(&room("general"), MessageId::new(1)),
            vec![user("alice")]
        );
    }

    #[test]
    fn test_acknowledge_adds_reader_and_reports_full_set() {
        // given:
        let mut tracker = ReadReceiptTracker::new();
        tracker.init_room(room("general"));
        tracker.seed(&room("general"), MessageId::new(1), user("alice"));

        // when:
        let outcome = tracker.acknowledge(&room("general"), MessageId::new(1), user("bob"));

        // then: sorted set, newly added
        assert!(outcome.newly_added);
        assert_eq!(outcome.read_by, vec![user("alice"), user("bob")]);
    }

    #[test]
    fn test_acknowledge_is_idempotent() {
        // given:
        let mut tracker = ReadReceiptTracker::new();
        tracker.init_room(room("general"));
        tracker.seed(&room("general"), MessageId::new(1), user("alice"));
        tracker.acknowledge(&room("general"), MessageId::new(1), user("bob"));

        // when:
        let outcome = tracker.acknowledge(&room("general"), MessageId::new(1), user("bob"));

        // then: no new addition, set unchanged
        assert!(!outcome.newly_added);
        assert_eq!(outcome.read_by, vec![user("alice"), user("bob")]);
    }

    #[test]
    fn test_acknowledge_untracked_room_is_absorbed() {
        // given:
        let mut tracker = ReadReceiptTracker::new();

        // when:
        let outcome = tracker.acknowledge(&room("ghost"), MessageId::new(9), user("bob"));

        // then: no error, no effect
        assert!(!outcome.newly_added);
        assert!(outcome.read_by.is_empty());
        assert!(!tracker.tracks_room(&room("ghost")));
    }

    #[test]
    fn test_acknowledge_unknown_message_creates_set() {
        // given:
        let mut tracker = ReadReceiptTracker::new();
        tracker.init_room(room("general"));

        // when: acking a message the room never saw
        let outcome = tracker.acknowledge(&room("general"), MessageId::new(42), user("bob"));

        // then: a set springs into existence with the acknowledger
        assert!(outcome.newly_added);
        assert_eq!(outcome.read_by, vec![user("bob")]);
    }

    #[test]
    fn test_drop_room_clears_all_receipts() {
        // given:
        let mut tracker = ReadReceiptTracker::new();
        tracker.init_room(room("general"));
        tracker.seed(&room("general"), MessageId::new(1), user("alice"));

        // when:
        tracker.drop_room(&room("general"));

        // then: later acks are no-ops
        let outcome = tracker.acknowledge(&room("general"), MessageId::new(1), user("bob"));
        assert!(!outcome.newly_added);
        assert!(outcome.read_by.is_empty());
    }
}
