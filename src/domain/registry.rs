//! Connection registry: the single source of truth for "who is where".

use std::collections::HashMap;

use thiserror::Error;

use super::model::{ConnectionId, RoomName, Username};

/// The (username, room) pair a connection committed to at join time.
///
/// A connection is bound at most once for its lifetime; rejoining a different
/// room requires a fresh connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub username: Username,
    pub room: RoomName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("connection {0} is not registered")]
    NotRegistered(ConnectionId),

    #[error("connection {0} is already bound to a room")]
    AlreadyBound(ConnectionId),
}

/// Maps live connections to their room binding.
///
/// A registered connection with no binding is in the `Anonymous` lifecycle
/// state; binding moves it to `Joined`; removal terminates it.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, Option<Binding>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected, still-anonymous connection.
    pub fn register(&mut self, conn_id: ConnectionId) {
        self.entries.insert(conn_id, None);
    }

    pub fn is_registered(&self, conn_id: ConnectionId) -> bool {
        self.entries.contains_key(&conn_id)
    }

    /// Bind a registered connection to a (username, room) pair.
    ///
    /// A second bind for an already-bound connection is a logic error and is
    /// rejected, never silently overwritten.
    pub fn bind(
        &mut self,
        conn_id: ConnectionId,
        username: Username,
        room: RoomName,
    ) -> Result<(), RegistryError> {
        match self.entries.get_mut(&conn_id) {
            None => Err(RegistryError::NotRegistered(conn_id)),
            Some(Some(_)) => Err(RegistryError::AlreadyBound(conn_id)),
            Some(slot @ None) => {
                *slot = Some(Binding { username, room });
                Ok(())
            }
        }
    }

    pub fn lookup(&self, conn_id: ConnectionId) -> Option<&Binding> {
        self.entries.get(&conn_id).and_then(|slot| slot.as_ref())
    }

    /// Remove a connection entirely, returning its binding if it had one.
    ///
    /// Returns `None` both for never-registered connections and for
    /// connections that disconnected before joining a room; neither case is
    /// surfaced to any user.
    pub fn unbind(&mut self, conn_id: ConnectionId) -> Option<Binding> {
        self.entries.remove(&conn_id).flatten()
    }

    /// All registered connection ids, anonymous ones included.
    pub fn all_ids(&self) -> Vec<ConnectionId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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
    fn test_bind_registered_connection() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let conn = ConnectionId::generate();
        registry.register(conn);

        // when:
        let result = registry.bind(conn, user("alice"), room("general"));

        // then:
        assert!(result.is_ok());
        let binding = registry.lookup(conn).unwrap();
        assert_eq!(binding.username.as_str(), "alice");
        assert_eq!(binding.room.as_str(), "general");
    }

    #[test]
    fn test_bind_unregistered_connection_fails() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let conn = ConnectionId::generate();

        // when:
        let result = registry.bind(conn, user("alice"), room("general"));

        // then:
        assert_eq!(result, Err(RegistryError::NotRegistered(conn)));
    }

    #[test]
    fn test_second_bind_is_rejected() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let conn = ConnectionId::generate();
        registry.register(conn);
        registry.bind(conn, user("alice"), room("general")).unwrap();

        // when:
        let result = registry.bind(conn, user("alice"), room("random"));

        // then: the original binding is untouched
        assert_eq!(result, Err(RegistryError::AlreadyBound(conn)));
        assert_eq!(registry.lookup(conn).unwrap().room.as_str(), "general");
    }

    #[test]
    fn test_unbind_returns_binding_and_removes_entry() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let conn = ConnectionId::generate();
        registry.register(conn);
        registry.bind(conn, user("alice"), room("general")).unwrap();

        // when:
        let binding = registry.unbind(conn);

        // then:
        assert_eq!(binding.unwrap().username.as_str(), "alice");
        assert!(!registry.is_registered(conn));
    }

    #[test]
    fn test_unbind_anonymous_connection_is_noop() {
        // given: a connection that disconnects before joining any room
        let mut registry = ConnectionRegistry::new();
        let conn = ConnectionId::generate();
        registry.register(conn);

        // when:
        let binding = registry.unbind(conn);

        // then:
        assert!(binding.is_none());
        assert!(!registry.is_registered(conn));
    }

    #[test]
    fn test_unbind_unknown_connection_is_noop() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.unbind(ConnectionId::generate()).is_none());
    }

    #[test]
    fn test_all_ids_includes_anonymous_connections() {
        // given:
        let mut registry = ConnectionRegistry::new();
        let joined = ConnectionId::generate();
        let anonymous = ConnectionId::generate();
        registry.register(joined);
        registry.register(anonymous);
        registry
            .bind(joined, user("alice"), room("general"))
            .unwrap();

        // when:
        let ids = registry.all_ids();

        // then:
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&joined));
        assert!(ids.contains(&anonymous));
    }
}
