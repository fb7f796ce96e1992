//! Activity ping: silent presence refresh.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{ConnectionId, SharedState, Timestamp};

/// Refreshes the acting user's last-active timestamp. No broadcast, no
/// response; pings from unbound connections are absorbed.
pub struct ActivityPingUseCase {
    state: SharedState,
    clock: Arc<dyn Clock>,
}

impl ActivityPingUseCase {
    pub fn new(state: SharedState, clock: Arc<dyn Clock>) -> Self {
        Self { state, clock }
    }

    pub async fn execute(&self, conn_id: ConnectionId) {
        let now = Timestamp::new(self.clock.now_millis());
        let mut state = self.state.lock().await;
        if let Some(binding) = state.registry.lookup(conn_id).cloned() {
            state.presence.touch(&binding.username, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::{CoordinatorState, RoomName, Username};

    fn user(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_ping_refreshes_last_active() {
        // given: alice joined at t=1000
        let state = CoordinatorState::shared();
        let conn = ConnectionId::generate();
        {
            let mut s = state.lock().await;
            s.registry.register(conn);
            s.registry.bind(conn, user("alice"), room("general")).unwrap();
            s.rooms.join(room("general"), conn, user("alice"));
            s.presence.mark_online(&user("alice"), Timestamp::new(1000));
        }
        let usecase = ActivityPingUseCase::new(state.clone(), Arc::new(FixedClock::new(5000)));

        // when:
        usecase.execute(conn).await;

        // then: last-active moved, online flag untouched
        let presence = state.lock().await.presence.get(&user("alice")).unwrap();
        assert!(presence.online);
        assert_eq!(presence.last_active, Timestamp::new(5000));
    }

    #[tokio::test]
    async fn test_ping_from_unbound_connection_is_absorbed() {
        // given: a registered but never-joined connection
        let state = CoordinatorState::shared();
        let conn = ConnectionId::generate();
        state.lock().await.registry.register(conn);
        let usecase = ActivityPingUseCase::new(state.clone(), Arc::new(FixedClock::new(5000)));

        // when:
        usecase.execute(conn).await;

        // then:
        assert!(state.lock().await.presence.is_empty());
    }
}
