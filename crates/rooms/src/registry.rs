//! Room membership for live push-channel connections
//!
//! The registry is the single owner of the topic → subscriber mapping. All
//! mutations happen under one write lock and never await, so a concurrent
//! `subscribers` read observes either the state before or after a join, leave
//! or disconnect, never a partial update.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::types::{ConnectionId, ServerEvent, Topic};

/// Outbound queue half held by the registry for each connection
pub(crate) type Outbound = mpsc::Sender<ServerEvent>;

struct ConnectionEntry {
    outbound: Outbound,
    topics: HashSet<Topic>,
}

#[derive(Default)]
struct RegistryState {
    topics: HashMap<Topic, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, ConnectionEntry>,
}

pub struct RoomRegistry {
    state: RwLock<RegistryState>,
    outbound_buffer: usize,
}

impl RoomRegistry {
    /// `outbound_buffer` bounds the per-connection event queue (minimum 1).
    pub fn new(outbound_buffer: usize) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new connection with no memberships.
    ///
    /// The returned receiver yields every event dispatched to the connection
    /// until it is disconnected.
    pub fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let id = ConnectionId::new();
        let (outbound, events) = mpsc::channel(self.outbound_buffer);

        let mut state = self.write();
        state.connections.insert(
            id,
            ConnectionEntry {
                outbound,
                topics: HashSet::new(),
            },
        );
        let connections = state.connections.len();
        drop(state);

        info!(connection_id = %id, connections, "connection registered");
        (id, events)
    }

    /// Subscribe `connection` to `topic`.
    ///
    /// Returns `true` when the membership is new. Joining twice is a no-op, and
    /// joins from unknown or already disconnected connections are ignored.
    pub fn join(&self, connection: ConnectionId, topic: Topic) -> bool {
        let mut state = self.write();
        let RegistryState {
            topics,
            connections,
        } = &mut *state;

        let Some(entry) = connections.get_mut(&connection) else {
            warn!(connection_id = %connection, %topic, "join from unknown connection ignored");
            return false;
        };

        if !entry.topics.insert(topic.clone()) {
            debug!(connection_id = %connection, %topic, "already joined");
            return false;
        }

        topics.entry(topic.clone()).or_default().insert(connection);
        drop(state);

        info!(connection_id = %connection, %topic, "connection joined room");
        true
    }

    /// Unsubscribe `connection` from `topic`. Returns `false` when it was not subscribed.
    pub fn leave(&self, connection: ConnectionId, topic: &Topic) -> bool {
        let mut state = self.write();
        let RegistryState {
            topics,
            connections,
        } = &mut *state;

        let removed = connections
            .get_mut(&connection)
            .is_some_and(|entry| entry.topics.remove(topic));

        if !removed {
            debug!(connection_id = %connection, %topic, "leave for room not joined");
            return false;
        }

        remove_member(topics, topic, connection);
        drop(state);

        info!(connection_id = %connection, %topic, "connection left room");
        true
    }

    /// Drop `connection` and every membership it holds.
    ///
    /// Returns the topics it was removed from. Calling it again for the same
    /// connection is a no-op that returns nothing.
    pub fn disconnect(&self, connection: ConnectionId) -> Vec<Topic> {
        let mut state = self.write();
        let RegistryState {
            topics,
            connections,
        } = &mut *state;

        let Some(entry) = connections.remove(&connection) else {
            return Vec::new();
        };

        let mut left: Vec<Topic> = entry.topics.into_iter().collect();
        left.sort();
        for topic in &left {
            remove_member(topics, topic, connection);
        }
        let remaining = connections.len();
        drop(state);

        info!(
            connection_id = %connection,
            rooms = left.len(),
            connections = remaining,
            "connection disconnected"
        );
        left
    }

    /// Queue `event` for a single connection, bypassing topics.
    ///
    /// Returns false when the connection is unknown or its queue cannot take the event.
    pub fn notify(&self, connection: ConnectionId, event: ServerEvent) -> bool {
        let outbound = match self.read().connections.get(&connection) {
            Some(entry) => entry.outbound.clone(),
            None => return false,
        };

        match outbound.try_send(event) {
            Ok(()) => true,
            Err(err) => {
                debug!(connection_id = %connection, error = %err, "direct event not delivered");
                false
            }
        }
    }

    /// Snapshot of the connections currently subscribed to `topic`
    pub fn subscribers(&self, topic: &Topic) -> HashSet<ConnectionId> {
        self.read().topics.get(topic).cloned().unwrap_or_default()
    }

    /// Snapshot of the topics `connection` is subscribed to
    pub fn rooms_of(&self, connection: ConnectionId) -> HashSet<Topic> {
        self.read()
            .connections
            .get(&connection)
            .map(|entry| entry.topics.clone())
            .unwrap_or_default()
    }

    pub fn is_connected(&self, connection: ConnectionId) -> bool {
        self.read().connections.contains_key(&connection)
    }

    pub fn connection_count(&self) -> usize {
        self.read().connections.len()
    }

    /// Number of topics with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.read().topics.len()
    }

    /// Subscribers of `topic` paired with their outbound queues, taken under one read lock.
    pub(crate) fn recipients(&self, topic: &Topic) -> Vec<(ConnectionId, Outbound)> {
        let state = self.read();
        let Some(members) = state.topics.get(topic) else {
            return Vec::new();
        };

        members
            .iter()
            .filter_map(|id| {
                state
                    .connections
                    .get(id)
                    .map(|entry| (*id, entry.outbound.clone()))
            })
            .collect()
    }
}

fn remove_member(
    topics: &mut HashMap<Topic, HashSet<ConnectionId>>,
    topic: &Topic,
    connection: ConnectionId,
) {
    if let Some(members) = topics.get_mut(topic) {
        members.remove(&connection);
        if members.is_empty() {
            topics.remove(topic);
        }
    }
}
