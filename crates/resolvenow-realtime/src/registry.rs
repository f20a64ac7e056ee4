// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit subscription registry.
//!
//! Two maps: connection id → outbound queue, and complaint channel id →
//! member connection ids. `join` and `leave` are the only membership
//! mutators; `unregister` drops a connection from every channel.
//!
//! Locks on the two maps are never held at the same time.

use std::collections::HashSet;

use dashmap::DashMap;
use resolvenow_core::Notifier;
use resolvenow_core::types::{RealtimeEvent, Scope};
use tokio::sync::mpsc;
use tracing::debug;

struct Connection {
    sender: mpsc::Sender<String>,
    user_id: String,
    channels: HashSet<String>,
}

/// Handle returned by [`ChannelRegistry::register`].
pub struct Registration {
    pub connection_id: String,
    /// Serialized frames queued for this connection.
    pub outbound: mpsc::Receiver<String>,
}

pub struct ChannelRegistry {
    connections: DashMap<String, Connection>,
    channels: DashMap<String, HashSet<String>>,
    buffer: usize,
}

impl ChannelRegistry {
    /// `buffer` is the per-connection queue depth; frames beyond it are dropped.
    pub fn new(buffer: usize) -> Self {
        Self {
            connections: DashMap::new(),
            channels: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Add a connection for `user_id`. It receives global events right away.
    pub fn register(&self, user_id: &str) -> Registration {
        let connection_id = uuid::Uuid::new_v4().to_string();
        let (sender, outbound) = mpsc::channel(self.buffer);
        self.connections.insert(
            connection_id.clone(),
            Connection {
                sender,
                user_id: user_id.to_string(),
                channels: HashSet::new(),
            },
        );
        resolvenow_prometheus::set_realtime_connections(self.connections.len() as f64);
        debug!(connection_id = %connection_id, user_id, "realtime connection registered");
        Registration {
            connection_id,
            outbound,
        }
    }

    /// Remove a connection and all of its memberships.
    pub fn unregister(&self, connection_id: &str) {
        let Some((_, connection)) = self.connections.remove(connection_id) else {
            return;
        };
        for channel in &connection.channels {
            self.remove_member(channel, connection_id);
        }
        resolvenow_prometheus::set_realtime_connections(self.connections.len() as f64);
        debug!(
            connection_id,
            user_id = %connection.user_id,
            channels = connection.channels.len(),
            "realtime connection removed"
        );
    }

    /// Add the connection to a complaint channel. Returns `false` for an
    /// unknown connection. Joining twice is a no-op.
    pub fn join(&self, connection_id: &str, channel: &str) -> bool {
        match self.connections.get_mut(connection_id) {
            Some(mut connection) => {
                connection.channels.insert(channel.to_string());
            }
            None => return false,
        }
        self.channels
            .entry(channel.to_string())
            .or_default()
            .insert(connection_id.to_string());
        true
    }

    /// Remove the connection from a complaint channel. Returns whether it was a member.
    pub fn leave(&self, connection_id: &str, channel: &str) -> bool {
        let was_member = self
            .connections
            .get_mut(connection_id)
            .is_some_and(|mut connection| connection.channels.remove(channel));
        if was_member {
            self.remove_member(channel, connection_id);
        }
        was_member
    }

    fn remove_member(&self, channel: &str, connection_id: &str) {
        if let Some(mut members) = self.channels.get_mut(channel) {
            members.remove(connection_id);
        }
        self.channels.remove_if(channel, |_, members| members.is_empty());
    }

    /// Queue a raw frame for one connection.
    pub fn send_to(&self, connection_id: &str, frame: String) -> bool {
        let sender = match self.connections.get(connection_id) {
            Some(connection) => connection.sender.clone(),
            None => return false,
        };
        try_deliver(&sender, frame, connection_id)
    }

    /// Queue a frame for every connection in `scope`. Returns how many accepted it.
    pub fn broadcast(&self, scope: &Scope, frame: &str) -> usize {
        let targets: Vec<(String, mpsc::Sender<String>)> = match scope {
            Scope::Global => self
                .connections
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().sender.clone()))
                .collect(),
            Scope::Complaint(id) => {
                let members: Vec<String> = match self.channels.get(id) {
                    Some(members) => members.iter().cloned().collect(),
                    None => return 0,
                };
                members
                    .into_iter()
                    .filter_map(|member| {
                        self.connections
                            .get(&member)
                            .map(|c| (member.clone(), c.sender.clone()))
                    })
                    .collect()
            }
        };

        let mut delivered = 0;
        let mut dropped = 0u64;
        for (connection_id, sender) in targets {
            if try_deliver(&sender, frame.to_string(), &connection_id) {
                delivered += 1;
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            resolvenow_prometheus::record_frames_dropped(dropped);
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections subscribed to a complaint channel.
    pub fn channel_size(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, |members| members.len())
    }

    pub fn is_member(&self, connection_id: &str, channel: &str) -> bool {
        self.channels
            .get(channel)
            .is_some_and(|members| members.contains(connection_id))
    }
}

fn try_deliver(sender: &mpsc::Sender<String>, frame: String, connection_id: &str) -> bool {
    match sender.try_send(frame) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            debug!(connection_id, "outbound queue full, frame dropped");
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!(connection_id, "outbound queue closed, frame dropped");
            false
        }
    }
}

impl Notifier for ChannelRegistry {
    fn publish(&self, scope: Scope, event: RealtimeEvent) -> usize {
        match serde_json::to_string(&event) {
            Ok(frame) => self.broadcast(&scope, &frame),
            Err(e) => {
                tracing::warn!(event = %event.event, error = %e, "failed to serialize realtime event");
                0
            }
        }
    }
}
