use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collections a client can watch for invalidation. Names match the
/// underlying tables so subscriptions read the same as the REST paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Watched {
    LivestockListings,
    Questions,
    Answers,
    Videos,
    VideoLikes,
    EducationalResources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// Events sent over the WebSocket gateway.
///
/// `Change` carries no row data. Clients react by re-fetching the named
/// collection, so a lost, duplicated, or reordered event can at worst cause
/// a redundant read — never corrupt displayed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Server confirms successful authentication
    Ready { user_id: Uuid },

    /// Rows in `table` changed; re-read the collection
    Change { table: Watched, op: ChangeOp },
}

impl GatewayEvent {
    /// Returns the watched collection if this event is scoped to one.
    /// Unscoped events are delivered to every client.
    pub fn table(&self) -> Option<Watched> {
        match self {
            Self::Change { table, .. } => Some(*table),
            Self::Ready { .. } => None,
        }
    }
}

/// Commands sent FROM client TO server over WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Authenticate the WebSocket connection
    Identify { token: String },

    /// Replace the set of watched collections for this connection.
    /// The server only forwards Change events for subscribed collections.
    Subscribe { tables: Vec<Watched> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_event_wire_form() {
        let event = GatewayEvent::Change {
            table: Watched::LivestockListings,
            op: ChangeOp::Update,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"Change","data":{"table":"livestock_listings","op":"update"}}"#
        );
    }

    #[test]
    fn subscribe_command_parses() {
        let raw = r#"{"type":"Subscribe","data":{"tables":["questions","answers"]}}"#;
        let cmd: GatewayCommand = serde_json::from_str(raw).unwrap();
        match cmd {
            GatewayCommand::Subscribe { tables } => {
                assert_eq!(tables, vec![Watched::Questions, Watched::Answers]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn ready_is_unscoped() {
        let event = GatewayEvent::Ready { user_id: Uuid::new_v4() };
        assert_eq!(event.table(), None);
    }
}
