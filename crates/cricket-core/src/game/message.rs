use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// How long a message stays in the log before it is dropped.
pub const MESSAGE_TTL_MS: u64 = 8_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub kind: MessageKind,
    pub text: String,
    pub timestamp_ms: u64,
    #[serde(default, with = "player_id", skip_serializing_if = "Option::is_none")]
    pub player: Option<Seat>,
}

/// Writes the seat as its observer id, `player-<n>`.
mod player_id {
    use crate::model::player::Seat;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seat: &Option<Seat>, serializer: S) -> Result<S::Ok, S::Error> {
        match seat {
            Some(seat) => serializer.serialize_some(&seat.id()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Seat>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|id| Seat::from_id(&id).ok_or_else(|| D::Error::custom(format!("unknown player id `{id}`"))))
            .transpose()
    }
}

/// Ordered, append-only game log. Entries leave only by expiry or a full clear.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: MessageKind,
        text: impl Into<String>,
        timestamp_ms: u64,
        player: Option<Seat>,
    ) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.entries.push(Message {
            id,
            kind,
            text: text.into(),
            timestamp_ms,
            player,
        });
        id
    }

    pub fn expire(&mut self, id: MessageId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|message| message.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
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

    #[test]
    fn ids_increase_and_survive_clear() {
        let mut log = MessageLog::new();
        let a = log.push(MessageKind::Info, "a", 0, None);
        let b = log.push(MessageKind::Success, "b", 10, Some(Seat::West));
        assert!(b > a);
        log.clear();
        let c = log.push(MessageKind::Info, "c", 20, None);
        assert!(c > b);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn expire_removes_only_the_matching_entry() {
        let mut log = MessageLog::new();
        let a = log.push(MessageKind::Info, "a", 0, None);
        let _b = log.push(MessageKind::Info, "b", 0, None);
        assert!(log.expire(a));
        assert!(!log.expire(a));
        assert_eq!(log.entries()[0].text, "b");
    }

    #[test]
    fn player_is_written_as_its_id() {
        let mut log = MessageLog::new();
        log.push(MessageKind::Success, "hit", 5, Some(Seat::West));
        log.push(MessageKind::Info, "started", 0, None);

        let json = serde_json::to_string(log.entries()).unwrap();
        assert!(json.contains("\"player\":\"player-1\""));
        assert_eq!(json.matches("\"player\"").count(), 1);

        let back: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log.entries());
        assert!(serde_json::from_str::<Message>(
            r#"{"id":0,"kind":"info","text":"x","timestamp_ms":0,"player":"West"}"#
        )
        .is_err());
    }
}
