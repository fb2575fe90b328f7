use chrono::{DateTime, Utc};

use crate::model::{Event, EventId, EventPayload};

/// Append-only event log. Ids start at 1 and increase by one per append.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    events: Vec<Event>,
    last_id: EventId,
}

impl EventLog {
    /// Record an event and return a copy of it.
    pub fn append(
        &mut self,
        at: DateTime<Utc>,
        correlation_id: &str,
        payload: EventPayload,
    ) -> Event {
        self.last_id += 1;
        let event = Event {
            id: self.last_id,
            at,
            correlation_id: correlation_id.to_owned(),
            payload,
        };
        self.events.push(event.clone());
        event
    }

    /// Events with `id > since_id` in id order, at most `limit` of them
    /// (`0` means no limit).
    pub fn since(&self, since_id: EventId, limit: usize) -> Vec<Event> {
        let start = self.events.partition_point(|event| event.id <= since_id);
        let tail = &self.events[start..];
        let take = if limit == 0 { tail.len() } else { limit.min(tail.len()) };
        tail[..take].to_vec()
    }
}
