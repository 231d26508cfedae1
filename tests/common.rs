use batchproc::prelude::*;
use rdkafka::message::OwnedMessage;
use rdkafka::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Event {
    pub id: u64,
    pub body: String,
}

pub fn create_event(id: u64, body: &str) -> Event {
    Event {
        id,
        body: body.to_string(),
    }
}

pub fn create_record(
    topic: &str,
    partition: Partition,
    offset: Offset,
    event: Option<&Event>,
) -> Record {
    let payload = event.map(|e| serde_json::to_vec(e).unwrap());
    let message = OwnedMessage::new(
        payload,
        None,
        topic.to_string(),
        Timestamp::CreateTime(0),
        partition,
        offset,
        None,
    );
    Record::new(message)
}
