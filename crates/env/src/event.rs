//! Contract events.

use crate::codec::decode;
use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use tessera_core::H256;

/// A contract event that can be deposited with the host.
pub trait Event: Serialize {
    /// Identifier encoded in front of the event data.
    fn event_id(&self) -> u32;

    /// Indexed topics of the event.
    fn topics(&self) -> Vec<H256> {
        Vec::new()
    }
}

/// An event as recorded by a host: encoded topics and encoded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    pub topics: Vec<u8>,
    pub data: Vec<u8>,
}

impl EmittedEvent {
    /// Decode the event identifier.
    pub fn event_id(&self) -> Result<u32> {
        decode(&self.data)
    }

    /// Decode the topics.
    pub fn decode_topics(&self) -> Result<Vec<H256>> {
        decode(&self.topics)
    }

    /// Decode the event body as `E`.
    pub fn decode_event<E: DeserializeOwned>(&self) -> Result<E> {
        let (_, event): (u32, E) = decode(&self.data)?;
        Ok(event)
    }
}
