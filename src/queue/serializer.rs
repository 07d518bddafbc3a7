// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON serializer strategy and the transform stages built on serializers.

use crate::errors::{QueueError, SerializationError};
use crate::queue::{Message, RawMessage};
use crate::streaming::{try_morph, Done, ErrorStream, ItemStream};
use crate::traits::Serializer;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Encodes items as JSON message bodies.
pub struct JsonSerializer<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Serializer<T> for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, item: &T) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(item)?)
    }

    fn deserialize(&self, body: &str) -> Result<T, SerializationError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Decode raw messages, publishing undecodable ones on the error stream.
pub(crate) fn deserialize_stage<T>(
    done: &Done,
    input: ItemStream<RawMessage>,
    serializer: Arc<dyn Serializer<T>>,
) -> (ItemStream<Message<T>>, ErrorStream<QueueError>)
where
    T: Send + 'static,
{
    try_morph(done, input, move |raw: RawMessage| match serializer.deserialize(&raw.body) {
        Ok(item) => Ok(Message { raw, item }),
        Err(source) => Err(QueueError::Deserialize {
            message_id: raw.id,
            source,
        }),
    })
}

/// Encode items into message bodies, publishing unencodable ones on the error stream.
pub(crate) fn serialize_stage<T>(
    done: &Done,
    input: ItemStream<T>,
    serializer: Arc<dyn Serializer<T>>,
) -> (ItemStream<String>, ErrorStream<QueueError>)
where
    T: Send + 'static,
{
    try_morph(done, input, move |item: T| {
        serializer.serialize(&item).map_err(QueueError::Serialize)
    })
}
