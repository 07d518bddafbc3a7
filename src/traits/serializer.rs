// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::SerializationError;

/// Converts items to and from message bodies.
///
/// The queue client is generic over the item type and delegates the wire
/// format to a strategy object implementing this trait.
pub trait Serializer<T>: Send + Sync {
    fn serialize(&self, item: &T) -> Result<String, SerializationError>;

    fn deserialize(&self, body: &str) -> Result<T, SerializationError>;
}
