// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// A message as handed over by a transport, before deserialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// Transport-assigned message id.
    pub id: String,
    pub body: String,
    /// Handle used to acknowledge (delete) this particular delivery.
    pub receipt: String,
    /// How many times the message has been delivered, including this one.
    pub receive_count: u32,
}

/// A received message together with its decoded item.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<T> {
    pub raw: RawMessage,
    pub item: T,
}

impl<T> Message<T> {
    pub fn id(&self) -> &str {
        &self.raw.id
    }

    pub fn into_item(self) -> T {
        self.item
    }
}
