use serde::{Deserialize, Serialize};

/// Minimal tagged protocol mirroring the shape of the configurator messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TestMessage {
    #[serde(rename = "ping")]
    Ping { seq: u32 },
    #[serde(rename = "hello")]
    Hello,
}

/// A message the listener above does not understand.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Foreign {
    #[serde(rename = "somethingElse")]
    SomethingElse { payload: String },
}
