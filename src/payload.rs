use serde_json::{Map as JsonMap, Value as JsonValue};

/// JSON object sent to the deSEC API, built up one key at a time.
///
/// Used for partial updates, where only the keys that are present get changed.
#[derive(Debug, Default)]
pub(crate) struct Payload {
    payload: JsonMap<String, JsonValue>,
}

impl Payload {
    /// Creates an empty payload.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds the given key-value pair.
    pub(crate) fn add<T: Into<JsonValue>>(mut self, key: &str, value: T) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// In the case that `value` is some, adds the key-value pair.
    pub(crate) fn add_if_some<T: Into<JsonValue>>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.payload.insert(key.to_string(), value.into());
        }
        self
    }

    /// Adds the key with either the value or an explicit `null`.
    pub(crate) fn add_nullable<T: Into<JsonValue>>(mut self, key: &str, value: Option<T>) -> Self {
        let value = value.map_or(JsonValue::Null, Into::into);
        self.payload.insert(key.to_string(), value);
        self
    }
}

impl From<Payload> for JsonValue {
    fn from(value: Payload) -> Self {
        JsonValue::Object(value.payload)
    }
}

impl serde::Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.payload.serialize(serializer)
    }
}
