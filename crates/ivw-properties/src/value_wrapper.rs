//! A live value paired with its default.

use ivw_serialization::{DeserializeValue, Deserializer, Result, SerializeValue, Serializer};

use crate::property::SerializationMode;

/// A named value that remembers its default.
///
/// The default only changes through [`set_as_default`](Self::set_as_default);
/// with [`SerializationMode::Changed`] a value equal to its default is not
/// written at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueWrapper<T> {
    name: String,
    value: T,
    default_value: T,
}

impl<T: Clone + PartialEq> ValueWrapper<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            default_value: value.clone(),
            value,
        }
    }

    /// Key under which the value is persisted.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replace the value. Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default_value
    }

    /// Restore the default. Returns whether the value changed.
    pub fn reset(&mut self) -> bool {
        let default = self.default_value.clone();
        self.set(default)
    }

    pub fn set_as_default(&mut self) {
        self.default_value = self.value.clone();
    }
}

impl<T> ValueWrapper<T>
where
    T: Clone + PartialEq + SerializeValue,
{
    pub fn serialize(&self, s: &mut Serializer, mode: SerializationMode) {
        match mode {
            SerializationMode::All => s.serialize(&self.name, &self.value),
            SerializationMode::Changed if !self.is_default() => {
                s.serialize(&self.name, &self.value);
            }
            SerializationMode::Changed | SerializationMode::None => {}
        }
    }
}

impl<T> ValueWrapper<T>
where
    T: Clone + PartialEq + DeserializeValue,
{
    /// Read the value if its node is present.
    ///
    /// An absent node keeps the current value in every mode.
    pub fn deserialize(&mut self, d: &mut Deserializer, mode: SerializationMode) -> Result<bool> {
        match mode {
            SerializationMode::None => Ok(false),
            SerializationMode::All | SerializationMode::Changed => {
                d.deserialize(&self.name, &mut self.value)
            }
        }
    }
}
