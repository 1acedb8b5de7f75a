//! The property contract shared by every typed property.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use ivw_serialization::constants::{IDENTIFIER_ATTRIBUTE, TYPE_ATTRIBUTE};
use ivw_serialization::{Deserializer, Result, Serializable, Serializer};

use crate::value_wrapper::ValueWrapper;

/// How much of a property's state is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SerializationMode {
    /// Write every value.
    #[default]
    All,
    /// Write only values that differ from their default.
    Changed,
    /// Write nothing beyond the type and identifier.
    None,
}

/// Hint for how a property should be presented and edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertySemantics(Cow<'static, str>);

impl PropertySemantics {
    pub const DEFAULT: Self = Self(Cow::Borrowed("Default"));
    pub const COLOR: Self = Self(Cow::Borrowed("Color"));
    pub const SPIN_BOX: Self = Self(Cow::Borrowed("SpinBox"));
    pub const TEXT: Self = Self(Cow::Borrowed("Text"));

    pub fn new(semantics: impl Into<String>) -> Self {
        Self(Cow::Owned(semantics.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PropertySemantics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PropertySemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback run with the property identifier whenever the property changes.
pub type ChangeObserver = Box<dyn FnMut(&str)>;

/// State common to all properties.
pub struct PropertyBase {
    identifier: String,
    display_name: ValueWrapper<String>,
    semantics: ValueWrapper<String>,
    serialization_mode: SerializationMode,
    observers: Vec<ChangeObserver>,
}

impl PropertyBase {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: ValueWrapper::new("displayName", display_name.into()),
            semantics: ValueWrapper::new("semantics", PropertySemantics::DEFAULT.to_string()),
            serialization_mode: SerializationMode::All,
            observers: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn display_name(&self) -> &str {
        self.display_name.value()
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name.set(name.into());
    }

    pub fn semantics(&self) -> PropertySemantics {
        PropertySemantics::new(self.semantics.value().as_str())
    }

    pub fn set_semantics(&mut self, semantics: PropertySemantics) {
        self.semantics.set(semantics.as_str().to_string());
    }

    pub fn serialization_mode(&self) -> SerializationMode {
        self.serialization_mode
    }

    pub fn set_serialization_mode(&mut self, mode: SerializationMode) {
        self.serialization_mode = mode;
    }

    /// Register a callback for [`property_modified`](Self::property_modified).
    pub fn on_change(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Notify every observer that the property changed.
    pub fn property_modified(&mut self) {
        tracing::trace!(property = %self.identifier, "Property modified");
        for observer in &mut self.observers {
            observer(&self.identifier);
        }
    }

    pub fn set_current_state_as_default(&mut self) {
        self.display_name.set_as_default();
        self.semantics.set_as_default();
    }

    pub fn reset_to_default_state(&mut self) {
        self.display_name.reset();
        self.semantics.reset();
    }

    /// Write the `type` and `identifier` attributes and the presentation fields.
    pub fn serialize(&self, s: &mut Serializer, class_identifier: &str) {
        s.serialize_attribute(TYPE_ATTRIBUTE, class_identifier);
        s.serialize_attribute(IDENTIFIER_ATTRIBUTE, &self.identifier);
        self.display_name.serialize(s, self.serialization_mode);
        self.semantics.serialize(s, self.serialization_mode);
    }

    pub fn deserialize(&mut self, d: &mut Deserializer) -> Result<bool> {
        let mut changed = d.deserialize_attribute(IDENTIFIER_ATTRIBUTE, &mut self.identifier)?;
        changed |= self.display_name.deserialize(d, self.serialization_mode)?;
        changed |= self.semantics.deserialize(d, self.serialization_mode)?;
        Ok(changed)
    }
}

/// Observers stay with the original; the copy starts with none.
impl Clone for PropertyBase {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
            semantics: self.semantics.clone(),
            serialization_mode: self.serialization_mode,
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for PropertyBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBase")
            .field("identifier", &self.identifier)
            .field("display_name", self.display_name.value())
            .field("semantics", self.semantics.value())
            .field("serialization_mode", &self.serialization_mode)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// A persisted, observable value owned by a processor.
pub trait Property: Serializable + Any {
    fn base(&self) -> &PropertyBase;

    fn base_mut(&mut self) -> &mut PropertyBase;

    /// Factory key, `org.inviwo.<Type>Property`.
    fn class_identifier(&self) -> String;

    fn identifier(&self) -> &str {
        self.base().identifier()
    }

    fn display_name(&self) -> &str {
        self.base().display_name()
    }

    fn set_current_state_as_default(&mut self);

    fn reset_to_default_state(&mut self);

    /// Copy the state of `other` if it has the same concrete type.
    ///
    /// Returns whether the types matched.
    fn set_from(&mut self, other: &dyn Property) -> bool;

    fn clone_property(&self) -> Box<dyn Property>;

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("class_identifier", &self.class_identifier())
            .field("identifier", &self.identifier())
            .finish()
    }
}
