//! Bounded numeric properties.
//!
//! An [`OrdinalProperty`] keeps `min <= value <= max` (component-wise) after
//! every mutation. Setters clamp instead of rejecting, and an inverted range is
//! repaired with a warning rather than treated as an error, so that older
//! documents with inconsistent ranges still load. NaN input, from a setter or a
//! document, is ignored and the previous field kept.

pub mod value;

use std::any::Any;

use glam::{
    DMat2, DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Quat,
    U64Vec2, U64Vec3, U64Vec4, Vec2, Vec3, Vec4,
};
use ivw_serialization::{Deserializer, Result, Serializable, Serializer};

pub use value::OrdinalValue;

use crate::property::{Property, PropertyBase, PropertySemantics, SerializationMode};
use crate::value_wrapper::ValueWrapper;

/// A value with a minimum, a maximum and a step size.
#[derive(Debug, Clone)]
pub struct OrdinalProperty<T: OrdinalValue> {
    base: PropertyBase,
    value: ValueWrapper<T>,
    min_value: ValueWrapper<T>,
    max_value: ValueWrapper<T>,
    increment: ValueWrapper<T>,
}

/// Order each component pair of `min`/`max`, warning when any were swapped.
fn repair_range<T: OrdinalValue>(identifier: &str, min: T, max: T) -> (T, T) {
    if min.any_greater(max) {
        tracing::warn!(
            property = %identifier,
            ?min,
            ?max,
            "Invalid range given, swapping the inverted bounds"
        );
        (min.min_components(max), min.max_components(max))
    } else {
        (min, max)
    }
}

/// `value`, or `fallback` with a warning when `value` has a NaN component.
fn reject_nan<T: OrdinalValue>(identifier: &str, field: &str, value: T, fallback: T) -> T {
    if value.has_nan() {
        tracing::warn!(
            property = %identifier,
            field,
            "Ignoring NaN, keeping the previous value"
        );
        fallback
    } else {
        value
    }
}

impl<T: OrdinalValue> OrdinalProperty<T> {
    /// Create a property; an inverted range is swapped into order, the value is
    /// raised to `min` and `max` is raised to the value.
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        value: T,
        min: T,
        max: T,
        increment: T,
    ) -> Self {
        let base = PropertyBase::new(identifier, display_name);
        let id = base.identifier();
        let min = reject_nan(id, "minvalue", min, T::default_min());
        let max = reject_nan(id, "maxvalue", max, T::default_max());
        let increment = reject_nan(id, "increment", increment, T::default_increment());
        let (min, max) = repair_range(id, min, max);
        let value = reject_nan(id, "value", value, min);
        let value = value.max_components(min);
        let max = max.max_components(value);
        Self {
            base,
            value: ValueWrapper::new("value", value),
            min_value: ValueWrapper::new("minvalue", min),
            max_value: ValueWrapper::new("maxvalue", max),
            increment: ValueWrapper::new("increment", increment),
        }
    }

    /// Create a property with the type's default value, range and increment.
    pub fn with_defaults(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(
            identifier,
            display_name,
            T::default_value(),
            T::default_min(),
            T::default_max(),
            T::default_increment(),
        )
    }

    #[must_use]
    pub fn with_semantics(mut self, semantics: PropertySemantics) -> Self {
        self.base.set_semantics(semantics);
        self.base.set_current_state_as_default();
        self
    }

    #[must_use]
    pub fn with_serialization_mode(mut self, mode: SerializationMode) -> Self {
        self.base.set_serialization_mode(mode);
        self
    }

    pub fn get(&self) -> T {
        *self.value.value()
    }

    pub fn min_value(&self) -> T {
        *self.min_value.value()
    }

    pub fn max_value(&self) -> T {
        *self.max_value.value()
    }

    pub fn increment(&self) -> T {
        *self.increment.value()
    }

    /// Register a callback run after every effective change.
    pub fn on_change(&mut self, observer: impl FnMut(&str) + 'static) {
        self.base.on_change(observer);
    }

    fn clamped(&self, value: T) -> T {
        value.clamp_components(self.min_value(), self.max_value())
    }

    /// Value, min, max and increment.
    fn state(&self) -> (T, T, T, T) {
        (
            self.get(),
            self.min_value(),
            self.max_value(),
            self.increment(),
        )
    }

    /// Set the value, clamped into the range. Notifies only on change.
    ///
    /// A value with a NaN component is ignored.
    pub fn set(&mut self, value: T) {
        let value = reject_nan(self.base.identifier(), "value", value, self.get());
        if value == self.get() {
            return;
        }
        let value = self.clamped(value);
        if self.value.set(value) {
            self.base.property_modified();
        }
    }

    /// Set the minimum; the maximum is raised if needed and the value re-clamped.
    pub fn set_min_value(&mut self, min: T) {
        let min = reject_nan(self.base.identifier(), "minvalue", min, self.min_value());
        if !self.min_value.set(min) {
            return;
        }
        let max = self.max_value().max_components(min);
        self.max_value.set(max);
        let value = self.clamped(self.get());
        self.value.set(value);
        self.base.property_modified();
    }

    /// Set the maximum; the minimum is lowered if needed and the value re-clamped.
    pub fn set_max_value(&mut self, max: T) {
        let max = reject_nan(self.base.identifier(), "maxvalue", max, self.max_value());
        if !self.max_value.set(max) {
            return;
        }
        let min = self.min_value().min_components(max);
        self.min_value.set(min);
        let value = self.clamped(self.get());
        self.value.set(value);
        self.base.property_modified();
    }

    pub fn set_increment(&mut self, increment: T) {
        let increment = reject_nan(
            self.base.identifier(),
            "increment",
            increment,
            self.increment(),
        );
        if self.increment.set(increment) {
            self.base.property_modified();
        }
    }

    /// Update value, range and increment together with at most one notification.
    ///
    /// Arguments with a NaN component keep the current field.
    pub fn set_all(&mut self, value: T, min: T, max: T, increment: T) {
        let (current, current_min, current_max, current_increment) = self.state();
        let id = self.base.identifier();
        let value = reject_nan(id, "value", value, current);
        let min = reject_nan(id, "minvalue", min, current_min);
        let max = reject_nan(id, "maxvalue", max, current_max);
        let increment = reject_nan(id, "increment", increment, current_increment);

        let mut modified = false;
        if min != self.min_value() || max != self.max_value() {
            let (min, max) = repair_range(self.base.identifier(), min, max);
            modified |= self.min_value.set(min);
            modified |= self.max_value.set(max);
        }
        modified |= self.increment.set(increment);
        let value = self.clamped(value);
        modified |= self.value.set(value);
        if modified {
            self.base.property_modified();
        }
    }
}

impl<T: OrdinalValue> Serializable for OrdinalProperty<T> {
    fn serialize(&self, s: &mut Serializer) {
        let mode = self.base.serialization_mode();
        self.base.serialize(s, &self.class_identifier());
        self.min_value.serialize(s, mode);
        self.max_value.serialize(s, mode);
        self.increment.serialize(s, mode);
        self.value.serialize(s, mode);
    }

    fn deserialize(&mut self, d: &mut Deserializer) -> Result<bool> {
        // Identity and presentation fields do not count as a value change.
        self.base.deserialize(d)?;
        let mode = self.base.serialization_mode();
        let before = self.state();
        let (value, min, max, increment) = before;
        self.min_value.deserialize(d, mode)?;
        self.max_value.deserialize(d, mode)?;
        self.increment.deserialize(d, mode)?;
        self.value.deserialize(d, mode)?;

        let id = self.base.identifier();
        let min = reject_nan(id, "minvalue", self.min_value(), min);
        let max = reject_nan(id, "maxvalue", self.max_value(), max);
        let increment = reject_nan(id, "increment", self.increment(), increment);
        let value = reject_nan(id, "value", self.get(), value);
        let (min, max) = repair_range(id, min, max);
        self.min_value.set(min);
        self.max_value.set(max);
        self.increment.set(increment);
        let value = self.clamped(value);
        self.value.set(value);

        let modified = self.state() != before;
        if modified {
            self.base.property_modified();
        }
        Ok(modified)
    }
}

impl<T: OrdinalValue> Property for OrdinalProperty<T> {
    fn base(&self) -> &PropertyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PropertyBase {
        &mut self.base
    }

    fn class_identifier(&self) -> String {
        format!("org.inviwo.{}Property", T::NAME)
    }

    fn set_current_state_as_default(&mut self) {
        self.base.set_current_state_as_default();
        self.value.set_as_default();
        self.min_value.set_as_default();
        self.max_value.set_as_default();
        self.increment.set_as_default();
    }

    fn reset_to_default_state(&mut self) {
        self.base.reset_to_default_state();
        let mut modified = self.value.reset();
        modified |= self.min_value.reset();
        modified |= self.max_value.reset();
        modified |= self.increment.reset();
        if modified {
            self.base.property_modified();
        }
    }

    fn set_from(&mut self, other: &dyn Property) -> bool {
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return false;
        };
        self.set_all(
            other.get(),
            other.min_value(),
            other.max_value(),
            other.increment(),
        );
        true
    }

    fn clone_property(&self) -> Box<dyn Property> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type FloatProperty = OrdinalProperty<f32>;
pub type DoubleProperty = OrdinalProperty<f64>;
pub type IntProperty = OrdinalProperty<i32>;
pub type IntSizeTProperty = OrdinalProperty<usize>;
pub type Int64Property = OrdinalProperty<i64>;

pub type FloatVec2Property = OrdinalProperty<Vec2>;
pub type FloatVec3Property = OrdinalProperty<Vec3>;
pub type FloatVec4Property = OrdinalProperty<Vec4>;
pub type DoubleVec2Property = OrdinalProperty<DVec2>;
pub type DoubleVec3Property = OrdinalProperty<DVec3>;
pub type DoubleVec4Property = OrdinalProperty<DVec4>;
pub type IntVec2Property = OrdinalProperty<IVec2>;
pub type IntVec3Property = OrdinalProperty<IVec3>;
pub type IntVec4Property = OrdinalProperty<IVec4>;
pub type IntSize2Property = OrdinalProperty<U64Vec2>;
pub type IntSize3Property = OrdinalProperty<U64Vec3>;
pub type IntSize4Property = OrdinalProperty<U64Vec4>;

pub type FloatMat2Property = OrdinalProperty<Mat2>;
pub type FloatMat3Property = OrdinalProperty<Mat3>;
pub type FloatMat4Property = OrdinalProperty<Mat4>;
pub type DoubleMat2Property = OrdinalProperty<DMat2>;
pub type DoubleMat3Property = OrdinalProperty<DMat3>;
pub type DoubleMat4Property = OrdinalProperty<DMat4>;

pub type FloatQuaternionProperty = OrdinalProperty<Quat>;
pub type DoubleQuaternionProperty = OrdinalProperty<DQuat>;
