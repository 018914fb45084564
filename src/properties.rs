use std::collections::HashMap;

/// A single custom property value from the map document.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A boolean property.
    Bool(bool),
    /// An integer property (Tiled `int` and `object` references).
    Int(i64),
    /// A floating point property.
    Float(f32),
    /// A string property (Tiled `string`, `file`, `color`, `class`).
    String(String),
}

/// A custom property bag attached to a map, layer, object, or tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(HashMap<String, PropertyValue>);

impl Properties {
    /// Creates an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.0.insert(name.into(), value);
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// The property as a bool, if present and boolean.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The property as an i64, if present and integral.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The property as an f32; integer properties coerce losslessly enough
    /// for map data.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// The property as a string slice, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Whether the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of properties in the bag.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_reject_mismatched_types() {
        let mut props = Properties::new();
        props.insert("speed", PropertyValue::Float(2.5));
        props.insert("lives", PropertyValue::Int(3));
        props.insert("name", PropertyValue::String("slime".into()));

        assert_eq!(props.get_f32("speed"), Some(2.5));
        assert_eq!(props.get_i64("lives"), Some(3));
        assert_eq!(props.get_f32("lives"), Some(3.0));
        assert_eq!(props.get_str("name"), Some("slime"));
        assert_eq!(props.get_bool("speed"), None);
        assert_eq!(props.get_i64("missing"), None);
    }
}
