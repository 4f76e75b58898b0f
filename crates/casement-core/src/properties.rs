//! Typed property store.
//!
//! A [`PropertyGroup`] maps string keys to exactly one [`PropertyValue`].
//! It is the configuration medium for window creation and the read-back
//! surface for display and window attributes.
//!
//! Strings are owned by the group and dropped with it (or when overwritten).
//! Pointers are opaque: the group never dereferences or frees them, the
//! caller keeps ownership of the referent.
//!
//! The raw pointer payload makes `PropertyGroup` neither `Send` nor `Sync`,
//! so a group stays on the thread that created it.
//!
//! # Example
//!
//! ```
//! use casement_core::properties::{PropertyGroup, PropertyValue};
//!
//! let mut props = PropertyGroup::new();
//! props.set("window.create.title", "Hello");
//! props.set("window.create.width", 1280i64);
//!
//! assert_eq!(props.get_string("window.create.title", ""), "Hello");
//! assert_eq!(props.get("window.create.width"), Some(&PropertyValue::Integer(1280)));
//! ```

use std::borrow::Cow;
use std::cell::RefCell;
use std::ffi::c_void;
use std::fmt;

use crate::alloc::HashMap;

/// The kind of value stored under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Boolean,
    Integer,
    Float,
    String,
    Pointer,
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f32),
    String(String),
    /// Opaque pointer; never dereferenced or freed by the store.
    Pointer(*mut c_void),
}

impl PropertyValue {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::Boolean(_) => PropertyType::Boolean,
            PropertyValue::Integer(_) => PropertyType::Integer,
            PropertyValue::Float(_) => PropertyType::Float,
            PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Pointer(_) => PropertyType::Pointer,
        }
    }

    /// Boolean view with coercion from the other scalar kinds.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            PropertyValue::Integer(value) => Some(*value != 0),
            PropertyValue::Float(value) => Some(*value != 0.0),
            PropertyValue::String(value) => parse_bool(value),
            PropertyValue::Pointer(_) => None,
        }
    }

    /// Integer view; floats round to the nearest integer.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            PropertyValue::Float(value) => Some(value.round() as i64),
            PropertyValue::Boolean(value) => Some(*value as i64),
            PropertyValue::String(value) => {
                let trimmed = value.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|v| v.round() as i64))
            }
            PropertyValue::Pointer(_) => None,
        }
    }

    pub fn to_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(value) => Some(*value),
            PropertyValue::Integer(value) => Some(*value as f32),
            PropertyValue::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
            PropertyValue::String(value) => value.trim().parse::<f32>().ok(),
            PropertyValue::Pointer(_) => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value as i64)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Integer(value as i64)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<*mut c_void> for PropertyValue {
    fn from(value: *mut c_void) -> Self {
        PropertyValue::Pointer(value)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
        || value == "1"
    {
        Some(true)
    } else if value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("off")
        || value == "0"
    {
        Some(false)
    } else {
        None
    }
}

/// Errors raised by the property store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The backing map could not reserve room for the requested entries.
    AllocationFailure { requested: usize },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::AllocationFailure { requested } => {
                write!(f, "Failed to allocate property storage for {} entries", requested)
            }
        }
    }
}

impl std::error::Error for PropertyError {}

/// Result type alias for property store operations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// A string-keyed, heterogeneously typed value container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyGroup {
    values: HashMap<String, PropertyValue>,
}

impl PropertyGroup {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Create a group with room for `capacity` entries, failing instead of
    /// aborting when the allocation cannot be satisfied.
    pub fn try_with_capacity(capacity: usize) -> PropertyResult<Self> {
        let mut group = Self::new();
        group.try_reserve(capacity)?;
        Ok(group)
    }

    pub fn try_reserve(&mut self, additional: usize) -> PropertyResult<()> {
        self.values
            .try_reserve(additional)
            .map_err(|_| PropertyError::AllocationFailure {
                requested: additional,
            })
    }

    /// Insert or replace the value stored under `key`.
    ///
    /// The previous value is returned; a replaced string is dropped by the
    /// caller discarding it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, PropertyValue::Boolean(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, PropertyValue::Integer(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.set(key, PropertyValue::Float(value));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, PropertyValue::String(value.into()));
    }

    pub fn set_pointer(&mut self, key: impl Into<String>, value: *mut c_void) {
        self.set(key, PropertyValue::Pointer(value));
    }

    /// The stored variant, or `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn property_type(&self, key: &str) -> Option<PropertyType> {
        self.values.get(key).map(PropertyValue::property_type)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(PropertyValue::to_bool).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(PropertyValue::to_int).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key).and_then(PropertyValue::to_float).unwrap_or(default)
    }

    /// String view of a property. Stored strings are borrowed; numbers and
    /// booleans are formatted.
    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> Cow<'a, str> {
        match self.get(key) {
            Some(PropertyValue::String(value)) => Cow::Borrowed(value.as_str()),
            Some(PropertyValue::Integer(value)) => Cow::Owned(value.to_string()),
            Some(PropertyValue::Float(value)) => Cow::Owned(value.to_string()),
            Some(PropertyValue::Boolean(value)) => Cow::Borrowed(if *value { "true" } else { "false" }),
            Some(PropertyValue::Pointer(_)) | None => Cow::Borrowed(default),
        }
    }

    /// Pointers are only returned for keys that hold a pointer.
    pub fn get_pointer(&self, key: &str) -> Option<*mut c_void> {
        match self.get(key) {
            Some(PropertyValue::Pointer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Snapshot of all keys, sorted so enumeration is reproducible.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Visit every property in key order.
    pub fn enumerate(&self, mut callback: impl FnMut(&str, &PropertyValue)) {
        for key in self.keys() {
            if let Some(value) = self.values.get(&key) {
                callback(&key, value);
            }
        }
    }

    /// Unordered iteration over the stored entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Copy every property into `dest`, overwriting matching keys.
    pub fn copy_into(&self, dest: &mut PropertyGroup) {
        for (key, value) in &self.values {
            dest.values.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

thread_local! {
    static GLOBAL_PROPERTIES: RefCell<PropertyGroup> = RefCell::new(PropertyGroup::new());
}

/// Run `f` against the default property group of the calling thread.
///
/// Hosts treat the thread driving the video subsystem as the owner of this
/// group. Calls do not nest: accessing the global group from inside `f`
/// panics.
pub fn with_global_properties<R>(f: impl FnOnce(&mut PropertyGroup) -> R) -> R {
    GLOBAL_PROPERTIES.with(|props| f(&mut props.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_every_kind() {
        let mut payload = 7u8;
        let ptr = &mut payload as *mut u8 as *mut c_void;

        let mut props = PropertyGroup::new();
        props.set("bool", true);
        props.set("int", -42i64);
        props.set("float", 1.5f32);
        props.set("string", "value");
        props.set("pointer", ptr);

        assert_eq!(props.get("bool"), Some(&PropertyValue::Boolean(true)));
        assert_eq!(props.get("int"), Some(&PropertyValue::Integer(-42)));
        assert_eq!(props.get("float"), Some(&PropertyValue::Float(1.5)));
        assert_eq!(props.get("string"), Some(&PropertyValue::String("value".to_string())));
        assert_eq!(props.get("pointer"), Some(&PropertyValue::Pointer(ptr)));
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn test_remove_then_get_is_none() {
        let mut props = PropertyGroup::new();
        props.set("key", 1i64);
        assert!(props.has("key"));

        assert_eq!(props.remove("key"), Some(PropertyValue::Integer(1)));
        assert_eq!(props.get("key"), None);
        assert!(!props.has("key"));
        assert_eq!(props.remove("key"), None);
    }

    #[test]
    fn test_set_replaces_kind() {
        let mut props = PropertyGroup::new();
        props.set("key", "text");
        assert_eq!(props.property_type("key"), Some(PropertyType::String));

        let previous = props.set("key", 3.0f32);
        assert_eq!(previous, Some(PropertyValue::String("text".to_string())));
        assert_eq!(props.property_type("key"), Some(PropertyType::Float));
    }

    #[test]
    fn test_typed_getters_coerce() {
        let mut props = PropertyGroup::new();
        props.set("int", 3i64);
        props.set("float", 2.6f32);
        props.set("yes", "true");
        props.set("number_text", " 12 ");
        props.set("garbage", "abc");

        assert!(props.get_bool("int", false));
        assert_eq!(props.get_int("float", 0), 3);
        assert_eq!(props.get_float("int", 0.0), 3.0);
        assert!(props.get_bool("yes", false));
        assert_eq!(props.get_int("number_text", 0), 12);
        assert_eq!(props.get_int("garbage", -1), -1);
        assert_eq!(props.get_int("missing", 99), 99);
        assert_eq!(props.get_string("int", ""), "3");
        assert_eq!(props.get_string("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_pointer_getter_is_exact() {
        let mut props = PropertyGroup::new();
        props.set("int", 5i64);
        assert_eq!(props.get_pointer("int"), None);
        assert_eq!(props.get_string("int", "x"), "5");
    }

    #[test]
    fn test_keys_snapshot_sorted() {
        let mut props = PropertyGroup::new();
        props.set("b", 1i64);
        props.set("a", 2i64);
        props.set("c", 3i64);

        let keys = props.keys();
        assert_eq!(keys, vec!["a", "b", "c"]);

        let mut visited = Vec::new();
        props.enumerate(|key, _| visited.push(key.to_string()));
        assert_eq!(visited, keys);
    }

    #[test]
    fn test_copy_into_overwrites() {
        let mut source = PropertyGroup::new();
        source.set("shared", "new");
        source.set("only_source", true);

        let mut dest = PropertyGroup::new();
        dest.set("shared", "old");
        dest.set("only_dest", 1i64);

        source.copy_into(&mut dest);
        assert_eq!(dest.get_string("shared", ""), "new");
        assert!(dest.get_bool("only_source", false));
        assert_eq!(dest.get_int("only_dest", 0), 1);
    }

    #[test]
    fn test_global_group_is_independent() {
        with_global_properties(|props| props.set("global.test", 10i64));

        let local = PropertyGroup::new();
        assert!(!local.has("global.test"));
        assert_eq!(with_global_properties(|props| props.get_int("global.test", 0)), 10);
        with_global_properties(|props| props.remove("global.test"));
    }

    #[test]
    fn test_try_with_capacity() {
        let props = PropertyGroup::try_with_capacity(16).unwrap();
        assert!(props.is_empty());

        let err = PropertyGroup::try_with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err, PropertyError::AllocationFailure { requested: usize::MAX });
    }
}
