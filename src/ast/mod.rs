// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{DlError, Value};

/// One struct of a DataLang tree: an optional own value, flat fields,
/// and child structs grouped by type name.
///
/// Child type groups keep the order in which each type was first added,
/// and every group keeps insertion order. The writer relies on both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructNode {
    #[serde(rename = "value", skip_serializing_if = "Option::is_none")]
    own_value: Option<Value>,
    fields: IndexMap<String, Value>,
    #[serde(rename = "structs")]
    children: IndexMap<String, Vec<StructNode>>,
}

impl StructNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            own_value: Some(value.into()),
            ..Self::default()
        }
    }

    // --- own value ---

    pub fn own_value(&self) -> Option<&Value> {
        self.own_value.as_ref()
    }

    pub fn set_own_value(&mut self, value: Option<Value>) {
        self.own_value = value;
    }

    pub fn take_own_value(&mut self) -> Option<Value> {
        self.own_value.take()
    }

    pub fn append_own_number(&mut self, n: f64) {
        match &mut self.own_value {
            Some(v) => v.append_number(n),
            None => self.own_value = Some(Value::from(n)),
        }
    }

    pub fn append_own_string(&mut self, s: &str) {
        match &mut self.own_value {
            Some(v) => v.append_string(s),
            None => self.own_value = Some(Value::from(s)),
        }
    }

    /// Converts the own value to `T`.
    pub fn own<T>(&self) -> Result<T, DlError>
    where
        T: TryFrom<Value, Error = DlError>,
    {
        let value = self.own_value.clone().ok_or_else(|| {
            DlError::type_error(
                "Struct has no own value".into(),
                "Declare the struct with a value, e.g. Room \"Kitchen\" { }",
                406,
            )
        })?;
        T::try_from(value)
    }

    // --- fields ---

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn put_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Sets a field, or deletes it when `value` is `None`.
    pub fn put(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(v) => {
                self.fields.insert(name.to_string(), v);
            }
            None => {
                self.fields.shift_remove(name);
            }
        }
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn append_number(&mut self, name: &str, n: f64) {
        match self.fields.get_mut(name) {
            Some(v) => v.append_number(n),
            None => self.put_field(name, n),
        }
    }

    pub fn append_string(&mut self, name: &str, s: &str) {
        match self.fields.get_mut(name) {
            Some(v) => v.append_string(s),
            None => self.put_field(name, s),
        }
    }

    pub fn append_bool(&mut self, name: &str, b: bool) {
        self.append_number(name, if b { 1.0 } else { 0.0 });
    }

    pub fn append_value(&mut self, name: &str, value: &Value) {
        match self.fields.get_mut(name) {
            Some(v) => v.append_value(value),
            None => self.put_field(name, value.clone()),
        }
    }

    /// Field value with references followed to a concrete value.
    ///
    /// Returns `None` for absent fields, dangling references and reference cycles.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        let mut value = self.fields.get(name)?;
        let mut hops = 0;
        while let Value::Reference(target) = value {
            hops += 1;
            if hops > self.fields.len() {
                return None;
            }
            value = self.fields.get(target)?;
        }
        Some(value)
    }

    /// Field value as stored, references left unresolved.
    pub fn raw_value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a typed field value.
    ///
    /// # Examples
    /// ```
    /// # use datalang::StructNode;
    /// let mut room = StructNode::new();
    /// room.put_field("width", 12.0);
    /// let width: u32 = room.get("width").unwrap();
    /// assert_eq!(width, 12);
    /// ```
    pub fn get<T>(&self, name: &str) -> Result<T, DlError>
    where
        T: TryFrom<Value, Error = DlError>,
    {
        let value = self.get_value(name).ok_or_else(|| {
            DlError::type_error(
                format!("Field '{}' not found", name),
                "Check that the field is declared in this struct",
                406,
            )
        })?;
        T::try_from(value.clone())
    }

    /// Like [`StructNode::get`], but an absent field is `Ok(None)`.
    pub fn get_optional<T>(&self, name: &str) -> Result<Option<T>, DlError>
    where
        T: TryFrom<Value, Error = DlError>,
    {
        match self.get_value(name) {
            Some(value) => Ok(Some(T::try_from(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn get_or<T>(&self, name: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = DlError>,
    {
        self.get(name).unwrap_or(default)
    }

    /// Reads an array field into exactly `len` elements, truncating or padding with defaults.
    pub fn get_array_padded<T>(&self, name: &str, len: usize) -> Result<Vec<T>, DlError>
    where
        T: TryFrom<Value, Error = DlError> + Default + Clone,
    {
        let mut out: Vec<T> = self.get(name)?;
        out.resize(len, T::default());
        Ok(out)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    // --- children ---

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.children.get(type_name).is_some_and(|list| !list.is_empty())
    }

    /// Adds a new empty child struct of `type_name` and returns it.
    pub fn add_child(&mut self, type_name: &str) -> &mut StructNode {
        self.push_child(type_name, StructNode::new())
    }

    pub fn push_child(&mut self, type_name: &str, node: StructNode) -> &mut StructNode {
        let list = self.children.entry(type_name.to_string()).or_default();
        list.push(node);
        let last = list.len() - 1;
        &mut list[last]
    }

    /// Children of one type in insertion order; empty if there are none.
    pub fn children(&self, type_name: &str) -> &[StructNode] {
        self.children.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children_mut(&mut self, type_name: &str) -> &mut [StructNode] {
        match self.children.get_mut(type_name) {
            Some(list) => list.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Child type names in first-introduction order.
    pub fn child_types(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn child_groups(&self) -> impl Iterator<Item = (&str, &[StructNode])> {
        self.children.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn child_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    // --- copying ---

    /// A fully independent deep copy.
    pub fn copy(&self) -> StructNode {
        self.clone()
    }

    /// Copies own value (if any), fields and children into `target`.
    ///
    /// Same-named fields are overwritten; children are appended after the
    /// target's existing ones.
    pub fn copy_into(&self, target: &mut StructNode) {
        if let Some(value) = &self.own_value {
            target.own_value = Some(value.clone());
        }
        for (name, value) in &self.fields {
            target.fields.insert(name.clone(), value.clone());
        }
        for (type_name, list) in &self.children {
            for child in list {
                target.push_child(type_name, child.clone());
            }
        }
    }
}

impl fmt::Display for StructNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::to_string(self))
    }
}
