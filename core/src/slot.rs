use crate::gate_error::OperationError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::Index;

/// Where a latch stores its result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKey {
  /// Creation-order index, assigned to every latch.
  Index(usize),
  /// Caller-chosen name. The latch still consumes an index.
  Name(String),
}

impl Display for SlotKey {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      SlotKey::Index(index) => write!(f, "{}", index),
      SlotKey::Name(name) => write!(f, "{}", name),
    }
  }
}

impl From<usize> for SlotKey {
  fn from(index: usize) -> Self {
    SlotKey::Index(index)
  }
}

impl From<&str> for SlotKey {
  fn from(name: &str) -> Self {
    SlotKey::Name(name.to_string())
  }
}

impl From<String> for SlotKey {
  fn from(name: String) -> Self {
    SlotKey::Name(name)
  }
}

/// A value stored in a slot, produced by applying a latch's mapping to its completion arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
  Value(Value),
  Error(OperationError),
  List(Vec<SlotValue>),
  Record(BTreeMap<String, SlotValue>),
}

impl SlotValue {
  pub fn null() -> Self {
    SlotValue::Value(Value::Null)
  }

  pub fn is_null(&self) -> bool {
    matches!(self, SlotValue::Value(Value::Null))
  }

  pub fn as_value(&self) -> Option<&Value> {
    match self {
      SlotValue::Value(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_error(&self) -> Option<&OperationError> {
    match self {
      SlotValue::Error(e) => Some(e),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[SlotValue]> {
    match self {
      SlotValue::List(values) => Some(values),
      _ => None,
    }
  }

  pub fn as_record(&self) -> Option<&BTreeMap<String, SlotValue>> {
    match self {
      SlotValue::Record(fields) => Some(fields),
      _ => None,
    }
  }

  /// Looks up a field of a record slot.
  pub fn field(&self, key: &str) -> Option<&SlotValue> {
    self.as_record().and_then(|fields| fields.get(key))
  }

  /// Builds a record from `(key, value)` pairs.
  pub fn record<K, V, I>(fields: I) -> Self
  where
    K: Into<String>,
    V: Into<SlotValue>,
    I: IntoIterator<Item = (K, V)>, {
    SlotValue::Record(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

impl From<Value> for SlotValue {
  fn from(value: Value) -> Self {
    SlotValue::Value(value)
  }
}

impl From<&str> for SlotValue {
  fn from(value: &str) -> Self {
    SlotValue::Value(Value::from(value))
  }
}

impl From<String> for SlotValue {
  fn from(value: String) -> Self {
    SlotValue::Value(Value::from(value))
  }
}

impl From<i64> for SlotValue {
  fn from(value: i64) -> Self {
    SlotValue::Value(Value::from(value))
  }
}

impl From<OperationError> for SlotValue {
  fn from(error: OperationError) -> Self {
    SlotValue::Error(error)
  }
}

impl From<Vec<SlotValue>> for SlotValue {
  fn from(values: Vec<SlotValue>) -> Self {
    SlotValue::List(values)
  }
}

impl PartialEq<Value> for SlotValue {
  fn eq(&self, other: &Value) -> bool {
    self.as_value() == Some(other)
  }
}

/// The aggregated result set handed to a gate's notifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateResults {
  slots: BTreeMap<SlotKey, SlotValue>,
}

impl GateResults {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&SlotValue> {
    self.slots.get(&SlotKey::Index(index))
  }

  pub fn get_named(&self, name: &str) -> Option<&SlotValue> {
    self.slots.get(&SlotKey::Name(name.to_string()))
  }

  pub fn get_key(&self, key: &SlotKey) -> Option<&SlotValue> {
    self.slots.get(key)
  }

  pub fn contains_key(&self, key: &SlotKey) -> bool {
    self.slots.contains_key(key)
  }

  /// Index-keyed slots in creation order, stopping at the first missing index.
  pub fn to_vec(&self) -> Vec<SlotValue> {
    (0..)
      .map_while(|index| self.get(index).cloned())
      .collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &SlotValue)> {
    self.slots.iter()
  }

  pub fn into_inner(self) -> BTreeMap<SlotKey, SlotValue> {
    self.slots
  }

  /// Stores `value` under `key`. An occupied slot is left untouched and `false` is returned.
  pub(crate) fn insert(&mut self, key: SlotKey, value: SlotValue) -> bool {
    match self.slots.entry(key) {
      std::collections::btree_map::Entry::Vacant(entry) => {
        entry.insert(value);
        true
      }
      std::collections::btree_map::Entry::Occupied(_) => false,
    }
  }
}

impl Index<usize> for GateResults {
  type Output = SlotValue;

  fn index(&self, index: usize) -> &Self::Output {
    match self.get(index) {
      Some(value) => value,
      None => panic!("no result at index {}", index),
    }
  }
}

impl Index<&str> for GateResults {
  type Output = SlotValue;

  fn index(&self, name: &str) -> &Self::Output {
    match self.get_named(name) {
      Some(value) => value,
      None => panic!("no result named {}", name),
    }
  }
}

impl IntoIterator for GateResults {
  type Item = (SlotKey, SlotValue);
  type IntoIter = std::collections::btree_map::IntoIter<SlotKey, SlotValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.slots.into_iter()
  }
}
