use crate::completion_args::CompletionArgs;
use crate::gate_error::GateError;
use crate::slot::SlotValue;
use serde_json::Value;
use std::collections::BTreeMap;


/// A value that a field mapping stores verbatim instead of resolving it positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedConstant(Value);

impl ScopedConstant {
  pub fn new(value: impl Into<Value>) -> Self {
    Self(value.into())
  }

  pub fn value(&self) -> &Value {
    &self.0
  }

  pub fn into_value(self) -> Value {
    self.0
  }
}

/// How one field of a [`Mapping::Fields`] record is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMapping {
  /// The completion argument at this position.
  Position(usize),
  /// A scoped constant, stored as is.
  Constant(ScopedConstant),
  /// A literal, stored as is.
  Literal(Value),
}

impl FieldMapping {
  fn resolve(&self, args: &CompletionArgs) -> SlotValue {
    match self {
      FieldMapping::Position(position) => args.arg(*position),
      FieldMapping::Constant(constant) => SlotValue::Value(constant.value().clone()),
      FieldMapping::Literal(value) => SlotValue::Value(value.clone()),
    }
  }
}

impl From<ScopedConstant> for FieldMapping {
  fn from(constant: ScopedConstant) -> Self {
    FieldMapping::Constant(constant)
  }
}

/// Describes what a latch stores in its slot when it is completed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mapping {
  /// Every completion argument, the error slot included.
  #[default]
  All,
  /// Only the argument at this position.
  Position(usize),
  /// A record built field by field.
  Fields(Vec<(String, FieldMapping)>),
}

impl Mapping {
  pub fn all() -> Self {
    Mapping::All
  }

  pub fn position(position: usize) -> Self {
    Mapping::Position(position)
  }

  pub fn fields() -> FieldsBuilder {
    FieldsBuilder::default()
  }

  pub fn apply(&self, args: &CompletionArgs) -> SlotValue {
    match self {
      Mapping::All => args.all(),
      Mapping::Position(position) => args.arg(*position),
      Mapping::Fields(fields) => SlotValue::Record(
        fields
          .iter()
          .map(|(key, field)| (key.clone(), field.resolve(args)))
          .collect::<BTreeMap<_, _>>(),
      ),
    }
  }
}

impl From<usize> for Mapping {
  fn from(position: usize) -> Self {
    Mapping::Position(position)
  }
}

impl From<FieldsBuilder> for Mapping {
  fn from(builder: FieldsBuilder) -> Self {
    builder.build()
  }
}

impl TryFrom<Value> for Mapping {
  type Error = GateError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Null => Ok(Mapping::All),
      Value::Number(ref n) => n
        .as_u64()
        .map(|p| Mapping::Position(p as usize))
        .ok_or_else(|| GateError::of_invalid_mapping(format!("position must be a non-negative integer: {}", n))),
      Value::Object(members) => {
        let mut fields = Vec::with_capacity(members.len());
        for (key, member) in members {
          let field = match member {
            Value::Number(ref n) => match n.as_u64() {
              Some(p) => FieldMapping::Position(p as usize),
              None => {
                return Err(GateError::of_invalid_mapping(format!(
                  "field `{}` must be a non-negative integer position: {}",
                  key, n
                )))
              }
            },
            other => FieldMapping::Literal(other),
          };
          fields.push((key, field));
        }
        Ok(Mapping::Fields(fields))
      }
      other => Err(GateError::of_invalid_mapping(format!(
        "expected null, a position or an object, got {}",
        other
      ))),
    }
  }
}

/// Builds a [`Mapping::Fields`] record mapping.
#[derive(Debug, Clone, Default)]
pub struct FieldsBuilder {
  fields: Vec<(String, FieldMapping)>,
}

impl FieldsBuilder {
  /// Fills `key` with the completion argument at `position`.
  pub fn arg(mut self, key: impl Into<String>, position: usize) -> Self {
    self.fields.push((key.into(), FieldMapping::Position(position)));
    self
  }

  pub fn constant(mut self, key: impl Into<String>, constant: ScopedConstant) -> Self {
    self.fields.push((key.into(), FieldMapping::Constant(constant)));
    self
  }

  pub fn literal(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.fields.push((key.into(), FieldMapping::Literal(value.into())));
    self
  }

  pub fn field(mut self, key: impl Into<String>, field: impl Into<FieldMapping>) -> Self {
    self.fields.push((key.into(), field.into()));
    self
  }

  pub fn build(self) -> Mapping {
    Mapping::Fields(self.fields)
  }
}
