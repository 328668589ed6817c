//! Core types for payload schemas.

use std::fmt;

use serde_json::Value;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Join a field name onto a dot-delimited path. An empty base is the root.
pub(crate) fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", base, key)
    }
}

/// Kind of value a field must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    String,
    Number,
    Boolean,
    Date,
    /// 24-character hexadecimal document identifier.
    ObjectId,
    Object,
    Array,
    /// Type name the schema declared but this crate does not recognize.
    /// Values of an unknown type are always accepted.
    Unknown(String),
}

impl TypeDescriptor {
    /// Parse a type name from a schema description.
    ///
    /// Matching is case-insensitive. Unrecognized names become
    /// [`TypeDescriptor::Unknown`] carrying the name as written.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "string" => TypeDescriptor::String,
            "number" => TypeDescriptor::Number,
            "boolean" => TypeDescriptor::Boolean,
            "date" => TypeDescriptor::Date,
            "objectid" | "schemaobjectid" => TypeDescriptor::ObjectId,
            "object" => TypeDescriptor::Object,
            "array" => TypeDescriptor::Array,
            _ => TypeDescriptor::Unknown(name.to_string()),
        }
    }

    /// Name used in violation messages and normalized schemas.
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::String => "string",
            TypeDescriptor::Number => "number",
            TypeDescriptor::Boolean => "boolean",
            TypeDescriptor::Date => "Date",
            TypeDescriptor::ObjectId => "ObjectId",
            TypeDescriptor::Object => "object",
            TypeDescriptor::Array => "array",
            TypeDescriptor::Unknown(name) => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDescriptor::Unknown(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validation rule for a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field_type: TypeDescriptor,
    pub required: bool,
    /// Nested rules, only consulted when `field_type` is `Object`.
    pub properties: Option<Schema>,
    /// Item type, only consulted when `field_type` is `Array`.
    pub item_type: Option<TypeDescriptor>,
}

impl FieldRule {
    /// Create an optional rule of the given type.
    pub fn new(field_type: TypeDescriptor) -> Self {
        Self {
            field_type,
            required: false,
            properties: None,
            item_type: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn properties(mut self, properties: Schema) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn items(mut self, item_type: TypeDescriptor) -> Self {
        self.item_type = Some(item_type);
        self
    }
}

/// Ordered mapping from field name to rule.
///
/// Fields are kept in declaration order, which is also the order
/// violations are reported in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces its rule in place.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(name.into(), rule);
        self
    }

    pub(crate) fn insert(&mut self, name: String, rule: FieldRule) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.fields.push((name, rule)),
        }
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Options for payload validation.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// When true, payload keys the schema does not declare are accepted.
    /// Defaults to false: every undeclared key is a violation.
    pub allow_additional: bool,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or reject keys the schema does not declare.
    pub fn allow_additional(mut self, allow: bool) -> Self {
        self.allow_additional = allow;
        self
    }
}
