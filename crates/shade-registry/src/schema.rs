//! Typed parameter schemas
//!
//! A [`ParamSchema`] is an ordered set of named parameters, each with a
//! primitive type tag, a required flag and a free-text description. The
//! description is part of what the consuming model reads, so it is carried
//! verbatim into the rendered JSON Schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ValidationError;

/// Primitive types a parameter may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
}

impl ParamType {
    /// JSON Schema type name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
        }
    }

    /// Whether `value` is acceptable for this type.
    ///
    /// `number` accepts any JSON number, `integer` only whole ones.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

/// Outcome of checking arguments against a schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub missing: Vec<String>,
    pub mistyped: Vec<String>,
    /// Arguments not declared by the schema. Reported, never fatal.
    pub unexpected: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.mistyped.is_empty()
    }

    /// Convert into the error form, or `None` if the arguments passed.
    pub fn into_error(self) -> Option<ValidationError> {
        if self.is_valid() {
            return None;
        }
        Some(ValidationError {
            missing: self.missing,
            mistyped: self.mistyped,
            malformed: false,
        })
    }
}

/// Ordered parameter declarations for a tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSchema {
    params: Vec<(String, ParamSpec)>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required parameter
    pub fn required(
        self,
        name: impl Into<String>,
        kind: ParamType,
        description: impl Into<String>,
    ) -> Self {
        self.with(name, kind, true, description)
    }

    /// Declare an optional parameter
    pub fn optional(
        self,
        name: impl Into<String>,
        kind: ParamType,
        description: impl Into<String>,
    ) -> Self {
        self.with(name, kind, false, description)
    }

    fn with(
        mut self,
        name: impl Into<String>,
        kind: ParamType,
        required: bool,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let spec = ParamSpec {
            kind,
            required,
            description: description.into(),
        };
        // Redeclaring a name replaces it in place
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = spec,
            None => self.params.push((name, spec)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as a JSON Schema object for the listing surface
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, spec) in &self.params {
            let mut prop = Map::new();
            prop.insert("type".into(), json!(spec.kind.as_str()));
            if !spec.description.is_empty() {
                prop.insert("description".into(), json!(spec.description));
            }
            properties.insert(name.clone(), Value::Object(prop));
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|(_, s)| s.required)
            .map(|(n, _)| n.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check `arguments` against the declared parameters
    pub fn validate(&self, arguments: &Map<String, Value>) -> Validation {
        let mut validation = Validation::default();

        for (name, spec) in &self.params {
            match arguments.get(name) {
                None | Some(Value::Null) if spec.required => validation.missing.push(name.clone()),
                None | Some(Value::Null) => {}
                Some(value) if !spec.kind.accepts(value) => validation.mistyped.push(name.clone()),
                Some(_) => {}
            }
        }

        validation.unexpected = arguments
            .keys()
            .filter(|k| self.get(k).is_none())
            .cloned()
            .collect();

        validation
    }
}
