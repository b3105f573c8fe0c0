//! Declarative input/output contracts shared by prompt rendering and reply
//! validation.

use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
}

impl FieldKind {
    fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::TextList => "array of strings",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Text, Value::String(_)) => true,
            (FieldKind::TextList, Value::Array(items)) => items.iter().all(Value::is_string),
            _ => false,
        }
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    fn json_schema(&self, description: &str) -> Value {
        match self {
            FieldKind::Text => json!({ "type": "string", "description": description }),
            FieldKind::TextList => json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    /// Whether an empty string or empty list satisfies the contract.
    pub allow_empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NotAnObject { found: &'static str },
    Missing { field: &'static str },
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    Empty { field: &'static str },
}

impl Violation {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Violation::NotAnObject { .. } => None,
            Violation::Missing { field }
            | Violation::WrongType { field, .. }
            | Violation::Empty { field } => Some(*field),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotAnObject { found } => write!(f, "expected an object, found {}", found),
            Violation::Missing { field } => write!(f, "field '{}' is missing", field),
            Violation::WrongType {
                field,
                expected,
                found,
            } => write!(f, "field '{}' must be {}, found {}", field, expected, found),
            Violation::Empty { field } => write!(f, "field '{}' must not be empty", field),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(items) if items.iter().all(Value::is_string) => "array of strings",
        Value::Array(_) => "array with non-string items",
        Value::Object(_) => "object",
    }
}

pub fn describe_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Contract {
    /// Checks presence and primitive type of every field. Extra keys are ignored.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), Vec<Violation>> {
        let Value::Object(object) = value else {
            return Err(vec![Violation::NotAnObject {
                found: json_type_name(value),
            }]);
        };

        let violations: Vec<Violation> = self
            .fields
            .iter()
            .filter_map(|spec| check_field(spec, object))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Validates caller-supplied input. The first offending field is named
    /// in the resulting `InvalidInput`.
    pub fn check_input<T: Serialize>(&self, input: &T) -> Result<()> {
        let value = serde_json::to_value(input)?;
        match self.validate(&value) {
            Ok(()) => Ok(()),
            Err(violations) => {
                let field = violations
                    .first()
                    .and_then(Violation::field)
                    .unwrap_or(self.name);
                Err(Error::invalid_input(field, describe_violations(&violations)))
            }
        }
    }

    /// Parses a raw model reply, validates it and deserializes the typed value.
    pub fn decode<T: DeserializeOwned>(&self, raw: &str) -> Result<T> {
        let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
            warn!(contract = self.name, "Reply is not valid JSON: {}", e);
            Error::schema_violation(self.name, format!("reply is not valid JSON: {}", e))
        })?;

        if let Err(violations) = self.validate(&value) {
            let detail = describe_violations(&violations);
            warn!(contract = self.name, "Reply rejected: {}", detail);
            return Err(Error::schema_violation(self.name, detail));
        }

        serde_json::from_value(value).map_err(|e| Error::schema_violation(self.name, e.to_string()))
    }

    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|spec| (spec.name.to_string(), spec.kind.json_schema(spec.description)))
            .collect();
        let required: Vec<&str> = self.fields.iter().map(|spec| spec.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }

    /// One `* name - description` line per field, in declaration order.
    pub fn guidance(&self) -> String {
        self.fields
            .iter()
            .map(|spec| format!("* {} - {}", spec.name, spec.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn check_field(spec: &FieldSpec, object: &Map<String, Value>) -> Option<Violation> {
    let Some(value) = object.get(spec.name) else {
        return Some(Violation::Missing { field: spec.name });
    };
    if !spec.kind.matches(value) {
        return Some(Violation::WrongType {
            field: spec.name,
            expected: spec.kind.type_name(),
            found: json_type_name(value),
        });
    }
    if !spec.allow_empty && spec.kind.is_empty(value) {
        return Some(Violation::Empty { field: spec.name });
    }
    None
}

pub const GENERATE_INPUT: Contract = Contract {
    name: "generateRecipeFromPhotoInput",
    description: "A photo of ingredients to build a recipe from.",
    fields: &[FieldSpec {
        name: "photoDataUri",
        kind: FieldKind::Text,
        description: "A photo of ingredients, as a data URI that must include a MIME type and use Base64 encoding. Expected format: 'data:<mimetype>;base64,<encoded_data>'.",
        allow_empty: false,
    }],
};

pub const RECIPE_OUTPUT: Contract = Contract {
    name: "generateRecipeFromPhotoOutput",
    description: "A recipe built from the ingredients in the photo.",
    fields: &[
        FieldSpec {
            name: "recipeName",
            kind: FieldKind::Text,
            description: "The name of the recipe.",
            allow_empty: true,
        },
        FieldSpec {
            name: "ingredients",
            kind: FieldKind::TextList,
            description: "A list of ingredients required to make the recipe.",
            allow_empty: true,
        },
        FieldSpec {
            name: "instructions",
            kind: FieldKind::TextList,
            description: "A list of numbered instructions to make the recipe.",
            allow_empty: true,
        },
        FieldSpec {
            name: "servingSize",
            kind: FieldKind::Text,
            description: "The serving size of the recipe.",
            allow_empty: true,
        },
    ],
};

pub const IMPROVE_INPUT: Contract = Contract {
    name: "improveRecipeInput",
    description: "An existing recipe and how to improve it.",
    fields: &[
        FieldSpec {
            name: "recipe",
            kind: FieldKind::Text,
            description: "The recipe to improve, including ingredients and instructions.",
            allow_empty: false,
        },
        FieldSpec {
            name: "improvementInstructions",
            kind: FieldKind::Text,
            description: "Instructions on how to improve the recipe, e.g., \"make it healthier\", \"add more flavor\", \"make it vegetarian\".",
            allow_empty: false,
        },
    ],
};

pub const IMPROVED_OUTPUT: Contract = Contract {
    name: "improveRecipeOutput",
    description: "The improved recipe.",
    fields: &[FieldSpec {
        name: "improvedRecipe",
        kind: FieldKind::Text,
        description: "The improved recipe.",
        allow_empty: true,
    }],
};
