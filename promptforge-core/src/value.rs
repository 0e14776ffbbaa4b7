// Copyright 2026 PromptForge Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The open variable mapping used throughout prompt rendering and scene
//! evaluation, modeled as a closed sum type instead of an untyped JSON blob.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A primitive leaf, sequence, or map — the shape `provided_variables`,
/// `default`, `condition.value`, and `input_variables` all take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical textual form used for enum-membership comparison: booleans
    /// render as lowercase `"true"`/`"false"`, everything else uses its
    /// natural display form.
    pub fn canonical_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::String(s) => s.clone(),
            Value::Seq(_) | Value::Map(_) => self.to_string(),
        }
    }

    /// Membership test used by the `in`/`not_in` condition operators.
    pub fn is_in(&self, haystack: &Value) -> bool {
        match haystack.as_sequence() {
            Some(items) => items.iter().any(|v| v == self),
            None => false,
        }
    }

    /// Jinja-style truthiness: used by `{% if %}` conditions and by the
    /// scene condition evaluator's `exists`/`not_exists` fallback.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Seq(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
        }
    }

    /// Resolves a dotted path (`"user.name"`) against a `Map` value,
    /// returning `None` on any missing segment or non-map intermediate.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                Value::Map(entries) => current = entries.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Seq(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).unwrap_or_default();
                write!(f, "{json}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// A string-keyed bag of [`Value`]s — the effective type of
/// `provided_variables`, `step.variables`, and `chain_context`.
pub type VarMap = BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_string_lowercases_bools() {
        assert_eq!(Value::Bool(true).canonical_string(), "true");
        assert_eq!(Value::Bool(false).canonical_string(), "false");
    }

    #[test]
    fn canonical_string_renders_integers_without_trailing_zero() {
        assert_eq!(Value::Number(3.0).canonical_string(), "3");
        assert_eq!(Value::Number(3.5).canonical_string(), "3.5");
    }

    #[test]
    fn is_in_requires_sequence_haystack() {
        let haystack = Value::String("not-a-seq".to_string());
        assert!(!Value::String("x".to_string()).is_in(&haystack));

        let seq = Value::Seq(vec![Value::from("a"), Value::from("b")]);
        assert!(Value::from("a").is_in(&seq));
        assert!(!Value::from("c").is_in(&seq));
    }
}
