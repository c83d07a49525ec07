//! The extracted configuration model.
//!
//! A [Config] is the flat result of a parse run: resources, modules, locals
//! and variables in discovery order, with every attribute already reduced to
//! a [Value]. The model serializes as-is; `type` is the serialized name of
//! [Resource::resource_type].

use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// One `resource` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// First label, e.g. `aws_lambda_function`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Second label.
    pub name: String,
    /// All labels in block order.
    pub labels: Vec<String>,
    /// Evaluated attributes; nested blocks fold in as object members.
    pub attributes: IndexMap<String, Value>,
}

/// One `module` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    /// Text of the `source` attribute, empty when the block has none.
    pub source: String,
    pub labels: Vec<String>,
    pub attributes: IndexMap<String, Value>,
}

/// One `locals` block. A file with three `locals` blocks yields three
/// entries, each holding that block's definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Local {
    pub attributes: IndexMap<String, Value>,
}

/// One `variable` block. Part of the model for output compatibility;
/// extraction does not populate these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub attributes: IndexMap<String, Value>,
}

/// Everything extracted from a set of configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    pub resources: Vec<Resource>,
    pub modules: Vec<Module>,
    pub locals: Vec<Local>,
    pub variables: Vec<Variable>,
}

impl Config {
    /// Appends everything from `other`, keeping discovery order.
    pub fn merge(&mut self, other: Config) {
        self.resources.extend(other.resources);
        self.modules.extend(other.modules);
        self.locals.extend(other.locals);
        self.variables.extend(other.variables);
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
            && self.modules.is_empty()
            && self.locals.is_empty()
            && self.variables.is_empty()
    }
}
