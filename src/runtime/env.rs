//! Shared environment
//!
//! The single name → value mapping every snippet executes against. Insertion
//! ordered; re-binding a name keeps its original position.

use indexmap::IndexMap;

use super::value::Value;

#[derive(Debug, Default, Clone)]
pub struct Environment {
    vars: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) {
        self.vars.insert(name.into(), value);
    }

    pub fn remove(
        &mut self,
        name: &str,
    ) -> Option<Value> {
        self.vars.shift_remove(name)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.vars.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}
