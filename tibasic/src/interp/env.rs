//! Variable store
//!
//! The namespace has three disjoint regions: the number slots `A`–`Z`, the list
//! slots `L₁`–`L₆`, and an untyped overflow region for every other name. The two
//! seeded regions are stored with their payload type, so a slot can never hold a
//! value of the wrong kind.

use super::error::{InterpResult, RuntimeError};
use super::list::{self, NumList};
use super::value::Value;
use std::collections::HashMap;

/// Names of the built-in list slots
pub const LIST_NAMES: [&str; 6] = ["L₁", "L₂", "L₃", "L₄", "L₅", "L₆"];

/// Names of the built-in number slots
pub fn number_names() -> impl Iterator<Item = String> {
    ('A'..='Z').map(String::from)
}

/// Variable bindings for one program run
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    numbers: HashMap<String, f64>,
    lists: HashMap<String, NumList>,
    overflow: HashMap<String, Value>,
}

impl Environment {
    /// Environment with every seeded slot at its initial value
    pub fn new() -> Self {
        Environment {
            numbers: number_names().map(|name| (name, 0.0)).collect(),
            lists: LIST_NAMES
                .iter()
                .map(|name| (name.to_string(), NumList::new(vec![1.0])))
                .collect(),
            overflow: HashMap::new(),
        }
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> InterpResult<Value> {
        if let Some(n) = self.numbers.get(name) {
            return Ok(Value::Number(*n));
        }
        if let Some(list) = self.lists.get(name) {
            return Ok(Value::List(list.clone()));
        }
        self.overflow
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Read the element at 1-based `index` of the list held by `name`
    pub fn get_list_element(&self, name: &str, index: &Value) -> InterpResult<f64> {
        let index = expect_index(name, index)?;
        let list = self.list(name)?;
        list::position(index, list.len())
            .and_then(|pos| list.get(pos))
            .ok_or_else(|| RuntimeError::index_out_of_range(name, index, list.len()))
    }

    /// Store `value` under `name`, enforcing the region's value kind
    pub fn assign(&mut self, name: &str, value: Value) -> InterpResult<()> {
        if let Some(slot) = self.numbers.get_mut(name) {
            return match value {
                Value::Number(n) => {
                    *slot = n;
                    Ok(())
                }
                other => Err(mismatch(name, "number", &other)),
            };
        }
        if let Some(slot) = self.lists.get_mut(name) {
            return match value {
                Value::List(list) => {
                    *slot = list;
                    Ok(())
                }
                other => Err(mismatch(name, "list", &other)),
            };
        }
        self.overflow.insert(name.to_string(), value);
        Ok(())
    }

    /// Overwrite the element at `index`, or append when `index` is one past the end
    pub fn assign_list_element(
        &mut self,
        name: &str,
        value: &Value,
        index: &Value,
    ) -> InterpResult<()> {
        let value = value.as_number().ok_or_else(|| {
            RuntimeError::type_error(&format!("element of {name}"), "number", value.type_name())
        })?;
        let index = expect_index(name, index)?;
        let list = self.list_mut(name)?;
        let len = list.len();
        match list::position(index, len + 1) {
            Some(pos) if pos == len + 1 => {
                list.push(value);
                Ok(())
            }
            Some(pos) => {
                list.set(pos, value);
                Ok(())
            }
            None => Err(RuntimeError::index_out_of_range(name, index, len)),
        }
    }

    fn list(&self, name: &str) -> InterpResult<&NumList> {
        if let Some(list) = self.lists.get(name) {
            return Ok(list);
        }
        match self.overflow.get(name) {
            Some(Value::List(list)) => Ok(list),
            Some(other) => Err(mismatch(name, "list", other)),
            None if self.numbers.contains_key(name) => {
                Err(RuntimeError::type_error(name, "list", "number"))
            }
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    fn list_mut(&mut self, name: &str) -> InterpResult<&mut NumList> {
        if self.numbers.contains_key(name) {
            return Err(RuntimeError::type_error(name, "list", "number"));
        }
        if let Some(list) = self.lists.get_mut(name) {
            return Ok(list);
        }
        match self.overflow.get_mut(name) {
            Some(Value::List(list)) => Ok(list),
            Some(other) => Err(mismatch(name, "list", other)),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    /// Variables that differ from a fresh environment, sorted by name
    pub fn modified(&self) -> Vec<(String, Value)> {
        let fresh = Environment::new();
        let mut vars: Vec<(String, Value)> = self
            .numbers
            .iter()
            .filter(|(name, n)| fresh.numbers.get(*name) != Some(*n))
            .map(|(name, n)| (name.clone(), Value::Number(*n)))
            .chain(
                self.lists
                    .iter()
                    .filter(|(name, list)| fresh.lists.get(*name) != Some(*list))
                    .map(|(name, list)| (name.clone(), Value::List(list.clone()))),
            )
            .chain(self.overflow.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_index(name: &str, index: &Value) -> InterpResult<f64> {
    index.as_number().ok_or_else(|| {
        RuntimeError::type_error(&format!("index into {name}"), "number", index.type_name())
    })
}

fn mismatch(name: &str, expected: &str, got: &Value) -> RuntimeError {
    RuntimeError::type_error(&format!("assignment to {name}"), expected, got.type_name())
}
