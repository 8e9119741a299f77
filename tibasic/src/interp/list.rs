//! Growable numeric list with 1-based addressing

use std::fmt;

/// Ordered sequence of numbers. Positions exposed by this type are 1-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumList {
    items: Vec<f64>,
}

impl NumList {
    pub fn new(items: Vec<f64>) -> Self {
        NumList { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at 1-based `position`
    pub fn get(&self, position: usize) -> Option<f64> {
        position.checked_sub(1).and_then(|i| self.items.get(i)).copied()
    }

    /// Overwrite the element at 1-based `position`. Returns false if out of range.
    pub fn set(&mut self, position: usize, value: f64) -> bool {
        match position.checked_sub(1).and_then(|i| self.items.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Append at position `len() + 1`
    pub fn push(&mut self, value: f64) {
        self.items.push(value);
    }
}

impl fmt::Display for NumList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, n) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{n:?}")?;
        }
        write!(f, "}}")
    }
}

/// Convert a numeric index to a 1-based position in `1..=upper`
pub fn position(index: f64, upper: usize) -> Option<usize> {
    if index.fract() != 0.0 || index < 1.0 || index > upper as f64 {
        return None;
    }
    Some(index as usize)
}
