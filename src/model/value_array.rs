//! Vaste-lengte reeks van tekstueel gecodeerde waarden, zoals COMET die
//! voor alle parameterwaarden gebruikt.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::value_set::ValueSetError;

/// Markering voor "geen waarde".
pub const NO_VALUE: &str = "-";

/// Geordende reeks tekstwaarden met een lengte die na aanmaak niet meer
/// verandert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueArray {
    values: Vec<String>,
}

impl ValueArray {
    /// Maakt een reeks van `len` lege (`"-"`) waarden.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![NO_VALUE.to_owned(); len],
        }
    }

    #[must_use]
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Geeft de waarde op `index` terug, tenzij die ontbreekt of `"-"` is.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != NO_VALUE)
    }

    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        self.value(index).is_some()
    }

    /// Overschrijft een enkele waarde.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> Result<(), ValueSetError> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ValueSetError::IndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Vervangt alle waarden; de lengte moet gelijk blijven.
    pub fn replace(&mut self, other: &ValueArray) -> Result<(), ValueSetError> {
        if other.len() != self.len() {
            return Err(ValueSetError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        self.values.clone_from(&other.values);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.values
    }
}

impl fmt::Display for ValueArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            f.write_str(value)?;
        }
        f.write_str("]")
    }
}

impl<S: Into<String>> FromIterator<S> for ValueArray {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_values(iter)
    }
}
