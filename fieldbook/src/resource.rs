//! Bookable fields.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::reservation::{ResourceId, ValidationError};

/// A bookable field and the rate it is charged at.
///
/// # Examples
///
/// ```
/// use fieldbook::{Money, Resource, ResourceId};
///
/// let field = Resource::new(ResourceId(1), "  Field A ", Money::from_units(35_000)).unwrap();
/// assert_eq!(field.name(), "Field A");
/// assert!(Resource::new(ResourceId(2), "", Money::ZERO).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: ResourceId,
    name: String,
    hourly_rate: Money,
}

impl Resource {
    /// Creates a resource record.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming whitespace.
    pub fn new(
        id: ResourceId,
        name: impl Into<String>,
        hourly_rate: Money,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(&name.into())?;
        Ok(Self {
            id,
            name,
            hourly_rate,
        })
    }

    /// Returns the resource id.
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the hourly rate.
    #[must_use]
    pub const fn hourly_rate(&self) -> Money {
        self.hourly_rate
    }
}

/// Trims a field name, rejecting empty ones.
pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: "name".into(),
            message: "field name must be non-empty after trimming whitespace".into(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_new() {
        let r = Resource::new(ResourceId(3), "Court 1", Money::from_units(100)).unwrap();
        assert_eq!(r.id(), ResourceId(3));
        assert_eq!(r.name(), "Court 1");
        assert_eq!(r.hourly_rate(), Money::from_units(100));
    }

    #[test]
    fn test_resource_rejects_blank_name() {
        let err = Resource::new(ResourceId(1), "  ", Money::ZERO).unwrap_err();
        assert_eq!(err.field, "name");
    }
}
