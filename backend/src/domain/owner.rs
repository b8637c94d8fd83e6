//! Document owner identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing an [`OwnerId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OwnerIdValidationError {
    /// The identifier was empty.
    #[error("owner id must not be empty")]
    Empty,
    /// The identifier was not a canonical UUID.
    #[error("owner id must be a valid UUID")]
    Invalid,
}

/// Stable owner identifier stored as a UUID.
///
/// The identity provider issues these; the domain never mints them except in
/// tests via [`OwnerId::random`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(Uuid, String);

impl OwnerId {
    /// Validate and construct an [`OwnerId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::OwnerId;
    ///
    /// let id = OwnerId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, OwnerIdValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`OwnerId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already validated UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, OwnerIdValidationError> {
        if id.is_empty() {
            return Err(OwnerIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(OwnerIdValidationError::Invalid);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| OwnerIdValidationError::Invalid)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        let OwnerId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for OwnerId {
    type Error = OwnerIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
