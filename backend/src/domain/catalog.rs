//! Shared cuisine and ingredient reference data.
//!
//! Both catalogs are trees: an entry may name a parent that must already
//! exist. Entries referenced by children or recipes cannot be deleted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CatalogEntryId;

/// Which catalog an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Cuisine categories, e.g. "Italian".
    Cuisine,
    /// Ingredient categories, e.g. "Tomato".
    Ingredient,
}

impl CatalogKind {
    /// Singular label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cuisine => "cuisine",
            Self::Ingredient => "ingredient",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation errors for catalog drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Entry named itself as parent.
    SelfParent,
}

impl fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::SelfParent => write!(f, "an entry cannot be its own parent"),
        }
    }
}

impl std::error::Error for CatalogValidationError {}

/// Caller-supplied fields for creating or replacing a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDraft {
    name: String,
    parent_id: Option<CatalogEntryId>,
}

impl CatalogDraft {
    /// Validate a draft; the name is trimmed.
    pub fn new(
        name: &str,
        parent_id: Option<CatalogEntryId>,
    ) -> Result<Self, CatalogValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            parent_id,
        })
    }

    /// Entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional parent entry.
    #[must_use]
    pub const fn parent_id(&self) -> Option<CatalogEntryId> {
        self.parent_id
    }
}

/// Stored catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    /// Entry identifier.
    pub id: CatalogEntryId,
    /// Display name.
    pub name: String,
    /// Parent entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CatalogEntryId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CatalogValidationError::EmptyName)]
    #[case("   ", CatalogValidationError::EmptyName)]
    fn draft_rejects_blank_names(#[case] name: &str, #[case] expected: CatalogValidationError) {
        assert_eq!(CatalogDraft::new(name, None).expect_err("blank"), expected);
    }

    #[test]
    fn draft_trims_name() {
        let parent = CatalogEntryId::random();
        let draft = CatalogDraft::new("  Thai ", Some(parent)).expect("valid draft");
        assert_eq!(draft.name(), "Thai");
        assert_eq!(draft.parent_id(), Some(parent));
    }
}
