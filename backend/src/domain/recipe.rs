//! Recipe aggregate model.
//!
//! A recipe is a host record plus three dependent collections: cuisine links,
//! ingredient links, and step-ordered instructions. The read views in this
//! module are always assembled from storage reads, never echoed from the
//! request that produced them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Default page size for recipe listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Identifier of a recipe aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a cuisine or ingredient catalog entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct CatalogEntryId(Uuid);

impl CatalogEntryId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CatalogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-record fields supplied on create and fully replaced on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeDetails {
    /// Display name; listings are ordered by it.
    pub name: String,
    /// Link to the source of the recipe.
    pub external_url: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Number of servings.
    pub servings: i32,
    /// Free-form yield, e.g. "2 loaves".
    #[serde(rename = "yield")]
    pub yield_amount: Option<String>,
    /// Total cook time.
    pub cook_time_in_minutes: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Ingredient line submitted with a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientLine {
    /// Catalog ingredient being linked.
    pub ingredient_id: CatalogEntryId,
    /// Free-text amount, e.g. "2 cups".
    pub amount: String,
    /// Optional preparation note, e.g. "finely diced".
    pub prep_note: Option<String>,
    /// Caller-supplied display position; need not be contiguous.
    pub index: i32,
}

/// A single recipe step. The step number is its identity within a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Instruction {
    /// Caller-visible ordering key, unique per recipe.
    pub step_no: i32,
    /// Step text.
    pub instruction: String,
}

/// Desired state of a whole recipe, as submitted on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRequest {
    /// Host-record fields.
    pub details: RecipeDetails,
    /// Cuisine catalog entries to link.
    pub cuisines: Vec<CatalogEntryId>,
    /// Ingredient lines to link.
    pub ingredients: Vec<IngredientLine>,
    /// Instructions keyed by step number.
    pub instructions: Vec<Instruction>,
}

/// Cuisine link as read back from storage, joined with the catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CuisineLink {
    /// Linked cuisine.
    pub id: CatalogEntryId,
    /// Catalog name of the cuisine.
    pub name: String,
}

/// Ingredient link as read back from storage, joined with the catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientLink {
    /// Linked ingredient.
    pub id: CatalogEntryId,
    /// Catalog name of the ingredient.
    pub name: String,
    /// Free-text amount.
    pub amount: String,
    /// Optional preparation note.
    pub prep_note: Option<String>,
    /// Display position.
    pub index: i32,
}

/// Host record without nested collections; used by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummary {
    /// Recipe identifier.
    pub id: RecipeId,
    /// Owning user.
    pub user_id: UserId,
    /// Host-record fields.
    #[serde(flatten)]
    pub details: RecipeDetails,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RecipeSummary {
    /// Whether `user_id` owns this recipe.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}

/// Fully composed recipe aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    /// Host record.
    #[serde(flatten)]
    pub summary: RecipeSummary,
    /// Linked cuisines.
    pub cuisines: Vec<CuisineLink>,
    /// Linked ingredients.
    pub ingredients: Vec<IngredientLink>,
    /// Instructions ordered by step number.
    pub instructions: Vec<Instruction>,
}

/// Limit/offset window for recipe listings.
///
/// ## Invariants
/// - `limit` and `offset` lie within `0..=i32::MAX`.
///
/// # Examples
/// ```
/// use mealbook::domain::PageRequest;
///
/// let page = PageRequest::new(None, Some(-5));
/// assert_eq!(page.limit(), 20);
/// assert_eq!(page.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    /// Build a window from optional caller bounds, clamping out-of-range values.
    #[must_use]
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let clamp = |value: i64| value.clamp(0, i64::from(i32::MAX));
        Self {
            limit: limit.map_or(DEFAULT_PAGE_LIMIT, clamp),
            offset: offset.map_or(0, clamp),
        }
    }

    /// Maximum number of rows.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
