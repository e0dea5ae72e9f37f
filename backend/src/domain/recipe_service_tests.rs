//! Tests for the recipe aggregate service.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockRecipeStore;
use crate::domain::{CONSTRAINT_VIOLATION_MESSAGE, ErrorCode, RecipeDetails};
use crate::test_support::{InMemoryRecipeStore, MutableClock, StoredRowCounts};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn details(name: &str) -> RecipeDetails {
    RecipeDetails {
        name: name.to_owned(),
        external_url: None,
        description: Some("weeknight staple".to_owned()),
        servings: 4,
        yield_amount: None,
        cook_time_in_minutes: 25,
        notes: None,
    }
}

fn step(step_no: i32, text: &str) -> Instruction {
    Instruction {
        step_no,
        instruction: text.to_owned(),
    }
}

fn line(ingredient_id: CatalogEntryId, amount: &str, index: i32) -> IngredientLine {
    IngredientLine {
        ingredient_id,
        amount: amount.to_owned(),
        prep_note: None,
        index,
    }
}

struct Kitchen {
    store: Arc<InMemoryRecipeStore>,
    clock: Arc<MutableClock>,
    service: RecipeService<InMemoryRecipeStore>,
    owner: UserId,
    italian: CatalogEntryId,
    thai: CatalogEntryId,
    basil: CatalogEntryId,
    garlic: CatalogEntryId,
}

impl Kitchen {
    fn request(&self, instructions: Vec<Instruction>) -> RecipeRequest {
        RecipeRequest {
            details: details("Pesto pasta"),
            cuisines: vec![self.thai, self.italian],
            ingredients: vec![line(self.garlic, "2 cloves", 5), line(self.basil, "1 cup", 1)],
            instructions,
        }
    }

    async fn create_three_steps(&self) -> Recipe {
        self.service
            .create_recipe(
                &self.owner,
                self.request(vec![step(1, "Boil"), step(2, "Blend"), step(3, "Toss")]),
            )
            .await
            .expect("create recipe")
    }
}

#[fixture]
fn kitchen() -> Kitchen {
    let store = Arc::new(InMemoryRecipeStore::default());
    let clock = Arc::new(MutableClock::new(start()));
    let service = RecipeService::new(Arc::clone(&store), clock.clone());
    Kitchen {
        italian: store.add_cuisine("Italian"),
        thai: store.add_cuisine("Thai"),
        basil: store.add_ingredient("Basil"),
        garlic: store.add_ingredient("Garlic"),
        store,
        clock,
        service,
        owner: UserId::random(),
    }
}

#[rstest]
#[tokio::test]
async fn create_returns_state_read_back_in_storage_order(kitchen: Kitchen) {
    let recipe = kitchen.create_three_steps().await;

    assert_eq!(recipe.summary.user_id, kitchen.owner);
    assert_eq!(recipe.summary.details, details("Pesto pasta"));
    assert_eq!(recipe.summary.created_at, start());
    assert_eq!(recipe.summary.updated_at, start());
    let cuisine_names: Vec<&str> = recipe.cuisines.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(cuisine_names, ["Italian", "Thai"]);
    let ingredient_names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(ingredient_names, ["Basil", "Garlic"]);
    assert_eq!(recipe.ingredients[1].amount, "2 cloves");
    assert_eq!(recipe.ingredients[1].index, 5);
    let steps: Vec<i32> = recipe.instructions.iter().map(|s| s.step_no).collect();
    assert_eq!(steps, [1, 2, 3]);
    assert_eq!(kitchen.store.commits(), 1);
    assert_eq!(
        kitchen.store.row_counts(&recipe.summary.id),
        StoredRowCounts {
            recipes: 1,
            cuisine_links: 2,
            ingredient_links: 2,
            instructions: 3,
        }
    );
}

#[rstest]
#[tokio::test]
async fn create_with_no_collections_stores_host_row_only(kitchen: Kitchen) {
    let request = RecipeRequest {
        details: details("Toast"),
        cuisines: Vec::new(),
        ingredients: Vec::new(),
        instructions: Vec::new(),
    };

    let recipe = kitchen
        .service
        .create_recipe(&kitchen.owner, request)
        .await
        .expect("create recipe");

    assert!(recipe.cuisines.is_empty());
    assert!(recipe.ingredients.is_empty());
    assert!(recipe.instructions.is_empty());
    assert_eq!(kitchen.store.recipe_count(), 1);
}

#[rstest]
#[tokio::test]
async fn update_reconciles_steps_one_two_three_into_two_three_four(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;
    kitchen.clock.advance(TimeDelta::minutes(10));

    let updated = kitchen
        .service
        .update_recipe(
            &kitchen.owner,
            &created.summary.id,
            kitchen.request(vec![step(2, "Blend well"), step(3, "Toss"), step(4, "Serve")]),
        )
        .await
        .expect("update recipe");

    assert_eq!(
        updated.instructions,
        vec![step(2, "Blend well"), step(3, "Toss"), step(4, "Serve")]
    );
    assert_eq!(
        kitchen.store.stored_instructions(&created.summary.id),
        updated.instructions
    );
    assert_eq!(updated.summary.created_at, start());
    assert_eq!(updated.summary.updated_at, start() + TimeDelta::minutes(10));
}

#[rstest]
#[tokio::test]
async fn update_replaces_host_fields_and_links(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;
    let request = RecipeRequest {
        details: RecipeDetails {
            servings: 2,
            notes: Some("halve everything".to_owned()),
            ..details("Basil pasta")
        },
        cuisines: vec![kitchen.italian],
        ingredients: vec![line(kitchen.basil, "2 cups", 0)],
        instructions: vec![step(1, "Boil")],
    };

    let updated = kitchen
        .service
        .update_recipe(&kitchen.owner, &created.summary.id, request)
        .await
        .expect("update recipe");

    assert_eq!(updated.summary.details.name, "Basil pasta");
    assert_eq!(updated.summary.details.servings, 2);
    assert_eq!(updated.cuisines.len(), 1);
    assert_eq!(updated.cuisines[0].id, kitchen.italian);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].amount, "2 cups");
    assert_eq!(updated.instructions, vec![step(1, "Boil")]);
}

#[rstest]
#[tokio::test]
async fn repeating_an_update_is_idempotent(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;
    let request = kitchen.request(vec![step(2, "Blend"), step(5, "Plate")]);

    let first = kitchen
        .service
        .update_recipe(&kitchen.owner, &created.summary.id, request.clone())
        .await
        .expect("first update");
    let second = kitchen
        .service
        .update_recipe(&kitchen.owner, &created.summary.id, request)
        .await
        .expect("second update");

    assert_eq!(first, second);
}

#[rstest]
#[tokio::test]
async fn dangling_cuisine_rolls_back_create(kitchen: Kitchen) {
    let mut request = kitchen.request(vec![step(1, "Boil")]);
    request.cuisines.push(CatalogEntryId::random());

    let err = kitchen
        .service
        .create_recipe(&kitchen.owner, request)
        .await
        .expect_err("dangling cuisine");

    assert_eq!(err.code(), ErrorCode::ConstraintViolation);
    assert_eq!(err.message(), CONSTRAINT_VIOLATION_MESSAGE);
    assert_eq!(kitchen.store.total_row_counts(), StoredRowCounts::default());
    assert_eq!(kitchen.store.rollbacks(), 1);
    assert_eq!(kitchen.store.commits(), 0);
}

#[rstest]
#[case::duplicate_step(vec![step(1, "Boil"), step(1, "Boil again")], None)]
#[case::duplicate_cuisine(vec![step(1, "Boil")], Some(true))]
#[case::dangling_ingredient(vec![step(1, "Boil")], Some(false))]
#[tokio::test]
async fn any_failing_step_leaves_nothing_behind(
    kitchen: Kitchen,
    #[case] instructions: Vec<Instruction>,
    #[case] cuisine_fault: Option<bool>,
) {
    let mut request = kitchen.request(instructions);
    match cuisine_fault {
        Some(true) => request.cuisines.push(kitchen.thai),
        Some(false) => request
            .ingredients
            .push(line(CatalogEntryId::random(), "a pinch", 9)),
        None => {}
    }

    let err = kitchen
        .service
        .create_recipe(&kitchen.owner, request)
        .await
        .expect_err("constraint violation");

    assert_eq!(err.code(), ErrorCode::ConstraintViolation);
    assert_eq!(kitchen.store.total_row_counts(), StoredRowCounts::default());
}

#[rstest]
#[tokio::test]
async fn failed_update_keeps_previous_state(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;
    let before = kitchen.store.row_counts(&created.summary.id);
    let mut request = kitchen.request(vec![step(9, "Garnish")]);
    request.details.name = "Renamed".to_owned();
    request.instructions.push(step(9, "Garnish twice"));

    let err = kitchen
        .service
        .update_recipe(&kitchen.owner, &created.summary.id, request)
        .await
        .expect_err("duplicate step");

    assert_eq!(err.code(), ErrorCode::ConstraintViolation);
    assert_eq!(kitchen.store.row_counts(&created.summary.id), before);
    let reread = kitchen
        .service
        .get_recipe(&created.summary.id)
        .await
        .expect("get recipe");
    assert_eq!(reread, created);
}

#[rstest]
#[tokio::test]
async fn get_returns_the_whole_aggregate(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;

    let fetched = kitchen
        .service
        .get_recipe(&created.summary.id)
        .await
        .expect("get recipe");

    assert_eq!(fetched, created);
}

#[rstest]
#[tokio::test]
async fn get_missing_recipe_is_not_found(kitchen: Kitchen) {
    let err = kitchen
        .service
        .get_recipe(&RecipeId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn other_users_cannot_mutate(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;
    let intruder = UserId::random();

    let update_err = kitchen
        .service
        .update_recipe(&intruder, &created.summary.id, kitchen.request(Vec::new()))
        .await
        .expect_err("not the owner");
    let delete_err = kitchen
        .service
        .delete_recipe(&intruder, &created.summary.id)
        .await
        .expect_err("not the owner");

    assert_eq!(update_err.code(), ErrorCode::Unauthorized);
    assert_eq!(delete_err.code(), ErrorCode::Unauthorized);
    assert_eq!(
        kitchen.service.get_recipe(&created.summary.id).await.expect("still there"),
        created
    );
}

#[rstest]
#[tokio::test]
async fn delete_cascades_to_dependents(kitchen: Kitchen) {
    let created = kitchen.create_three_steps().await;

    kitchen
        .service
        .delete_recipe(&kitchen.owner, &created.summary.id)
        .await
        .expect("delete");

    assert_eq!(
        kitchen.store.row_counts(&created.summary.id),
        StoredRowCounts::default()
    );
    let err = kitchen
        .service
        .delete_recipe(&kitchen.owner, &created.summary.id)
        .await
        .expect_err("already deleted");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_pages_owned_recipes_by_name(kitchen: Kitchen) {
    for name in ["Stew", "Curry", "Soup", "Bread"] {
        let request = RecipeRequest {
            details: details(name),
            cuisines: Vec::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        };
        kitchen
            .service
            .create_recipe(&kitchen.owner, request)
            .await
            .expect("create recipe");
    }
    kitchen
        .service
        .create_recipe(&UserId::random(), kitchen.request(Vec::new()))
        .await
        .expect("someone else's recipe");

    let page = kitchen
        .service
        .list_recipes(&kitchen.owner, PageRequest::new(Some(2), Some(1)))
        .await
        .expect("list recipes");

    let names: Vec<&str> = page.iter().map(|r| r.details.name.as_str()).collect();
    assert_eq!(names, ["Curry", "Soup"]);
}

fn foreign_summary(id: RecipeId) -> RecipeSummary {
    RecipeSummary {
        id,
        user_id: UserId::random(),
        details: details("Someone else's"),
        created_at: start(),
        updated_at: start(),
    }
}

#[tokio::test]
async fn ownership_is_checked_before_any_transaction() {
    let id = RecipeId::random();
    let mut store = MockRecipeStore::new();
    store
        .expect_find_recipe()
        .times(2)
        .returning(move |requested| Ok(Some(foreign_summary(*requested))));
    store.expect_begin().times(0);
    store.expect_delete_recipe().times(0);
    let service = RecipeService::new(Arc::new(store), Arc::new(MutableClock::new(start())));
    let caller = UserId::random();
    let request = RecipeRequest {
        details: details("Mine now"),
        cuisines: Vec::new(),
        ingredients: Vec::new(),
        instructions: Vec::new(),
    };

    let update_err = service
        .update_recipe(&caller, &id, request)
        .await
        .expect_err("unauthorised update");
    let delete_err = service
        .delete_recipe(&caller, &id)
        .await
        .expect_err("unauthorised delete");

    assert_eq!(update_err.code(), ErrorCode::Unauthorized);
    assert_eq!(delete_err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn missing_recipe_is_reported_before_any_transaction() {
    let mut store = MockRecipeStore::new();
    store.expect_find_recipe().times(1).returning(|_| Ok(None));
    store.expect_begin().times(0);
    let service = RecipeService::new(Arc::new(store), Arc::new(MutableClock::new(start())));

    let err = service
        .update_recipe(
            &UserId::random(),
            &RecipeId::random(),
            RecipeRequest {
                details: details("Ghost"),
                cuisines: Vec::new(),
                ingredients: Vec::new(),
                instructions: Vec::new(),
            },
        )
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(RecipeStoreError::connection("pool exhausted"), ErrorCode::ServiceUnavailable)]
#[case(RecipeStoreError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn begin_failures_map_to_domain_errors(
    #[case] failure: RecipeStoreError,
    #[case] expected: ErrorCode,
) {
    let mut store = MockRecipeStore::new();
    store
        .expect_begin()
        .times(1)
        .return_once(move |_| Err(failure));
    let service = RecipeService::new(Arc::new(store), Arc::new(MutableClock::new(start())));

    let err = service
        .get_recipe(&RecipeId::random())
        .await
        .expect_err("begin failed");
    assert_eq!(err.code(), expected);
}
