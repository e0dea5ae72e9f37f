//! Handler coverage for the recipe endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{CONSTRAINT_VIOLATION_MESSAGE, CatalogEntryId, RecipeId, UserId};
use crate::inbound::http::test_utils::{error_code, init_api, read_json};
use crate::test_support::InMemoryBackend;

struct Pantry {
    italian: CatalogEntryId,
    tomato: CatalogEntryId,
    basil: CatalogEntryId,
}

fn stock(backend: &InMemoryBackend) -> Pantry {
    Pantry {
        italian: backend.recipes.add_cuisine("Italian"),
        tomato: backend.recipes.add_ingredient("Tomato"),
        basil: backend.recipes.add_ingredient("Basil"),
    }
}

fn marinara(pantry: &Pantry, steps: &[i32]) -> Value {
    let instructions: Vec<Value> = steps
        .iter()
        .map(|step| json!({ "step_no": step, "instruction": format!("step {step}") }))
        .collect();
    json!({
        "name": "Marinara",
        "external_url": "https://example.com/marinara",
        "servings": 4,
        "yield": "1 litre",
        "cook_time_in_minutes": 45,
        "cuisines": [pantry.italian],
        "ingredients": [
            { "id": pantry.tomato, "amount": "800 g", "prep_note": "crushed", "index": 1 },
            { "id": pantry.basil, "amount": "1 handful", "index": 2 }
        ],
        "instructions": instructions
    })
}

async fn create(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    bearer: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/api/v1/recipes")
        .insert_header((AUTHORIZATION, bearer))
        .set_json(payload)
        .to_request();
    read_json(test::call_service(app, req).await).await
}

fn step_numbers(body: &Value) -> Vec<i64> {
    body["instructions"]
        .as_array()
        .expect("instructions")
        .iter()
        .map(|step| step["step_no"].as_i64().expect("step_no"))
        .collect()
}

#[actix_web::test]
async fn create_returns_the_stored_aggregate() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let owner = UserId::random();
    let app = init_api(&backend).await;

    let (status, body) = create(&app, &backend.bearer(&owner), marinara(&pantry, &[2, 1])).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Marinara");
    assert_eq!(body["yield"], "1 litre");
    assert_eq!(body["user_id"], owner.to_string());
    assert_eq!(body["cuisines"][0]["name"], "Italian");
    assert_eq!(body["ingredients"][0]["name"], "Tomato");
    assert_eq!(body["ingredients"][0]["prep_note"], "crushed");
    assert_eq!(step_numbers(&body), vec![1, 2]);
    assert_eq!(backend.recipes.recipe_count(), 1);
}

#[actix_web::test]
async fn update_reconciles_steps_and_returns_stored_state() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let owner = UserId::random();
    let bearer = backend.bearer(&owner);
    let app = init_api(&backend).await;
    let (_, created) = create(&app, &bearer, marinara(&pantry, &[1, 2, 3])).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let mut payload = marinara(&pantry, &[2, 3, 4]);
    payload["name"] = json!("Marinara II");
    payload["cuisines"] = json!([]);
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/recipes/{id}"))
        .insert_header((AUTHORIZATION, bearer.as_str()))
        .set_json(payload)
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Marinara II");
    assert_eq!(body["cuisines"], json!([]));
    assert_eq!(step_numbers(&body), vec![2, 3, 4]);
    let recipe_id = RecipeId::from_uuid(id.parse().expect("uuid"));
    let stored: Vec<i32> = backend
        .recipes
        .stored_instructions(&recipe_id)
        .into_iter()
        .map(|step| step.step_no)
        .collect();
    assert_eq!(stored, vec![2, 3, 4]);
}

#[actix_web::test]
async fn dangling_cuisine_is_a_constraint_violation() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let owner = UserId::random();
    let app = init_api(&backend).await;
    let mut payload = marinara(&pantry, &[1]);
    payload["cuisines"] = json!([CatalogEntryId::random()]);

    let (status, body) = create(&app, &backend.bearer(&owner), payload).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), Some("constraint_violation"));
    assert_eq!(body["message"], CONSTRAINT_VIOLATION_MESSAGE);
    assert_eq!(backend.recipes.total_row_counts().recipes, 0);
}

#[actix_web::test]
async fn other_users_cannot_update_or_delete() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let owner = UserId::random();
    let intruder = backend.bearer(&UserId::random());
    let app = init_api(&backend).await;
    let (_, created) = create(&app, &backend.bearer(&owner), marinara(&pantry, &[1])).await;
    let uri = format!("/api/v1/recipes/{}", created["id"].as_str().expect("id"));

    let update = test::TestRequest::put()
        .uri(&uri)
        .insert_header((AUTHORIZATION, intruder.as_str()))
        .set_json(marinara(&pantry, &[1, 2]))
        .to_request();
    let (update_status, update_body) = read_json(test::call_service(&app, update).await).await;
    let delete = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((AUTHORIZATION, intruder.as_str()))
        .to_request();
    let (delete_status, _) = read_json(test::call_service(&app, delete).await).await;

    assert_eq!(update_status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&update_body), Some("unauthorized"));
    assert_eq!(delete_status, StatusCode::UNAUTHORIZED);
    assert_eq!(backend.recipes.recipe_count(), 1);
}

#[actix_web::test]
async fn any_authenticated_user_can_read_a_recipe() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let app = init_api(&backend).await;
    let (_, created) = create(
        &app,
        &backend.bearer(&UserId::random()),
        marinara(&pantry, &[1]),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/recipes/{}", created["id"].as_str().expect("id")))
        .insert_header((AUTHORIZATION, backend.bearer(&UserId::random())))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[rstest]
#[case("get")]
#[case("put")]
#[case("delete")]
#[actix_web::test]
async fn missing_recipe_is_not_found(#[case] method: &str) {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let bearer = backend.bearer(&UserId::random());
    let app = init_api(&backend).await;
    let uri = format!("/api/v1/recipes/{}", RecipeId::random());

    let req = match method {
        "get" => test::TestRequest::get(),
        "put" => test::TestRequest::put().set_json(marinara(&pantry, &[1])),
        _ => test::TestRequest::delete(),
    }
    .uri(&uri)
    .insert_header((AUTHORIZATION, bearer.as_str()))
    .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some("not_found"));
}

#[actix_web::test]
async fn malformed_id_is_a_bad_request() {
    let backend = InMemoryBackend::new();
    let app = init_api(&backend).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/recipes/not-a-uuid")
        .insert_header((AUTHORIZATION, backend.bearer(&UserId::random())))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_id");
}

#[actix_web::test]
async fn delete_removes_the_aggregate() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let owner = UserId::random();
    let bearer = backend.bearer(&owner);
    let app = init_api(&backend).await;
    let (_, created) = create(&app, &bearer, marinara(&pantry, &[1, 2])).await;
    let uri = format!("/api/v1/recipes/{}", created["id"].as_str().expect("id"));

    let delete = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((AUTHORIZATION, bearer.as_str()))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, delete).await).await;
    let fetch = test::TestRequest::get()
        .uri(&uri)
        .insert_header((AUTHORIZATION, bearer.as_str()))
        .to_request();
    let (fetch_status, _) = read_json(test::call_service(&app, fetch).await).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(fetch_status, StatusCode::NOT_FOUND);
    let counts = backend.recipes.total_row_counts();
    assert_eq!(counts.instructions, 0);
    assert_eq!(counts.ingredient_links, 0);
}

#[actix_web::test]
async fn list_pages_the_callers_recipes_by_name() {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let owner = UserId::random();
    let bearer = backend.bearer(&owner);
    let app = init_api(&backend).await;
    for name in ["Carbonara", "Arrabbiata", "Bolognese"] {
        let mut payload = marinara(&pantry, &[1]);
        payload["name"] = json!(name);
        create(&app, &bearer, payload).await;
    }
    create(
        &app,
        &backend.bearer(&UserId::random()),
        marinara(&pantry, &[1]),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/recipes?limit=2&offset=1")
        .insert_header((AUTHORIZATION, bearer.as_str()))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|recipe| recipe["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Bolognese", "Carbonara"]);
    assert!(body[0].get("instructions").is_none());
}

#[rstest]
#[case("name", json!("   "), "empty_name")]
#[case("servings", json!(-1), "negative_servings")]
#[case("cook_time_in_minutes", json!(-5), "negative_cook_time")]
#[case("instructions", json!([{ "step_no": 0, "instruction": "boil" }]), "non_positive_step")]
#[actix_web::test]
async fn invalid_bodies_are_rejected_before_storage(
    #[case] field: &str,
    #[case] value: Value,
    #[case] code: &str,
) {
    let backend = InMemoryBackend::new();
    let pantry = stock(&backend);
    let app = init_api(&backend).await;
    let mut payload = marinara(&pantry, &[1]);
    payload[field] = value;

    let (status, body) = create(&app, &backend.bearer(&UserId::random()), payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
    assert_eq!(backend.recipes.commits(), 0);
}

#[actix_web::test]
async fn recipes_require_authentication() {
    let backend = InMemoryBackend::new();
    let app = init_api(&backend).await;

    let req = test::TestRequest::get().uri("/api/v1/recipes").to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), Some("unauthorized"));
}
