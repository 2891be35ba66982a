//! HTTP-level integration tests for `/fotos_limpeza`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, create_room, create_solicitante, create_zelador, delete_auth, get,
    get_auth, png_bytes, post_auth, upload_photo,
};
use sqlx::PgPool;

/// Create a room, start a cleaning as `token` and return the record ID.
async fn open_cleaning(app: &axum::Router, admin_token: &str, token: &str, name: &str) -> (String, i64) {
    let room = create_room(app, admin_token, serde_json::json!({ "name": name })).await;
    let room_uri = format!("/api/v1/salas/{}", room["uuid"].as_str().unwrap());
    let response = post_auth(app.clone(), &format!("{room_uri}/iniciar_limpeza"), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    (room_uri, record_id)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_stores_file_and_serves_it(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let (_admin, admin_token) = create_admin(&pool, "chefe").await;
    let (_z, token) = create_zelador(&pool, "zelador").await;
    let app = common::build_test_app_with_media(pool, media.path());
    let (_, record_id) = open_cleaning(&app, &admin_token, &token, "Sala 1").await;

    let response = upload_photo(app.clone(), record_id, &png_bytes(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = body_json(response).await["data"].clone();
    assert_eq!(photo["cleaning_record_id"], record_id);

    let url = photo["image_url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/media/limpezas_fotos/"));
    assert!(url.ends_with(".png"));

    let relative = url.trim_start_matches("/media/");
    assert!(media.path().join(relative).exists());

    let response = get(app, &url).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_photo_limit_and_finished_record(pool: PgPool) {
    let (_admin, admin_token) = create_admin(&pool, "chefe").await;
    let (_z, token) = create_zelador(&pool, "zelador").await;
    let app = common::build_test_app(pool);
    let (room_uri, record_id) = open_cleaning(&app, &admin_token, &token, "Sala 2").await;

    for _ in 0..3 {
        let response = upload_photo(app.clone(), record_id, &png_bytes(), &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = upload_photo(app.clone(), record_id, &png_bytes(), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PHOTO_LIMIT_REACHED");

    let response = post_auth(app.clone(), &format!("{room_uri}/concluir_limpeza"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = upload_photo(app, record_id, &png_bytes(), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CLEANING_ALREADY_FINISHED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_non_images(pool: PgPool) {
    let (_admin, admin_token) = create_admin(&pool, "chefe").await;
    let (_z, token) = create_zelador(&pool, "zelador").await;
    let app = common::build_test_app(pool);
    let (_, record_id) = open_cleaning(&app, &admin_token, &token, "Sala 3").await;

    let response = upload_photo(app, record_id, b"isto nao e uma imagem", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_to_unknown_or_foreign_record_is_not_found(pool: PgPool) {
    let (_admin, admin_token) = create_admin(&pool, "chefe").await;
    let (_a, token_a) = create_zelador(&pool, "zelador_a").await;
    let (_b, token_b) = create_zelador(&pool, "zelador_b").await;
    let app = common::build_test_app(pool);
    let (_, record_id) = open_cleaning(&app, &admin_token, &token_a, "Sala 4").await;

    let response = upload_photo(app.clone(), 999_999, &png_bytes(), &token_a).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = upload_photo(app, record_id, &png_bytes(), &token_b).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_photo_visibility_per_role(pool: PgPool) {
    let (_admin, admin_token) = create_admin(&pool, "chefe").await;
    let (_a, token_a) = create_zelador(&pool, "zelador_a").await;
    let (_b, token_b) = create_zelador(&pool, "zelador_b").await;
    let (_s, sol_token) = create_solicitante(&pool, "prof").await;
    let app = common::build_test_app(pool);

    let (_, record_a) = open_cleaning(&app, &admin_token, &token_a, "Sala A").await;
    let (_, record_b) = open_cleaning(&app, &admin_token, &token_b, "Sala B").await;
    let response = upload_photo(app.clone(), record_a, &png_bytes(), &token_a).await;
    let photo_a = body_json(response).await["data"]["id"].as_i64().unwrap();
    upload_photo(app.clone(), record_b, &png_bytes(), &token_b).await;

    let count = |json: serde_json::Value| json["data"].as_array().unwrap().len();

    let response = get_auth(app.clone(), "/api/v1/fotos_limpeza", &admin_token).await;
    assert_eq!(count(body_json(response).await), 2);

    let response = get_auth(app.clone(), "/api/v1/fotos_limpeza", &token_a).await;
    assert_eq!(count(body_json(response).await), 1);

    let response = get_auth(app.clone(), "/api/v1/fotos_limpeza", &sol_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(count(body_json(response).await), 0);

    let uri = format!("/api/v1/fotos_limpeza/{photo_a}");
    let response = get_auth(app.clone(), &uri, &token_b).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app.clone(), &uri, &sol_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app, &uri, &token_a).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_photo_removes_file(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let (_admin, admin_token) = create_admin(&pool, "chefe").await;
    let (_z, token) = create_zelador(&pool, "zelador").await;
    let app = common::build_test_app_with_media(pool, media.path());
    let (_, record_id) = open_cleaning(&app, &admin_token, &token, "Sala 5").await;

    let response = upload_photo(app.clone(), record_id, &png_bytes(), &token).await;
    let photo = body_json(response).await["data"].clone();
    let id = photo["id"].as_i64().unwrap();
    let relative = photo["image_url"]
        .as_str()
        .unwrap()
        .trim_start_matches("/media/")
        .to_string();
    assert!(media.path().join(&relative).exists());

    let uri = format!("/api/v1/fotos_limpeza/{id}");
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!media.path().join(&relative).exists());

    let response = get_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
