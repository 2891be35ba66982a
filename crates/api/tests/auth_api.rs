//! HTTP-level integration tests for the auth and admin user endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, create_solicitante, create_user, create_zelador, delete_auth, get,
    get_auth, png_bytes, post_json, post_json_auth, put_json_auth, put_profile, TEST_PASSWORD,
};
use sqlx::PgPool;
use zeladoria_core::roles::{ROLE_ADMIN_ID, ROLE_ZELADORIA_ID};
use zeladoria_db::repositories::UserRepo;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    let body = serde_json::json!({ "username": username, "password": password });
    post_json(app, "/api/v1/auth/login", body).await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_user(&pool, "zelador1", ROLE_ZELADORIA_ID).await;
    let app = common::build_test_app(pool.clone());

    let response = login(app, "zelador1", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "zeladoria");

    let refreshed = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(refreshed.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_user(&pool, "errado", ROLE_ADMIN_ID).await;
    let app = common::build_test_app(pool);

    let response = login(app, "errado", "outra-senha-qualquer").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = login(app, "fantasma", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = create_user(&pool, "inativo", ROLE_ADMIN_ID).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let response = login(app, "inativo", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_returns_profile(pool: PgPool) {
    let (user, token) = create_solicitante(&pool, "prof").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["role"], "solicitante");
    assert_eq!(json["profile"]["nome"], "");
    assert!(json["profile"]["profile_picture"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_or_bad_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/salas").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = get_auth(app, "/api/v1/salas", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_user_who_can_log_in(pool: PgPool) {
    let (_admin, token) = create_admin(&pool, "chefe").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "novo_zelador",
        "email": "novo@escola.test",
        "password": "vassoura-nova",
        "role_id": ROLE_ZELADORIA_ID,
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "zeladoria");
    assert!(json["data"].get("password_hash").is_none());

    let response = login(app, "novo_zelador", "vassoura-nova").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_create_user_validation(pool: PgPool) {
    let (_admin, token) = create_admin(&pool, "chefe").await;
    let app = common::build_test_app(pool);

    let short_password = serde_json::json!({
        "username": "curto",
        "email": "curto@escola.test",
        "password": "abc",
        "role_id": ROLE_ZELADORIA_ID,
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", short_password, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown_role = serde_json::json!({
        "username": "semrole",
        "email": "semrole@escola.test",
        "password": "senha-valida-1",
        "role_id": 99,
    });
    let response = post_json_auth(app, "/api/v1/admin/users", unknown_role, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_conflicts(pool: PgPool) {
    let (_admin, token) = create_admin(&pool, "chefe").await;
    create_user(&pool, "repetido", ROLE_ZELADORIA_ID).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "repetido",
        "email": "outro@escola.test",
        "password": "senha-valida-1",
        "role_id": ROLE_ZELADORIA_ID,
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admin_cannot_manage_users(pool: PgPool) {
    let (_user, token) = create_solicitante(&pool, "prof").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_update_and_deactivate_user(pool: PgPool) {
    let (_admin, token) = create_admin(&pool, "chefe").await;
    let target = create_user(&pool, "alvo", ROLE_ZELADORIA_ID).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/admin/users/{}", target.id);
    let response = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "email": "alvo2@escola.test" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "alvo2@escola.test");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = login(app, "alvo", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_reset_password(pool: PgPool) {
    let (_admin, token) = create_admin(&pool, "chefe").await;
    let target = create_user(&pool, "esquecido", ROLE_ZELADORIA_ID).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/admin/users/{}/reset-password", target.id);
    let response = post_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "new_password": "senha-redefinida" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = login(app.clone(), "esquecido", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = login(app, "esquecido", "senha-redefinida").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_list_users_filters(pool: PgPool) {
    let (_admin, token) = create_admin(&pool, "chefe").await;
    create_zelador(&pool, "ana.zeladora").await;
    create_zelador(&pool, "bruno").await;
    create_solicitante(&pool, "prof.ana").await;
    let app = common::build_test_app(pool);

    let usernames = |json: serde_json::Value| -> Vec<String> {
        let mut names: Vec<String> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        names
    };

    let response = get_auth(app.clone(), "/api/v1/admin/users", &token).await;
    assert_eq!(usernames(body_json(response).await).len(), 4);

    let response = get_auth(app.clone(), "/api/v1/admin/users?username=ANA", &token).await;
    assert_eq!(
        usernames(body_json(response).await),
        vec!["ana.zeladora", "prof.ana"]
    );

    let response = get_auth(app.clone(), "/api/v1/admin/users?group=Zeladoria", &token).await;
    assert_eq!(usernames(body_json(response).await), vec!["ana.zeladora", "bruno"]);

    let response = get_auth(
        app.clone(),
        "/api/v1/admin/users?username=ana&group=solicitante",
        &token,
    )
    .await;
    assert_eq!(usernames(body_json(response).await), vec!["prof.ana"]);

    let response = get_auth(app.clone(), "/api/v1/admin/users?email=bruno%40escola", &token).await;
    assert_eq!(usernames(body_json(response).await), vec!["bruno"]);

    let response = get_auth(app, "/api/v1/admin/users?group=inexistente", &token).await;
    assert!(usernames(body_json(response).await).is_empty());
}

// ---------------------------------------------------------------------------
// Own password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_own_password(pool: PgPool) {
    let (_user, token) = create_zelador(&pool, "zelador").await;
    let app = common::build_test_app(pool);
    let uri = "/api/v1/auth/change-password";

    let body = serde_json::json!({
        "old_password": TEST_PASSWORD,
        "new_password": "vassoura-nova-1",
        "confirm_new_password": "vassoura-nova-2",
    });
    let response = post_json_auth(app.clone(), uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let body = serde_json::json!({
        "old_password": "senha-errada-xyz",
        "new_password": "vassoura-nova-1",
        "confirm_new_password": "vassoura-nova-1",
    });
    let response = post_json_auth(app.clone(), uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "A senha antiga está incorreta.");

    let body = serde_json::json!({
        "old_password": TEST_PASSWORD,
        "new_password": "vassoura-nova-1",
        "confirm_new_password": "vassoura-nova-1",
    });
    let response = post_json_auth(app.clone(), uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Senha alterada com sucesso.");

    let response = login(app.clone(), "zelador", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = login(app, "zelador", "vassoura-nova-1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "old_password": TEST_PASSWORD,
        "new_password": "vassoura-nova-1",
        "confirm_new_password": "vassoura-nova-1",
    });
    let response = post_json(app, "/api/v1/auth/change-password", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_name_and_picture(pool: PgPool) {
    let (user, token) = create_solicitante(&pool, "prof").await;
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_media(pool.clone(), media.path());

    let response = get_auth(app.clone(), "/api/v1/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["nome"], "");
    assert!(json["profile_picture"].is_null());

    // Name and picture together.
    let response = put_profile(app.clone(), "Maria Prof", Some(&png_bytes()), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["nome"], "Maria Prof");
    let url = json["profile_picture"].as_str().unwrap().to_string();
    assert!(url.starts_with("/media/profile_pics/"));
    assert!(url.ends_with(".png"));
    assert!(!url.contains("minha-foto"));
    let first = url.trim_start_matches("/media/").to_string();
    assert!(media.path().join(&first).exists());

    // A new picture replaces the old file.
    let response = put_profile(app.clone(), "Maria Prof", Some(&png_bytes()), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await["profile_picture"]
        .as_str()
        .unwrap()
        .trim_start_matches("/media/")
        .to_string();
    assert_ne!(first, second);
    assert!(!media.path().join(&first).exists());
    assert!(media.path().join(&second).exists());

    // Leaving the picture out removes it.
    let response = put_profile(app.clone(), "Maria S.", None, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["nome"], "Maria S.");
    assert!(json["profile_picture"].is_null());
    assert!(!media.path().join(&second).exists());

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.display_name, "Maria S.");
    assert!(stored.profile_picture_path.is_none());

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(body_json(response).await["profile"]["nome"], "Maria S.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_rejects_bad_input(pool: PgPool) {
    let (_user, token) = create_zelador(&pool, "zelador").await;
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_media(pool, media.path());

    let response = put_profile(app.clone(), "Nome", Some(b"nao sou uma imagem"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!media.path().join("profile_pics").exists());

    let long_name = "x".repeat(151);
    let response = put_profile(app.clone(), &long_name, None, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/api/v1/auth/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
