#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use zeladoria_api::auth::jwt::{generate_access_token, JwtConfig};
use zeladoria_api::auth::password::hash_password;
use zeladoria_api::config::ServerConfig;
use zeladoria_api::router::build_app_router;
use zeladoria_api::state::AppState;
use zeladoria_core::roles::{ROLE_ADMIN_ID, ROLE_SOLICITANTE_ID, ROLE_ZELADORIA_ID};
use zeladoria_core::storage::LocalImageStore;
use zeladoria_db::models::user::{CreateUser, User};
use zeladoria_db::repositories::UserRepo;

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "senha-de-teste-123";

const MULTIPART_BOUNDARY: &str = "zeladoria-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// The expiry job is disabled; tests trigger it explicitly.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        max_upload_bytes: 5 * 1024 * 1024,
        expiry_check_interval_secs: 0,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router storing uploads under `media_root`.
pub fn build_test_app_with_media(pool: PgPool, media_root: &Path) -> Router {
    let config = test_config(media_root);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_store: Arc::new(LocalImageStore::new(media_root)),
    };
    build_app_router(state, &config)
}

/// Build the full application router with a throwaway media directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let media_root = std::env::temp_dir().join(format!("zeladoria-test-{}", Uuid::new_v4()));
    build_test_app_with_media(pool, &media_root)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role_id: i64) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@escola.test"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Issue a token for `user` signed with the test secret.
pub fn token_for(user: &User, role: &str) -> String {
    let config = test_config(Path::new("unused"));
    generate_access_token(user.id, role, &config.jwt).expect("token generation should succeed")
}

pub async fn create_admin(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ROLE_ADMIN_ID).await;
    let token = token_for(&user, "admin");
    (user, token)
}

pub async fn create_zelador(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ROLE_ZELADORIA_ID).await;
    let token = token_for(&user, "zeladoria");
    (user, token)
}

pub async fn create_solicitante(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ROLE_SOLICITANTE_ID).await;
    let token = token_for(&user, "solicitante");
    (user, token)
}

/// Create a room through the API as `admin_token` and return its JSON.
pub async fn create_room(app: &Router, admin_token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app.clone(), "/api/v1/salas", body, admin_token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Encode a small PNG image.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(8, 6);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("png encoding should succeed");
    buf.into_inner()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

/// POST without a body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::POST, uri, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::PATCH, uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// One multipart form field. `filename` marks it as a file part.
pub struct FormField<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub data: &'a [u8],
}

/// Send a multipart/form-data request with the given fields.
pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    fields: &[FormField<'_>],
    token: &str,
) -> Response {
    let mut body = Vec::new();
    for field in fields {
        let disposition = match field.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                field.name
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                field.name
            ),
        };
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n{disposition}").as_bytes());
        body.extend_from_slice(field.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request should build");
    send(app, request).await
}

/// Upload a cleaning photo as multipart (`registro_limpeza`, `imagem`).
pub async fn upload_photo(app: Router, record_id: i64, image: &[u8], token: &str) -> Response {
    let record = record_id.to_string();
    let fields = [
        FormField {
            name: "registro_limpeza",
            filename: None,
            data: record.as_bytes(),
        },
        FormField {
            name: "imagem",
            filename: Some("foto.png"),
            data: image,
        },
    ];
    send_multipart(app, Method::POST, "/api/v1/fotos_limpeza", &fields, token).await
}

/// Replace the caller's profile (`nome`, optional `profile_picture`).
pub async fn put_profile(app: Router, nome: &str, picture: Option<&[u8]>, token: &str) -> Response {
    let mut fields = vec![FormField {
        name: "nome",
        filename: None,
        data: nome.as_bytes(),
    }];
    if let Some(data) = picture {
        fields.push(FormField {
            name: "profile_picture",
            filename: Some("minha-foto.png"),
            data,
        });
    }
    send_multipart(app, Method::PUT, "/api/v1/auth/profile", &fields, token).await
}
