mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct Setup {
    owner: AuthHeaders,
    brand_id: String,
    product_id: String,
    booking_id: String,
    booking_code: String,
}

async fn create_setup(app: &TestApp, slug: &str) -> Setup {
    let owner = app.register_and_login(&format!("owner-{}", slug)).await;
    let brand_id = app.create_brand(&owner, "Studio Nine", slug).await;
    let product_id = app.create_product(&owner, &brand_id, "Main Hall", 100_000).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "product_id": product_id,
                "start_date": "2026-01-05T00:00:00Z",
                "end_date": "2026-01-07T00:00:00Z",
                "customer_name": "Alice",
                "customer_phone": "+6281234567",
                "customer_email": "alice@example.com"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;

    Setup {
        owner,
        brand_id,
        product_id,
        booking_id: body["booking"]["id"].as_str().unwrap().to_string(),
        booking_code: body["booking"]["booking_code"].as_str().unwrap().to_string(),
    }
}

async fn get_authed(app: &TestApp, auth: &AuthHeaders, uri: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("GET").uri(uri)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_anonymous_cannot_read_by_internal_id() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a1").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/bookings/{}", setup.booking_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_can_read_by_booking_code() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a2").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/bookings/{}", setup.booking_code))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["id"], setup.booking_id.as_str());
}

#[tokio::test]
async fn test_stranger_gets_forbidden_regardless_of_existence() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a3").await;
    let stranger = app.register_and_login("stranger-a3").await;

    // Existing booking the stranger has no stake in.
    let existing = get_authed(&app, &stranger, &format!("/api/v1/bookings/{}", setup.booking_id)).await;
    assert_eq!(existing.status(), StatusCode::FORBIDDEN);

    // Nonexistent id: same answer, no existence leak.
    let missing = get_authed(&app, &stranger, "/api/v1/bookings/no-such-booking").await;
    assert_eq!(missing.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_sees_not_found_for_missing_booking() {
    let app = TestApp::new().await;
    create_setup(&app, "a4").await;
    let admin = app.seed_admin("root-a4").await;

    let res = get_authed(&app, &admin, "/api/v1/bookings/no-such-booking").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_booker_and_admin_can_read() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a5").await;
    let admin = app.seed_admin("root-a5").await;

    let owner_res = get_authed(&app, &setup.owner, &format!("/api/v1/bookings/{}", setup.booking_id)).await;
    assert_eq!(owner_res.status(), StatusCode::OK);

    let admin_res = get_authed(&app, &admin, &format!("/api/v1/bookings/{}", setup.booking_id)).await;
    assert_eq!(admin_res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stranger_cannot_mutate() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a6").await;
    let stranger = app.register_and_login("stranger-a6").await;

    let patch = app.router.clone().oneshot(
        Request::builder().method("PATCH").uri(format!("/api/v1/bookings/{}", setup.booking_id))
            .header(header::COOKIE, format!("access_token={}", stranger.access_token))
            .header("X-CSRF-Token", &stranger.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"status": "CONFIRMED"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(patch.status(), StatusCode::FORBIDDEN);

    let delete = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/bookings/{}", setup.booking_id))
            .header(header::COOKIE, format!("access_token={}", stranger.access_token))
            .header("X-CSRF-Token", &stranger.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mutations_require_identity() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a7").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PATCH").uri(format!("/api/v1/bookings/{}", setup.booking_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"status": "CONFIRMED"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_product_listing_is_sanitized() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a8").await;

    // Anonymous caller.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/bookings?product_id={}", setup.product_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["id"], setup.booking_id.as_str());
    assert_eq!(row["product_id"], setup.product_id.as_str());
    assert_eq!(row["status"], "PENDING");
    assert!(row.get("customer_name").is_none());
    assert!(row.get("customer_phone").is_none());
    assert!(row.get("customer_email").is_none());
    assert!(row.get("total_price").is_none());
    assert!(row.get("booking_code").is_none());

    // Same shape even for the brand owner: the projection depends on the
    // query, not the identity.
    let owned = get_authed(&app, &setup.owner, &format!("/api/v1/bookings?product_id={}", setup.product_id)).await;
    let body = parse_body(owned).await;
    assert!(body.as_array().unwrap()[0].get("customer_name").is_none());
}

#[tokio::test]
async fn test_brand_scoped_listing_requires_ownership() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a9").await;
    let stranger = app.register_and_login("stranger-a9").await;

    // Anonymous: no identity at all.
    let anon = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/bookings?brand_id={}", setup.brand_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    // Stranger: identity present, no privilege.
    let forbidden = get_authed(&app, &stranger, &format!("/api/v1/bookings?brand_id={}", setup.brand_id)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // Owner gets the full records.
    let owned = get_authed(&app, &setup.owner, &format!("/api/v1/bookings?brand_id={}", setup.brand_id)).await;
    assert_eq!(owned.status(), StatusCode::OK);
    let body = parse_body(owned).await;
    assert_eq!(body.as_array().unwrap()[0]["customer_name"], "Alice");
}

#[tokio::test]
async fn test_user_scoped_listing_is_self_only() {
    let app = TestApp::new().await;
    create_setup(&app, "a10").await;
    let customer = app.register_and_login("customer-a10").await;
    let other = app.register_and_login("other-a10").await;

    let own = get_authed(&app, &customer, &format!("/api/v1/bookings?user_id={}", customer.user_id)).await;
    assert_eq!(own.status(), StatusCode::OK);

    let foreign = get_authed(&app, &customer, &format!("/api/v1/bookings?user_id={}", other.user_id)).await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let admin = app.seed_admin("root-a10").await;
    let any = get_authed(&app, &admin, &format!("/api/v1/bookings?user_id={}", customer.user_id)).await;
    assert_eq!(any.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unfiltered_listing_defaults_to_own_bookings() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a11").await;
    let customer = app.register_and_login("customer-a11").await;

    // Customer books for themselves.
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header(header::COOKIE, format!("access_token={}", customer.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "product_id": setup.product_id,
                "start_date": "2026-02-01T00:00:00Z",
                "end_date": "2026-02-02T00:00:00Z",
                "customer_name": "Carol",
                "customer_phone": "+6280000002"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let anon = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/bookings").body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    let own = get_authed(&app, &customer, "/api/v1/bookings").await;
    assert_eq!(own.status(), StatusCode::OK);
    let rows = parse_body(own).await;
    let rows = rows.as_array().unwrap().clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["customer_name"], "Carol");

    // Admin sees everything.
    let admin = app.seed_admin("root-a11").await;
    let all = get_authed(&app, &admin, "/api/v1/bookings").await;
    assert_eq!(parse_body(all).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_status_filter_rejected() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a12").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/bookings?product_id={}&status=BOGUS", setup.product_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_creation_requires_brand_ownership() {
    let app = TestApp::new().await;
    let setup = create_setup(&app, "a13").await;
    let stranger = app.register_and_login("stranger-a13").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/brands/{}/products", setup.brand_id))
            .header(header::COOKIE, format!("access_token={}", stranger.access_token))
            .header("X-CSRF-Token", &stranger.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "Intruder Room", "price": 1}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = app.seed_admin("root-a13").await;
    let allowed = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/brands/{}/products", setup.brand_id))
            .header(header::COOKIE, format!("access_token={}", admin.access_token))
            .header("X-CSRF-Token", &admin.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "Annex", "price": 10}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(allowed.status(), StatusCode::CREATED);
}
