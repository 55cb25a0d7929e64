//! Console API router.
//!
//! Returns a composable `Router` with all endpoints nested under `/api`.
//! Login is the only unprotected route; everything else sits behind the
//! bearer-session middleware, with per-role capability checks inside the
//! handlers.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the console API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer); endpoint handlers use `State<ApiContext>`.
pub fn console_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(endpoints::dashboard::overview))
        .route("/patients", get(endpoints::patients::list))
        .route("/patients/:id", get(endpoints::patients::detail))
        .route("/clinics", get(endpoints::clinics::list))
        .route("/appointments", get(endpoints::appointments::list))
        .route("/medicines", get(endpoints::medicines::list))
        .route(
            "/prescriptions",
            get(endpoints::prescriptions::list).post(endpoints::prescriptions::create),
        )
        .route(
            "/prescriptions/:id/document",
            get(endpoints::prescriptions::document),
        )
        .route("/auth/logout", post(endpoints::auth::logout))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx);

    Router::new().nest("/api", protected).nest("/api", unprotected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::Engine;
    use tower::ServiceExt;

    use crate::auth::SessionStore;
    use crate::core_state::CoreState;
    use crate::services::{MockDirectory, PATIENT_ZIDANE};
    use crate::signature::SignaturePad;

    fn test_ctx() -> (ApiContext, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let sessions = SessionStore::load(&tmp.path().join("sessions.json"));
        let core = Arc::new(CoreState::new(MockDirectory::instant(), sessions));
        (ApiContext::new(core), tmp)
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 2 * 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn login(ctx: &ApiContext, email: &str, password: &str) -> String {
        let app = console_router(ctx.clone());
        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({"email": email, "password": password}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn signature_base64() -> String {
        let mut pad = SignaturePad::default();
        pad.add_stroke(&[(60.0, 160.0), (280.0, 90.0), (540.0, 180.0)]);
        base64::engine::general_purpose::STANDARD.encode(pad.export_png().unwrap())
    }

    fn paracetamol_body(signature: &str) -> serde_json::Value {
        serde_json::json!({
            "patient_id": PATIENT_ZIDANE,
            "date": "2026-02-20",
            "medications": [{
                "name": "Paracetamol",
                "dosage": "500mg",
                "posology": "1 comprimé x3/jour",
                "duration": "5 jours"
            }],
            "signature_png": signature
        })
    }

    #[tokio::test]
    async fn login_returns_token_and_navigation() {
        let (ctx, _tmp) = test_ctx();
        let app = console_router(ctx);

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({
                    "email": "l.benali@clinique-elazhar.dz",
                    "password": "benali-2026"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(!json["token"].as_str().unwrap().is_empty());
        assert_eq!(json["role"], "Doctor");
        let paths: Vec<&str> = json["navigation"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"/prescriptions"));
        assert!(!paths.contains(&"/clinics"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_returns_401() {
        let (ctx, _tmp) = test_ctx();
        let app = console_router(ctx);

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({
                    "email": "l.benali@clinique-elazhar.dz",
                    "password": "nope"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_routes_require_auth() {
        let (ctx, _tmp) = test_ctx();
        for uri in ["/api/dashboard", "/api/patients", "/api/prescriptions"] {
            let app = console_router(ctx.clone());
            let response = app.oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let (ctx, _tmp) = test_ctx();
        let app = console_router(ctx);
        let response = app
            .oneshot(get_request("/api/dashboard", Some("not-a-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn capability_gates_by_role() {
        let (ctx, _tmp) = test_ctx();

        // Pharmacy has no prescription area
        let pharmacy = login(&ctx, "pharmacie@clinique-elazhar.dz", "pharmacie-2026").await;
        let response = console_router(ctx.clone())
            .oneshot(get_request("/api/prescriptions", Some(&pharmacy)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Nurse has no medicine catalog
        let nurse = login(&ctx, "infirmerie@clinique-elazhar.dz", "infirmerie-2026").await;
        let response = console_router(ctx.clone())
            .oneshot(get_request("/api/medicines", Some(&nurse)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Only the super user sees clinics
        let response = console_router(ctx.clone())
            .oneshot(get_request("/api/clinics", Some(&nurse)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let direction = login(&ctx, "direction@ordocare.dz", "direction-2026").await;
        let response = console_router(ctx)
            .oneshot(get_request("/api/clinics", Some(&direction)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dashboard_response_shape() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let response = console_router(ctx)
            .oneshot(get_request("/api/dashboard", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Cache-Control").unwrap(),
            "no-store"
        );

        let json = response_json(response).await;
        assert_eq!(json["user_name"], "Dr. Leila Benali");
        assert_eq!(json["role"], "doctor");
        assert!(json["stats"]["patients"].is_number());
        assert!(json["visits_series"].is_array());
        assert_eq!(json["session_prescriptions"], 0);
    }

    #[tokio::test]
    async fn doctor_creates_prescription_and_downloads_document() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let response = console_router(ctx.clone())
            .oneshot(post_json(
                "/api/prescriptions",
                Some(&token),
                paracetamol_body(&signature_base64()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["number"], "ORD-2026-0001");
        assert_eq!(json["patient_name"], "Amine Zidane");
        assert_eq!(json["medication_count"], 1);
        assert_eq!(json["filename"], "Ordonnance_Amine_Zidane_2026-02-20.pdf");
        let id = json["id"].as_str().unwrap().to_string();

        let response = console_router(ctx)
            .oneshot(get_request(
                &format!("/api/prescriptions/{id}/document"),
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/pdf"
        );
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"Ordonnance_Amine_Zidane_2026-02-20.pdf\""
        );
        let body = axum::body::to_bytes(response.into_body(), 2 * 1024 * 1024)
            .await
            .unwrap();
        assert_eq!(&body[0..4], b"%PDF");
    }

    #[tokio::test]
    async fn zero_medications_is_rejected_before_any_document_work() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let mut body = paracetamol_body(&signature_base64());
        body["medications"] = serde_json::json!([]);

        let response = console_router(ctx.clone())
            .oneshot(post_json("/api/prescriptions", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Nothing stored
        let response = console_router(ctx)
            .oneshot(get_request("/api/prescriptions", Some(&token)))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["prescriptions"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn blank_required_medication_field_is_rejected() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let mut body = paracetamol_body(&signature_base64());
        body["medications"][0]["posology"] = serde_json::json!("   ");

        let response = console_router(ctx)
            .oneshot(post_json("/api/prescriptions", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("posology"));
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let response = console_router(ctx)
            .oneshot(post_json(
                "/api/prescriptions",
                Some(&token),
                paracetamol_body(""),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert!(json["error"]["message"].as_str().unwrap().contains("signature"));
    }

    #[tokio::test]
    async fn unknown_patient_returns_404() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let mut body = paracetamol_body(&signature_base64());
        body["patient_id"] = serde_json::json!(uuid::Uuid::new_v4());

        let response = console_router(ctx)
            .oneshot(post_json("/api/prescriptions", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn outstanding_submission_returns_409() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        // Simulate the first click still being processed
        assert!(ctx
            .core
            .begin_submission("l.benali@clinique-elazhar.dz")
            .unwrap());

        let response = console_router(ctx)
            .oneshot(post_json(
                "/api/prescriptions",
                Some(&token),
                paracetamol_body(&signature_base64()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "DUPLICATE_SUBMISSION");
    }

    #[tokio::test]
    async fn logout_revokes_the_session() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "l.benali@clinique-elazhar.dz", "benali-2026").await;

        let response = console_router(ctx.clone())
            .oneshot(post_json(
                "/api/auth/logout",
                Some(&token),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = console_router(ctx)
            .oneshot(get_request("/api/dashboard", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn medicines_search_filters_catalog() {
        let (ctx, _tmp) = test_ctx();
        let token = login(&ctx, "pharmacie@clinique-elazhar.dz", "pharmacie-2026").await;

        let response = console_router(ctx)
            .oneshot(get_request("/api/medicines?search=doliprane", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let medicines = json["medicines"].as_array().unwrap();
        assert_eq!(medicines.len(), 1);
        assert_eq!(medicines[0]["name"], "Doliprane");
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let (ctx, _tmp) = test_ctx();
        let app = console_router(ctx);
        let response = app
            .oneshot(get_request("/api/nonexistent", Some("token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
