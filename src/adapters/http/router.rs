//! Top-level router assembly.

use axum::{middleware::from_fn_with_state, Router};

use super::middleware::{auth_middleware, AuthState};
use super::state::AppState;
use super::{accounts, admin, gifts, webhooks};

/// Builds the full API.
///
/// Public and webhook routes never see the auth middleware, so a stale token
/// sent along with a login or a gift card download is ignored.
pub fn api_router(state: AppState, document_body_limit: usize) -> Router {
    let auth: AuthState = state.token_issuer.clone();

    let protected = Router::new()
        .merge(accounts::member_routes(document_body_limit))
        .merge(gifts::member_routes())
        .nest("/admin", admin::admin_routes())
        .route_layer(from_fn_with_state(auth, auth_middleware));

    Router::new()
        .merge(accounts::public_routes())
        .merge(gifts::public_routes())
        .merge(webhooks::webhook_routes())
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::adapters::card::SvgGiftCardRenderer;
    use crate::adapters::storage::LocalDocumentStorage;
    use crate::application::handlers::test_support::{registration_input, Fixture};
    use crate::application::handlers::CheckoutUrls;
    use crate::domain::account::Account;
    use crate::domain::foundation::{Principal, Role};
    use crate::domain::intake::{sign_payload, StripeWebhookVerifier};
    use crate::ports::{NotificationTemplate, TokenIssuer};

    const WEBHOOK_SECRET: &str = "whsec_router_secret";

    struct TestApp {
        fx: Fixture,
        router: Router,
        _uploads: TempDir,
    }

    fn test_app() -> TestApp {
        let fx = Fixture::new();
        let uploads = TempDir::new().unwrap();
        let state = AppState {
            accounts: Arc::new(fx.store.clone()),
            ledger: Arc::new(fx.store.clone()),
            payments: Arc::new(fx.store.clone()),
            gifts: Arc::new(fx.store.clone()),
            payment_provider: Arc::new(fx.provider.clone()),
            documents: Arc::new(LocalDocumentStorage::new(uploads.path(), 1024)),
            notifier: Arc::new(fx.mailer.clone()),
            token_issuer: fx.issuer.clone(),
            password_hasher: fx.hasher.clone(),
            card_renderer: Arc::new(SvgGiftCardRenderer::builtin().unwrap()),
            webhook_verifier: Arc::new(StripeWebhookVerifier::new(SecretString::new(
                WEBHOOK_SECRET.to_string(),
            ))),
            checkout_urls: CheckoutUrls::new("https://coop.example"),
        };
        TestApp {
            router: api_router(state, 16 * 1024),
            fx,
            _uploads: uploads,
        }
    }

    impl TestApp {
        async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, bytes.to_vec())
        }

        async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
            let (status, bytes) = self.send(request).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }

        fn token(&self, account: &Account, role: Role) -> String {
            self.fx
                .issuer
                .issue(&Principal::new(account.id, role))
                .unwrap()
                .token
        }
    }

    fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Account Flow
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn register_confirm_then_me() {
        let app = test_app();
        let input = registration_input("Ada@Example.org");
        let body = json!({
            "email": input.email,
            "password": input.password,
            "phone_number": input.phone_number,
            "first_name": input.first_name,
            "last_name": input.last_name,
            "address": input.address,
            "postal_code": input.postal_code,
            "city": input.city,
            "country": input.country,
            "category": input.category,
        });

        let (status, _) = app
            .send_json(json_request(Method::POST, "/users", None, body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, err) = app
            .send_json(json_request(Method::POST, "/users", None, body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "email-used");

        let (status, err) = app
            .send_json(json_request(
                Method::POST,
                "/tokens",
                None,
                json!({"email": "ada@example.org", "password": "password"}),
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["code"], "not-confirmed");

        let mail = app
            .fx
            .mailer
            .last_to("ada@example.org", NotificationTemplate::ConfirmAccount)
            .unwrap();
        let (status, confirmed) = app
            .send_json(json_request(
                Method::POST,
                "/users/confirm",
                None,
                json!({"email": "ada@example.org", "token": mail.token.as_str()}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = confirmed["token"].as_str().unwrap().to_string();

        let (status, me) = app.send_json(get("/users/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "ada@example.org");
        assert_eq!(me["mustUploadDocuments"], true);
        assert_eq!(me["shares"], 0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = test_app();
        let (status, err) = app
            .send_json(json_request(Method::POST, "/tokens", None, json!({"email": 3})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "bad-request");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Authentication
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn me_without_token_is_header_missing() {
        let app = test_app();
        let (status, err) = app.send_json(get("/users/me", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "authorization-header-missing");
    }

    #[tokio::test]
    async fn me_with_garbage_token_is_invalid() {
        let app = test_app();
        let (status, err) = app.send_json(get("/users/me", Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["code"], "token-invalid");
    }

    #[tokio::test]
    async fn stale_token_on_public_route_is_ignored() {
        let app = test_app();
        let (status, err) = app
            .send_json(json_request(
                Method::POST,
                "/tokens",
                Some("garbage"),
                json!({"email": "nobody@example.org", "password": "x"}),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "email-unknown");
    }

    #[tokio::test]
    async fn admin_routes_refuse_members() {
        let app = test_app();
        let ada = app.fx.confirmed_member("ada@example.org").await;
        let token = app.token(&ada, Role::Member);

        let (status, err) = app.send_json(get("/admin/users", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["code"], "not-admin");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Shares and Gifts
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn checkout_returns_provider_url() {
        let app = test_app();
        let ada = app.fx.confirmed_member("ada@example.org").await;
        let token = app.token(&ada, Role::Member);

        let (status, body) = app
            .send_json(json_request(
                Method::POST,
                "/users/me/checkout/sessions",
                Some(&token),
                json!({"quantity": 3, "gift": false}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["url"]
            .as_str()
            .unwrap()
            .starts_with("https://checkout.stripe.test/pay/"));

        let (status, err) = app
            .send_json(json_request(
                Method::POST,
                "/users/me/checkout/sessions",
                Some(&token),
                json!({"quantity": 0, "gift": false}),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "bad-request");
    }

    #[tokio::test]
    async fn webhook_then_redeem_moves_gift_shares() {
        let app = test_app();
        let payer = app.fx.confirmed_member("payer@example.org").await;
        let friend = app.fx.confirmed_member("friend@example.org").await;
        let gift = crate::domain::gift::Gift::new(crate::domain::gift::GiftCode::generate());
        crate::ports::GiftCodeRepository::insert(&app.fx.store, &gift)
            .await
            .unwrap();

        let payload = json!({
            "id": "evt_router_1",
            "type": "checkout.session.completed",
            "created": chrono::Utc::now().timestamp(),
            "data": { "object": { "id": "cs_1", "metadata": {
                "userID": payer.id.to_string(),
                "shares": "3",
                "giftID": gift.id.to_string(),
            }}}
        })
        .to_string();
        let signature =
            sign_payload(WEBHOOK_SECRET, chrono::Utc::now().timestamp(), &payload).unwrap();
        let webhook = Request::builder()
            .method(Method::POST)
            .uri("/stripe/webhook")
            .header("Stripe-Signature", signature)
            .body(Body::from(payload))
            .unwrap();
        let (status, _) = app.send(webhook).await;
        assert_eq!(status, StatusCode::OK);

        let payer_token = app.token(&payer, Role::Member);
        let (_, me) = app.send_json(get("/users/me", Some(&payer_token))).await;
        assert_eq!(me["shares"], 0);

        let friend_token = app.token(&friend, Role::Member);
        let redeem = json!({"gift_code": gift.code.as_str()});
        let (status, _) = app
            .send(json_request(
                Method::POST,
                "/users/me/use-gift-code",
                Some(&friend_token),
                redeem.clone(),
            ))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, me) = app.send_json(get("/users/me", Some(&friend_token))).await;
        assert_eq!(me["shares"], 3);

        let (status, err) = app
            .send_json(json_request(
                Method::POST,
                "/users/me/use-gift-code",
                Some(&friend_token),
                redeem,
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "gift-code-claimed");
    }

    #[tokio::test]
    async fn unsigned_webhook_is_authentication_failure() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/stripe/webhook")
            .body(Body::from("{}"))
            .unwrap();
        let (status, bytes) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(err["code"], "authentication-failed");
    }

    #[tokio::test]
    async fn oversized_webhook_is_rejected() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/stripe/webhook")
            .header("Stripe-Signature", "t=1,v1=00")
            .body(Body::from(vec![b' '; webhooks::WEBHOOK_BODY_LIMIT + 1]))
            .unwrap();
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn gift_card_is_an_svg_attachment() {
        let app = test_app();
        let payer = app.fx.confirmed_member("payer@example.org").await;
        let gift = app.fx.funded_gift(payer.id, 2).await;

        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/gifts/{}", gift.id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let svg = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(svg.contains(gift.code.as_str()));
    }

    #[tokio::test]
    async fn malformed_gift_id_is_bad_request() {
        let app = test_app();
        let (status, _) = app.send(get("/gifts/not-a-uuid", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Admin
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn admin_grants_shares_and_exports_csv() {
        let app = test_app();
        let root = app.fx.confirmed_member("root@example.org").await;
        assert!(app.fx.store.grant_admin(&root.id));
        let admin_token = app.token(&root, Role::Admin);
        let ada = app.fx.confirmed_member("ada@example.org").await;

        let (status, _) = app
            .send(json_request(
                Method::PUT,
                &format!("/admin/users/{}/initial-shares", ada.id),
                Some(&admin_token),
                json!({"initialShares": 5}),
            ))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, detail) = app
            .send_json(get(&format!("/admin/users/{}", ada.id), Some(&admin_token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["shares"], 5);
        assert_eq!(detail["initialShares"], 5);

        let (status, list) = app.send_json(get("/admin/users", Some(&admin_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 2);

        let uri = format!("/admin/csv/users?token={}", admin_token);
        let response = app.router.clone().oneshot(get(&uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[tokio::test]
    async fn unknown_member_is_id_unknown() {
        let app = test_app();
        let root = app.fx.confirmed_member("root@example.org").await;
        assert!(app.fx.store.grant_admin(&root.id));
        let admin_token = app.token(&root, Role::Admin);

        let uri = format!("/admin/users/{}", crate::domain::foundation::AccountId::new());
        let (status, err) = app.send_json(get(&uri, Some(&admin_token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "id-unknown");
    }

    #[tokio::test]
    async fn documents_upload_then_admin_download() {
        let app = test_app();
        let ada = app.fx.confirmed_member("ada@example.org").await;
        let member_token = app.token(&ada, Role::Member);

        let boundary = "XBOUNDARYX";
        let mut body = String::new();
        for (name, content) in [("identity_front", "front-scan"), ("address_proof", "bill")] {
            body.push_str(&format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"; filename=\"{n}.pdf\"\r\nContent-Type: application/pdf\r\n\r\n{c}\r\n",
                b = boundary,
                n = name,
                c = content
            ));
        }
        body.push_str(&format!("--{}--\r\n", boundary));

        let upload = Request::builder()
            .method(Method::POST)
            .uri("/users/me/documents")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .header(header::AUTHORIZATION, format!("Bearer {}", member_token))
            .body(Body::from(body))
            .unwrap();
        let (status, stored) = app.send_json(upload).await;
        assert_eq!(status, StatusCode::OK);
        let front = stored["identityFront"].as_str().unwrap().to_string();
        assert!(stored["identityBack"].is_null());

        let (_, me) = app.send_json(get("/users/me", Some(&member_token))).await;
        assert_eq!(me["mustUploadDocuments"], false);

        let root = app.fx.confirmed_member("root@example.org").await;
        assert!(app.fx.store.grant_admin(&root.id));
        let admin_token = app.token(&root, Role::Admin);
        let (status, bytes) = app
            .send(get(
                &format!("/admin/users/{}/documents/{}", ada.id, front),
                Some(&admin_token),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"front-scan");
    }

    #[tokio::test]
    async fn documents_without_address_proof_are_rejected() {
        let app = test_app();
        let ada = app.fx.confirmed_member("ada@example.org").await;
        let token = app.token(&ada, Role::Member);

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"identity_front\"; filename=\"f.pdf\"\r\n\r\nfront\r\n--{b}--\r\n",
            b = boundary
        );
        let upload = Request::builder()
            .method(Method::POST)
            .uri("/users/me/documents")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body))
            .unwrap();
        let (status, err) = app.send_json(upload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "bad-request");
    }
}
