//! Coop Ledger API server.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use secrecy::SecretString;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use coop_ledger::adapters::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use coop_ledger::adapters::card::SvgGiftCardRenderer;
use coop_ledger::adapters::email::MailgunSender;
use coop_ledger::adapters::http::{api_router, AppState};
use coop_ledger::adapters::postgres::{
    PostgresAccountRepository, PostgresGiftCodeRepository, PostgresLedgerReader,
    PostgresPaymentEventRepository, MIGRATOR,
};
use coop_ledger::adapters::storage::LocalDocumentStorage;
use coop_ledger::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use coop_ledger::application::handlers::CheckoutUrls;
use coop_ledger::config::AppConfig;
use coop_ledger::domain::intake::StripeWebhookVerifier;

/// Multipart framing on top of the three documents.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let card_renderer = SvgGiftCardRenderer::load(config.storage.gift_card_template.as_deref())?;

    let stripe = StripePaymentAdapter::new(
        StripeConfig::new(
            config.payment.stripe_api_key.clone(),
            config.payment.stripe_price_id.clone(),
        )
        .with_base_url(config.payment.stripe_api_base.clone())
        .with_timeout(config.payment.request_timeout()),
    )?;

    let state = AppState {
        accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
        ledger: Arc::new(PostgresLedgerReader::new(pool.clone())),
        payments: Arc::new(PostgresPaymentEventRepository::new(pool.clone())),
        gifts: Arc::new(PostgresGiftCodeRepository::new(pool.clone())),
        payment_provider: Arc::new(stripe),
        documents: Arc::new(LocalDocumentStorage::new(
            config.storage.uploads_path(),
            config.storage.max_document_bytes,
        )),
        notifier: Arc::new(MailgunSender::new(&config.email)?),
        token_issuer: Arc::new(JwtTokenIssuer::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_days,
        )),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        card_renderer: Arc::new(card_renderer),
        webhook_verifier: Arc::new(StripeWebhookVerifier::new(SecretString::new(
            config.payment.stripe_webhook_secret.clone(),
        ))),
        checkout_urls: CheckoutUrls::new(config.payment.app_base_url.clone()),
    };

    let document_body_limit =
        usize::try_from(config.storage.max_document_bytes.saturating_mul(3))
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = api_router(state, document_body_limit).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server.cors_origins_list()))
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    );

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON lines in production, human-readable output elsewhere. `RUST_LOG`
/// overrides the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .init();
    }
}

/// No configured origins means any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
