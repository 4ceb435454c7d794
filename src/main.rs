//! Voiceline server entry point.
//!
//! Wires adapters from configuration: PostgreSQL stores when a database URL
//! is configured (in-memory otherwise), a model-backed classifier behind
//! the bounded-timeout failover when an API key is present (rules
//! otherwise), and Twilio SMS when credentials exist (log-only otherwise).

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use voiceline::adapters::ai::{
    FailoverClassifier, OpenAiClassifier, OpenAiClassifierConfig, RuleBasedClassifier,
};
use voiceline::adapters::http::voice::{voice_router, VoiceAppState};
use voiceline::adapters::info::StaticBusinessInfo;
use voiceline::adapters::notify::{LogNotifier, TwilioSmsConfig, TwilioSmsNotifier};
use voiceline::adapters::store::{
    ensure_schema, InMemoryRecordStore, InMemorySessionStore, PostgresRecordStore,
    PostgresSessionStore,
};
use voiceline::application::handlers::{GreetCallHandler, ProcessTurnHandler};
use voiceline::config::AppConfig;
use voiceline::ports::{IntentClassifier, Notifier, RecordStore, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        restaurant = %config.business.restaurant.name,
        financial = %config.business.financial.name,
        "voiceline starting"
    );

    let (sessions, records): (Arc<dyn SessionStore>, Arc<dyn RecordStore>) =
        if let Some(url) = config.database.url.as_deref().filter(|u| !u.is_empty()) {
            tracing::info!("connecting to PostgreSQL");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
                .connect(url)
                .await?;
            ensure_schema(&pool).await?;
            (
                Arc::new(PostgresSessionStore::new(pool.clone())),
                Arc::new(PostgresRecordStore::new(pool)),
            )
        } else {
            tracing::warn!("no database configured, using in-memory stores");
            (
                Arc::new(InMemorySessionStore::new()),
                Arc::new(InMemoryRecordStore::new()),
            )
        };

    let classifier: Arc<dyn IntentClassifier> = if config.ai.has_model_backend() {
        let api_key = config.ai.openai_api_key.clone().unwrap_or_default();
        let backend = OpenAiClassifier::new(
            OpenAiClassifierConfig::new(api_key)
                .with_model(config.ai.model.clone())
                .with_base_url(config.ai.base_url.clone())
                .with_timeout(config.ai.timeout()),
        );
        tracing::info!(model = %config.ai.model, "model-backed classifier enabled");
        Arc::new(FailoverClassifier::new(Arc::new(backend), config.ai.timeout()))
    } else {
        tracing::info!("no classifier backend configured, using keyword rules");
        Arc::new(RuleBasedClassifier::new())
    };

    let notifier: Arc<dyn Notifier> = if config.notifications.has_twilio() {
        let twilio = TwilioSmsConfig::new(
            config.notifications.twilio_account_sid.clone().unwrap_or_default(),
            config
                .notifications
                .twilio_auth_token
                .clone()
                .map(|t| secrecy::ExposeSecret::expose_secret(&t).clone())
                .unwrap_or_default(),
            config.notifications.twilio_from_number.clone().unwrap_or_default(),
        )
        .with_business_facts(
            config.business.restaurant.name.clone(),
            config.business.restaurant.phone.clone(),
            config.business.financial.oncall_staff_phone.clone(),
        );
        tracing::info!("Twilio SMS notifications enabled");
        Arc::new(TwilioSmsNotifier::new(twilio))
    } else {
        tracing::info!("notifications running in demo mode");
        Arc::new(LogNotifier::new())
    };

    let info = Arc::new(StaticBusinessInfo::new(config.business.restaurant.clone()));

    let turns = Arc::new(ProcessTurnHandler::new(
        classifier,
        sessions,
        records.clone(),
        notifier,
        info,
    ));
    let greetings = Arc::new(GreetCallHandler::new(config.business.clone()));

    let state = VoiceAppState::new(
        turns,
        greetings,
        records,
        config.business.restaurant.name.clone(),
        config.business.financial.name.clone(),
    );

    let app = voice_router()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .with_state(state);

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
