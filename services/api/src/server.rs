use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredStore, Engine};
use crate::routes::with_engine_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rfp_engine::config::AppConfig;
use rfp_engine::error::AppError;
use rfp_engine::responses::AutoSaveCoordinator;
use rfp_engine::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const AUTOSAVE_TICK: Duration = Duration::from_millis(100);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Engine::from_config(&config)?;
    let autosave = Arc::clone(&engine.autosave);
    let ticker = spawn_autosave_ticker(Arc::clone(&autosave), AUTOSAVE_TICK);

    let app = with_engine_routes(engine.autosave, engine.comparisons)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        store = %engine.store_description,
        quiet_ms = config.autosave.quiet_period_ms,
        "rfp response engine ready"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    ticker.abort();
    let flushed = autosave.flush_all();
    info!(flushed = flushed.len(), "pending autosaves written before exit");

    served?;
    Ok(())
}

/// Periodically persists debounced edits whose quiet period has elapsed.
pub(crate) fn spawn_autosave_ticker(
    autosave: Arc<AutoSaveCoordinator<ConfiguredStore>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let written = autosave.flush_due(Instant::now());
            if !written.is_empty() {
                debug!(count = written.len(), "autosave flush");
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfp_engine::catalog::QuestionId;
    use rfp_engine::responses::{ResponseStatus, ResponseValue, SubjectId};

    #[tokio::test]
    async fn ticker_writes_edits_after_quiet_period() {
        let store = ConfiguredStore::open(None).expect("memory store");
        let engine = Engine::with_store(store, Duration::from_millis(20));
        let subject = SubjectId::new("rfp-1");
        let question = QuestionId::new("company_description");

        engine.autosave.on_change(
            subject.clone(),
            question.clone(),
            Some(ResponseValue::text("draft")),
            Instant::now(),
        );
        let ticker = spawn_autosave_ticker(Arc::clone(&engine.autosave), Duration::from_millis(5));

        let mut record = None;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            record = engine.autosave.manager().resolve(&subject, &question);
            if record.is_some() {
                break;
            }
        }
        ticker.abort();

        let record = record.expect("autosave flushed");
        assert_eq!(record.status, ResponseStatus::InProgress);
        assert_eq!(engine.autosave.pending(), 0);
    }
}
