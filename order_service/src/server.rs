use std::{future::Future, sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_engine::{reconcile, OrderCache, OrderIngestor, ReconcileReport, SqliteDatabase};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{config::ServiceConfig, errors::ServerError, routes::configure_routes, subscriber::NatsSubscriber};

/// Runs the service until it receives SIGINT or SIGTERM, or until the HTTP server stops by itself.
///
/// Startup is strictly ordered. The store must be reachable, and the cache is rehydrated from it before the first
/// message is taken off the queue. Losing the rehydration is not fatal: the service starts with whatever it has and
/// fills up as events arrive.
pub async fn run_service(config: ServiceConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;

    let cache = Arc::new(OrderCache::new());
    match reconcile(&cache, &db).await {
        ReconcileReport::Restored(n) => info!("🚀️ Cache warmed up with {n} orders"),
        ReconcileReport::Degraded(n) => warn!("🚀️ Starting with a partially warmed cache ({n} orders)"),
    }

    let ingestor = OrderIngestor::new(db.clone(), Arc::clone(&cache));
    let subscriber = NatsSubscriber::connect(&config.nats, ingestor).await?;
    let shutdown = CancellationToken::new();
    let subscriber_task = tokio::spawn(subscriber.run(shutdown.clone()));

    let srv = create_server_instance(&config, Arc::clone(&cache))?;
    info!("🚀️ Order service is up on {}:{}", config.host, config.port);
    let result = serve_until_shutdown(srv, shutdown_signal(), &shutdown).await;

    drain_subscriber(subscriber_task, config.shutdown_timeout).await;
    db.close().await;
    result
}

/// Runs `srv` until `signal` resolves or the server stops by itself, then cancels `shutdown`.
///
/// On a signal, the server is stopped gracefully: it stops accepting connections, and the requests already being served
/// are allowed to finish. The server future is still polled while that happens, since it drives the stop.
pub(crate) async fn serve_until_shutdown<F>(
    srv: Server,
    signal: F,
    shutdown: &CancellationToken,
) -> Result<(), ServerError>
where
    F: Future<Output = Result<(), ServerError>>,
{
    let srv_handle = srv.handle();
    tokio::pin!(srv);
    let signalled = tokio::select! {
        res = &mut srv => {
            warn!("🚀️ The HTTP server has stopped");
            shutdown.cancel();
            return res.map_err(ServerError::from);
        },
        res = signal => {
            info!("🚀️ Shutdown signal received");
            res
        },
    };
    shutdown.cancel();
    let ((), stopped) = tokio::join!(srv_handle.stop(true), srv);
    info!("🚀️ HTTP server stopped");
    signalled.and(stopped.map_err(ServerError::from))
}

pub fn create_server_instance(config: &ServiceConfig, cache: Arc<OrderCache>) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("orders::access_log"))
            .app_data(web::Data::from(Arc::clone(&cache)))
            .configure(configure_routes::<OrderCache>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .disable_signals()
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Waits for the messages that were in flight at shutdown. Anything left after `timeout` is abandoned. Those messages
/// were never acknowledged, so the broker redelivers them once their ack-wait expires.
///
/// Returns whether the subscriber finished in time.
async fn drain_subscriber(task: JoinHandle<()>, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(())) => {
            info!("🚀️ In-flight messages drained");
            true
        },
        Ok(Err(e)) => {
            error!("🚀️ The message subscriber task panicked. {e}");
            true
        },
        Err(_) => {
            warn!(
                "🚀️ In-flight messages did not finish within {}s. They will be redelivered.",
                timeout.as_secs()
            );
            false
        },
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<(), ServerError> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<(), ServerError> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
