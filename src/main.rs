use carebook::router::init_router;
use carebook::state::init_app_state;
use carebook_config::ServerConfig;
use carebook_observability::init_tracing;
use dotenvy::dotenv;
use tokio::signal;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };

    let state = match init_app_state().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start");
            std::process::exit(1);
        }
    };
    let app = init_router(state);

    let address = server_config.address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, address = %address, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Server running on http://{address}");
    tracing::info!("Swagger UI available at http://{address}/swagger-ui");
    tracing::info!("Scalar UI available at http://{address}/scalar");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = wait_for_terminate(signal::unix::signal(
        signal::unix::SignalKind::terminate(),
    ));

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}

/// Resolves on SIGTERM. Never resolves if the handler could not be installed.
#[cfg(unix)]
async fn wait_for_terminate(installed: std::io::Result<signal::unix::Signal>) {
    match installed {
        Ok(mut sig) => {
            sig.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}
