/// Resolves once the process receives SIGINT or SIGTERM (Ctrl-C elsewhere).
pub async fn shutdown() {
	#[cfg(unix)]
	{
		use tokio::signal::unix::{signal, SignalKind};

		let (Ok(mut interrupt), Ok(mut terminate)) = (
			signal(SignalKind::interrupt()),
			signal(SignalKind::terminate()),
		) else {
			tracing::error!("failed to install signal handlers, graceful shutdown is disabled");
			return std::future::pending().await;
		};

		tokio::select! {
			_ = interrupt.recv() => tracing::info!("received SIGINT"),
			_ = terminate.recv() => tracing::info!("received SIGTERM"),
		}
	}

	#[cfg(not(unix))]
	{
		if let Err(error) = tokio::signal::ctrl_c().await {
			tracing::error!(%error, "failed to listen for Ctrl-C, graceful shutdown is disabled");
			return std::future::pending().await;
		}

		tracing::info!("received Ctrl-C");
	}
}
