//! OS signal handling for orchestrated shutdown.
//!
//! A single async helper, [`wait_for_shutdown_signal`], that completes when
//! the process receives a termination signal. Applications wire it to
//! [`Orchestrator::stop_all`](crate::Orchestrator::stop_all):
//!
//! ```no_run
//! # use workvisor::{Orchestrator, wait_for_shutdown_signal};
//! # async fn run(orchestrator: Orchestrator) -> std::io::Result<()> {
//! wait_for_shutdown_signal().await?;
//! orchestrator.stop_all().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Unix
//! SIGINT (Ctrl-C), SIGTERM (systemd/Kubernetes kill), and SIGQUIT are
//! handled, with [`tokio::signal::ctrl_c`] awaited as a fallback.
//!
//! ## Windows
//! Only [`tokio::signal::ctrl_c`] is awaited.

#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
