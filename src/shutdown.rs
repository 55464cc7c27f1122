use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Wait for a termination signal
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, stopping");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, stopping");
        }
    }
    Ok(())
}

/// Wait for a termination signal
#[cfg(windows)]
pub async fn wait_for_signal() -> std::io::Result<()> {
    let mut ctrlc = ctrl_c()?;
    let mut ctrlbreak = ctrl_break()?;

    tokio::select! {
        _ = ctrlc.recv() => {
            info!("Received Ctrl+C signal, stopping");
        }
        _ = ctrlbreak.recv() => {
            info!("Received Ctrl+Break signal, stopping");
        }
    }
    Ok(())
}
