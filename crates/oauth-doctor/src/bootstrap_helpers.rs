use std::ffi::OsStr;
use std::future::Future;

use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Colors stay on unless `--no-color` is given or `NO_COLOR` is set to a
/// non-empty value.
pub(crate) fn color_enabled(no_color_flag: bool, no_color_env: Option<&OsStr>) -> bool {
    if no_color_flag {
        return false;
    }
    !no_color_env.is_some_and(|value| !value.is_empty())
}

/// Resolves once the interrupt signal fires. If the listener cannot be
/// installed it never resolves, so the caller keeps waiting on its worker.
pub(crate) async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {}
        Err(error) => {
            tracing::warn!(%error, "failed to listen for ctrl-c; interrupts are disabled");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::io;
    use std::time::Duration;

    use super::{color_enabled, wait_for_interrupt};

    #[test]
    fn unit_color_enabled_honours_flag_and_non_empty_no_color() {
        assert!(color_enabled(false, None));
        assert!(color_enabled(false, Some(OsStr::new(""))));
        assert!(!color_enabled(false, Some(OsStr::new("1"))));
        assert!(!color_enabled(true, None));
    }

    #[tokio::test]
    async fn unit_wait_for_interrupt_resolves_when_signal_fires() {
        let waited = tokio::time::timeout(
            Duration::from_secs(1),
            wait_for_interrupt(async { Ok(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn regression_wait_for_interrupt_listener_failure_does_not_resolve() {
        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_interrupt(async { Err(io::Error::other("signal handler unavailable")) }),
        )
        .await;
        assert!(waited.is_err());
    }
}
