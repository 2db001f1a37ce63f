//! The `check` command: run the engine and stream results to the terminal.

use crate::export::{export_path, write_active_accounts};
use crate::input::RunInput;
use crate::CheckArgs;
use anyhow::{bail, Result};
use handlecheck_core::{AppConfig, Verdict};
use handlecheck_engine::{Checker, RunHandle, RunProgress};
use std::future::Future;
use std::io::{self, Write};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::warn;

/// How the live display ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamEnd {
    /// Every username reached a verdict
    Completed,
    /// A second interrupt arrived before the run converged
    ForceQuit,
}

pub(crate) async fn run(args: CheckArgs, config: &AppConfig) -> Result<()> {
    let mut input = match &args.input {
        Some(path) => RunInput::from_file(path)?,
        None => RunInput::default(),
    };
    input.extend_inline(&args.usernames);
    if input.is_empty() {
        bail!("no usernames to check (pass --input <file> or --username <name>)");
    }

    let concurrency = args.concurrency.unwrap_or(config.checker.concurrency);
    let checker = Checker::from_config(config)?;
    let run = checker.start_run(input.usernames, input.metadata, concurrency)?;

    let end = stream_outcomes(&run, &mut io::stdout(), ctrl_c).await?;
    if end == StreamEnd::ForceQuit {
        bail!("interrupted twice; exiting without waiting for the run or exporting");
    }

    let progress = run.progress();
    print_summary(&progress, run.is_cancelled());

    if !args.no_export {
        let dir = match args.output {
            Some(dir) => dir,
            None => config.export_dir()?,
        };
        let path = export_path(&dir, args.input.as_deref());
        write_active_accounts(&path, &run.active_accounts())?;
        println!("Saved active accounts to {}", path.display());
    }

    Ok(())
}

/// Resolves on the next Ctrl-C, or never if the signal cannot be watched.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Write each outcome as it arrives until the run completes.
///
/// The first interrupt cancels the run and outcomes keep streaming until it
/// converges. A second interrupt stops waiting.
pub(crate) async fn stream_outcomes<W, F, Fut>(
    run: &RunHandle,
    out: &mut W,
    mut interrupt: F,
) -> io::Result<StreamEnd>
where
    W: Write,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut feed = run.subscribe();
    let mut signal = Box::pin(interrupt());
    let mut interrupted = false;

    loop {
        tokio::select! {
            biased;
            received = feed.recv() => match received {
                Ok(outcome) => writeln!(out, "{}", outcome.message)?,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Display fell behind, {} results not shown", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            () = run.wait() => break,
            () = &mut signal => {
                if interrupted {
                    return Ok(StreamEnd::ForceQuit);
                }
                interrupted = true;
                writeln!(out, "Cancelling... (press Ctrl-C again to quit)")?;
                run.cancel();
                signal = Box::pin(interrupt());
            }
        }
    }

    // Outcomes recorded just before completion may still be queued
    loop {
        match feed.try_recv() {
            Ok(outcome) => writeln!(out, "{}", outcome.message)?,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Display fell behind, {} results not shown", skipped);
            }
            Err(_) => break,
        }
    }
    Ok(StreamEnd::Completed)
}

fn print_summary(progress: &RunProgress, cancelled: bool) {
    println!();
    println!("Processed: {}/{}", progress.processed, progress.total);
    for verdict in Verdict::ALL {
        println!("  {:<10} {}", verdict.label(), progress.counts.get(verdict));
    }
    if cancelled {
        println!("Run was cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use handlecheck_core::Username;
    use handlecheck_probe::{ProbeResult, Prober};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Finds usernames starting with "taken", misses the rest.
    struct PrefixProber;

    #[async_trait]
    impl Prober for PrefixProber {
        async fn probe(&self, username: &Username) -> ProbeResult {
            if username.as_str().starts_with("taken") {
                ProbeResult::Found
            } else {
                ProbeResult::NotFound
            }
        }

        fn prober_id(&self) -> &'static str {
            "prefix"
        }
    }

    struct HangingProber;

    #[async_trait]
    impl Prober for HangingProber {
        async fn probe(&self, _username: &Username) -> ProbeResult {
            std::future::pending().await
        }

        fn prober_id(&self) -> &'static str {
            "hanging"
        }
    }

    fn start(prober: Arc<dyn Prober>, list: &[&str]) -> RunHandle {
        let usernames = list.iter().map(|n| Username::new(*n).unwrap()).collect();
        Checker::new(prober)
            .start_run(usernames, HashMap::new(), 2)
            .unwrap()
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out)
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_streams_every_outcome_until_complete() {
        let run = start(Arc::new(PrefixProber), &["taken1", "free1", "free2"]);
        let mut out = Vec::new();

        let end = stream_outcomes(&run, &mut out, std::future::pending::<()>)
            .await
            .unwrap();

        assert_eq!(end, StreamEnd::Completed);
        let mut printed = lines(&out);
        printed.sort();
        assert_eq!(
            printed,
            vec!["[ACTIVE] taken1", "[AVAILABLE] free1", "[AVAILABLE] free2"]
        );
    }

    #[tokio::test]
    async fn test_first_interrupt_cancels_and_waits() {
        let run = start(Arc::new(HangingProber), &["alice", "bob", "carol"]);
        let notify = Arc::new(Notify::new());
        notify.notify_one();

        let mut out = Vec::new();
        let interrupt = {
            let notify = notify.clone();
            move || {
                let notify = notify.clone();
                async move { notify.notified().await }
            }
        };
        let end = stream_outcomes(&run, &mut out, interrupt).await.unwrap();

        assert_eq!(end, StreamEnd::Completed);
        assert!(run.is_complete());
        assert_eq!(run.progress().counts.cancelled, 3);
        let printed = lines(&out);
        assert!(printed[0].starts_with("Cancelling..."));
        assert_eq!(
            printed.iter().filter(|l| l.starts_with("[CANCELLED]")).count(),
            3
        );
    }

    #[tokio::test]
    async fn test_second_interrupt_forces_quit() {
        let run = start(Arc::new(HangingProber), &["alice", "bob"]);
        let mut out = Vec::new();

        // Always ready: the second poll fires before the run can converge
        let end = stream_outcomes(&run, &mut out, || async {}).await.unwrap();

        assert_eq!(end, StreamEnd::ForceQuit);
        assert!(run.is_cancelled());
    }
}
