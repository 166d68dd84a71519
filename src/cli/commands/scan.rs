//! Scan command - Run a simulated scan and follow it to completion
//!
//! Status changes are observed through a store subscription, the way a
//! dashboard re-renders on store updates.

use std::time::Duration;

use anyhow::Result;
use reconx::errors::ReconxError;
use reconx::ui::{Printer, Spinner, Theme};
use reconx::{Dashboard, ScanProfile, ScanStatus};
use tokio::sync::mpsc;
use tracing::debug;

use super::show::print_report;

pub async fn run(
    dashboard: &Dashboard,
    target: &str,
    profile: ScanProfile,
    cancel_after: Option<u64>,
) -> Result<()> {
    let printer = Printer::new();
    let theme = Theme::new(printer.mode());

    let Some(scan_id) = dashboard.start_scan(target, profile) else {
        return Err(ReconxError::EmptyTarget.into());
    };

    let config = dashboard.controller().config();
    printer.info(&format!(
        "Queued {} ({} profile, about {}s)",
        scan_id,
        profile,
        config.completion_delay(profile).as_secs()
    ));

    // Only status changes of this scan are forwarded; None means removed
    let (tx, mut rx) = mpsc::unbounded_channel();
    let watched = scan_id.clone();
    let subscription = dashboard.store().subscribe(move |reports| {
        let status = reports.iter().find(|r| r.id == watched).map(|r| r.status());
        let _ = tx.send(status);
    });

    let mut spinner = Spinner::new(printer.mode());
    spinner.start(&format!("{} queued", scan_id));

    let cancel_timer = async {
        match cancel_after {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(cancel_timer);

    let mut last = None;
    let outcome = loop {
        tokio::select! {
            update = rx.recv() => {
                let Some(status) = update else { break None };
                if status == last {
                    continue;
                }
                last = status;
                match status {
                    Some(ScanStatus::Completed) => break Some(ScanStatus::Completed),
                    Some(status) => {
                        debug!("{} is {}", scan_id, status);
                        spinner.set_message(&format!("{} {}", scan_id, status.as_str().to_lowercase()));
                        spinner.println(&format!("  {} {}", scan_id, theme.status(status)));
                    }
                    None => break None,
                }
            }
            _ = &mut cancel_timer => {
                dashboard.cancel_scan(&scan_id);
                break None;
            }
        }
    };

    spinner.finish_and_clear();
    dashboard.store().unsubscribe(subscription);

    match outcome.and_then(|_| dashboard.store().get(&scan_id)) {
        Some(report) => {
            printer.success(&format!("{} completed", scan_id));
            printer.newline();
            print_report(&report);
        }
        None => printer.warning(&format!("{} was cancelled", scan_id)),
    }
    Ok(())
}
