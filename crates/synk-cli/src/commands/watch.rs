use chrono::Local;
use synk_core::{Mutation, SyncState};
use tokio::sync::{mpsc, watch};

use crate::commands::common::{finish_session, open_session, status_report, CliContext};
use crate::error::CliError;

pub async fn run_watch(context: &CliContext) -> Result<(), CliError> {
    if !context.settings.is_configured() {
        return Err(CliError::SyncNotConfigured);
    }

    let mut session = open_session(context).await?;
    if session.sync_state() == SyncState::Offline {
        return Err(CliError::SyncUnavailable);
    }

    let refresh = session.subscribe_refresh();
    // Held open so the session loop keeps serving remote changes.
    let (_mutations, mutations_rx) = mpsc::channel::<Mutation>(16);

    println!(
        "Watching {} as {} (Ctrl+C to stop)",
        context.settings.remote_url.as_deref().unwrap_or_default(),
        session.client_id()
    );

    tokio::select! {
        () = session.run(mutations_rx) => {}
        () = print_refreshes(refresh) => {}
        result = tokio::signal::ctrl_c() => result?,
    }

    finish_session(&mut session).await;
    let report = status_report(&session, &context.settings);
    println!(
        "Stopped. {} calendar, {} shopping, {} bucket, {} chores",
        report.calendar, report.shopping, report.bucket, report.chores
    );
    Ok(())
}

async fn print_refreshes(mut refresh: watch::Receiver<u64>) {
    while refresh.changed().await.is_ok() {
        let revision = *refresh.borrow_and_update();
        println!(
            "{}  document updated from remote (revision {revision})",
            Local::now().format("%H:%M:%S")
        );
    }
}
