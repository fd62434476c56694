use crate::commands::common::{open_session, status_report, CliContext};
use crate::error::CliError;

pub async fn run_status(as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let session = open_session(context).await?;
    let report = status_report(&session, &context.settings);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Client:    {}", report.client_id);
    println!(
        "Remote:    {}",
        report.remote_url.as_deref().unwrap_or("(not configured)")
    );
    println!("Sync:      {}", report.sync_state);
    if report.last_remote_updated_at > 0 {
        println!("Last seen: {}", format_timestamp(report.last_remote_updated_at));
    }
    println!(
        "Entries:   {} calendar, {} shopping, {} bucket, {} chores",
        report.calendar, report.shopping, report.bucket, report.chores
    );
    if report.unreadable > 0 {
        println!("Kept as-is (unreadable): {}", report.unreadable);
    }
    Ok(())
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |time| {
            time.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}
