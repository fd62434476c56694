use serde_json::json;
use synk_core::models::fields::parse_optional_date;

use crate::cli::CollectionArg;
use crate::commands::common::{
    calendar_in_order, done_last, format_bucket_line, format_calendar_line, format_chore_line,
    format_shopping_line, open_session, CliContext,
};
use crate::error::CliError;

pub async fn run_list(
    collection: Option<CollectionArg>,
    date: Option<&str>,
    as_json: bool,
    context: &CliContext,
) -> Result<(), CliError> {
    let session = open_session(context).await?;
    let document = session.document();
    let on_date = parse_optional_date(date.unwrap_or_default())?;
    let shows = |arg: CollectionArg| collection.is_none_or(|selected| selected == arg);

    if as_json {
        let mut output = serde_json::Map::new();
        if shows(CollectionArg::Calendar) {
            let entries = calendar_in_order(document.calendar.entries(), on_date);
            output.insert("calendar".to_string(), json!(entries));
        }
        if shows(CollectionArg::Shopping) {
            output.insert(
                "shopping".to_string(),
                json!(done_last(document.shopping.entries())),
            );
        }
        if shows(CollectionArg::Bucket) {
            output.insert(
                "bucket".to_string(),
                json!(done_last(document.bucket.entries())),
            );
        }
        if shows(CollectionArg::Chores) {
            output.insert(
                "chores".to_string(),
                json!(done_last(document.chores.entries())),
            );
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut sections = Vec::new();
    if shows(CollectionArg::Calendar) {
        sections.push((
            "Calendar",
            calendar_in_order(document.calendar.entries(), on_date)
                .into_iter()
                .map(format_calendar_line)
                .collect::<Vec<_>>(),
        ));
    }
    if shows(CollectionArg::Shopping) {
        sections.push((
            "Shopping",
            done_last(document.shopping.entries())
                .into_iter()
                .map(format_shopping_line)
                .collect(),
        ));
    }
    if shows(CollectionArg::Bucket) {
        sections.push((
            "Bucket list",
            done_last(document.bucket.entries())
                .into_iter()
                .map(format_bucket_line)
                .collect(),
        ));
    }
    if shows(CollectionArg::Chores) {
        sections.push((
            "Chores",
            done_last(document.chores.entries())
                .into_iter()
                .map(format_chore_line)
                .collect(),
        ));
    }

    let single = sections.len() == 1;
    for (index, (title, lines)) in sections.iter().enumerate() {
        if !single {
            if index > 0 {
                println!();
            }
            println!("{title}");
        }
        if lines.is_empty() {
            println!("  (empty)");
        }
        for line in lines {
            println!("{line}");
        }
    }

    Ok(())
}
