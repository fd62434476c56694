use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use synk_core::models::{CalendarEntry, Person, Priority, ShoppingItem};
use synk_core::{Document, LocalStore, SyncSettings};
use tempfile::{tempdir, TempDir};

use crate::cli::{AddCommands, Cli, CollectionArg, Commands, CompletionShell, EditCommands};
use crate::commands::add::run_add;
use crate::commands::common::{
    calendar_in_order, done_last, format_calendar_line, join_text, open_session, status_report,
    CliContext,
};
use crate::commands::completions::render_completions;
use crate::commands::config::config_lines;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::toggle::run_toggle;
use crate::config::CliConfig;
use crate::error::CliError;

fn offline_context() -> (TempDir, CliContext) {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("data").join("synk.db");
    (tmp, CliContext::new(db_path, SyncSettings::default()))
}

fn stored_document(context: &CliContext) -> Document {
    LocalStore::open(&context.db_path).unwrap().load()
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[test]
fn join_text_trims_and_rejects_blank() {
    assert_eq!(join_text(&words(" Køb  blomster "), "label").unwrap(), "Køb blomster");
    assert!(matches!(
        join_text(&[" ".to_string()], "label"),
        Err(CliError::EmptyText("label"))
    ));
}

#[test]
fn cli_parses_add_shopping_with_flags() {
    let cli = Cli::try_parse_from([
        "synk", "add", "shopping", "Havre", "mælk", "-q", "2 l", "--offline",
    ])
    .unwrap();
    assert!(cli.offline);
    match cli.command {
        Some(Commands::Add {
            entry:
                AddCommands::Shopping {
                    label, quantity, ..
                },
        }) => {
            assert_eq!(label, words("Havre mælk"));
            assert_eq!(quantity, "2 l");
        }
        _ => panic!("expected add shopping"),
    }
}

#[test]
fn cli_accepts_chore_alias_for_collection() {
    let cli = Cli::try_parse_from(["synk", "toggle", "chore", "abc"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Toggle {
            collection: CollectionArg::Chores,
            ..
        })
    ));
}

#[test]
fn cli_requires_date_for_calendar() {
    assert!(Cli::try_parse_from(["synk", "add", "calendar", "Tandlæge"]).is_err());
}

#[test]
fn done_entries_sort_last_keeping_order() {
    let mut first = ShoppingItem::new("Mælk", "", "").unwrap();
    first.done = true;
    let second = ShoppingItem::new("Brød", "", "").unwrap();
    let third = ShoppingItem::new("Æg", "", "").unwrap();
    let items = [first, second, third];

    let labels = done_last(items.iter())
        .into_iter()
        .map(|item| item.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Brød", "Æg", "Mælk"]);
}

#[test]
fn calendar_orders_by_date_then_time_and_filters() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    let at = |h: u32| chrono::NaiveTime::from_hms_opt(h, 0, 0);
    let entries = [
        CalendarEntry::new("Frokost", day(2), at(12), Person::Begge, "").unwrap(),
        CalendarEntry::new("Morgenløb", day(2), at(7), Person::Ida, "").unwrap(),
        CalendarEntry::new("Fødselsdag", day(2), None, Person::Arvid, "").unwrap(),
        CalendarEntry::new("Tandlæge", day(1), at(9), Person::Ida, "").unwrap(),
    ];

    let titles = calendar_in_order(entries.iter(), None)
        .into_iter()
        .map(|entry| entry.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Tandlæge", "Fødselsdag", "Morgenløb", "Frokost"]);

    assert_eq!(calendar_in_order(entries.iter(), Some(day(1))).len(), 1);
}

#[test]
fn calendar_line_shows_all_day_and_notes() {
    let entry = CalendarEntry::new(
        "Fødselsdag",
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        None,
        Person::Arvid,
        "Husk gave",
    )
    .unwrap();
    let line = format_calendar_line(&entry);
    assert!(line.contains("2024-06-01"));
    assert!(line.contains("all day"));
    assert!(line.ends_with("Fødselsdag  (Husk gave)"));
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("synk"));
}

#[test]
fn config_lines_hide_token_value() {
    let config = CliConfig {
        remote_url: Some("http://127.0.0.1:8080".to_string()),
        auth_token: Some("hemmelig".to_string()),
    };
    let lines = config_lines(
        &config,
        &PathBuf::from("/tmp/cli-config.json"),
        &PathBuf::from("/tmp/synk.db"),
    );
    assert!(lines.iter().any(|line| line.contains("http://127.0.0.1:8080")));
    assert!(lines.iter().any(|line| line.ends_with("set")));
    assert!(!lines.iter().any(|line| line.contains("hemmelig")));
}

#[tokio::test]
async fn add_toggle_and_delete_offline() {
    let (_tmp, context) = offline_context();

    run_add(
        AddCommands::Bucket {
            label: words("Se nordlys"),
            priority: "HIGH".to_string(),
        },
        &context,
    )
    .await
    .unwrap();

    let document = stored_document(&context);
    let item = document.bucket.entries().next().unwrap().clone();
    assert_eq!(item.priority, Priority::High);
    assert!(!item.done);

    let prefix = item.id.as_str()[..8].to_string();
    run_toggle(CollectionArg::Bucket, &prefix, &context)
        .await
        .unwrap();
    assert!(stored_document(&context).bucket.get(item.id.as_str()).unwrap().done);

    run_delete(CollectionArg::Bucket, item.id.as_str(), &context)
        .await
        .unwrap();
    assert!(stored_document(&context).bucket.is_empty());
}

#[tokio::test]
async fn edit_keeps_title_when_blank_and_clears_time() {
    let (_tmp, context) = offline_context();
    run_add(
        AddCommands::Calendar {
            title: words("Tandlæge"),
            date: "2024-02-03".to_string(),
            time: Some("09:15".to_string()),
            person: "ida".to_string(),
            notes: String::new(),
        },
        &context,
    )
    .await
    .unwrap();
    let id = stored_document(&context)
        .calendar
        .entries()
        .next()
        .unwrap()
        .id
        .clone();

    run_edit(
        EditCommands::Calendar {
            id: id.to_string(),
            title: Some("   ".to_string()),
            date: None,
            time: Some(String::new()),
            person: Some("nobody".to_string()),
            notes: Some(" Ring først ".to_string()),
        },
        &context,
    )
    .await
    .unwrap();

    let document = stored_document(&context);
    let entry = document.calendar.get(id.as_str()).unwrap();
    assert_eq!(entry.title, "Tandlæge");
    assert_eq!(entry.time, None);
    assert_eq!(entry.person, Person::Begge);
    assert_eq!(entry.notes, "Ring først");
}

#[tokio::test]
async fn toggle_calendar_entry_is_rejected() {
    let (_tmp, context) = offline_context();
    run_add(
        AddCommands::Calendar {
            title: words("Middag"),
            date: "2024-02-03".to_string(),
            time: None,
            person: "begge".to_string(),
            notes: String::new(),
        },
        &context,
    )
    .await
    .unwrap();
    let before = stored_document(&context);
    let id = before.calendar.entries().next().unwrap().id.to_string();

    assert!(run_toggle(CollectionArg::Calendar, &id, &context).await.is_err());
    assert_eq!(stored_document(&context), before);
}

#[tokio::test]
async fn export_then_import_restores_document() {
    let (tmp, context) = offline_context();
    run_add(
        AddCommands::Chore {
            label: words("Vande planter"),
            assigned_to: "arvid".to_string(),
            due: Some("2024-03-01".to_string()),
        },
        &context,
    )
    .await
    .unwrap();
    let exported = stored_document(&context);

    let export_path = tmp.path().join("cute-synk-data.json");
    run_export(Some(&export_path), &context).await.unwrap();

    run_delete(
        CollectionArg::Chores,
        exported.chores.entries().next().unwrap().id.as_str(),
        &context,
    )
    .await
    .unwrap();
    assert!(stored_document(&context).chores.is_empty());

    run_import(&export_path, &context).await.unwrap();
    assert_eq!(stored_document(&context), exported);
}

#[tokio::test]
async fn import_of_invalid_file_changes_nothing() {
    let (tmp, context) = offline_context();
    run_add(
        AddCommands::Shopping {
            label: words("Kaffe"),
            quantity: String::new(),
            category: String::new(),
        },
        &context,
    )
    .await
    .unwrap();
    let before = stored_document(&context);

    let bad_path = tmp.path().join("bad.json");
    std::fs::write(&bad_path, json!({ "calendar": [], "shopping": [] }).to_string()).unwrap();

    assert!(run_import(&bad_path, &context).await.is_err());
    assert_eq!(stored_document(&context), before);
}

#[tokio::test]
async fn export_into_directory_uses_default_file_name() {
    let (tmp, context) = offline_context();
    run_export(Some(tmp.path()), &context).await.unwrap();

    let written = std::fs::read_to_string(tmp.path().join("cute-synk-data.json")).unwrap();
    assert_eq!(Document::from_json(&written).unwrap(), Document::default());
}

#[tokio::test]
async fn status_report_renders_state_in_lowercase() {
    let (_tmp, context) = offline_context();
    let session = open_session(&context).await.unwrap();
    let report = serde_json::to_value(status_report(&session, &context.settings)).unwrap();
    assert_eq!(report["sync_state"], "offline");
    assert_eq!(report["remote_url"], serde_json::Value::Null);
}
