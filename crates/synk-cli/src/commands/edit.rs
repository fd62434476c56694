use synk_core::models::fields::{parse_date, parse_optional_clock_time, parse_optional_date};
use synk_core::models::{BucketPatch, CalendarPatch, ChorePatch, Person, Priority, ShoppingPatch};
use synk_core::{CollectionKind, EntryId, Error};

use crate::cli::EditCommands;
use crate::commands::common::{finish_session, open_session, CliContext};
use crate::error::CliError;

pub async fn run_edit(entry: EditCommands, context: &CliContext) -> Result<(), CliError> {
    let mut session = open_session(context).await?;

    let id = match entry {
        EditCommands::Calendar {
            id,
            title,
            date,
            time,
            person,
            notes,
        } => {
            let id = session.document().resolve_id(CollectionKind::Calendar, &id)?;
            let patch = CalendarPatch {
                title,
                date: date.as_deref().map(parse_date).transpose()?,
                time: time.as_deref().map(parse_optional_clock_time).transpose()?,
                person: person.as_deref().map(Person::normalize),
                notes,
            };
            session.mutate(|document| {
                document
                    .calendar
                    .get_mut(id.as_str())
                    .ok_or_else(|| not_found(CollectionKind::Calendar, &id))?
                    .apply(patch);
                Ok(())
            })?;
            id
        }
        EditCommands::Shopping {
            id,
            label,
            quantity,
            category,
        } => {
            let id = session.document().resolve_id(CollectionKind::Shopping, &id)?;
            let patch = ShoppingPatch {
                label,
                quantity,
                category,
            };
            session.mutate(|document| {
                document
                    .shopping
                    .get_mut(id.as_str())
                    .ok_or_else(|| not_found(CollectionKind::Shopping, &id))?
                    .apply(patch);
                Ok(())
            })?;
            id
        }
        EditCommands::Bucket {
            id,
            label,
            priority,
        } => {
            let id = session.document().resolve_id(CollectionKind::Bucket, &id)?;
            let patch = BucketPatch {
                label,
                priority: priority.as_deref().map(Priority::normalize),
            };
            session.mutate(|document| {
                document
                    .bucket
                    .get_mut(id.as_str())
                    .ok_or_else(|| not_found(CollectionKind::Bucket, &id))?
                    .apply(patch);
                Ok(())
            })?;
            id
        }
        EditCommands::Chore {
            id,
            label,
            assigned_to,
            due,
        } => {
            let id = session.document().resolve_id(CollectionKind::Chores, &id)?;
            let patch = ChorePatch {
                label,
                assigned_to: assigned_to.as_deref().map(Person::normalize),
                due_date: due.as_deref().map(parse_optional_date).transpose()?,
            };
            session.mutate(|document| {
                document
                    .chores
                    .get_mut(id.as_str())
                    .ok_or_else(|| not_found(CollectionKind::Chores, &id))?
                    .apply(patch);
                Ok(())
            })?;
            id
        }
    };

    finish_session(&mut session).await;
    println!("{id}");
    Ok(())
}

fn not_found(kind: CollectionKind, id: &EntryId) -> Error {
    Error::NotFound(format!("{kind}/{id}"))
}
