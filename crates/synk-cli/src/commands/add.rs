use synk_core::models::fields::{parse_date, parse_optional_clock_time, parse_optional_date};
use synk_core::models::{
    BucketItem, CalendarEntry, Chore, Collection, Entry, Person, Priority, ShoppingItem,
};
use synk_core::EntryId;

use crate::cli::AddCommands;
use crate::commands::common::{finish_session, join_text, open_session, CliContext};
use crate::error::CliError;

pub async fn run_add(entry: AddCommands, context: &CliContext) -> Result<(), CliError> {
    let mut session = open_session(context).await?;

    let id = match entry {
        AddCommands::Calendar {
            title,
            date,
            time,
            person,
            notes,
        } => {
            let title = join_text(&title, "title")?;
            let date = parse_date(&date)?;
            let time = parse_optional_clock_time(time.as_deref().unwrap_or_default())?;
            let entry = CalendarEntry::new(&title, date, time, Person::normalize(&person), &notes)?;
            session.mutate(|document| Ok(push_returning_id(&mut document.calendar, entry)))?
        }
        AddCommands::Shopping {
            label,
            quantity,
            category,
        } => {
            let item = ShoppingItem::new(&join_text(&label, "label")?, &quantity, &category)?;
            session.mutate(|document| Ok(push_returning_id(&mut document.shopping, item)))?
        }
        AddCommands::Bucket { label, priority } => {
            let item = BucketItem::new(&join_text(&label, "label")?, Priority::normalize(&priority))?;
            session.mutate(|document| Ok(push_returning_id(&mut document.bucket, item)))?
        }
        AddCommands::Chore {
            label,
            assigned_to,
            due,
        } => {
            let due_date = parse_optional_date(due.as_deref().unwrap_or_default())?;
            let chore = Chore::new(
                &join_text(&label, "label")?,
                Person::normalize(&assigned_to),
                due_date,
            )?;
            session.mutate(|document| Ok(push_returning_id(&mut document.chores, chore)))?
        }
    };

    finish_session(&mut session).await;
    println!("{id}");
    Ok(())
}

fn push_returning_id<T: Entry>(collection: &mut Collection<T>, entry: T) -> EntryId {
    let id = entry.id().clone();
    collection.push(entry);
    id
}
