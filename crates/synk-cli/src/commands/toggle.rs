use synk_core::CollectionKind;

use crate::cli::CollectionArg;
use crate::commands::common::{finish_session, open_session, CliContext};
use crate::error::CliError;

pub async fn run_toggle(
    collection: CollectionArg,
    id: &str,
    context: &CliContext,
) -> Result<(), CliError> {
    let kind = CollectionKind::from(collection);
    let mut session = open_session(context).await?;
    let id = session.document().resolve_id(kind, id)?;

    let done = session.mutate(|document| document.toggle_done(kind, id.as_str()))?;
    finish_session(&mut session).await;

    println!("{id} {}", if done { "done" } else { "open" });
    Ok(())
}
