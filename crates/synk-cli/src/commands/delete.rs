use synk_core::{CollectionKind, Error};

use crate::cli::CollectionArg;
use crate::commands::common::{finish_session, open_session, CliContext};
use crate::error::CliError;

pub async fn run_delete(
    collection: CollectionArg,
    id: &str,
    context: &CliContext,
) -> Result<(), CliError> {
    let kind = CollectionKind::from(collection);
    let mut session = open_session(context).await?;
    let id = session.document().resolve_id(kind, id)?;

    session.mutate(|document| {
        if document.remove(kind, id.as_str()) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("{kind}/{id}")))
        }
    })?;
    finish_session(&mut session).await;

    println!("{id}");
    Ok(())
}
