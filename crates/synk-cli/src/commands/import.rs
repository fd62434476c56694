use std::path::Path;

use crate::commands::common::{finish_session, open_session, CliContext};
use crate::error::CliError;

pub async fn run_import(path: &Path, context: &CliContext) -> Result<(), CliError> {
    let text = std::fs::read_to_string(path)?;
    let mut session = open_session(context).await?;

    session.import_json(&text)?;
    finish_session(&mut session).await;

    println!("Imported {} entries from {}", session.document().len(), path.display());
    Ok(())
}
