use std::path::Path;

use synk_core::export::suggested_export_file_name;

use crate::commands::common::{open_session, CliContext};
use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, context: &CliContext) -> Result<(), CliError> {
    let session = open_session(context).await?;
    let rendered = session.export_json()?;

    if let Some(path) = output_path {
        // A directory target gets the usual export file name.
        let path = if path.is_dir() {
            path.join(suggested_export_file_name())
        } else {
            path.to_path_buf()
        };
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
