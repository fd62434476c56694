//! Whole-document JSON export and import.

use crate::error::Result;
use crate::models::Document;

/// Default file name offered by export flows.
pub const EXPORT_FILE_NAME: &str = "cute-synk-data.json";

/// Render the document as pretty-printed JSON.
pub fn render_json_export(document: &Document) -> Result<String> {
    document.to_json_pretty()
}

#[must_use]
pub const fn suggested_export_file_name() -> &'static str {
    EXPORT_FILE_NAME
}

/// Parse and validate an import file.
///
/// Rejects anything that is not JSON or not shaped like a document; the
/// caller's state must stay untouched on error.
pub fn parse_import(text: &str) -> Result<Document> {
    Document::from_json(text.trim_start_matches('\u{feff}'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BucketItem, Chore, Person, Priority};
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn export_then_import_keeps_entries_and_ids() {
        let mut document = Document::default();
        document
            .bucket
            .push(BucketItem::new("Se nordlys", Priority::High).unwrap());
        document
            .chores
            .push(Chore::new("Støvsuge", Person::Ida, None).unwrap());

        let exported = render_json_export(&document).unwrap();
        assert!(exported.contains('\n'));

        let imported = parse_import(&exported).unwrap();
        assert_eq!(imported, document);
    }

    #[test]
    fn import_rejects_invalid_documents() {
        assert!(matches!(
            parse_import(r#"{"calendar": [], "shopping": [], "bucket": []}"#),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_import("not json"),
            Err(Error::Serialization(_))
        ));
        assert!(parse_import("[]").is_err());
    }

    #[test]
    fn import_accepts_leading_byte_order_mark() {
        let text = "\u{feff}{\"calendar\":[],\"shopping\":[],\"bucket\":[],\"chores\":[]}";
        assert_eq!(parse_import(text).unwrap(), Document::default());
    }

    #[test]
    fn suggested_file_name_is_fixed() {
        assert_eq!(suggested_export_file_name(), "cute-synk-data.json");
    }
}
