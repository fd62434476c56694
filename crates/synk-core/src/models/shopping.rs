//! Shopping list model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::{Completable, Entry};
use super::EntryId;
use crate::error::{Error, Result};

/// An item on the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: EntryId,
    pub label: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub done: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingPatch {
    pub label: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
}

impl ShoppingItem {
    pub fn new(label: &str, quantity: &str, category: &str) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidInput(
                "shopping label must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: EntryId::new(),
            label: label.to_string(),
            quantity: quantity.trim().to_string(),
            category: category.trim().to_string(),
            done: false,
            extra: Map::new(),
        })
    }

    pub fn apply(&mut self, patch: ShoppingPatch) {
        if let Some(label) = patch.label {
            let label = label.trim();
            if !label.is_empty() {
                self.label = label.to_string();
            }
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
    }
}

impl Entry for ShoppingItem {
    fn id(&self) -> &EntryId {
        &self.id
    }
}

impl Completable for ShoppingItem {
    fn is_done(&self) -> bool {
        self.done
    }

    fn set_done(&mut self, done: bool) {
        self.done = done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_not_done() {
        let item = ShoppingItem::new(" Æbler ", " 6 stk ", "").unwrap();
        assert_eq!(item.label, "Æbler");
        assert_eq!(item.quantity, "6 stk");
        assert!(!item.done);
    }

    #[test]
    fn test_apply_can_clear_quantity() {
        let mut item = ShoppingItem::new("Kaffe", "1 pose", "Morgenmad").unwrap();
        item.apply(ShoppingPatch {
            label: Some(String::new()),
            quantity: Some(String::new()),
            category: None,
        });
        assert_eq!(item.label, "Kaffe");
        assert_eq!(item.quantity, "");
        assert_eq!(item.category, "Morgenmad");
    }
}
