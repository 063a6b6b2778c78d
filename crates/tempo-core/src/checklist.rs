//! Packing and leaving-the-house checklists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::profile::Profile;
use crate::task::TaskStep;

/// Only shown to the adult profile.
pub const ADULT_ONLY: &str = "adult_essentials";

/// (id, text, icon)
type ItemRow = (&'static str, &'static str, &'static str);

const BUILT_IN: &[(&str, &str, &[ItemRow])] = &[
    (
        "backpack",
        "🎒",
        &[
            ("b1", "Check the planner for tomorrow's timetable", "📔"),
            ("b2", "Books and folders for the timetable", "📚"),
            ("b3", "Pencil case (pencils, pens, eraser)", "✏️"),
            ("b4", "Special supplies (art, recorder...)", "🎨"),
            ("b5", "Pack the snack box", "🥪"),
            ("b6", "Full water bottle", "💧"),
        ],
    ),
    (
        ADULT_ONLY,
        "👜",
        &[
            ("ae1", "Phone (check battery)", "📱"),
            ("ae2", "Card / wallet", "💳"),
            ("ae3", "ID / documents", "🪪"),
            ("ae4", "Car keys", "🚗"),
            ("ae5", "House keys", "🔑"),
            ("ae6", "Lock the door", "🔐"),
            ("ae7", "Check the windows are shut", "🪟"),
            ("ae8", "Lights and hob off", "💡"),
        ],
    ),
    (
        "sports",
        "🏀",
        &[
            ("s1", "Basketball shirt", "🎽"),
            ("s2", "Shorts", "🩳"),
            ("s3", "Sports socks", "🧦"),
            ("s4", "Spare underwear", "👕"),
            ("s5", "Basketball shoes", "👟"),
            ("s6", "Tracksuit for afterwards", "🧥"),
            ("s7", "Shower towel", "🚿"),
            ("s8", "Shampoo and shower gel", "🧴"),
            ("s9", "Deodorant", "✨"),
            ("s10", "Shower flip-flops", "🩴"),
            ("s11", "Water bottle", "🥤"),
        ],
    ),
    (
        "football",
        "⚽",
        &[
            ("f1", "Football shirt", "👕"),
            ("f2", "Shorts", "🩳"),
            ("f3", "Long socks (for shin pads)", "🧦"),
            ("f4", "Shin pads", "🛡️"),
            ("f5", "Football boots", "👟"),
            ("f6", "Spare underwear", "👕"),
            ("f7", "Tracksuit", "🧥"),
            ("f8", "Shower towel", "🚿"),
            ("f9", "Shampoo and shower gel", "🧴"),
            ("f10", "Deodorant", "✨"),
            ("f11", "Shower flip-flops", "🩴"),
            ("f12", "Water bottle", "💧"),
        ],
    ),
    (
        "hockey",
        "🏒",
        &[
            ("h1", "Hockey shirt", "👕"),
            ("h2", "Shorts / skort", "🩳"),
            ("h3", "Long hockey socks", "🧦"),
            ("h4", "Hockey shin pads", "🛡️"),
            ("h5", "Mouthguard (essential)", "👄"),
            ("h6", "Hockey stick", "🏒"),
            ("h7", "Turf shoes", "👟"),
            ("h8", "Spare underwear", "👕"),
            ("h9", "Tracksuit", "🧥"),
            ("h10", "Shower towel", "🚿"),
            ("h11", "Shampoo and shower gel", "🧴"),
            ("h12", "Deodorant", "✨"),
            ("h13", "Shower flip-flops", "🩴"),
            ("h14", "Water bottle", "💧"),
        ],
    ),
];

pub const NEW_ITEM_TEXT: &str = "New item";

/// Icon shown next to a list name. Custom lists get a plain clipboard.
pub fn list_icon(key: &str) -> &'static str {
    BUILT_IN
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, icon, _)| *icon)
        .unwrap_or("📋")
}

/// Lists keyed by name. Serialized as a plain JSON object of arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklists {
    lists: BTreeMap<String, Vec<TaskStep>>,
}

impl Default for Checklists {
    fn default() -> Self {
        let lists = BUILT_IN
            .iter()
            .map(|(key, _, rows)| {
                let items = rows
                    .iter()
                    .map(|(id, text, icon)| TaskStep {
                        id: (*id).to_string(),
                        text: (*text).to_string(),
                        completed: false,
                        icon: Some((*icon).to_string()),
                    })
                    .collect();
                ((*key).to_string(), items)
            })
            .collect();
        Self { lists }
    }
}

impl Checklists {
    // ── Queries ──────────────────────────────────────────────────────

    /// List names visible to a profile.
    pub fn keys_for(&self, profile: Profile) -> Vec<&str> {
        self.lists
            .keys()
            .map(String::as_str)
            .filter(|k| profile == Profile::Adult || *k != ADULT_ONLY)
            .collect()
    }

    pub fn get(&self, key: &str) -> Result<&[TaskStep], ValidationError> {
        self.lists
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| not_found("checklist", key))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append an item. Blank text gets the placeholder label.
    pub fn add_item(&mut self, key: &str, text: &str) -> Result<&TaskStep, ValidationError> {
        let list = self.list_mut(key)?;
        let text = match text.trim() {
            "" => NEW_ITEM_TEXT,
            t => t,
        };
        let idx = list.len();
        list.push(TaskStep::new(uuid::Uuid::new_v4().to_string(), text));
        Ok(&list[idx])
    }

    pub fn rename_item(&mut self, key: &str, item_id: &str, text: &str) -> Result<(), ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty("item text".into()));
        }
        self.item_mut(key, item_id)?.text = text.to_string();
        Ok(())
    }

    pub fn remove_item(&mut self, key: &str, item_id: &str) -> Result<TaskStep, ValidationError> {
        let list = self.list_mut(key)?;
        let pos = list
            .iter()
            .position(|s| s.id == item_id)
            .ok_or_else(|| not_found("checklist item", item_id))?;
        Ok(list.remove(pos))
    }

    /// Flip an item and return its new state.
    pub fn toggle_item(&mut self, key: &str, item_id: &str) -> Result<bool, ValidationError> {
        let item = self.item_mut(key, item_id)?;
        item.completed = !item.completed;
        Ok(item.completed)
    }

    /// Clear every completion mark in a list.
    pub fn reset(&mut self, key: &str) -> Result<(), ValidationError> {
        for item in self.list_mut(key)? {
            item.completed = false;
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn list_mut(&mut self, key: &str) -> Result<&mut Vec<TaskStep>, ValidationError> {
        self.lists.get_mut(key).ok_or_else(|| not_found("checklist", key))
    }

    fn item_mut(&mut self, key: &str, item_id: &str) -> Result<&mut TaskStep, ValidationError> {
        self.list_mut(key)?
            .iter_mut()
            .find(|s| s.id == item_id)
            .ok_or_else(|| not_found("checklist item", item_id))
    }
}

fn not_found(kind: &'static str, id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_lists() {
        let lists = Checklists::default();
        assert_eq!(lists.get("backpack").unwrap().len(), 6);
        assert_eq!(lists.get("hockey").unwrap().len(), 14);
        assert_eq!(lists.get("football").unwrap()[3].icon.as_deref(), Some("🛡️"));
        assert!(lists.get("chess").is_err());
    }

    #[test]
    fn adult_list_hidden_from_younger_profiles() {
        let lists = Checklists::default();
        assert!(lists.keys_for(Profile::Adult).contains(&ADULT_ONLY));
        assert!(!lists.keys_for(Profile::Child).contains(&ADULT_ONLY));
        assert_eq!(lists.keys_for(Profile::Teen).len(), 4);
    }

    #[test]
    fn add_rename_remove() {
        let mut lists = Checklists::default();
        let id = lists.add_item("sports", "  ").unwrap().id.clone();
        assert_eq!(lists.get("sports").unwrap().last().unwrap().text, NEW_ITEM_TEXT);

        lists.rename_item("sports", &id, "Knee pads").unwrap();
        assert_eq!(lists.get("sports").unwrap()[11].text, "Knee pads");
        assert!(lists.rename_item("sports", &id, "").is_err());

        assert_eq!(lists.remove_item("sports", &id).unwrap().text, "Knee pads");
        assert_eq!(lists.get("sports").unwrap().len(), 11);
        assert!(lists.remove_item("sports", &id).is_err());
    }

    #[test]
    fn toggle_and_reset() {
        let mut lists = Checklists::default();
        assert!(lists.toggle_item("backpack", "b2").unwrap());
        assert!(lists.toggle_item("backpack", "b5").unwrap());
        assert!(!lists.toggle_item("backpack", "b5").unwrap());
        lists.toggle_item("backpack", "b6").unwrap();

        lists.reset("backpack").unwrap();
        assert!(lists.get("backpack").unwrap().iter().all(|s| !s.completed));
        assert!(lists.toggle_item("backpack", "zz").is_err());
    }

    #[test]
    fn serializes_as_object_of_arrays() {
        let json = serde_json::to_value(Checklists::default()).unwrap();
        assert!(json["backpack"].is_array());
        assert_eq!(json["backpack"][0]["id"], "b1");
        assert_eq!(json["backpack"][0]["completed"], false);
    }

    #[test]
    fn icons_for_lists() {
        assert_eq!(list_icon("hockey"), "🏒");
        assert_eq!(list_icon("mine"), "📋");
    }
}
