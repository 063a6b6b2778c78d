//! Cosmetic shop: accessories for the avatar and houses.

use serde::{Deserialize, Serialize};

use crate::error::ShopError;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Wearable,
    House,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub cost: u32,
    pub category: ItemCategory,
}

pub const CATALOG: &[ShopItem] = &[
    ShopItem { id: "glasses", name: "Sunglasses", icon: "🕶️", cost: 50, category: ItemCategory::Wearable },
    ShopItem { id: "crown", name: "Crown", icon: "👑", cost: 300, category: ItemCategory::Wearable },
    ShopItem { id: "energy", name: "Aura", icon: "✨", cost: 600, category: ItemCategory::Wearable },
    ShopItem { id: "h1", name: "Hut", icon: "🛖", cost: 250, category: ItemCategory::House },
    ShopItem { id: "h2", name: "Castle", icon: "🏰", cost: 1000, category: ItemCategory::House },
    ShopItem { id: "h3", name: "Space station", icon: "🚀", cost: 2000, category: ItemCategory::House },
];

pub fn find(id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == id)
}

/// Owned items plus what is currently equipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wardrobe {
    pub owned: Vec<String>,
    #[serde(default)]
    pub active_accessory: Option<String>,
    #[serde(default)]
    pub active_house: Option<String>,
}

impl Wardrobe {
    pub fn owns(&self, id: &str) -> bool {
        self.owned.iter().any(|o| o == id)
    }

    /// Buy an item, debit the ledger and equip it.
    pub fn purchase(&mut self, ledger: &mut Ledger, id: &str) -> Result<&'static ShopItem, ShopError> {
        let item = find(id).ok_or_else(|| ShopError::UnknownItem(id.to_string()))?;
        if self.owns(id) {
            return Err(ShopError::AlreadyOwned(id.to_string()));
        }
        ledger.debit(item.cost)?;
        self.owned.push(item.id.to_string());
        self.equip_item(item);
        tracing::info!(item = item.id, cost = item.cost, balance = ledger.balance(), "item purchased");
        Ok(item)
    }

    /// Equip an owned item.
    pub fn equip(&mut self, id: &str) -> Result<&'static ShopItem, ShopError> {
        let item = find(id).ok_or_else(|| ShopError::UnknownItem(id.to_string()))?;
        if !self.owns(id) {
            return Err(ShopError::UnknownItem(id.to_string()));
        }
        self.equip_item(item);
        Ok(item)
    }

    fn equip_item(&mut self, item: &ShopItem) {
        match item.category {
            ItemCategory::Wearable => self.active_accessory = Some(item.id.to_string()),
            ItemCategory::House => self.active_house = Some(item.id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_debits_and_equips() {
        let mut ledger = Ledger::new(400);
        let mut wardrobe = Wardrobe::default();

        wardrobe.purchase(&mut ledger, "crown").unwrap();
        assert_eq!(ledger.balance(), 100);
        assert_eq!(wardrobe.active_accessory.as_deref(), Some("crown"));

        wardrobe.purchase(&mut ledger, "glasses").unwrap();
        assert_eq!(ledger.balance(), 50);
        assert_eq!(wardrobe.active_accessory.as_deref(), Some("glasses"));
        assert!(wardrobe.active_house.is_none());
    }

    #[test]
    fn purchase_errors() {
        let mut ledger = Ledger::new(100);
        let mut wardrobe = Wardrobe::default();
        assert_eq!(
            wardrobe.purchase(&mut ledger, "h2").unwrap_err(),
            ShopError::InsufficientCoins { cost: 1000, balance: 100 }
        );
        assert_eq!(
            wardrobe.purchase(&mut ledger, "unicorn").unwrap_err(),
            ShopError::UnknownItem("unicorn".into())
        );
        wardrobe.purchase(&mut ledger, "glasses").unwrap();
        assert_eq!(
            wardrobe.purchase(&mut ledger, "glasses").unwrap_err(),
            ShopError::AlreadyOwned("glasses".into())
        );
        assert_eq!(ledger.balance(), 50);
        assert!(wardrobe.owned.len() == 1);
    }

    #[test]
    fn equip_requires_ownership() {
        let mut wardrobe = Wardrobe {
            owned: vec!["h1".into()],
            ..Default::default()
        };
        assert!(wardrobe.equip("h2").is_err());
        wardrobe.equip("h1").unwrap();
        assert_eq!(wardrobe.active_house.as_deref(), Some("h1"));
    }
}
