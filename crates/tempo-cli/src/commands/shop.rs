use clap::Subcommand;
use tempo_core::shop::CATALOG;
use tempo_core::Config;

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum ShopAction {
    /// List items with prices
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Buy an item and wear it
    Buy {
        /// Item ID
        id: String,
    },
    /// Switch to an item you already own
    Equip {
        /// Item ID
        id: String,
    },
}

pub fn run(action: ShopAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        ShopAction::List { json } => {
            if json {
                print_json(&CATALOG)?;
                return Ok(());
            }
            let wardrobe = app.wardrobe();
            for item in CATALOG {
                let active = wardrobe.active_accessory.as_deref() == Some(item.id)
                    || wardrobe.active_house.as_deref() == Some(item.id);
                let status = if active {
                    "equipped"
                } else if wardrobe.owns(item.id) {
                    "owned"
                } else {
                    ""
                };
                println!("{:<8} {} {:<14} {:>5}  {status}", item.id, item.icon, item.name, item.cost);
            }
            println!("balance: {}", app.balance());
        }
        ShopAction::Buy { id } => {
            let item = app.purchase(&id)?;
            println!("bought {} {} (balance {})", item.icon, item.name, app.balance());
        }
        ShopAction::Equip { id } => {
            let item = app.equip(&id)?;
            println!("now using {} {}", item.icon, item.name);
        }
    }
    Ok(())
}
