use tempo_core::Config;

use super::{open_app, print_json};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let app = open_app(&config)?;
    let balance = app.balance();

    if json {
        let wardrobe = app.wardrobe();
        print_json(&serde_json::json!({
            "coins": balance,
            "owned": wardrobe.owned,
            "active_accessory": wardrobe.active_accessory,
            "active_house": wardrobe.active_house,
        }))?;
    } else {
        println!("{balance} coins");
    }
    Ok(())
}
