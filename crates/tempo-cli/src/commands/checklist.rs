use clap::Subcommand;
use tempo_core::checklist::list_icon;
use tempo_core::Config;

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum ChecklistAction {
    /// List the checklists available to the current profile
    List,
    /// Show the items of one list
    Show {
        /// List name
        list: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append an item
    Add {
        list: String,
        /// Item text (blank gives a placeholder)
        #[arg(default_value = "")]
        text: String,
    },
    /// Change an item's text
    Rename {
        list: String,
        item: String,
        text: String,
    },
    /// Tick or untick an item
    Toggle {
        list: String,
        item: String,
    },
    /// Remove an item
    Remove {
        list: String,
        item: String,
    },
    /// Untick every item in a list
    Reset {
        list: String,
    },
}

pub fn run(action: ChecklistAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        ChecklistAction::List => {
            let lists = app.checklists();
            for key in lists.keys_for(app.profile()) {
                let items = lists.get(key)?;
                let done = items.iter().filter(|i| i.completed).count();
                println!("{} {key} ({done}/{})", list_icon(key), items.len());
            }
        }
        ChecklistAction::Show { list, json } => {
            let items = app.checklists().get(&list)?;
            if json {
                print_json(&items)?;
            } else {
                for item in items {
                    let mark = if item.completed { "x" } else { " " };
                    let icon = item.icon.as_deref().unwrap_or(" ");
                    println!("[{mark}] {icon} {:<36}  {}", item.text, item.id);
                }
            }
        }
        ChecklistAction::Add { list, text } => {
            let item = app.add_checklist_item(&list, &text)?;
            println!("{}", item.id);
        }
        ChecklistAction::Rename { list, item, text } => {
            app.rename_checklist_item(&list, &item, &text)?;
            println!("ok");
        }
        ChecklistAction::Toggle { list, item } => {
            let done = app.toggle_checklist_item(&list, &item)?;
            println!("{}", if done { "packed" } else { "not packed" });
        }
        ChecklistAction::Remove { list, item } => {
            let removed = app.remove_checklist_item(&list, &item)?;
            println!("removed: {}", removed.text);
        }
        ChecklistAction::Reset { list } => {
            app.reset_checklist(&list)?;
            println!("{list} reset");
        }
    }
    Ok(())
}
