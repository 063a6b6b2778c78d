use std::io::{BufRead, Write};

use tempo_core::{Config, Conversation};

use super::{assistant, block_on};

/// Chat with the assistant. Without a message, reads one line per turn
/// until stdin closes or the user types `exit`.
pub fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = assistant(&config)?;
    let mut conv = Conversation::new(config.profile.profile, config.profile.language);

    if let Some(text) = message {
        let reply = block_on(conv.send(&client, &text))?;
        println!("{}", reply.text);
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }
        let reply = block_on(conv.send(&client, text))?;
        println!("assistant> {}", reply.text);
    }
    println!();
    Ok(())
}
