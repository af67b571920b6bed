//! One-shot chat command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Run one turn and print the reply.
///
/// ```bash
/// colloquy chat "Build a todo app"
/// colloquy chat "Add auth" --session <id>
/// ```
pub async fn send_message(
    state: &AppState,
    message: String,
    session: Option<String>,
    json: bool,
) -> Result<()> {
    let turn = state.chat_service.handle_turn(session, message).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turn)?);
        return Ok(());
    }

    println!();
    println!("{}", turn.reply);
    println!();
    println!(
        "  {} session {}  {}",
        style("i").blue().bold(),
        style(&turn.session_id).cyan(),
        style(format!("({})", turn.source)).dim()
    );
    println!();

    Ok(())
}
