//! Session CLI commands: history and clear.

use anyhow::Result;
use chrono::{Local, TimeZone};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde_json::json;

use colloquy_types::chat::{ChatMessage, MessageRole};

use crate::state::AppState;

/// Longest content shown in a table cell before truncation.
const PREVIEW_CHARS: usize = 80;

/// Print a session's stored messages.
///
/// ```bash
/// colloquy history <session-id>
/// colloquy history <session-id> --json
/// ```
pub async fn show_history(state: &AppState, session: &str, json: bool) -> Result<()> {
    let messages = state.chat_service.history(session).await?;

    if json {
        let body = json!({ "sessionId": session, "messages": messages });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages in session '{}'.",
            style("i").blue().bold(),
            style(session).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for (i, message) in messages.iter().enumerate() {
        let role_cell = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
            MessageRole::System => Cell::new("system").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            role_cell,
            Cell::new(format_timestamp(message.timestamp)).fg(Color::DarkGrey),
            Cell::new(preview(message)),
        ]);
    }

    println!();
    println!("  Session '{}'", style(session).cyan().bold());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Clear a session's history.
pub async fn clear_session(state: &AppState, session: &str, json: bool) -> Result<()> {
    state.chat_service.clear(session).await?;

    if json {
        println!("{}", json!({ "success": true, "sessionId": session }));
    } else {
        println!(
            "  {} Cleared session '{}'",
            style("✓").green().bold(),
            style(session).cyan()
        );
    }

    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// First line of the content, cut to [`PREVIEW_CHARS`] characters.
fn preview(message: &ChatMessage) -> String {
    let first_line = message.content.lines().next().unwrap_or("");
    let mut text: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || message.content.lines().count() > 1 {
        text.push_str("...");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_single_line() {
        assert_eq!(preview(&ChatMessage::user("hello")), "hello");
    }

    #[test]
    fn preview_truncates_long_and_multiline_content() {
        let long = "x".repeat(200);
        let text = preview(&ChatMessage::user(long));
        assert_eq!(text.chars().count(), PREVIEW_CHARS + 3);

        assert_eq!(preview(&ChatMessage::assistant("line one\nline two")), "line one...");
    }

    #[test]
    fn format_timestamp_is_human_readable() {
        let formatted = format_timestamp(1_700_000_000_000);
        assert_eq!(formatted.len(), "2023-11-14 22:13:20".len());
    }
}
