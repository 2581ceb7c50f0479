//! History CLI commands: show, clear.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatgate_types::chat::DeleteAck;
use chatgate_types::message::MessageRole;

use crate::state::AppState;

/// Print a session's messages as a table (or JSON with `--json`).
///
/// ```bash
/// chatgate history show s1
/// chatgate history show s1 --json
/// ```
pub async fn show_history(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let history = state.chat_service.history(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!();
        println!(
            "  {} No history for session '{}'",
            style("i").blue().bold(),
            style(session_id).cyan()
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
        Cell::new("Content").fg(Color::White),
    ]);

    for (index, message) in history.iter().enumerate() {
        let role_cell = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(index + 1).fg(Color::DarkGrey),
            role_cell,
            Cell::new(&message.content),
        ]);
    }

    println!();
    println!("  History for '{}'", style(session_id).cyan().bold());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(history.len()).bold(),
        if history.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete a session. Succeeds whether or not it existed.
pub async fn clear_history(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    state.chat_service.clear_history(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&DeleteAck { success: true })?);
    } else {
        println!(
            "  {} Cleared session '{}'",
            style("✓").green().bold(),
            style(session_id).cyan()
        );
    }
    Ok(())
}
