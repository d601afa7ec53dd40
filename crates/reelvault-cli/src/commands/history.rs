use super::context::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use watchlist_sync_models::{HistoryEntry, ItemType};

pub async fn run_show(limit: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let token = ctx.require_token().await?;

    let entries = ctx
        .client
        .history(&token, Some(limit))
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch history: {}", e))?;

    match output.format() {
        crate::output::OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if entries.is_empty() {
                output.info("No viewing history yet");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Id"),
                Cell::new("Type"),
                Cell::new("Title"),
                Cell::new("Progress"),
                Cell::new("Watched"),
            ]);
            for entry in &entries {
                table.add_row(vec![
                    Cell::new(entry.item_id),
                    Cell::new(entry.item_type),
                    Cell::new(&entry.title),
                    Cell::new(
                        entry
                            .progress
                            .map(|p| format!("{:.0}%", p))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(
                        entry
                            .watched_at
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ]);
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        _ => {
            output.json(&serde_json::to_value(&entries)?);
        }
    }

    Ok(())
}

pub async fn run_add(
    id: u64,
    item_type: ItemType,
    title: String,
    poster_path: Option<String>,
    progress: Option<f64>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let token = ctx.require_token().await?;

    let mut entry = HistoryEntry::new(id, item_type, title);
    entry.poster_path = poster_path;
    entry.progress = progress;

    let saved = ctx
        .client
        .add_to_history(&token, &entry)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to record view: {}", e))?;

    output.success(format!("Recorded {}", saved.title));
    Ok(())
}

pub async fn run_remove(id: u64, item_type: ItemType, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let token = ctx.require_token().await?;

    ctx.client
        .remove_from_history(&token, id, item_type)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to remove history record: {}", e))?;

    output.success("Removed from history");
    Ok(())
}

pub async fn run_clear(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let token = ctx.require_token().await?;

    ctx.client
        .clear_history(&token)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear history: {}", e))?;

    output.success("Viewing history cleared");
    Ok(())
}
