use super::context::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use watchlist_sync_models::{ItemType, WatchlistEntry};

pub struct EntryArgs {
    pub id: u64,
    pub item_type: ItemType,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

impl EntryArgs {
    fn into_entry(self) -> WatchlistEntry {
        let mut entry = WatchlistEntry::new(self.id, self.item_type, self.title);
        entry.poster_path = self.poster_path;
        entry.backdrop_path = self.backdrop_path;
        entry.overview = self.overview;
        entry.release_date = self.release_date;
        entry.vote_average = self.vote_average;
        entry
    }
}

pub async fn run_list(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let coordinator = ctx.coordinator_with_session(output).await?;
    let entries = coordinator.entries();

    match output.format() {
        crate::output::OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if entries.is_empty() {
                output.info("Your list is empty");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Id"),
                Cell::new("Type"),
                Cell::new("Title"),
                Cell::new("Release"),
                Cell::new("Rating"),
            ]);
            for entry in &entries {
                table.add_row(vec![
                    Cell::new(entry.item_id),
                    Cell::new(entry.item_type),
                    Cell::new(&entry.title),
                    Cell::new(entry.release_date.as_deref().unwrap_or("-")),
                    Cell::new(
                        entry
                            .vote_average
                            .map(|v| format!("{:.1}", v))
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

pub async fn run_add(args: EntryArgs, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let coordinator = ctx.coordinator_with_session(output).await?;

    // Outcome reaches the user as a notice through the Toasts sink
    coordinator.add_entry(args.into_entry()).await;
    Ok(())
}

pub async fn run_remove(id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let coordinator = ctx.coordinator_with_session(output).await?;

    if !coordinator.is_member(id) {
        output.warn(format!("Item {} is not in your list", id));
        return Ok(());
    }

    coordinator.remove_entry(id).await;
    Ok(())
}

pub async fn run_sync(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    let Some(session) = ctx.restore_session().await? else {
        output.warn("Not signed in; nothing to sync");
        return Ok(());
    };

    let coordinator = ctx.coordinator(output);
    coordinator.attach_session(session).await;
    output.success(format!(
        "Watchlist synced ({} entries)",
        coordinator.entries().len()
    ));
    Ok(())
}
