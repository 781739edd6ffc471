use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rv_play::SaveFile;

pub fn show(file: &Path) -> Result<(), String> {
    let save = SaveFile::read(file).map_err(|e| e.to_string())?;
    let state = &save.state;

    println!("  {} [version {}]", file.display().to_string().bold(), save.version);
    println!("  saved:      {}", save.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  world:      {}", save.world_mode);
    println!(
        "  sanity:     {} ({}..{})",
        save.player.sanity(),
        save.player.min_sanity(),
        save.player.max_sanity()
    );
    if let Some(mask) = &save.equipped_mask {
        println!("  mask:       {mask}");
    }
    if !save.fired_triggers.is_empty() {
        println!("  triggers:   {}", save.fired_triggers.join(", "));
    }
    println!();

    if state.flags.is_empty() {
        println!("  {}", "No flags set.".dimmed());
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Flag", "Value"]);
        for (key, value) in state.flags.iter() {
            table.add_row(vec![key.to_string(), value.to_string()]);
        }
        println!("{table}");
    }

    if !state.interactables.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Interactable", "State", "Consumed"]);
        for (id, record) in state.interactables.iter() {
            let consumed = if record.consumed { "yes" } else { "no" };
            table.add_row(vec![id.to_string(), record.state.to_string(), consumed.to_string()]);
        }
        println!("{table}");
    }

    if state.inventory.is_empty() {
        println!("  {}", "Inventory empty.".dimmed());
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Item", "Count"]);
        for (id, count) in state.inventory.iter() {
            table.add_row(vec![id.to_string(), count.to_string()]);
        }
        println!("{table}");
    }

    Ok(())
}
