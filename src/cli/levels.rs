use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let mut table = Table::new();
    table.set_header(vec!["#", "Level"]);
    for level in &settings.levels {
        table.add_row(vec![Cell::new(level.id), Cell::new(&level.name)]);
    }
    println!("{table}");
    Ok(())
}
