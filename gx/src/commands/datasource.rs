// gx/src/commands/datasource.rs
//
// USE CASE: List datasources.

use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::PathBuf;

use super::load_context;

pub fn list(directory: PathBuf) -> anyhow::Result<i32> {
    let Some(context) = load_context(&directory)? else {
        return Ok(1);
    };

    let datasources = &context.config().datasources;
    if datasources.is_empty() {
        println!("No datasources found. Run `gx init` to add one.");
        return Ok(0);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["name", "class_name", "data_asset_type"]);
    for (name, datasource) in datasources {
        table.add_row(vec![
            name.as_str(),
            datasource.class_name.as_str(),
            datasource.data_asset_type.class_name.as_str(),
        ]);
    }
    println!("{} datasource(s) found:", datasources.len());
    println!("{table}");
    Ok(0)
}
