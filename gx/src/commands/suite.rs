// gx/src/commands/suite.rs
//
// USE CASE: List expectation suites.

use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::PathBuf;

use super::load_context;

pub fn list(directory: PathBuf) -> anyhow::Result<i32> {
    let Some(context) = load_context(&directory)? else {
        return Ok(1);
    };

    let store = context.expectations_store();
    let names = store.list_suite_names()?;
    if names.is_empty() {
        println!("No expectation suites found.");
        return Ok(0);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["expectation suite", "expectations"]);
    for name in &names {
        let suite = store.get(name)?;
        table.add_row(vec![name.clone(), suite.expectations.len().to_string()]);
    }
    println!("{} expectation suite(s) found:", names.len());
    println!("{table}");
    Ok(0)
}
