//! `taskspec version` — build version and packaged resources.

use anyhow::{Context, Result};

use crate::assets::StaticResource;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be serialized.
pub fn run(json: bool) -> Result<()> {
    let name = "taskspec";
    let version = env!("CARGO_PKG_VERSION");

    if !json {
        println!("{name} {version}");
        return Ok(());
    }

    let resources: Vec<&str> = StaticResource::ALL
        .iter()
        .copied()
        .map(StaticResource::file_name)
        .collect();
    let report = serde_json::json!({
        "name": name,
        "version": version,
        "resources": resources,
    });
    println!(
        "{}",
        serde_json::to_string(&report).context("serializing version report")?
    );
    Ok(())
}
