//! `taskspec assets` — list the static resources packaged into this build.

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::assets;

/// Run the assets command.
///
/// # Errors
///
/// Returns an error if a packaged resource is missing.
pub fn run(json: bool) -> Result<()> {
    assets::preload()?;

    if json {
        let rows: Vec<serde_json::Value> = assets::all()
            .map(|(resource, bytes)| {
                serde_json::json!({
                    "name": resource.file_name(),
                    "size": bytes.len(),
                    "sha256": format!("{:x}", Sha256::digest(bytes)),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(rows));
    } else {
        for (resource, bytes) in assets::all() {
            let sha = Sha256::digest(bytes);
            println!("{sha:x}  {:>6}  {}", bytes.len(), resource.file_name());
        }
    }
    Ok(())
}
