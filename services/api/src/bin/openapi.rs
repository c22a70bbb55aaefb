//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the dashboard API to disk, by default to
//! `openapi.json`. An output path may be given as the first argument.

use api_lib::web::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    let doc = ApiDoc::openapi();
    std::fs::write(&path, doc.to_pretty_json()?)?;
    println!(
        "OpenAPI document for {} routes written to {}",
        doc.paths.paths.len(),
        path
    );
    Ok(())
}
