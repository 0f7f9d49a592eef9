//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use utoipa::OpenApi;
use virusdecode::ApiDoc;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi().to_pretty_json()?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{document}")?;
    Ok(())
}
