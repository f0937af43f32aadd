use gazette::{GazetteOptions, errors::GazetteError, site::build_site, store::BlogStore};
use tracing::info;

/// Exports the reader into `options.output_dir`.
pub fn start_build(store: BlogStore, options: &GazetteOptions) -> Result<(), GazetteError> {
    info!(name: "build", "Reading blogs from {}", options.api_base_url);

    let output = build_site(&store, options)?;

    info!(name: "build", "Wrote {} pages to {}", output.pages.len(), options.output_dir.display());
    Ok(())
}
