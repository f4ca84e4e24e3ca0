mod bootstrap;
mod output;
mod registry;
mod settings;

use anyhow::{Context, Result};
use registry::ProjectRegistry;
use settings::Settings;
use simreport_data::analysis::analyze;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("simreport v{} starting", env!("CARGO_PKG_VERSION"));

    // The registry is only needed to resolve --project.
    let registry = if settings.project.is_some() || settings.registry.is_some() {
        ProjectRegistry::load_optional(settings.registry.as_deref())?
    } else {
        None
    };

    let inputs = settings.resolve_inputs(registry.as_ref())?;
    tracing::debug!("Resolved inputs: {:?}", inputs);

    let result = analyze(&inputs)
        .with_context(|| format!("Failed to analyze {}", inputs.series_path.display()))?;

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print!("{}", output::render_text(&result)),
    }

    Ok(())
}
