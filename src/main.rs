use anyhow::{Context as _, Result};
use license_content::config::Config;
use license_content::i18n::Language;
use license_content::license::{Context, LicenseSpec, Resolver, Warnings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("license_content=info".parse()?),
        )
        .init();

    info!("Starting license content resolution");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Step 1: Read license specifications
    info!("Reading license specifications from {}", config.spec_file.display());
    let raw = tokio::fs::read(&config.spec_file)
        .await
        .with_context(|| format!("Failed to read {}", config.spec_file.display()))?;
    let specs: Vec<LicenseSpec> =
        serde_json::from_slice(&raw).context("Failed to parse license specifications")?;

    // Step 2: Resolve
    let resolver = Resolver::new(Context::with_base_dir(config.base_dir()));
    let mut warnings = Warnings::new();
    let content = resolver.resolve(&specs, &mut warnings).await?;
    let warnings = warnings.into_result(config.strict_warnings)?;

    for (id, item) in content.by_language_id() {
        let tag = Language::from_id(id)
            .map(|lang| lang.display_tag())
            .unwrap_or("?");
        info!(
            "{} ({}): {} body, {} bytes, {} label bytes",
            tag,
            id,
            item.body.format.as_str(),
            item.body.data.len(),
            item.labels.len()
        );
    }

    // Step 3: Write manifest
    if let Some(path) = &config.output_file {
        let json = serde_json::to_vec_pretty(&content.manifest())
            .context("Failed to serialize license manifest")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote license manifest to {}", path.display());
    }

    info!(
        "Done: {} language(s), default {}, {} warning(s)",
        content.language_ids().count(),
        content.default_language_id(),
        warnings.len()
    );
    Ok(())
}
