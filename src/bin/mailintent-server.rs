//! mailintent HTTP server binary

use anyhow::Context;
use mailintent::{ActionEngine, GeminiModel, HttpCorpusClient, ServiceConfig, TaxonomyStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("mailintent: email intent classification and action ranking");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = ServiceConfig::from_env();

    let taxonomy = match &config.taxonomy_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read taxonomy from {}", path))?;
            let store = TaxonomyStore::from_json(&raw)
                .with_context(|| format!("Invalid taxonomy in {}", path))?;
            println!("✓ Taxonomy: {} ({} intents)", path, store.len());
            store
        }
        None => {
            let store = TaxonomyStore::builtin().context("Builtin taxonomy failed to load")?;
            println!("✓ Taxonomy: builtin ({} intents)", store.len());
            store
        }
    };

    let mut engine = ActionEngine::new(Arc::new(taxonomy), config.pipeline.clone())
        .context("Action tables failed validation")?;

    match &config.gemini_api_key {
        Some(api_key) => {
            let model = GeminiModel::new(
                &config.gemini_base_url,
                &config.gemini_model,
                api_key,
                config.pipeline.ai_timeout,
            )?;
            println!("✓ AI fallback: {}", config.gemini_model);
            engine = engine.with_model(Arc::new(model));
        }
        None => {
            println!("✓ AI fallback: disabled (set GEMINI_API_KEY to enable)");
        }
    }

    match &config.corpus_service_url {
        Some(url) => {
            let client = HttpCorpusClient::new(url.as_str(), config.pipeline.corpus_timeout)?;
            match client.health_check().await {
                Ok(true) => println!("✓ Corpus service is healthy: {}", url),
                Ok(false) => eprintln!("⚠️  Corpus service is unhealthy: {}", url),
                Err(e) => eprintln!("⚠️  Failed to reach corpus service at {}: {}", url, e),
            }
            engine = engine.with_corpus(Arc::new(client));
        }
        None => {
            println!("✓ Personalization: disabled (set CORPUS_SERVICE_URL to enable)");
        }
    }

    println!("✓ Action engine initialized: {:?}", engine);
    println!("✓ Starting HTTP server on port {}...", config.port);
    println!();

    mailintent::server::run_server(engine.into_shared(), config.port).await?;

    Ok(())
}
