//! Command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use sift_core::{Customer, FilterRequest, QueryCompiler, QueryDocument};
use sift_gateway::{HttpTransport, IndexingGateway, IndexingOptions, SearchGateway, Transport};

use crate::cli::{Command, QueryArgs};
use crate::config::SiftConfig;

/// Dispatch a parsed command.
pub async fn run(command: Command, config: &SiftConfig) -> Result<()> {
    match command {
        Command::Compile(args) => {
            let document = compile(&args, config)?;
            println!("{}", render_document(&document)?);
            Ok(())
        }
        Command::Search(args) => {
            let document = compile(&args, config)?;
            let gateway = SearchGateway::new(transport(config)?, config.index.clone());
            let results = gateway
                .search(&document)
                .await
                .with_context(|| format!("search against '{}' failed", config.index))?;
            print_json(results.as_value())
        }
        Command::Index {
            id,
            file,
            visibility,
        } => {
            let document = read_document(&file)?;
            let gateway = indexing_gateway(config, visibility.requested())?;
            gateway
                .upsert(&id, &document)
                .await
                .with_context(|| format!("failed to index document '{id}'"))?;
            tracing::info!(id = %id, index = %config.index, "document indexed");
            Ok(())
        }
        Command::Seed { visibility } => seed(config, visibility.requested()).await,
    }
}

fn compile(args: &QueryArgs, config: &SiftConfig) -> Result<QueryDocument> {
    let request: FilterRequest = args.to_request();
    if args.strict {
        Customer::allow_list().check(&request)?;
    }
    let document = QueryCompiler::new(config.compiler.clone()).compile(&request)?;
    Ok(document)
}

fn transport(config: &SiftConfig) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::new(&config.engine)
        .with_context(|| format!("cannot reach engine at '{}'", config.engine.url))?;
    Ok(Arc::new(transport))
}

fn indexing_gateway(config: &SiftConfig, immediate: Option<bool>) -> Result<IndexingGateway> {
    let options = IndexingOptions {
        immediate_visibility: immediate.unwrap_or(config.indexing.immediate_visibility),
    };
    Ok(IndexingGateway::new(
        transport(config)?,
        config.index.clone(),
        options,
    ))
}

async fn seed(config: &SiftConfig, immediate: Option<bool>) -> Result<()> {
    let gateway = indexing_gateway(config, immediate)?;
    let customers = Customer::samples();
    let mut failed = 0usize;

    for customer in &customers {
        match gateway.upsert(&customer.document_id(), customer).await {
            Ok(()) => tracing::info!(id = customer.id, "customer indexed"),
            Err(e) => {
                failed += 1;
                tracing::error!(id = customer.id, error = %e, "failed to index customer");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} customers failed to index", customers.len());
    }
    tracing::info!(count = customers.len(), index = %config.index, "seed complete");
    Ok(())
}

fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Pretty-print the body exactly as the gateway sends it.
fn render_document(document: &QueryDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    fn query_args(argv: &[&str]) -> QueryArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Compile(args) | Command::Search(args) => args,
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_compile_uses_configured_sort() {
        let mut config = SiftConfig::default();
        config.compiler.sort_field = "UpdatedAt".to_string();

        let document = compile(&query_args(&["sift", "compile"]), &config).unwrap();
        assert_eq!(document.sort()[0].field, "UpdatedAt");
    }

    #[test]
    fn test_strict_rejects_unknown_field() {
        let args = query_args(&["sift", "compile", "--strict", "-f", "Nickname=Jo"]);
        let err = compile(&args, &SiftConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid request"));
    }

    #[test]
    fn test_compile_rejects_zero_limit() {
        let args = query_args(&["sift", "compile", "--limit", "0"]);
        assert!(compile(&args, &SiftConfig::default()).is_err());
    }

    #[test]
    fn test_read_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"id": 7, "FirstName": "Ada"}"#).unwrap();
        assert_eq!(read_document(&path).unwrap()["FirstName"], "Ada");

        std::fs::write(&path, "not json").unwrap();
        assert!(read_document(&path).is_err());
    }

    #[test]
    fn test_rendered_document_keeps_wire_key_order() {
        let args = query_args(&["sift", "compile", "-f", "City=New York", "-q", "jo"]);
        let document = compile(&args, &SiftConfig::default()).unwrap();
        let rendered = render_document(&document).unwrap();

        let at = |key: &str| rendered.find(key).unwrap();
        assert!(at("\"from\"") < at("\"size\""));
        assert!(at("\"size\"") < at("\"sort\""));
        assert!(at("\"sort\"") < at("\"query\""));
        assert!(at("\"query\": \"jo\"") < at("\"fields\""));
        assert!(at("\"fields\"") < at("\"type\""));

        let wire: Value = serde_json::from_slice(&document.to_json_bytes().unwrap()).unwrap();
        let printed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(printed, wire);
    }

    #[test]
    fn test_cli_visibility_overrides_config() {
        let mut config = SiftConfig::default();
        let gateway = indexing_gateway(&config, Some(true)).unwrap();
        assert!(gateway.options().immediate_visibility);

        config.indexing.immediate_visibility = true;
        let gateway = indexing_gateway(&config, Some(false)).unwrap();
        assert!(!gateway.options().immediate_visibility);

        let gateway = indexing_gateway(&config, None).unwrap();
        assert!(gateway.options().immediate_visibility);
    }

    #[tokio::test]
    async fn test_seed_reports_every_failed_customer() {
        let mut config = SiftConfig::default();
        config.engine.url = "http://127.0.0.1:1".to_string();

        let err = seed(&config, Some(true)).await.unwrap_err();
        assert!(err.to_string().contains("2 of 2"), "unexpected error: {err}");
    }
}
