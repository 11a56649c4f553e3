//! Search command

use super::joined_text;
use crate::app::{OutputFormat, SearchArgs};
use crate::output;
use anyhow::Result;
use sitewise_core::store::QUERIES_COLLECTION;
use sitewise_core::{Config, DocumentStore, LlmGateway, SearchAgent};
use std::sync::Arc;

pub async fn run(
    args: SearchArgs,
    gateway: Arc<LlmGateway>,
    config: &Config,
    store: &dyn DocumentStore,
    format: OutputFormat,
) -> Result<()> {
    let query = joined_text(&args.query, "query")?;

    let mut search_config = config.search.clone();
    if let Some(limit) = args.limit {
        search_config.candidate_limit = limit;
    }
    if let Some(fallback) = args.fallback {
        search_config.fallback = fallback.into();
    }

    let agent = SearchAgent::new(gateway, &search_config);
    let results = agent.search(&query).await;

    if !args.no_save {
        store.save(
            QUERIES_COLLECTION,
            serde_json::json!({ "query": query, "results": results }),
        )?;
    }

    print!("{}", output::format_search_results(&results, format));
    Ok(())
}
