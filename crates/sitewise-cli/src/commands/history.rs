//! History command

use crate::app::{HistoryArgs, HistoryCollection, OutputFormat};
use crate::output;
use anyhow::Result;
use sitewise_core::store::{QUERIES_COLLECTION, REPORTS_COLLECTION};
use sitewise_core::DocumentStore;

pub fn run(args: HistoryArgs, store: &dyn DocumentStore, format: OutputFormat) -> Result<()> {
    let collection = match args.collection {
        HistoryCollection::Reports => REPORTS_COLLECTION,
        HistoryCollection::Queries => QUERIES_COLLECTION,
    };

    let mut documents = store.list(collection)?;
    if let Some(limit) = args.limit {
        let skip = documents.len().saturating_sub(limit);
        documents.drain(..skip);
    }

    print!("{}", output::format_history(&documents, format));
    Ok(())
}
