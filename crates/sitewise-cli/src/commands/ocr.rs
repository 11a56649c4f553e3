//! OCR command

use crate::app::{OcrArgs, OutputFormat};
use crate::output;
use anyhow::{Context, Result};
use sitewise_core::{DocumentSource, LlmGateway};

pub async fn run(args: OcrArgs, gateway: &LlmGateway, format: OutputFormat) -> Result<()> {
    let source = if is_url(&args.source) {
        DocumentSource::Url(args.source)
    } else {
        DocumentSource::open(&args.source)
            .await
            .with_context(|| format!("opening {}", args.source))?
    };

    let document = gateway.extract_document(source).await?;
    print!("{}", output::format_extraction(&document, format));
    Ok(())
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
