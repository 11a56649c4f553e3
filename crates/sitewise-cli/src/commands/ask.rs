//! Ask command

use super::joined_text;
use crate::app::{AskArgs, OutputFormat};
use crate::output;
use anyhow::{Context, Result};
use base64::Engine;
use sitewise_core::{LlmGateway, ModelTier, StructuredRequest};

pub async fn run(args: AskArgs, gateway: &LlmGateway, format: OutputFormat) -> Result<()> {
    let prompt = joined_text(&args.prompt, "prompt")?;
    let mut request = StructuredRequest::new(prompt);

    if let Some(schema) = args.schema {
        request = request.with_schema_hint(schema);
    }
    if let Some(path) = args.context {
        let context = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading context {}", path.display()))?;
        request = request.with_context(context);
    }
    if let Some(path) = args.image {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading image {}", path.display()))?;
        request = request.with_image(base64::engine::general_purpose::STANDARD.encode(bytes));
    }
    if args.fast {
        request = request.with_tier(ModelTier::Fast);
    }

    let response = gateway.complete_structured(&request).await?;
    if response.is_simulated() && format == OutputFormat::Cli {
        eprintln!("(simulated response)");
    }
    print!("{}", output::format_structured(&response, format));
    Ok(())
}
