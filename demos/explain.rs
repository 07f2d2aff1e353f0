//! Example: explain the jargon in a sentence with a live Gemini call.
//!
//! Run with: `GEMINI_API_KEY=... cargo run --example explain -- "We fine-tuned an LLM with LoRA"`
//!
//! Set `RUST_LOG=term_extractor=debug` to watch the parser cascade.

use term_extractor::{BackoffConfig, Explainer, SavedTermsStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let text = if text.is_empty() {
        "Our RAG pipeline cut hallucinations after we quantized the LLM to 4-bit.".to_string()
    } else {
        text
    };

    let explainer = Explainer::builder()
        .api_key_from_env()
        .backoff(BackoffConfig::interactive())
        .build()?;

    let output = explainer.explain_detailed(&text).await?;
    for record in &output.terms {
        println!("{}: {}", record.term(), record.explanation());
    }
    if let Some(ref diag) = output.diagnostics {
        println!("\nParsed by: {} (discarded {}, repaired {})", diag.stage, diag.discarded, diag.repaired);
    }

    // Keep the first explanation for later.
    let store = std::env::temp_dir().join("term-extractor-demo");
    let mut saved = SavedTermsStore::open(&store)?;
    if !output.is_sentinel() && saved.save(output.terms.first().clone())? {
        println!("Saved '{}' to {}", output.terms.first().term(), saved.path().display());
    }

    Ok(())
}
