//! Example: feed typical misbehaving model answers through the explainer
//! using `MockBackend`, and show which parser stage handled each one.
//!
//! Run with: `cargo run --example offline`

use std::sync::Arc;

use term_extractor::backend::{MockBackend, MockReply};
use term_extractor::Explainer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let replies = vec![
        MockReply::Text(r#"[{"term":"LLM","explanation":"A large language model."}]"#.into()),
        MockReply::Text(
            "Sure! Here you go:\n```json\n[{\"term\":\"RAG\",\"explanation\":\"Retrieval-augmented generation.\"}]\n```".into(),
        ),
        MockReply::Text("[{'Term': 'LoRA', 'Definition': 'A cheap way to fine-tune a model.'},]".into()),
        MockReply::Text("**GPU**: A graphics processor.\n**TPU**: Google's AI chip.".into()),
        MockReply::Text("I'm not sure what you mean.".into()),
        MockReply::Status(429),
        MockReply::Empty,
    ];
    let count = replies.len();

    let explainer = Explainer::builder()
        .backend(Arc::new(MockBackend::with_replies(replies)))
        .build()?;

    for i in 0..count {
        let output = explainer.explain_detailed("some social media post").await?;
        let how = match output.diagnostics {
            Some(ref diag) => diag.stage.to_string(),
            None => "status sentinel".to_string(),
        };
        println!("reply #{} ({})", i + 1, how);
        for record in &output.terms {
            println!("  {}: {}", record.term(), record.explanation());
        }
    }

    Ok(())
}
