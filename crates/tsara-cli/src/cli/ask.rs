//! One-shot question: a single submit/settle cycle through the controller.

use std::sync::Arc;

use anyhow::{anyhow, bail};

use tsara_core::answer::AnswerService;
use tsara_core::conversation::ConversationController;
use tsara_core::dispatch::RequestDispatcher;
use tsara_core::render::build_view;

use crate::state::AppState;

use super::chat::renderer::ReplyRenderer;
use super::spinner;

/// Ask `question`, then print the reply card (or the message as JSON).
///
/// A failed call still prints its fallback reply. With `--json` the
/// underlying error is included alongside the message.
pub async fn ask(state: &AppState, question: &str, json: bool) -> anyhow::Result<()> {
    let (dispatcher, mut settlements) = RequestDispatcher::new(Arc::clone(&state.service));
    let mut controller = ConversationController::new(dispatcher);

    if controller.submit(question).is_none() {
        bail!("the question is empty");
    }

    let progress = (!json).then(|| spinner("thinking..."));
    let settlement = settlements
        .recv()
        .await
        .ok_or_else(|| anyhow!("the request ended without a reply"))?;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let elapsed = settlement.elapsed;
    let error = settlement.error.clone();
    let reply = controller
        .on_dispatch_settled(settlement)
        .cloned()
        .ok_or_else(|| anyhow!("the reply did not belong to this question"))?;

    if json {
        let output = serde_json::json!({
            "message": reply,
            "elapsed_ms": elapsed.as_millis() as u64,
            "error": error.map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let renderer = ReplyRenderer::new();
    print!("{}", renderer.render(&build_view(&reply)));
    if state.config.show_timing {
        print!("{}", renderer.timing_footer(elapsed, state.service.endpoint()));
    }
    println!();
    Ok(())
}
