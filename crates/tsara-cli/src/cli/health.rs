//! `tsara health`: check that the answer service is up.

use console::style;

use tsara_core::answer::AnswerService;

use crate::state::AppState;

use super::spinner;

pub async fn health(state: &AppState, json: bool) -> anyhow::Result<()> {
    let endpoint = state.service.endpoint();

    let progress = (!json).then(|| spinner("checking..."));
    let result = state.service.health().await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let healthy = matches!(&result, Ok(health) if health.is_healthy());

    if json {
        let check = match &result {
            Ok(health) => serde_json::json!({
                "endpoint": endpoint,
                "status": health.status,
                "message": health.message,
                "healthy": healthy,
            }),
            Err(err) => serde_json::json!({
                "endpoint": endpoint,
                "error": err.to_string(),
                "healthy": false,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        println!();
        println!("  Health check for {}", style(endpoint).cyan());
        println!();
        match &result {
            Ok(health) => {
                let mark = if healthy {
                    style("\u{2713}").green()
                } else {
                    style("\u{2717}").red()
                };
                println!("  {mark} {} {}", style(&health.status).bold(), health.message);
            }
            Err(err) => println!("  {} {err}", style("\u{2717}").red()),
        }
        println!();
    }

    if !healthy {
        anyhow::bail!("answer service at {endpoint} is not healthy");
    }
    Ok(())
}
