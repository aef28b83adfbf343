//! Main chat loop orchestration.
//!
//! One task owns the controller. It waits on user input, on the
//! dispatcher's settlement channel, and on results of `/health` and
//! `/reload` at the same time, so nothing a slow service call does can block
//! typing. Replies are printed from `MessageAppended` events in the order
//! they settle.

use std::io::Write;
use std::sync::Arc;

use console::style;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tsara_core::answer::AnswerService;
use tsara_core::conversation::ConversationController;
use tsara_core::dispatch::{Dispatch, RequestDispatcher, Settlement};
use tsara_core::render::build_view;
use tsara_types::error::DispatchError;
use tsara_types::event::ConversationEvent;
use tsara_types::research::{HealthResponse, ReloadResponse};

use crate::state::AppState;

use super::banner::welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ReplyRenderer;

fn prompt(pending: bool) -> String {
    if pending {
        format!("  {} ", style("You (waiting) >").yellow().bold())
    } else {
        format!("  {} ", style("You >").green().bold())
    }
}

/// Service calls run beside the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServiceCall {
    Health,
    Reload,
}

/// Outcome of a [`ServiceCall`], delivered back to the loop.
#[derive(Debug)]
enum ServiceNotice {
    Health(Result<HealthResponse, DispatchError>),
    Reload(Result<ReloadResponse, DispatchError>),
}

impl ServiceNotice {
    fn render(&self) -> String {
        match self {
            ServiceNotice::Health(Ok(health)) if health.is_healthy() => {
                format!("\n  {} {}\n", style("\u{2713}").green(), health.message)
            }
            ServiceNotice::Health(Ok(health)) => format!(
                "\n  {} {} {}\n",
                style("\u{2717}").red(),
                style(&health.status).bold(),
                health.message
            ),
            ServiceNotice::Health(Err(err)) => format!("\n  {} {err}\n", style("\u{2717}").red()),
            ServiceNotice::Reload(Ok(reloaded)) => {
                format!("\n  {} {}\n", style("*").cyan().bold(), reloaded.message)
            }
            ServiceNotice::Reload(Err(err)) => format!(
                "\n  {} Reload failed: {}\n",
                style("!").red().bold(),
                err.fallback_content()
            ),
        }
    }
}

/// Run `call` on its own task and send the outcome on `notices`.
fn spawn_service_call<S: AnswerService>(
    service: Arc<S>,
    call: ServiceCall,
    notices: mpsc::UnboundedSender<ServiceNotice>,
) {
    info!(?call, "starting service call");
    tokio::spawn(async move {
        let notice = match call {
            ServiceCall::Health => ServiceNotice::Health(service.health().await),
            ServiceCall::Reload => ServiceNotice::Reload(service.reload().await),
        };
        if notices.send(notice).is_err() {
            debug!(?call, "chat loop gone, dropping service call result");
        }
    });
}

/// Prints controller events above the prompt.
struct Screen<W: Write> {
    out: W,
    events: broadcast::Receiver<ConversationEvent>,
    renderer: ReplyRenderer,
}

impl<W: Write> Screen<W> {
    fn print(&mut self, text: &str) -> anyhow::Result<()> {
        write!(self.out, "{text}")?;
        Ok(())
    }

    /// Render every queued event. Returns the latest pending flag seen.
    ///
    /// User messages are not echoed; the input line already shows them.
    fn drain(&mut self) -> anyhow::Result<Option<bool>> {
        let mut pending = None;
        loop {
            match self.events.try_recv() {
                Ok(ConversationEvent::MessageAppended { message, .. }) => {
                    if !message.is_user() {
                        let text = self.renderer.render(&build_view(&message));
                        self.print(&text)?;
                    }
                }
                Ok(ConversationEvent::PendingChanged { pending: now, .. }) => {
                    pending = Some(now);
                }
                Ok(ConversationEvent::SessionReset { .. }) => {
                    pending = Some(false);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "renderer lagged behind conversation events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        Ok(pending)
    }
}

/// Run the interactive chat loop until the user exits.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let (dispatcher, mut settlements) = RequestDispatcher::new(Arc::clone(&state.service));
    let mut controller = ConversationController::new(dispatcher);
    let (notice_tx, mut notices) = mpsc::unbounded_channel();
    let endpoint = state.service.endpoint().to_string();

    let (mut input, out) = ChatInput::new(prompt(false))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let mut screen = Screen {
        out,
        events: controller.subscribe(),
        renderer: ReplyRenderer::new(),
    };

    let session = controller.session_id().to_string();
    screen.print(&welcome_banner(&endpoint, &session, true))?;
    info!(session_id = %session, endpoint = %endpoint, "chat session started");

    loop {
        let mut settled_pending = None;
        tokio::select! {
            event = input.read_line() => match event {
                InputEvent::Eof => break,
                InputEvent::Interrupted => {
                    let hint = style("Press Ctrl+D to exit, or keep chatting.").dim();
                    screen.print(&format!("\n  {hint}\n"))?;
                }
                InputEvent::Message(text) => match commands::parse(&text) {
                    Some(ChatCommand::Exit) => break,
                    Some(ChatCommand::Health) => {
                        spawn_service_call(
                            Arc::clone(&state.service),
                            ServiceCall::Health,
                            notice_tx.clone(),
                        );
                    }
                    Some(ChatCommand::Reload) => {
                        spawn_service_call(
                            Arc::clone(&state.service),
                            ServiceCall::Reload,
                            notice_tx.clone(),
                        );
                    }
                    Some(cmd) => run_command(cmd, &endpoint, &mut controller, &mut input, &mut screen)?,
                    None => {
                        controller.submit(&text);
                    }
                },
            },
            Some(settlement) = settlements.recv() => {
                settled_pending = on_settlement(
                    settlement,
                    state.config.show_timing,
                    &endpoint,
                    &mut controller,
                    &mut screen,
                )?;
            }
            Some(notice) = notices.recv() => {
                screen.print(&notice.render())?;
            }
        }

        if let Some(pending) = screen.drain()?.or(settled_pending) {
            input.update_prompt(&prompt(pending));
        }
    }

    let unanswered = controller.outstanding();
    if unanswered > 0 {
        info!(unanswered, "ending session with questions still in flight");
    }
    screen.print(&format!("\n  {}\n", style("Session ended.").dim()))?;
    input.flush();
    Ok(())
}

/// Append a settlement and print its reply, then the timing footer.
///
/// Returns the pending flag if it changed. Ignored settlements print nothing.
fn on_settlement<D: Dispatch, W: Write>(
    settlement: Settlement,
    show_timing: bool,
    endpoint: &str,
    controller: &mut ConversationController<D>,
    screen: &mut Screen<W>,
) -> anyhow::Result<Option<bool>> {
    let elapsed = settlement.elapsed;
    let appended = controller.on_dispatch_settled(settlement).is_some();

    // The reply must be on screen before its footer.
    let pending = screen.drain()?;
    if appended && show_timing {
        let footer = screen.renderer.timing_footer(elapsed, endpoint);
        screen.print(&footer)?;
    }
    Ok(pending)
}

/// Commands that only touch local state.
fn run_command<D: Dispatch, W: Write>(
    cmd: ChatCommand,
    endpoint: &str,
    controller: &mut ConversationController<D>,
    input: &mut ChatInput,
    screen: &mut Screen<W>,
) -> anyhow::Result<()> {
    match cmd {
        ChatCommand::Help => screen.print(&commands::help_text())?,
        ChatCommand::Clear => {
            controller.reset();
            input.clear();
            let session = controller.session_id().to_string();
            screen.print(&welcome_banner(endpoint, &session, true))?;
        }
        ChatCommand::History => {
            let snapshot = controller.snapshot();
            if snapshot.messages.is_empty() {
                screen.print(&format!("\n  {}\n", style("No messages yet.").dim()))?;
            }
            for message in &snapshot.messages {
                let text = screen.renderer.render(&build_view(message));
                screen.print(&text)?;
            }
            if snapshot.pending {
                screen.print(&format!("\n  {}\n", style("Waiting for a reply...").dim()))?;
            }
        }
        ChatCommand::Unknown(name) => {
            screen.print(&format!(
                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(name).dim()
            ))?;
        }
        ChatCommand::Health | ChatCommand::Reload | ChatCommand::Exit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use tsara_core::dispatch::DispatchRequest;
    use tsara_types::research::ResearchResponse;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<DispatchRequest>>>);

    impl Recorder {
        fn take(&self, index: usize) -> DispatchRequest {
            self.0.borrow()[index].clone()
        }
    }

    impl Dispatch for Recorder {
        fn dispatch(&self, request: DispatchRequest) {
            self.0.borrow_mut().push(request);
        }
    }

    fn setup() -> (ConversationController<Recorder>, Recorder, Screen<Vec<u8>>) {
        console::set_colors_enabled(false);
        let recorder = Recorder::default();
        let controller = ConversationController::new(recorder.clone());
        let screen = Screen {
            out: Vec::new(),
            events: controller.subscribe(),
            renderer: ReplyRenderer::plain(80),
        };
        (controller, recorder, screen)
    }

    fn answered(request: &DispatchRequest, summary: &str) -> Settlement {
        Settlement::from_outcome(
            request,
            Ok(ResearchResponse::summary_only(summary)),
            Duration::from_millis(1400),
        )
    }

    fn output(screen: &mut Screen<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut screen.out)).unwrap()
    }

    #[test]
    fn submit_is_not_echoed_and_sets_waiting_prompt() {
        let (mut controller, _recorder, mut screen) = setup();

        controller.submit("hello");
        assert_eq!(screen.drain().unwrap(), Some(true));
        assert!(output(&mut screen).is_empty());
        assert!(prompt(true).contains("waiting"));
    }

    #[test]
    fn timing_footer_follows_its_reply() {
        let (mut controller, recorder, mut screen) = setup();
        controller.submit("hello");
        screen.drain().unwrap();

        let pending = on_settlement(
            answered(&recorder.take(0), "Hi there"),
            true,
            "http://host",
            &mut controller,
            &mut screen,
        )
        .unwrap();

        assert_eq!(pending, Some(false));
        let out = output(&mut screen);
        let reply = out.find("Hi there").unwrap();
        let footer = out.find("| 1.4s \u{00b7} http://host").unwrap();
        assert!(reply < footer);
    }

    #[test]
    fn footer_hidden_when_timing_disabled() {
        let (mut controller, recorder, mut screen) = setup();
        controller.submit("hello");
        screen.drain().unwrap();

        on_settlement(
            answered(&recorder.take(0), "Hi there"),
            false,
            "http://host",
            &mut controller,
            &mut screen,
        )
        .unwrap();

        let out = output(&mut screen);
        assert!(out.contains("Hi there"));
        assert!(!out.contains("1.4s"));
    }

    #[test]
    fn stale_settlement_prints_nothing() {
        let (mut controller, recorder, mut screen) = setup();
        controller.submit("before clear");
        controller.reset();
        screen.drain().unwrap();

        let pending = on_settlement(
            answered(&recorder.take(0), "late reply"),
            true,
            "http://host",
            &mut controller,
            &mut screen,
        )
        .unwrap();

        assert_eq!(pending, None);
        assert!(output(&mut screen).is_empty());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn prompt_returns_to_idle_after_first_of_two_replies() {
        let (mut controller, recorder, mut screen) = setup();
        controller.submit("a");
        controller.submit("b");
        assert_eq!(screen.drain().unwrap(), Some(true));

        let pending = on_settlement(
            answered(&recorder.take(1), "reply to b"),
            true,
            "http://host",
            &mut controller,
            &mut screen,
        )
        .unwrap();

        assert_eq!(pending, Some(false));
        assert_eq!(controller.outstanding(), 1);
        assert!(output(&mut screen).contains("reply to b"));
        assert!(!prompt(false).contains("waiting"));
    }

    /// Reload never finishes; health answers at once.
    struct StalledReload;

    impl AnswerService for StalledReload {
        fn endpoint(&self) -> &str {
            "http://stub"
        }

        async fn ask(&self, _message: &str) -> Result<ResearchResponse, DispatchError> {
            Ok(ResearchResponse::summary_only("unused"))
        }

        async fn health(&self) -> Result<HealthResponse, DispatchError> {
            Ok(HealthResponse {
                status: "healthy".to_string(),
                message: "Service is running".to_string(),
            })
        }

        async fn reload(&self) -> Result<ReloadResponse, DispatchError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn stalled_reload_does_not_hold_up_other_results() {
        let service = Arc::new(StalledReload);
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_service_call(Arc::clone(&service), ServiceCall::Reload, tx.clone());
        spawn_service_call(service, ServiceCall::Health, tx);

        let notice = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("health result should not wait for reload")
            .unwrap();
        assert!(matches!(notice, ServiceNotice::Health(Ok(_))));
    }

    #[test]
    fn service_notices_render() {
        console::set_colors_enabled(false);

        let healthy = ServiceNotice::Health(Ok(HealthResponse {
            status: "healthy".to_string(),
            message: "Service is running".to_string(),
        }));
        assert!(healthy.render().contains("\u{2713} Service is running"));

        let failed = ServiceNotice::Reload(Err(DispatchError::Status {
            status: 500,
            detail: Some("System RAG not initialized".to_string()),
        }));
        assert!(failed.render().contains("Reload failed: System RAG not initialized"));
    }
}
