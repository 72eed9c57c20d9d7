//! Interactive stdin loop driving a page context.

use std::io::Write;

use pagechat_common::{EntryPoint, PagechatError};
use pagechat_session::{AskRejected, PageContext};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::view::TerminalView;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Toggle,
    Reset,
    Quit,
    Ask(String),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "/open" => Self::Open,
            "/close" => Self::Close,
            "/toggle" => Self::Toggle,
            "/reset" => Self::Reset,
            "/quit" | "/exit" => Self::Quit,
            cmd if cmd.starts_with('/') => Self::Unknown(cmd.to_string()),
            _ => Self::Ask(line.to_string()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run until `input` closes or the user quits.
///
/// Settled calls are applied before the next input line is read.
pub async fn run<R, W>(
    mut ctx: PageContext,
    view: &mut TerminalView<W>,
    input: R,
) -> Result<(), PagechatError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match ctx.surface().entry() {
        EntryPoint::Popup => {
            ctx.open();
        }
        EntryPoint::Floating => {
            view.notice("Type /open to chat about this page.")?;
        }
    }
    view.refresh(&mut ctx)?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            biased;
            Some(kind) = ctx.next_completion() => {
                debug!(?kind, "Completion applied");
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if handle_line(&mut ctx, view, &line)? == Flow::Quit {
                    break;
                }
            }
        }
        view.refresh(&mut ctx)?;
    }

    info!(in_flight = ctx.in_flight(), "Leaving page context");
    Ok(())
}

fn handle_line<W: Write>(
    ctx: &mut PageContext,
    view: &mut TerminalView<W>,
    line: &str,
) -> std::io::Result<Flow> {
    match Command::parse(line) {
        Command::Open => {
            ctx.open();
        }
        Command::Close => ctx.close(),
        Command::Toggle => {
            ctx.toggle();
        }
        Command::Reset => {
            if !ctx.reactivate() {
                view.notice("Cannot reset while a request is running.")?;
            }
        }
        Command::Quit => return Ok(Flow::Quit),
        Command::Unknown(cmd) => {
            view.notice(&format!("Unknown command: {cmd}"))?;
        }
        Command::Ask(question) => {
            if !ctx.surface().is_panel_open() {
                view.notice("The chat panel is closed. Type /open first.")?;
            } else {
                match ctx.submit(&question) {
                    Ok(_) | Err(AskRejected::Empty) => {}
                    Err(rejected) => view.notice(&format!("Question not sent: {rejected}"))?,
                }
            }
        }
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pagechat_common::SessionId;
    use pagechat_relay::bridge::DEFAULT_CAPACITY;
    use pagechat_relay::{
        BackendClient, ChatResult, DirectTransport, IndexResult, RelayError, RelayRequest,
        RelayResponse, Transport,
    };
    use tokio::io::{AsyncWriteExt, BufReader};
    use tokio::sync::Notify;

    use super::*;

    /// Answers immediately and signals each settled call.
    #[derive(Default)]
    struct EchoTransport {
        sent: Mutex<Vec<RelayRequest>>,
        indexed: Notify,
        answered: Notify,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, request: RelayRequest) -> RelayResponse {
            self.sent.lock().unwrap().push(request.clone());
            match request {
                RelayRequest::ScrapeAndIndex { .. } => {
                    self.indexed.notify_one();
                    Ok::<_, RelayError>(IndexResult {
                        session_id: SessionId::new("s1"),
                        message: None,
                    })
                    .into()
                }
                RelayRequest::Chat { question, .. } => {
                    self.answered.notify_one();
                    Ok::<_, RelayError>(ChatResult {
                        answer: format!("echo {question}"),
                    })
                    .into()
                }
                RelayRequest::GetCurrentTabUrl => RelayResponse::failure("no tab"),
            }
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/open"), Command::Open);
        assert_eq!(Command::parse("  /close "), Command::Close);
        assert_eq!(Command::parse("/toggle"), Command::Toggle);
        assert_eq!(Command::parse("/reset"), Command::Reset);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(
            Command::parse("/nope"),
            Command::Unknown("/nope".to_string())
        );
        assert_eq!(
            Command::parse("What is X?"),
            Command::Ask("What is X?".to_string())
        );
    }

    fn floating_context() -> PageContext {
        let backend = BackendClient::new("http://127.0.0.1:9").unwrap();
        let (_host, client) = pagechat_relay::channel(
            Arc::new(DirectTransport::new(backend)),
            DEFAULT_CAPACITY,
        );
        PageContext::new("https://example.com", EntryPoint::Floating, Arc::new(client))
    }

    #[tokio::test]
    async fn question_with_closed_panel_is_refused() {
        let mut ctx = floating_context();
        let mut view = TerminalView::new(Vec::new());

        let flow = handle_line(&mut ctx, &mut view, "hello?").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(ctx.in_flight(), 0);
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.contains("Type /open first."));
    }

    #[tokio::test]
    async fn question_before_ready_reports_reason() {
        let mut ctx = floating_context();
        let mut view = TerminalView::new(Vec::new());

        handle_line(&mut ctx, &mut view, "/open").unwrap();
        assert_eq!(ctx.in_flight(), 1);
        handle_line(&mut ctx, &mut view, "too early").unwrap();
        assert_eq!(ctx.in_flight(), 1);

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.contains("Question not sent:"));
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut ctx = floating_context();
        let mut view = TerminalView::new(Vec::new());
        assert_eq!(handle_line(&mut ctx, &mut view, "/quit").unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn popup_indexes_on_start_and_prints_answers() {
        let transport = Arc::new(EchoTransport::default());
        let ctx = PageContext::new(
            "https://example.com/tab",
            EntryPoint::Popup,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        let mut view = TerminalView::new(Vec::new());
        let (mut writer, reader) = tokio::io::duplex(1024);

        let user = async {
            transport.indexed.notified().await;
            writer.write_all(b"What is X?\n").await.unwrap();
            transport.answered.notified().await;
            drop(writer);
        };
        let (result, ()) = tokio::join!(run(ctx, &mut view, BufReader::new(reader)), user);
        result.unwrap();

        assert_eq!(
            *transport.sent.lock().unwrap(),
            vec![
                RelayRequest::ScrapeAndIndex {
                    url: "https://example.com/tab".into(),
                },
                RelayRequest::Chat {
                    session_id: SessionId::new("s1"),
                    question: "What is X?".into(),
                },
            ]
        );
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(!out.contains("Type /open"));
        assert!(out.contains("[status] Ready! Ask a question below."));
        assert!(out.contains("You: What is X?"));
        assert!(out.contains("Bot: echo What is X?"));
    }

    #[tokio::test]
    async fn floating_waits_for_open_and_stops_on_quit() {
        let transport = Arc::new(EchoTransport::default());
        let ctx = PageContext::new(
            "https://example.com",
            EntryPoint::Floating,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        let mut view = TerminalView::new(Vec::new());
        let input: &[u8] = b"hello?\n/quit\n/open\n";

        run(ctx, &mut view, input).await.unwrap();

        assert!(transport.sent.lock().unwrap().is_empty());
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.contains("Type /open to chat about this page."));
        assert!(out.contains("Type /open first."));
    }
}
