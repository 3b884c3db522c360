//! Line-oriented terminal front-end
//!
//! Reads commands from stdin, forwards them to the runtime and prints the
//! [`UiEvent`]s it broadcasts. No chat or call logic lives here.

use crate::call::CallPhase;
use crate::conversation::{Message, Role};
use crate::runtime::{CallView, RuntimeHandle, RuntimeStopped, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

const HELP: &str = "Type a question and press enter. Commands: /connect /mute /video /end \
                    /resources /back /close /hangup /help /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Connect,
    ToggleMute,
    ToggleVideo,
    EndCall,
    Resources,
    Back,
    Close,
    Hangup,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(name) = trimmed.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };
        match name.to_lowercase().as_str() {
            "connect" => Command::Connect,
            "mute" => Command::ToggleMute,
            "video" => Command::ToggleVideo,
            "end" => Command::EndCall,
            "resources" => Command::Resources,
            "back" => Command::Back,
            "close" => Command::Close,
            "hangup" | "x" => Command::Hangup,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

/// Drive the runtime from stdin until EOF or `/quit`
pub async fn run(
    handle: &RuntimeHandle,
    ui_rx: broadcast::Receiver<UiEvent>,
    community_url: String,
) -> std::io::Result<()> {
    let printer = tokio::spawn(print_events(ui_rx, Printer::new(community_url)));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let result = match Command::parse(&line) {
            Command::Send(text) => handle.send_message(text).await,
            Command::Connect => handle.connect().await,
            Command::ToggleMute => handle.toggle_mute().await,
            Command::ToggleVideo => handle.toggle_video().await,
            Command::EndCall => handle.end_call().await,
            Command::Resources => handle.open_learning_resources().await,
            Command::Back => handle.close_learning_resources().await,
            Command::Close => handle.close_call().await,
            Command::Hangup => handle.dismiss_call().await,
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Quit => break,
            Command::Unknown(cmd) => {
                println!("Unknown command {cmd}. {HELP}");
                Ok(())
            }
        };
        if let Err(RuntimeStopped) = result {
            tracing::warn!("Runtime stopped; leaving console");
            break;
        }
    }

    handle.shutdown();
    printer.abort();
    Ok(())
}

async fn print_events(mut ui_rx: broadcast::Receiver<UiEvent>, mut printer: Printer) {
    loop {
        match ui_rx.recv().await {
            Ok(event) => {
                for line in printer.render(&event) {
                    println!("{line}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Console fell behind UI events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Turns UI events into terminal lines, remembering just enough to print
/// transcript lines and progress once each.
struct Printer {
    community_url: String,
    last_phase: Option<CallPhase>,
    last_progress: u8,
    /// (muted, video enabled) as last printed
    last_controls: (bool, bool),
    transcript_printed: usize,
}

impl Printer {
    fn new(community_url: String) -> Self {
        Self {
            community_url,
            last_phase: None,
            last_progress: 0,
            last_controls: (false, true),
            transcript_printed: 0,
        }
    }

    fn render(&mut self, event: &UiEvent) -> Vec<String> {
        match event {
            UiEvent::Init { messages, .. } | UiEvent::MessagesAppended { messages } => messages
                .iter()
                .flat_map(|m| self.render_message(m))
                .collect(),
            UiEvent::ChatStateChanged { state } if state.is_busy() => {
                vec!["  ...".to_string()]
            }
            UiEvent::ChatStateChanged { .. } => vec![],
            UiEvent::CallUpdated { call } => self.render_call(call),
            UiEvent::CallClosed => {
                self.last_phase = None;
                self.last_progress = 0;
                self.last_controls = (false, true);
                self.transcript_printed = 0;
                vec!["[call] Closed".to_string()]
            }
            UiEvent::LearningResources { resources } => {
                let mut lines = vec!["[resources] Learning Resources (/back to return)".to_string()];
                for r in resources {
                    lines.push(format!("  [{}] {}", r.icon, r.title));
                    lines.push(format!("      {}", r.description));
                }
                lines
            }
            UiEvent::LearningResourcesClosed => vec!["[resources] Closed".to_string()],
            UiEvent::Error { message } => vec![format!("! {message}")],
        }
    }

    fn render_message(&self, message: &Message) -> Vec<String> {
        let speaker = match message.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        let body = if message.content.is_rich() {
            strip_markup(message.text())
        } else {
            message.text().to_string()
        };

        let mut lines = vec![format!("{speaker}: {body}")];
        if message.offer_community_link {
            lines.push(format!("  Community: {}", self.community_url));
        }
        if message.offer_connect {
            lines.push("  Type /connect to talk with a preceptor".to_string());
        }
        lines
    }

    fn render_call(&mut self, call: &CallView) -> Vec<String> {
        let mut lines = Vec::new();
        let entered = self.last_phase != Some(call.phase);
        self.last_phase = Some(call.phase);

        match call.phase {
            CallPhase::Connecting => {
                if entered {
                    lines.push(format!("[call] {}", call.title));
                }
                if entered || call.progress != self.last_progress {
                    lines.push(format!("[call] {}% {}", call.progress, call.status_line));
                }
            }
            CallPhase::Live => {
                if entered {
                    lines.push(format!("[call] {}", call.title));
                    lines.push("[call] /mute /video /end".to_string());
                } else if (call.muted, call.video_enabled) != self.last_controls {
                    lines.push(format!(
                        "[call] mic {} | camera {}",
                        if call.muted { "off" } else { "on" },
                        if call.video_enabled { "on" } else { "off" },
                    ));
                }
            }
            CallPhase::Summary => {
                if entered {
                    lines.extend(render_summary(call));
                }
            }
            CallPhase::Closed => {}
        }
        self.last_progress = call.progress;
        self.last_controls = (call.muted, call.video_enabled);

        for line in call.transcript.iter().skip(self.transcript_printed) {
            lines.push(format!("[call] {} {}", line.speaker.label(), line.text));
        }
        self.transcript_printed = self.transcript_printed.max(call.transcript.len());

        lines
    }
}

fn render_summary(call: &CallView) -> Vec<String> {
    let mut lines = vec!["[call] Call Summary".to_string()];
    let Some(summary) = &call.summary else {
        return lines;
    };
    lines.push("  Key Points Discussed:".to_string());
    lines.extend(summary.key_points.iter().map(|p| format!("    - {p}")));
    lines.push("  Recommendations:".to_string());
    lines.extend(summary.recommendations.iter().map(|r| format!("    - {r}")));
    if !call.transcript.is_empty() {
        lines.push("  Call Transcript:".to_string());
        lines.extend(
            call.transcript
                .iter()
                .map(|l| format!("    {} {}", l.speaker.label(), l.text)),
        );
    }
    lines.push(format!("  Community: {}", summary.community_url));
    lines.push("  /resources for learning resources, /close to return to chat".to_string());
    lines
}

/// Drop `<...>` tags, keeping the text between them
fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
