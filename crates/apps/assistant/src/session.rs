//! One chat turn: command detection, desktop side effects, and the relay round trip.

use chat_relay_contract::{ChatRole, ErrorKind, WireMessage};
use desktop_app_contract::{AppId, DesktopHost};

use crate::{
    client::{RelayClient, RelayClientError},
    dispatcher::{detect_command, Command},
    transcript::{ChatMessage, Transcript},
};

/// Transcript messages sent to the relay as context.
pub const CONTEXT_MESSAGES: usize = 10;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for AegisDesk, an AI-powered desktop operating system. You can help users:
- Open applications (tasks, notes, weather, browser, settings, youtube, google)
- Create tasks in the tasks app
- Answer questions and provide information
- Navigate to websites
- Provide general assistance

When a user asks to open an app or create a task, the system will handle it automatically. You should respond naturally and confirm the action.

Be conversational, helpful, and concise. Keep responses brief and friendly.";

const CONFIGURATION_REPLY: &str = "⚠️ **Server Configuration Required**

This AI Assistant requires server-side configuration.

The administrator needs to:
1. Set the OPENAI_API_KEY environment variable on the server
2. Deploy the chat relay

If you're the administrator, check your deployment platform's environment variables settings.";

/// Result of [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// Command detected in the message, if any.
    pub command: Option<Command>,
    /// Status line shown after the command ran (`✓ Opening Notes...`).
    pub confirmation: Option<String>,
    /// Assistant message appended to the transcript.
    pub reply: ChatMessage,
}

pub struct ChatSession<C> {
    transcript: Transcript,
    client: C,
}

impl<C: RelayClient> ChatSession<C> {
    pub fn new(transcript: Transcript, client: C) -> Self {
        Self { transcript, client }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn clear_history(&mut self) {
        self.transcript.clear();
    }

    /// Re-reads the transcript from storage, after the desktop cleared all data.
    pub fn reload_history(&mut self) {
        self.transcript.reload();
    }

    /// Handles a message typed into the chat box.
    ///
    /// Returns `None` for blank input. Relay failures never surface as errors: they become an
    /// assistant reply so the transcript always records an answer.
    pub async fn send<H: DesktopHost + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
        now_ms: u64,
    ) -> Option<ChatTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut context = vec![WireMessage::new(ChatRole::System, SYSTEM_PROMPT)];
        context.extend(self.transcript.recent(CONTEXT_MESSAGES));
        context.push(WireMessage::new(ChatRole::User, text));
        self.transcript
            .push(ChatMessage::new(ChatRole::User, text, now_ms));

        let command = detect_command(text);
        let confirmation = command.as_ref().and_then(|cmd| run_command(host, cmd));

        let content = match self.client.complete(&context).await {
            Ok(reply) => reply,
            Err(err) => {
                log::warn!("assistant relay call failed: {err}");
                match &command {
                    Some(cmd) => command_fallback(cmd),
                    None => error_reply(&err),
                }
            }
        };

        let reply = ChatMessage::new(ChatRole::Assistant, content, now_ms);
        self.transcript.push(reply.clone());
        Some(ChatTurn {
            command,
            confirmation,
            reply,
        })
    }
}

fn run_command<H: DesktopHost + ?Sized>(host: &mut H, command: &Command) -> Option<String> {
    match command {
        Command::OpenApp(app_id) => match host.open_app(*app_id) {
            Ok(_) => Some(format!("✓ Opening {}...", app_id.title())),
            Err(err) => {
                log::warn!("assistant could not open {app_id}: {err}");
                None
            }
        },
        Command::CreateTask(text) => match host.create_task(text) {
            Ok(()) => Some(format!("✓ Task created: \"{text}\"")),
            Err(err) => {
                log::warn!("assistant could not create task: {err}");
                None
            }
        },
    }
}

fn command_fallback(command: &Command) -> String {
    match command {
        Command::OpenApp(app_id) => format!("I've opened the {app_id} app for you!"),
        Command::CreateTask(text) => {
            format!("I've created a task: \"{text}\". Check your {} app!", AppId::Tasks.title())
        }
    }
}

fn error_reply(err: &RelayClientError) -> String {
    match err.kind() {
        Some(ErrorKind::Configuration) => CONFIGURATION_REPLY.to_string(),
        Some(ErrorKind::Authentication) => {
            "Sorry, I encountered an error: Authentication failed. Please check server configuration."
                .to_string()
        }
        Some(ErrorKind::RateLimited) => {
            "Sorry, I encountered an error: Rate limit exceeded. Please try again in a moment."
                .to_string()
        }
        Some(ErrorKind::Transport) => {
            "Sorry, I encountered an error: Network error. Please check your internet connection."
                .to_string()
        }
        _ => format!("Sorry, I encountered an error: {err}"),
    }
}
