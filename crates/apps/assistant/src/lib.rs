//! AI assistant app: persisted chat transcript, the phrase-table command dispatcher, and the
//! relay client that forwards conversations to the chat relay server.
//!
//! Desktop side effects go through [`desktop_app_contract::DesktopHost`], so the assistant never
//! touches the window manager or the task list directly.

pub mod client;
pub mod dispatcher;
pub mod session;
pub mod transcript;

pub use client::{HttpRelayClient, RelayClient, RelayClientError, RelayFuture};
pub use dispatcher::{detect_command, Command};
pub use session::{ChatSession, ChatTurn, SYSTEM_PROMPT};
pub use transcript::{ChatMessage, Transcript, TRANSCRIPT_LIMIT};

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use chat_relay_contract::WireMessage;
    use desktop_app_contract::{AppId, WindowKey};
    use desktop_runtime::{Desktop, WindowRect};
    use futures::executor::block_on;
    use platform_host::StorageFacade;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Offline;

    impl RelayClient for Offline {
        fn complete<'a>(
            &'a self,
            _messages: &'a [WireMessage],
        ) -> RelayFuture<'a, Result<String, RelayClientError>> {
            Box::pin(async { Err(RelayClientError::Network("offline".to_string())) })
        }
    }

    #[test]
    fn chat_commands_drive_the_real_desktop() {
        let storage = StorageFacade::in_memory();
        let now = Rc::new(Cell::new(1_000));
        let clock_now = now.clone();
        let mut desktop = Desktop::with_clock(
            storage.clone(),
            WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 800,
            },
            Rc::new(move || clock_now.get()),
        );
        let mut chat = ChatSession::new(Transcript::load(storage), Offline);

        block_on(chat.send(&mut desktop, "open the weather app", 1_000));
        let front = desktop.windows().front_most().unwrap();
        assert_eq!(front.key.as_str(), "weather");

        let turn = block_on(chat.send(&mut desktop, "create a task to buy milk", 1_100)).unwrap();
        assert_eq!(turn.command, Some(Command::CreateTask("buy milk".to_string())));
        assert_eq!(desktop.tasks().tasks()[0].text, "buy milk");
        assert!(desktop
            .windows()
            .is_open(&WindowKey::for_app(AppId::Tasks)));
        assert_eq!(chat.transcript().messages().len(), 4);
    }

    #[test]
    fn cleared_history_stays_gone_after_the_next_message() {
        let storage = StorageFacade::in_memory();
        let mut desktop = Desktop::new(
            storage.clone(),
            WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 800,
            },
        );
        let mut chat = ChatSession::new(Transcript::load(storage.clone()), Offline);
        block_on(chat.send(&mut desktop, "secret one", 1));

        assert!(desktop.clear_all_data());
        chat.reload_history();
        block_on(chat.send(&mut desktop, "hello", 2));

        let reloaded = Transcript::load(storage);
        assert_eq!(reloaded.messages().len(), 2);
        assert_eq!(reloaded.messages()[0].content, "hello");
        assert!(reloaded
            .messages()
            .iter()
            .all(|message| message.content != "secret one"));
    }
}
