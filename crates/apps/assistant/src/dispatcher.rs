//! Phrase tables that turn chat messages into desktop commands.
//!
//! Matching is first-hit over flat tables, so table order decides between overlapping phrases.
//! Open-app phrases are checked before task phrases.

use desktop_app_contract::AppId;

/// Action requested by a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open (or focus) an app.
    OpenApp(AppId),
    /// Add a task with this text.
    CreateTask(String),
}

const OPEN_APP_PHRASES: [(AppId, &[&str]); 9] = [
    (
        AppId::Tasks,
        &[
            "open task",
            "open tasks",
            "open tasks app",
            "show task",
            "show tasks",
            "launch task",
            "start task",
            "open the task",
        ],
    ),
    (
        AppId::Notes,
        &[
            "open note",
            "open notes",
            "open notes app",
            "show note",
            "show notes",
            "launch note",
            "start note",
            "open the note",
        ],
    ),
    (
        AppId::Weather,
        &[
            "open weather",
            "show weather",
            "weather app",
            "launch weather",
            "open the weather",
        ],
    ),
    (
        AppId::Browser,
        &[
            "open browser",
            "open web",
            "show browser",
            "launch browser",
            "open the browser",
        ],
    ),
    (
        AppId::Bookmarks,
        &[
            "open bookmark",
            "open bookmarks",
            "show bookmark",
            "show bookmarks",
        ],
    ),
    (
        AppId::Google,
        &[
            "open google",
            "go to google",
            "show google",
            "launch google",
            "open the google",
        ],
    ),
    (
        AppId::Youtube,
        &[
            "open youtube",
            "go to youtube",
            "show youtube",
            "launch youtube",
            "open the youtube",
            "watch youtube",
        ],
    ),
    (
        AppId::Settings,
        &[
            "open setting",
            "open settings",
            "show setting",
            "show settings",
            "launch setting",
            "open the setting",
        ],
    ),
    (
        AppId::AiChat,
        &[
            "open ai",
            "open assistant",
            "open chat",
            "show ai",
            "show assistant",
        ],
    ),
];

const TASK_PHRASES: [&str; 13] = [
    "create task",
    "add task",
    "new task",
    "make a task",
    "add a task",
    "create a task",
    "task to",
    "remind me to",
    "remind me",
    "i need to",
    "i should",
    "i must",
    "i have to",
];

const FILLER_WORDS: [&str; 4] = ["to", "that", "about", "for"];

/// Detects a desktop command in a chat message.
pub fn detect_command(message: &str) -> Option<Command> {
    let original = message.trim();
    // ASCII folding keeps byte offsets aligned with `original`.
    let lower = original.to_ascii_lowercase();

    for (app_id, phrases) in OPEN_APP_PHRASES {
        if phrases.iter().any(|phrase| phrase_matches(&lower, phrase)) {
            return Some(Command::OpenApp(app_id));
        }
    }

    for phrase in TASK_PHRASES {
        let Some(index) = lower.find(phrase) else {
            continue;
        };
        let text = task_text(&original[index + phrase.len()..]);
        if !text.is_empty() {
            return Some(Command::CreateTask(text));
        }
    }

    None
}

/// Whole-phrase match: equal, leading, space-delimited inside, or trailing.
fn phrase_matches(message: &str, phrase: &str) -> bool {
    message == phrase
        || message.starts_with(&format!("{phrase} "))
        || message.contains(&format!(" {phrase} "))
        || message.ends_with(&format!(" {phrase}"))
}

fn task_text(remainder: &str) -> String {
    let mut text = remainder.trim();
    if let Some(rest) = strip_filler_word(text) {
        text = rest.trim();
    }
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    let text = text.strip_suffix(['"', '\'']).unwrap_or(text);
    text.trim().to_string()
}

/// Strips one leading filler word when whitespace follows it.
fn strip_filler_word(text: &str) -> Option<&str> {
    FILLER_WORDS.iter().find_map(|word| {
        let head = text.get(..word.len())?;
        let rest = &text[word.len()..];
        (head.eq_ignore_ascii_case(word) && rest.starts_with(char::is_whitespace))
            .then(|| rest.trim_start())
    })
}
