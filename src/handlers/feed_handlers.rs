// src/handlers/feed_handlers.rs - terminal front end of the posts screen
use log::debug;
use thiserror::Error;

use crate::services::{PostFeedController, ScreenView, SubmitOutcome, SubmitRejection};

pub const HELP: &str = "commands: refresh | new | nick <text> | msg <text> | photo | discard | submit | cancel | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    New,
    Nickname(String),
    Message(String),
    Photo,
    Discard,
    Submit,
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Err(CommandError::Empty),
        "refresh" | "r" => Ok(Command::Refresh),
        "new" => Ok(Command::New),
        "nick" => Ok(Command::Nickname(rest.to_string())),
        "msg" => Ok(Command::Message(rest.to_string())),
        "photo" => Ok(Command::Photo),
        "discard" => Ok(Command::Discard),
        "submit" => Ok(Command::Submit),
        "cancel" => Ok(Command::Cancel),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Forwards one user intent to the controller.
pub async fn handle_command(controller: &PostFeedController, command: Command) -> Flow {
    match command {
        Command::Refresh => {
            controller
                .refresh(|| debug!("Refresh gesture completed"))
                .await
        }
        Command::New => controller.open_composer(),
        Command::Nickname(text) => controller.set_nickname(&text),
        Command::Message(text) => controller.set_message(&text),
        Command::Photo => controller.capture_photo().await,
        Command::Discard => controller.clear_captured_photo(),
        Command::Submit => match controller.submit_post().await {
            SubmitOutcome::Rejected(SubmitRejection::ComposerClosed) => {
                println!("open the composer with `new` first");
            }
            SubmitOutcome::Rejected(SubmitRejection::Missing(field)) => {
                println!("cannot submit yet, missing {:?}", field);
            }
            SubmitOutcome::Posted | SubmitOutcome::Failed => {}
        },
        Command::Cancel => controller.close_composer().await,
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Renders the feed as text cards, newest first, followed by the composer
/// when it is open.
pub fn render(view: &ScreenView) -> String {
    const RULE: &str = "+------------------------------------------\n";
    let mut out = String::new();

    if view.is_loading {
        out.push_str("... loading\n");
    }
    if view.posts.is_empty() {
        out.push_str("(no posts)\n");
    }
    for post in &view.posts {
        out.push_str(RULE);
        out.push_str(&format!(
            "| [image] {}\n| {}\n| {}\n",
            post.image.url, post.nickname, post.message
        ));
    }
    if !view.posts.is_empty() {
        out.push_str(RULE);
    }

    if let Some(draft) = &view.composer {
        let photo = if draft.captured_image.is_some() {
            "attached (`discard` to remove)"
        } else {
            "none (`photo` to take one)"
        };
        let submit = if view.can_submit { "ready" } else { "disabled" };
        out.push_str(&format!(
            "== new post ==\nnickname: {}\nmessage:  {}\nphoto:    {}\nsubmit:   {}\n",
            draft.nickname.as_deref().unwrap_or("-"),
            draft.message.as_deref().unwrap_or("-"),
            photo,
            submit
        ));
    }

    out
}
