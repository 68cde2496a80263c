//! Line-oriented chat loop over stdin.

use crate::command::{Command, parse_command};
use anyhow::Context;
use learnchat_client::AuthClient;
use learnchat_core::{ChatWidget, EventBus, format_time};
use learnchat_protocol::{ChatMessage, Sender, WidgetEvent};
use learnchat_store::AuthSession;
use log::{debug, warn};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Drives a [`ChatWidget`] from terminal input.
pub struct Repl {
    widget: Arc<ChatWidget>,
    session: AuthSession,
    auth: AuthClient,
    events: EventBus,
}

impl Repl {
    pub fn new(
        widget: Arc<ChatWidget>,
        session: AuthSession,
        auth: AuthClient,
        events: EventBus,
    ) -> Self {
        Self {
            widget,
            session,
            auth,
            events,
        }
    }

    /// Run until `/quit` or end of input.
    pub async fn run(self) -> anyhow::Result<()> {
        let indicator = spawn_indicator(&self.events);
        self.widget.open();
        self.widget.refresh_context().await;

        for message in self.widget.messages() {
            print_message(&message);
        }
        self.print_quick_actions();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt()?;
            let Some(line) = lines.next_line().await.context("failed to read input")? else {
                break;
            };
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.handle(command).await,
                Err(err) => println!("{err}"),
            }
        }

        self.widget.close();
        indicator.abort();
        debug!("chat loop finished");
        Ok(())
    }

    async fn handle(&self, command: Command) {
        match command {
            Command::Send(text) => {
                self.widget.set_input(text);
                self.send().await;
            }
            Command::Clear => {
                self.widget.clear_chat();
                for message in self.widget.messages() {
                    print_message(&message);
                }
                self.print_quick_actions();
            }
            Command::Actions => self.print_quick_actions(),
            Command::Action(number) => match self.widget.apply_quick_action(number - 1) {
                Ok(label) => {
                    println!("> {label}");
                    self.send().await;
                }
                Err(err) => println!("{err}"),
            },
            Command::Suggest => {
                let suggestions = self.widget.suggestions().await;
                for item in suggestions.items {
                    println!("  * {item}");
                }
            }
            Command::Name(name) => match self.auth.update_profile(&name).await {
                Ok(_) => {
                    println!("Profile updated.");
                    self.widget.set_user(self.session.current_user()).await;
                }
                Err(err) => println!("{err}"),
            },
            Command::Logout => {
                if let Err(err) = self.session.logout() {
                    warn!("failed to clear login: {err}");
                }
                self.widget.set_user(None).await;
                println!("Logged out.");
            }
            Command::Context => println!("{}", self.widget.context()),
            Command::Quit => {}
        }
    }

    async fn send(&self) {
        match self.widget.send_message().await {
            Ok(reply) => print_message(&reply),
            Err(err) => println!("{err}"),
        }
        self.print_quick_actions();
    }

    fn print_quick_actions(&self) {
        let actions = self.widget.quick_actions();
        if actions.is_empty() {
            return;
        }
        println!("Quick actions (use /action N):");
        for (index, label) in actions.iter().enumerate() {
            println!("  {}. {label}", index + 1);
        }
    }
}

fn prompt() -> anyhow::Result<()> {
    print!("> ");
    std::io::stdout().flush().context("failed to flush stdout")
}

fn print_message(message: &ChatMessage) {
    let author = match (message.sender, message.is_error) {
        (Sender::User, _) => "You",
        (Sender::Bot, false) => "Assistant",
        (Sender::Bot, true) => "Assistant (error)",
    };
    println!(
        "[{}] {author}: {}",
        format_time(&message.timestamp.to_rfc3339()),
        message.text
    );
}

/// Print the typing indicator and notices as the widget emits them.
fn spawn_indicator(events: &EventBus) -> JoinHandle<()> {
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(WidgetEvent::TypingChanged(true)) => println!("Assistant is typing..."),
                Ok(WidgetEvent::Notice(notice)) => println!("({notice})"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!("event indicator lagged (skipped={skipped})");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
