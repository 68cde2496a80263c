//! Slash commands accepted at the prompt.

/// Parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send to the assistant.
    Send(String),
    /// Start a fresh conversation.
    Clear,
    /// List the quick actions on offer.
    Actions,
    /// Send quick action `n` (1-based).
    Action(usize),
    /// Show quick-reply suggestions.
    Suggest,
    /// Rename the signed-in user.
    Name(String),
    /// Forget the stored login.
    Logout,
    /// Print the context sent with messages.
    Context,
    /// Leave the prompt.
    Quit,
}

/// Parse one prompt line; blank lines yield `Ok(None)`.
pub fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Some(Command::Send(trimmed.to_string())));
    };
    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };
    match name.to_lowercase().as_str() {
        "clear" => Ok(Some(Command::Clear)),
        "actions" => Ok(Some(Command::Actions)),
        "action" => {
            let index = argument
                .parse::<usize>()
                .ok()
                .filter(|index| *index > 0)
                .ok_or_else(|| "usage: /action <number>".to_string())?;
            Ok(Some(Command::Action(index)))
        }
        "suggest" => Ok(Some(Command::Suggest)),
        "name" => {
            if argument.is_empty() {
                return Err("usage: /name <new name>".to_string());
            }
            Ok(Some(Command::Name(argument.to_string())))
        }
        "logout" => Ok(Some(Command::Logout)),
        "context" => Ok(Some(Command::Context)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        _ => Err(format!("unknown command: /{name}")),
    }
}
