use veritas_core::{InputMode, Msg};

/// One line typed in the interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Submit(String),
    Mode(InputMode),
    New,
    History,
    Help,
    Quit,
    Unknown(String),
    Blank,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Blank;
    }
    let Some(name) = trimmed.strip_prefix(':') else {
        return Command::Submit(trimmed.to_string());
    };
    match name.trim().to_ascii_lowercase().as_str() {
        "text" => Command::Mode(InputMode::Text),
        "url" => Command::Mode(InputMode::Url),
        "new" | "reset" => Command::New,
        "history" | "recent" => Command::History,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

impl Command {
    /// Controller messages for this command; local commands map to none.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            Command::Submit(text) => vec![Msg::InputChanged(text), Msg::SubmitClicked],
            Command::Mode(mode) => vec![Msg::ModeSelected(mode)],
            Command::New => vec![Msg::ResetClicked],
            Command::History | Command::Help | Command::Quit | Command::Unknown(_) | Command::Blank => {
                Vec::new()
            }
        }
    }
}

pub const HELP: &str = "\
Type or paste a claim and press Enter to analyze it.
  :text      analyze pasted text (default)
  :url       analyze an article URL
  :new       cancel the current analysis and start over
  :history   show recent analyses
  :quit      leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_submit_trimmed_text() {
        assert_eq!(
            parse_command("  the claim  \n"),
            Command::Submit("the claim".to_string())
        );
        assert_eq!(
            parse_command("the claim").into_msgs(),
            vec![Msg::InputChanged("the claim".to_string()), Msg::SubmitClicked]
        );
    }

    #[test]
    fn colon_commands_are_case_insensitive() {
        assert_eq!(parse_command(":URL"), Command::Mode(InputMode::Url));
        assert_eq!(parse_command(":new"), Command::New);
        assert_eq!(parse_command(":Quit"), Command::Quit);
        assert_eq!(parse_command(":bogus"), Command::Unknown("bogus".to_string()));
        assert_eq!(parse_command("   "), Command::Blank);
    }

    #[test]
    fn reset_maps_to_controller_reset() {
        assert_eq!(Command::New.into_msgs(), vec![Msg::ResetClicked]);
        assert!(Command::History.into_msgs().is_empty());
    }
}
