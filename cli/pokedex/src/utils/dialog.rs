use crossterm::tty::IsTty;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use super::TERMINAL_STDERR;

/// Environment variable that disables interactive prompts when set to `1`.
pub const NO_PROMPT_VAR: &str = "_POKEDEX_NO_PROMPT";

/// A free text prompt, e.g. the command line of the browser session.
#[derive(Debug, Clone, Default)]
pub struct Text {
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dialog<'a, Type> {
    pub message: &'a str,
    pub typed: Type,
}

impl Dialog<'_, Text> {
    pub async fn prompt(self) -> inquire::error::InquireResult<String> {
        let message = self.message.to_owned();
        let placeholder = self.typed.placeholder;

        tokio::task::spawn_blocking(move || {
            let _stderr_lock = TERMINAL_STDERR.lock();

            let mut dialog = inquire::Text::new(&message).with_render_config(pokedex_theme());

            if let Some(ref placeholder) = placeholder {
                dialog = dialog.with_placeholder(placeholder);
            }

            dialog.prompt()
        })
        .await
        .map_err(|err| inquire::InquireError::Custom(Box::new(err)))?
    }
}

impl Dialog<'_, ()> {
    /// True if stderr, stdin and stdout are ttys
    pub fn can_prompt() -> bool {
        if std::env::var(NO_PROMPT_VAR).is_ok_and(|v| v == "1") {
            return false;
        }
        std::io::stderr().is_tty() && std::io::stdin().is_tty() && std::io::stdout().is_tty()
    }
}

pub fn pokedex_theme() -> RenderConfig<'static> {
    let mut render_config = RenderConfig::default_colored();

    let accent = Color::LightRed;
    render_config.answered_prompt_prefix = Styled::new(">").with_fg(accent);
    render_config.prompt_prefix = Styled::new(">").with_fg(accent);
    render_config.prompt = StyleSheet::new().with_attr(Attributes::BOLD);
    render_config.help_message = Styled::new("").with_fg(Color::DarkGrey).style;
    render_config.answer = Styled::new("").with_fg(accent).style;

    render_config
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn prompting_can_be_disabled() {
        temp_env::with_var(NO_PROMPT_VAR, Some("1"), || {
            assert!(!Dialog::can_prompt());
        });
    }

    #[test]
    fn theme_outlives_the_prompt() {
        let theme: RenderConfig<'static> = pokedex_theme();
        assert_eq!(theme.prompt_prefix.content, ">");
        assert_eq!(theme.answered_prompt_prefix.content, ">");
    }

    #[test]
    fn text_dialog_is_a_message_and_a_placeholder() {
        let dialog = Dialog {
            message: "pokedex",
            typed: Text {
                placeholder: Some("help".to_string()),
            },
        };
        assert_eq!(dialog.message, "pokedex");
        assert_eq!(dialog.typed.placeholder.as_deref(), Some("help"));
    }
}
