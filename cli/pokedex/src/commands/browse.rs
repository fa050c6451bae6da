use anyhow::{Context, Result};
use bpaf::Bpaf;
use inquire::InquireError;
use pokedex_catalog::ClientTrait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::shell::{CommandParseError, HELP, Reply, Session, ShellCommand};
use crate::utils::dialog::{Dialog, Text};
use crate::utils::message;

// Browse the catalog interactively
#[derive(Debug, Bpaf, Clone)]
pub struct Browse {}

impl Browse {
    #[instrument(name = "browse", skip_all)]
    pub async fn handle(self, config: &Config, client: impl ClientTrait) -> Result<()> {
        let mut session = Session::new(client, config.page_size());
        let mut input = Input::detect();

        run_session(&mut session, &mut input).await?;

        info!("session ended");
        Ok(())
    }
}

/// Load the first page, then apply commands from `input` until it ends
/// or the user quits.
async fn run_session<C, R>(session: &mut Session<C>, input: &mut Input<R>) -> Result<()>
where
    C: ClientTrait,
    R: AsyncBufRead + Unpin,
{
    session.start().await;
    println!("{}", session.render());
    message::plain("Type 'help' for a list of commands.");

    while let Some(line) = input.next_line().await? {
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(CommandParseError::Empty) => continue,
            Err(err) => {
                message::error(err);
                continue;
            },
        };

        match session.execute(command).await {
            Reply::Screen => println!("{}", session.render()),
            Reply::Notice(notice) => {
                message::updated(notice);
                println!("{}", session.render());
            },
            Reply::Failed(err) => {
                message::error(err);
                println!("{}", session.render());
            },
            Reply::Help => message::plain(HELP),
            Reply::Quit => break,
        }
    }

    Ok(())
}

/// Where session commands are read from.
enum Input<R> {
    /// Interactive prompt on a terminal
    Prompt,
    /// One command per line, e.g. from a pipe
    Lines(Lines<R>),
}

impl Input<BufReader<Stdin>> {
    fn detect() -> Self {
        if Dialog::can_prompt() {
            Input::Prompt
        } else {
            debug!("not a terminal, reading commands from stdin");
            Input::Lines(BufReader::new(tokio::io::stdin()).lines())
        }
    }
}

impl<R: AsyncBufRead + Unpin> Input<R> {
    /// The next line of input, `None` once the user is done.
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            Input::Prompt => {
                let dialog = Dialog {
                    message: "pokedex",
                    typed: Text {
                        placeholder: Some("help".to_string()),
                    },
                };
                match dialog.prompt().await {
                    Ok(line) => Ok(Some(line)),
                    Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                        Ok(None)
                    },
                    Err(err) => Err(err).context("Could not read command"),
                }
            },
            Input::Lines(lines) => lines.next_line().await.context("Could not read command"),
        }
    }
}
