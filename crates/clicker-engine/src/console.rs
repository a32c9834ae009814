//! Line-oriented operator controls.
//!
//! Each input line is one command. Commands map one-to-one onto
//! [`SessionHandle`] calls; the reply is printed to stdout while logs go
//! to stderr.
//!
//! Stdin is read on its own OS thread and forwarded over a channel. A
//! blocked read there never holds up runtime shutdown: the thread is
//! detached and dies with the process.
//!
//! | Command            | Effect                                   |
//! |--------------------|------------------------------------------|
//! | `click [n]`        | Trigger `n` manual actions (default 1)   |
//! | `buy <upgrade_id>` | Buy one level                            |
//! | `shop`             | Per-upgrade level, next cost, affordable |
//! | `status`           | One-line economy summary                 |
//! | `dump`             | Full snapshot as JSON                    |
//! | `reset`            | Discard all progress                     |
//! | `save`             | Write the save file now                  |
//! | `help`             | List commands                            |
//! | `quit`             | Stop the engine                          |

use std::io::BufRead;

use clicker_core::session::{SessionError, SessionHandle};
use clicker_types::EconomySnapshot;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Lines buffered between the stdin thread and the console task.
const LINE_CAPACITY: usize = 16;

/// Command summary printed by `help`.
pub const HELP: &str =
    "commands: click [n] | buy <upgrade_id> | shop | status | dump | reset | save | help | quit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Trigger manual actions.
    Click {
        /// How many actions to apply.
        count: u32,
    },
    /// Buy one level of an upgrade.
    Buy {
        /// The upgrade to buy.
        upgrade_id: String,
    },
    /// Show the shop.
    Shop,
    /// Show a one-line summary.
    Status,
    /// Print the snapshot as JSON.
    Dump,
    /// Reset the game.
    Reset,
    /// Flush to the store now.
    Save,
    /// Print the command list.
    Help,
    /// Stop the engine.
    Quit,
}

/// Errors for lines that are not valid commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a command.
    #[error("unknown command `{word}` (try `help`)")]
    Unknown {
        /// The unrecognized word.
        word: String,
    },

    /// A required argument is missing.
    #[error("`{command}` needs an argument")]
    MissingArgument {
        /// The command that needs it.
        command: &'static str,
    },

    /// The click count is not a positive integer.
    #[error("`{value}` is not a valid count")]
    InvalidCount {
        /// The rejected value.
        value: String,
    },
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    /// The operator typed `quit`.
    Quit,
    /// Input reached end of file.
    InputClosed,
    /// The session stopped underneath the console.
    SessionClosed,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "click" | "c" => {
            let count = match words.next() {
                None => 1,
                Some(value) => value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ParseError::InvalidCount {
                        value: value.to_owned(),
                    })?,
            };
            ConsoleCommand::Click { count }
        }
        "buy" | "b" => {
            let upgrade_id = words
                .next()
                .ok_or(ParseError::MissingArgument { command: "buy" })?;
            ConsoleCommand::Buy {
                upgrade_id: upgrade_id.to_owned(),
            }
        }
        "shop" => ConsoleCommand::Shop,
        "status" | "s" => ConsoleCommand::Status,
        "dump" => ConsoleCommand::Dump,
        "reset" => ConsoleCommand::Reset,
        "save" => ConsoleCommand::Save,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        _ => {
            return Err(ParseError::Unknown {
                word: word.to_owned(),
            });
        }
    };
    Ok(Some(command))
}

/// Run `command` against the session and render the reply.
///
/// Rejected purchases and failed saves are replies, not errors.
///
/// # Errors
///
/// Returns [`SessionError::Closed`] if the session has stopped.
pub async fn execute(session: &SessionHandle, command: ConsoleCommand) -> Result<String, SessionError> {
    match command {
        ConsoleCommand::Click { count } => {
            let mut gained: u64 = 0;
            let mut balance = 0;
            for _ in 0..count {
                let outcome = session.trigger_action().await?;
                gained = gained.saturating_add(outcome.gained);
                balance = outcome.balance;
            }
            Ok(format!("+{gained} cubes, balance {balance}"))
        }
        ConsoleCommand::Buy { upgrade_id } => match session.purchase_upgrade(&upgrade_id).await {
            Ok(bought) => Ok(format!(
                "bought {} level {} for {}, balance {} (+{}/action, +{}/tick)",
                bought.upgrade_id,
                bought.new_level,
                bought.cost_paid,
                bought.balance,
                bought.rates.per_action_yield,
                bought.rates.per_interval_yield,
            )),
            Err(SessionError::Purchase { source }) => Ok(format!("cannot buy: {source}")),
            Err(e) => Err(e),
        },
        ConsoleCommand::Shop => Ok(render_shop(&session.snapshot().await?)),
        ConsoleCommand::Status => Ok(render_status(&session.snapshot().await?)),
        ConsoleCommand::Dump => {
            let snapshot = session.snapshot().await?;
            Ok(serde_json::to_string_pretty(&snapshot)
                .unwrap_or_else(|e| format!("cannot encode snapshot: {e}")))
        }
        ConsoleCommand::Reset => {
            let snapshot = session.reset_game().await?;
            Ok(format!("progress reset, {}", render_status(&snapshot)))
        }
        ConsoleCommand::Save => match session.flush().await {
            Ok(()) => Ok("saved".to_owned()),
            Err(SessionError::Store { source }) => Ok(format!("save failed: {source}")),
            Err(e) => Err(e),
        },
        ConsoleCommand::Help => Ok(HELP.to_owned()),
        ConsoleCommand::Quit => Ok("stopping".to_owned()),
    }
}

/// Start reading stdin on a detached thread. The receiver yields one
/// entry per line and closes at end of input.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (lines, receiver) = mpsc::channel(LINE_CAPACITY);
    let spawned = std::thread::Builder::new()
        .name("console-stdin".to_owned())
        .spawn(move || forward_lines(std::io::stdin().lock(), &lines));
    if let Err(e) = spawned {
        // The sender was moved into the failed closure and is gone, so the
        // console sees closed input.
        warn!(error = %e, "Failed to start console reader");
    }
    receiver
}

/// Send each line of `input` to `lines` until end of input, a read error,
/// or the receiver going away. Blocks the calling thread.
fn forward_lines<R: BufRead>(input: R, lines: &mpsc::Sender<String>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read console input");
                return;
            }
        };
        if lines.blocking_send(line).is_err() {
            return;
        }
    }
}

/// Run commands from `lines` until `quit`, end of input, or the session
/// stops.
pub async fn run(session: SessionHandle, mut lines: mpsc::Receiver<String>) -> ConsoleExit {
    loop {
        let Some(line) = lines.recv().await else {
            debug!("Console input closed");
            return ConsoleExit::InputClosed;
        };

        let command = match parse(&line) {
            Ok(Some(ConsoleCommand::Quit)) => return ConsoleExit::Quit,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match execute(&session, command).await {
            Ok(reply) => println!("{reply}"),
            Err(e) => {
                warn!(error = %e, "Console lost its session");
                return ConsoleExit::SessionClosed;
            }
        }
    }
}

/// One-line summary of `snapshot`.
pub fn render_status(snapshot: &EconomySnapshot) -> String {
    format!(
        "balance {} | lifetime {} | +{}/action | +{}/tick | playtime {}s",
        snapshot.balance,
        snapshot.lifetime_earned,
        snapshot.derived_rates.per_action_yield,
        snapshot.derived_rates.per_interval_yield,
        snapshot.playtime_seconds,
    )
}

fn render_shop(snapshot: &EconomySnapshot) -> String {
    snapshot
        .upgrades
        .iter()
        .map(|upgrade| {
            let next = upgrade
                .next_cost
                .map_or_else(|| "MAX".to_owned(), |cost| cost.to_string());
            let marker = if upgrade.affordable { " *" } else { "" };
            format!(
                "{:<14} {} {:<20} lvl {}/{}  next {}{}",
                upgrade.id, upgrade.kind, upgrade.name, upgrade.level, upgrade.max_level, next, marker,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use clicker_core::config::SessionConfig;
    use clicker_core::game::Game;
    use clicker_core::session::spawn_session;
    use clicker_economy::UpgradeCatalog;
    use clicker_store::MemoryStore;

    use super::*;

    /// A closed channel preloaded with `input`, one entry per line.
    fn feed(input: &str) -> mpsc::Receiver<String> {
        let (lines, receiver) = mpsc::channel(LINE_CAPACITY);
        for line in input.lines() {
            lines.try_send(line.to_owned()).unwrap();
        }
        receiver
    }

    fn start() -> SessionHandle {
        let game = Game::new(Arc::new(UpgradeCatalog::builtin()));
        let (session, _task) = spawn_session(game, MemoryStore::new(), &SessionConfig::default());
        session
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse("click").unwrap(), Some(ConsoleCommand::Click { count: 1 }));
        assert_eq!(parse("  c 25 ").unwrap(), Some(ConsoleCommand::Click { count: 25 }));
        assert_eq!(
            parse("buy upgrade1_cpc").unwrap(),
            Some(ConsoleCommand::Buy {
                upgrade_id: "upgrade1_cpc".to_owned()
            })
        );
        assert_eq!(parse("QUIT").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(
            parse("dance").unwrap_err(),
            ParseError::Unknown {
                word: "dance".to_owned()
            }
        );
        assert_eq!(
            parse("buy").unwrap_err(),
            ParseError::MissingArgument { command: "buy" }
        );
        assert!(matches!(parse("click 0"), Err(ParseError::InvalidCount { .. })));
        assert!(matches!(parse("click -3"), Err(ParseError::InvalidCount { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn click_then_buy() {
        let session = start();
        let reply = execute(&session, ConsoleCommand::Click { count: 10 }).await.unwrap();
        assert_eq!(reply, "+10 cubes, balance 10");

        let reply = execute(
            &session,
            ConsoleCommand::Buy {
                upgrade_id: "upgrade1_cpc".to_owned(),
            },
        )
        .await
        .unwrap();
        assert!(reply.starts_with("bought upgrade1_cpc level 1 for 10, balance 0"));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_purchase_is_a_reply() {
        let session = start();
        let reply = execute(
            &session,
            ConsoleCommand::Buy {
                upgrade_id: "upgrade2_cps".to_owned(),
            },
        )
        .await
        .unwrap();
        assert!(reply.starts_with("cannot buy:"));
    }

    #[tokio::test(start_paused = true)]
    async fn shop_lists_every_upgrade() {
        let session = start();
        let shop = execute(&session, ConsoleCommand::Shop).await.unwrap();
        assert_eq!(shop.lines().count(), 4);
        assert!(shop.lines().next().unwrap().starts_with("upgrade1_cpc"));
    }

    #[tokio::test(start_paused = true)]
    async fn dump_is_camel_case_json() {
        let session = start();
        let dump = execute(&session, ConsoleCommand::Dump).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(value["lifetimeEarned"], 0);
        assert_eq!(value["derivedRates"]["perActionYield"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_quit() {
        let session = start();
        let exit = run(session.clone(), feed("click\n\nnonsense\nclick 2\nquit\nclick\n")).await;
        assert_eq!(exit, ConsoleExit::Quit);
        assert_eq!(session.snapshot().await.unwrap().balance, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn run_reports_closed_input() {
        let session = start();
        let exit = run(session.clone(), feed("click\n")).await;
        assert_eq!(exit, ConsoleExit::InputClosed);
        assert_eq!(session.snapshot().await.unwrap().balance, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_notices_stopped_session() {
        let session = start();
        session.shutdown().await.unwrap();
        let exit = run(session, feed("status\n")).await;
        assert_eq!(exit, ConsoleExit::SessionClosed);
    }

    #[test]
    fn forwards_every_line_then_closes() {
        let (lines, mut receiver) = mpsc::channel(LINE_CAPACITY);
        forward_lines(std::io::Cursor::new("click\nbuy upgrade1_cpc\n"), &lines);
        drop(lines);
        assert_eq!(receiver.blocking_recv().as_deref(), Some("click"));
        assert_eq!(receiver.blocking_recv().as_deref(), Some("buy upgrade1_cpc"));
        assert_eq!(receiver.blocking_recv(), None);
    }

    #[test]
    fn reader_stops_when_console_is_gone() {
        let (lines, receiver) = mpsc::channel(1);
        drop(receiver);
        // Returns instead of blocking on a full or closed channel.
        forward_lines(std::io::Cursor::new("click\nclick\nclick\n"), &lines);
        assert!(lines.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn run_returns_while_input_is_still_open() {
        let session = start();
        let (lines, receiver) = mpsc::channel(LINE_CAPACITY);
        lines.send("quit".to_owned()).await.unwrap();
        // The sender stays open, as the stdin thread's does while it waits
        // on a read.
        let exit = run(session, receiver).await;
        assert_eq!(exit, ConsoleExit::Quit);
        // The reader's next send fails, so its thread exits.
        assert!(lines.is_closed());
    }
}
