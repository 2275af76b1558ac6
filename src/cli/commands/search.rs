//! Search commands: one-shot search and the interactive shell.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;

use crate::context::AppContext;
use crate::preview::{Completion, Completions, CpalBackend, PlaybackState, PreviewController};
use crate::search::{SearchAggregator, SearchLimits, SearchState, search_all};
use crate::views::SearchView;

/// Search all three categories once, without debouncing
pub fn cmd_search(rt: &Runtime, ctx: &AppContext, query: &str) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Search query is empty");
    }

    let limits = SearchLimits::from(&ctx.config.search);
    let outcome = rt.block_on(search_all(ctx.api.as_ref(), query, limits));
    if outcome.all_failed() {
        ctx.notifier.error(
            "Search failed",
            "Unable to search at the moment. Please try again.",
        );
    }

    let state = SearchState {
        query: query.to_string(),
        generation: 1,
        loading: false,
        failed: outcome.failures.iter().map(|(kind, _)| *kind).collect(),
        results: outcome.response,
    };
    print!("{}", SearchView::new(&state, None));
    Ok(())
}

/// One line typed into the shell.
#[derive(Debug, PartialEq, Eq)]
enum ShellInput {
    /// New contents of the search box
    Query(String),
    /// Toggle the preview of the Nth track row
    Play(usize),
    Quit,
    Help,
    Unknown(String),
}

impl ShellInput {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return ShellInput::Query(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("quit" | "q"), None, None) => ShellInput::Quit,
            (Some("help"), None, None) => ShellInput::Help,
            (Some("play" | "p"), Some(n), None) => match n.parse() {
                Ok(n) if n > 0 => ShellInput::Play(n),
                _ => ShellInput::Unknown(trimmed.to_string()),
            },
            _ => ShellInput::Unknown(trimmed.to_string()),
        }
    }
}

const SHELL_HELP: &str = "Type to search. /play N toggles the preview of track N, /quit exits.";

/// Interactive debounced search with preview playback
pub fn cmd_shell(rt: &Runtime, ctx: &AppContext) -> anyhow::Result<()> {
    rt.block_on(async {
        let session = SearchAggregator::new(ctx.api.clone(), &ctx.config.search)
            .with_notifier(ctx.notifier.clone())
            .spawn();
        let mut updates = session.subscribe();

        // The backend owns the output stream and has to stay on this task
        let (mut preview, mut completions) =
            match CpalBackend::new(&ctx.config.audio, ctx.api.http().clone()) {
                Ok(backend) => {
                    let (controller, completions) = PreviewController::new(backend);
                    (Some(controller), Some(completions))
                }
                Err(e) => {
                    tracing::warn!("Preview playback unavailable: {}", e);
                    eprintln!("Preview playback unavailable: {e}");
                    (None, None)
                }
            };

        println!("{SHELL_HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    // Leave through the cleanup below, even on a read error
                    let Some(line) = shell_line(line) else { break };
                    match ShellInput::parse(&line) {
                        ShellInput::Query(text) => session.set_query(text),
                        ShellInput::Play(number) => {
                            let state = session.state();
                            let track = SearchView::new(&state, None).track(number).cloned();
                            match (track, preview.as_mut()) {
                                (None, _) => println!("No track {number} in the current results"),
                                (Some(track), _) if !track.has_preview() => {
                                    println!("No preview available for {}", track.name);
                                }
                                (Some(_), None) => println!("Preview playback unavailable"),
                                (Some(track), Some(controller)) => match controller.toggle(&track) {
                                    Ok(PlaybackState::Playing(_)) => {
                                        println!("▶ {} - {}", track.name, track.artist_names());
                                    }
                                    Ok(PlaybackState::Idle) => println!("Paused {}", track.name),
                                    Err(e) => {
                                        ctx.notifier.error("Preview unavailable", e.to_string());
                                    }
                                },
                            }
                        }
                        ShellInput::Quit => break,
                        ShellInput::Help => println!("{SHELL_HELP}"),
                        ShellInput::Unknown(input) => println!("Unknown command: {input}"),
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    let playing = preview.as_ref().and_then(|p| p.currently_playing());
                    print!("{}", SearchView::new(&state, playing));
                }
                Some(done) = next_completion(&mut completions) => {
                    if let Some(controller) = preview.as_mut()
                        && controller.handle_completion(&done)
                    {
                        println!("Preview finished");
                    }
                }
            }
            super::print_notifications(ctx);
        }

        if let Some(controller) = preview.as_mut() {
            controller.stop();
        }
        session.shutdown().await;
        Ok::<_, anyhow::Error>(())
    })
}

/// The next stdin line, or `None` when the shell should exit.
fn shell_line(read: std::io::Result<Option<String>>) -> Option<String> {
    match read {
        Ok(line) => line,
        Err(e) => {
            tracing::error!("Failed to read input: {}", e);
            eprintln!("Failed to read input: {e}");
            None
        }
    }
}

async fn next_completion(completions: &mut Option<Completions>) -> Option<Completion> {
    match completions {
        Some(completions) => completions.next().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_queries() {
        assert_eq!(ShellInput::parse("Rahman"), ShellInput::Query("Rahman".into()));
        assert_eq!(ShellInput::parse("  "), ShellInput::Query("  ".into()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(ShellInput::parse("/play 3"), ShellInput::Play(3));
        assert_eq!(ShellInput::parse(" /p 1 "), ShellInput::Play(1));
        assert_eq!(ShellInput::parse("/quit"), ShellInput::Quit);
        assert_eq!(ShellInput::parse("/help"), ShellInput::Help);
        assert_eq!(ShellInput::parse("/play 0"), ShellInput::Unknown("/play 0".into()));
        assert_eq!(ShellInput::parse("/play x"), ShellInput::Unknown("/play x".into()));
        assert_eq!(ShellInput::parse("/volume"), ShellInput::Unknown("/volume".into()));
    }

    #[test]
    fn test_read_error_ends_shell_like_eof() {
        assert_eq!(shell_line(Ok(Some("Arijit".into()))), Some("Arijit".into()));
        assert_eq!(shell_line(Ok(None)), None);

        let invalid = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        );
        assert_eq!(shell_line(Err(invalid)), None);
    }

    #[tokio::test]
    async fn test_completions_pending_without_playback() {
        let mut none = None;
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            next_completion(&mut none),
        )
        .await;
        assert!(waited.is_err());
    }
}
