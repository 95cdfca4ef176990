//! CommandDispatcher - translates operator commands into registry operations

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use contracts::{
    ContextId, Destination, LineBuffer, Notice, Notifier, PasteError, SourceLoader,
};
use tracing::{debug, instrument, warn};

use crate::paster::Paster;

/// One parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Paste a file, optionally with its own delay
    Paste {
        path: PathBuf,
        delay: Option<Duration>,
    },
    Stop,
    Resume,
    Cancel,
    Status,
    Help,
}

impl Command {
    /// Parse `action [args...]`
    ///
    /// # Errors
    /// `Usage` for missing/extra arguments, `UnknownCommand` for an unknown
    /// action, `InvalidDelay` for a malformed delay.
    pub fn parse(input: &str) -> Result<Self, PasteError> {
        let mut words = input.split_whitespace();
        let action = words
            .next()
            .ok_or_else(|| PasteError::usage("no parameters"))?;

        let command = match action {
            "paste" => {
                let path = words
                    .next()
                    .ok_or_else(|| PasteError::usage("no filename"))?;
                let delay = words.next().map(parse_delay).transpose()?;
                Command::Paste {
                    path: PathBuf::from(path),
                    delay,
                }
            }
            "stop" => Command::Stop,
            "resume" => Command::Resume,
            "cancel" => Command::Cancel,
            "status" => Command::Status,
            "help" => Command::Help,
            other => {
                return Err(PasteError::UnknownCommand {
                    action: other.to_string(),
                })
            }
        };

        if let Some(extra) = words.next() {
            return Err(PasteError::usage(format!("unexpected argument: {extra}")));
        }
        Ok(command)
    }
}

/// Parse an operator-supplied delay in milliseconds
///
/// # Errors
/// `InvalidDelay` when `s` is not an integer or not positive.
pub fn parse_delay(s: &str) -> Result<Duration, PasteError> {
    let ms: i64 = s
        .parse()
        .map_err(|_| PasteError::invalid_delay(format!("invalid delay: {s}")))?;
    if ms <= 0 {
        return Err(PasteError::invalid_delay("delay must be positive"));
    }
    Ok(Duration::from_millis(ms as u64))
}

/// Front door for every command.
///
/// The caller supplies the issuing context and the destination that context
/// currently targets; the dispatcher never infers either. Each dispatched
/// command produces exactly one notice to the issuing context.
pub struct CommandDispatcher<D, N, L> {
    paster: Arc<Paster<D, N>>,
    loader: L,
}

impl<D, N, L> CommandDispatcher<D, N, L>
where
    D: Destination + Clone + Sync + 'static,
    N: Notifier,
    L: SourceLoader,
{
    pub fn new(paster: Arc<Paster<D, N>>, loader: L) -> Self {
        Self { paster, loader }
    }

    pub fn paster(&self) -> &Arc<Paster<D, N>> {
        &self.paster
    }

    /// Parse, execute and report `input`
    ///
    /// Returns the notice that was sent to `context`.
    #[instrument(name = "command_dispatch", skip(self, destination), fields(destination = %destination.id(), context = %context))]
    pub async fn dispatch(&self, context: &ContextId, destination: &D, input: &str) -> Notice {
        let result = match Command::parse(input) {
            Ok(command) => self.execute(context, destination, command).await,
            Err(e) => Err(e),
        };

        let notice = match result {
            Ok(notice) => notice,
            Err(e) => {
                debug!(error = %e, "Command rejected");
                Notice::Rejected {
                    message: e.to_string(),
                }
            }
        };

        self.paster.notifier().notify(context, &notice);
        notice
    }

    /// Execute an already-parsed command without reporting it
    pub async fn execute(
        &self,
        context: &ContextId,
        destination: &D,
        command: Command,
    ) -> Result<Notice, PasteError> {
        match command {
            Command::Paste { path, delay } => self.paste(context, destination, &path, delay).await,
            Command::Stop => self.paster.stop(destination.id()),
            Command::Resume => self.paster.resume(context, destination.id()),
            Command::Cancel => self.paster.cancel(destination.id()),
            Command::Status => Ok(Notice::Status {
                jobs: self.paster.status(),
            }),
            Command::Help => Ok(Notice::Usage),
        }
    }

    /// Load the whole source, then start the job; nothing is registered if
    /// loading fails.
    async fn paste(
        &self,
        context: &ContextId,
        destination: &D,
        path: &Path,
        delay: Option<Duration>,
    ) -> Result<Notice, PasteError> {
        let settings = self.paster.settings();

        let delay = match delay {
            Some(delay) if delay < Duration::from_millis(settings.min_delay_ms) => {
                return Err(PasteError::invalid_delay(format!(
                    "delay must be at least {}ms",
                    settings.min_delay_ms
                )));
            }
            Some(delay) => delay,
            None => settings.default_delay(),
        };

        let text = self.loader.load(path).await.inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "Source load failed");
        })?;

        let lines = if settings.allow_empty_source {
            LineBuffer::from_text(&text)
        } else {
            LineBuffer::from_text_non_empty(&text, &path.display().to_string())?
        };

        self.paster.start(context, destination.clone(), lines, delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paste() {
        assert_eq!(
            Command::parse("paste song.txt").unwrap(),
            Command::Paste {
                path: PathBuf::from("song.txt"),
                delay: None
            }
        );
        assert_eq!(
            Command::parse("  paste song.txt 500 ").unwrap(),
            Command::Paste {
                path: PathBuf::from("song.txt"),
                delay: Some(Duration::from_millis(500))
            }
        );
    }

    #[test]
    fn test_parse_simple_actions() {
        assert_eq!(Command::parse("stop").unwrap(), Command::Stop);
        assert_eq!(Command::parse("resume").unwrap(), Command::Resume);
        assert_eq!(Command::parse("cancel").unwrap(), Command::Cancel);
        assert_eq!(Command::parse("status").unwrap(), Command::Status);
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse(""), Err(PasteError::Usage { .. })));
        assert!(matches!(
            Command::parse("paste"),
            Err(PasteError::Usage { .. })
        ));
        assert!(matches!(
            Command::parse("stop now"),
            Err(PasteError::Usage { .. })
        ));
        assert!(matches!(
            Command::parse("dance"),
            Err(PasteError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_parse_delay() {
        assert_eq!(parse_delay("2500").unwrap(), Duration::from_millis(2500));
        assert_eq!(
            parse_delay("fast").unwrap_err().to_string(),
            "invalid delay: fast"
        );
        assert_eq!(
            parse_delay("0").unwrap_err().to_string(),
            "delay must be positive"
        );
        assert!(parse_delay("-5").is_err());
    }
}
