//! Interactive console host.
//!
//! Owns the destinations, tracks which one is current, and forwards paste
//! commands to the dispatcher. Host-only commands (`use`, `attach`,
//! `detach`, `quit`) never reach the scheduler.

use std::sync::{Mutex, PoisonError};

use contracts::{ContextId, Destination, DestinationId, Notice, Notifier, PasteError, SourceLoader};
use observability::{SessionStats, SessionSummary};
use scheduler::{CommandDispatcher, HostDestination};
use tracing::debug;

/// What the input loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    Continue,
    Quit,
}

pub struct Console<N, L> {
    context: ContextId,
    dispatcher: CommandDispatcher<HostDestination, N, L>,
    /// In configuration order
    destinations: Vec<HostDestination>,
    current: Option<DestinationId>,
}

impl<N, L> Console<N, L>
where
    N: Notifier,
    L: SourceLoader,
{
    /// The first destination becomes the current one
    pub fn new(
        context: ContextId,
        dispatcher: CommandDispatcher<HostDestination, N, L>,
        destinations: Vec<HostDestination>,
    ) -> Self {
        let current = destinations.first().map(|d| d.id().clone());
        Self {
            context,
            dispatcher,
            destinations,
            current,
        }
    }

    pub fn current(&self) -> Option<&HostDestination> {
        let current = self.current.as_ref()?;
        self.destinations.iter().find(|d| d.id() == current)
    }

    /// `name@network` for every destination
    pub fn destination_names(&self) -> Vec<String> {
        self.destinations.iter().map(|d| label(d.id())).collect()
    }

    /// Handle one line of operator input
    pub async fn handle_line(&mut self, input: &str) -> ConsoleAction {
        let input = input.trim();
        if input.is_empty() {
            return ConsoleAction::Continue;
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(w, r)| (w, r.trim()));
        debug!(command = word, "Console input");

        let result = match word {
            "quit" | "exit" => return ConsoleAction::Quit,
            "use" => self.select(rest),
            "attach" => self.attach(rest).await,
            "detach" => self.detach(rest),
            _ => {
                // The dispatcher reports for itself.
                match self.current() {
                    Some(destination) => {
                        self.dispatcher
                            .dispatch(&self.context, destination, input)
                            .await;
                        return ConsoleAction::Continue;
                    }
                    None => Err(PasteError::usage("no destination selected")),
                }
            }
        };

        let notice = result.unwrap_or_else(|e| Notice::Rejected {
            message: e.to_string(),
        });
        self.notify(&notice);
        ConsoleAction::Continue
    }

    fn select(&mut self, name: &str) -> Result<Notice, PasteError> {
        let destination = self.lookup(name)?.id().clone();
        self.current = Some(destination.clone());
        Ok(Notice::Selected { destination })
    }

    async fn attach(&self, name: &str) -> Result<Notice, PasteError> {
        let destination = self.lookup(name)?;
        if let Err(e) = destination.attach().await {
            return Err(PasteError::delivery_write(destination.id(), e.to_string()));
        }
        Ok(Notice::Presence {
            destination: destination.id().clone(),
            reachable: true,
        })
    }

    fn detach(&self, name: &str) -> Result<Notice, PasteError> {
        let destination = self.lookup(name)?;
        destination.detach();
        Ok(Notice::Presence {
            destination: destination.id().clone(),
            reachable: false,
        })
    }

    /// Resolve `name` or `name@network`; a bare name must be unambiguous
    fn lookup(&self, name: &str) -> Result<&HostDestination, PasteError> {
        if name.is_empty() {
            return Err(PasteError::usage(format!(
                "no destination given (known: {})",
                self.destination_names().join(", ")
            )));
        }

        let (channel, network) = match name.rsplit_once('@') {
            Some((channel, network)) => (channel, Some(network)),
            None => (name, None),
        };
        let mut matches = self.destinations.iter().filter(|d| {
            d.id().channel() == channel && network.is_none_or(|n| d.id().network() == n)
        });

        match (matches.next(), matches.next()) {
            (Some(destination), None) => Ok(destination),
            (None, _) => Err(PasteError::UnknownDestination {
                name: name.to_string(),
            }),
            (Some(first), Some(second)) => {
                let mut candidates = vec![label(first.id()), label(second.id())];
                candidates.extend(matches.map(|d| label(d.id())));
                Err(PasteError::usage(format!(
                    "ambiguous destination {name} (one of: {})",
                    candidates.join(", ")
                )))
            }
        }
    }

    fn notify(&self, notice: &Notice) {
        self.dispatcher
            .paster()
            .notifier()
            .notify(&self.context, notice);
    }
}

fn label(id: &DestinationId) -> String {
    format!("{}@{}", id.channel(), id.network())
}

/// Prints notices to stdout and keeps session statistics
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    stats: Mutex<SessionStats>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> SessionSummary {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .summary()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, context: &ContextId, notice: &Notice) {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(notice);
        debug!(context = %context, "Notice delivered");
        println!("{notice}");
    }
}
