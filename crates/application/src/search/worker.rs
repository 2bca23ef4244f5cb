//! Background fuzzy search worker.
//!
//! Ranking runs on a dedicated thread so a large capture never blocks the
//! caller. Queries carry a sequence number; replies to queries that have
//! since been superseded are dropped by [`FuzzySearch::next_result`].

use std::thread;

use tokio::sync::mpsc;

use super::fuzzy::{FuzzyMatcher, IndexedDocument, RankedHit};
use super::projection::SearchDocument;
use crate::error::{ApplicationError, ApplicationResult};

/// Messages sent to the worker thread.
#[derive(Debug)]
pub enum SearchCommand {
    /// Replaces the indexed document set.
    Initialize(Vec<SearchDocument>),
    /// Ranks the current documents against `text`.
    Query {
        /// Sequence number echoed in the reply.
        seq: u64,
        /// Raw query text.
        text: String,
    },
}

/// Messages sent back by the worker thread.
#[derive(Debug)]
pub enum SearchReply {
    /// Ranked results for query `seq`.
    Matches {
        /// Sequence number of the query.
        seq: u64,
        /// Hits, best first.
        hits: Vec<RankedHit>,
    },
    /// Query `seq` could not be answered.
    Failed {
        /// Sequence number of the query.
        seq: u64,
        /// What went wrong.
        message: String,
    },
}

/// Handle to the fuzzy search worker.
///
/// Dropping the handle closes the command channel, which stops the thread.
#[derive(Debug)]
pub struct FuzzySearch {
    commands: mpsc::UnboundedSender<SearchCommand>,
    replies: mpsc::UnboundedReceiver<SearchReply>,
    latest: Option<u64>,
    next_seq: u64,
}

impl FuzzySearch {
    /// Spawns the worker thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(matcher: FuzzyMatcher, max_results: usize) -> ApplicationResult<Self> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        thread::Builder::new()
            .name("capview-search".to_string())
            .spawn(move || run_worker(matcher, max_results, command_rx, &reply_tx))
            .map_err(|e| ApplicationError::SearchWorker(e.to_string()))?;

        Ok(Self {
            commands: command_tx,
            replies: reply_rx,
            latest: None,
            next_seq: 0,
        })
    }

    /// Hands a new document set to the worker.
    ///
    /// # Errors
    /// Returns an error if the worker has stopped.
    pub fn initialize(&self, documents: Vec<SearchDocument>) -> ApplicationResult<()> {
        tracing::debug!(documents = documents.len(), "initializing fuzzy index");
        self.send(SearchCommand::Initialize(documents))
    }

    /// Issues a query and returns its sequence number.
    ///
    /// Earlier queries that have not been answered yet become stale.
    ///
    /// # Errors
    /// Returns an error if the worker has stopped.
    pub fn query(&mut self, text: impl Into<String>) -> ApplicationResult<u64> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.send(SearchCommand::Query {
            seq,
            text: text.into(),
        })?;
        self.latest = Some(seq);
        Ok(seq)
    }

    /// Waits for the reply to the most recent query.
    ///
    /// # Errors
    /// Returns an error if no query was issued, the worker failed to answer
    /// or the worker has stopped.
    pub async fn next_result(&mut self) -> ApplicationResult<Vec<RankedHit>> {
        let latest = self
            .latest
            .ok_or_else(|| ApplicationError::SearchWorker("no query issued".to_string()))?;

        loop {
            let reply = self.replies.recv().await.ok_or_else(stopped)?;
            match reply {
                SearchReply::Matches { seq, hits } if seq == latest => return Ok(hits),
                SearchReply::Failed { seq, message } if seq == latest => {
                    return Err(ApplicationError::SearchWorker(message));
                }
                SearchReply::Matches { seq, .. } | SearchReply::Failed { seq, .. } => {
                    tracing::trace!(seq, latest, "discarding stale search reply");
                }
            }
        }
    }

    fn send(&self, command: SearchCommand) -> ApplicationResult<()> {
        self.commands.send(command).map_err(|_| stopped())
    }
}

fn stopped() -> ApplicationError {
    ApplicationError::SearchWorker("search worker stopped".to_string())
}

fn run_worker(
    matcher: FuzzyMatcher,
    max_results: usize,
    mut commands: mpsc::UnboundedReceiver<SearchCommand>,
    replies: &mpsc::UnboundedSender<SearchReply>,
) {
    let mut index: Option<Vec<IndexedDocument>> = None;

    while let Some(command) = commands.blocking_recv() {
        let reply = match command {
            SearchCommand::Initialize(documents) => {
                index = Some(documents.into_iter().map(IndexedDocument::from).collect());
                continue;
            }
            SearchCommand::Query { seq, text } => match &index {
                Some(documents) => SearchReply::Matches {
                    seq,
                    hits: matcher.rank(documents, &text, max_results),
                },
                None => SearchReply::Failed {
                    seq,
                    message: "search index not initialized".to_string(),
                },
            },
        };

        if replies.send(reply).is_err() {
            break;
        }
    }
    tracing::debug!("search worker stopped");
}
