//! Command handlers.

use std::error::Error;
use std::time::Duration;

use capview_application::{
    FuzzyMatcher, FuzzySearch, LoadSession, RankedHit, SearchFilter, debounce, project_session,
};
use capview_domain::{Entry, Session, ViewerSettings};
use capview_infrastructure::{
    CaptureIngestor, CurlOptions, IngestConfig, ReconstructedExchange, RenderOptions,
    RenderedMessage, TokioFileSource, to_curl,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

type CommandResult<T = ()> = Result<T, Box<dyn Error>>;

/// Reads and decodes the capture at `location`.
pub async fn load(location: &str, settings: &ViewerSettings) -> CommandResult<Session> {
    let use_case = LoadSession::new(
        TokioFileSource::new(),
        CaptureIngestor::with_config(IngestConfig::from(settings)),
    );
    let output = use_case.execute(location).await?;
    for warning in output.session.warnings() {
        tracing::warn!("{warning}");
    }
    Ok(output.session)
}

fn entry_at(session: &Session, index: usize) -> CommandResult<&Entry> {
    session.entry_at(index).ok_or_else(|| {
        format!("no entry at index {index} (session has {} entries)", session.len()).into()
    })
}

fn summary_line(entry: &Entry) -> String {
    let status = entry
        .response
        .as_ref()
        .map_or_else(|| "---".to_string(), |r| r.status_code.to_string());
    let info = entry.response_info();
    format!(
        "{:>4}  {:<19}  {:<7} {:>3}  {}  {} {}",
        entry.index,
        entry.timestamp,
        entry.request.method,
        status,
        entry.request.url,
        info.mime_type,
        info.content_length
    )
}

/// Prints one line per entry matching `filter`.
pub fn list(session: &Session, settings: &ViewerSettings, filter: Option<&str>) {
    let entries = SearchFilter::from_settings(settings).apply(session, filter.unwrap_or_default());
    for entry in entries {
        println!("{}", summary_line(entry));
    }
}

fn render(message: &RenderedMessage, raw: bool) -> String {
    if !raw {
        return message.to_string();
    }
    let mut text = RenderedMessage {
        body: String::new(),
        ..message.clone()
    }
    .to_string();
    for payload in message.payloads() {
        text.push_str("\n\n");
        text.push_str(&payload);
    }
    text
}

/// Prints the reconstructed request and response of one entry.
pub fn show(session: &Session, settings: &ViewerSettings, index: usize, raw: bool) -> CommandResult {
    let entry = entry_at(session, index)?;
    let options = RenderOptions {
        beautify: !raw,
        ..RenderOptions::from(settings)
    };
    let exchange = ReconstructedExchange::from_entry(entry, options);

    println!("{}", render(&exchange.request, raw));
    println!();
    match &exchange.response {
        Some(response) => println!("{}", render(response, raw)),
        None => println!("No response received"),
    }
    Ok(())
}

/// Prints a curl command for one entry.
pub fn curl(session: &Session, index: usize, escape_quotes: bool) -> CommandResult {
    let entry = entry_at(session, index)?;
    let options = CurlOptions {
        escape_quotes,
        ..CurlOptions::default()
    };
    println!("{}", to_curl(entry, &options));
    Ok(())
}

/// Runs a fuzzy query on the search worker and prints ranked entries.
pub async fn search(
    session: &Session,
    settings: &ViewerSettings,
    query: &str,
    limit: Option<usize>,
) -> CommandResult {
    let mut search = spawn_search(session, settings, limit.unwrap_or(settings.fuzzy_max_results))?;
    search.query(query)?;

    print_hits(session, &search.next_result().await?);
    Ok(())
}

fn spawn_search(session: &Session, settings: &ViewerSettings, limit: usize) -> CommandResult<FuzzySearch> {
    let search = FuzzySearch::spawn(FuzzyMatcher::new(settings.fuzzy_threshold), limit)?;
    search.initialize(project_session(session, settings.fuzzy_body_limit))?;
    Ok(search)
}

fn print_hits(session: &Session, hits: &[RankedHit]) {
    if hits.is_empty() {
        println!("no matches");
    }
    for hit in hits {
        if let Some(entry) = session.entry(&hit.entry_id) {
            println!("{:.2}  {}", hit.score, summary_line(entry));
        }
    }
}

/// Reads queries from stdin, one per line, and prints ranked entries for
/// each query that stays unchanged for the configured debounce period.
pub async fn interactive(session: &Session, settings: &ViewerSettings) -> CommandResult {
    let (lines_tx, lines_rx) = mpsc::channel(16);
    let mut queries = debounce(lines_rx, Duration::from_millis(settings.search_debounce_ms));

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if lines_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut search = spawn_search(session, settings, settings.fuzzy_max_results)?;
    while let Some(query) = queries.recv().await {
        if query.trim().is_empty() {
            continue;
        }
        search.query(query.as_str())?;
        println!("> {query}");
        print_hits(session, &search.next_result().await?);
    }
    Ok(())
}

/// Prints the cookies set by one entry's response.
pub fn cookies(session: &Session, index: usize) -> CommandResult {
    let entry = entry_at(session, index)?;
    println!("{}", entry.cookies());
    Ok(())
}
