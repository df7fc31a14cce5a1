use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::{env, path::Path, process, time::Instant};
use writeflow_config::Config;
use writeflow_engine::{
    ControllerSettings, DocumentStats, EditSession, EditorController, HttpClient, PreferenceStore,
    SuggestionRequest, WritingService,
    service::run_chain,
    store::{RecentChecks, RecentDocuments},
};

const USAGE: &str = "Usage: writeflow <command> [args]

Commands:
  check <file>              List suggestions for a file
  fix <file> [--write]      Apply every suggestion (print, or write back with --write)
  rewrite <file> [goal]     Rewrite toward a goal (default from config)
  summarize <file>          Summarize a file
  chain <file>              Correct, rewrite, then summarize
  plagiarism <file>         Check a file for plagiarism
  stats <file>              Show local statistics for a file
  recent                    List recent documents and plagiarism checks";

fn read_session(path: &str) -> Result<EditSession> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {path}"))?;
    EditSession::from_bytes(&bytes).with_context(|| format!("{path} is not valid UTF-8"))
}

fn client(config: &Config) -> Result<HttpClient> {
    let client = HttpClient::new(config.api_base_url.clone(), config.request_timeout())?;
    Ok(client.with_token(config.api_token.clone()))
}

fn request(config: &Config, content: &str) -> SuggestionRequest {
    SuggestionRequest {
        content: content.to_string(),
        goal: config.goal.clone(),
        tone: config.tone.clone(),
        audience: config.audience.clone(),
        user_id: config.user_id.clone(),
    }
}

fn controller_settings(config: &Config) -> ControllerSettings {
    ControllerSettings {
        goal: config.goal.clone(),
        tone: config.tone.clone(),
        audience: config.audience.clone(),
        user_id: config.user_id.clone(),
        enabled_types: config.enabled_suggestion_types.clone(),
        min_content_chars: config.min_content_chars,
        refresh_window: config.suggestion_debounce(),
        autosave_window: config.autosave_debounce(),
        history_limit: config.history_limit(),
    }
}

/// Open `path` in a controller and fetch suggestions for it.
fn analysed(config: &Config, path: &str) -> Result<EditorController<HttpClient>> {
    let session = read_session(path)?;
    let mut controller = EditorController::new(client(config)?, controller_settings(config));
    let title = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    controller.open_text(&title, session.content());

    if !controller.refresh_now()? {
        bail!(
            "{path} is too short to analyse (needs more than {} characters)",
            config.min_content_chars
        );
    }
    Ok(controller)
}

fn check(config: &Config, path: &str) -> Result<()> {
    let controller = analysed(config, path)?;
    let suggestions = controller.session().suggestions();

    for suggestion in suggestions {
        let position = suggestion
            .position
            .map(|span| format!("{}..{}", span.start, span.end))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {} {position}: {:?} -> {:?}",
            suggestion.id, suggestion.kind, suggestion.original_text, suggestion.suggested_text
        );
        if !suggestion.explanation.is_empty() {
            println!("    {}", suggestion.explanation);
        }
    }
    println!("{} suggestion(s)", suggestions.len());
    if let Some(score) = controller.analytics_score() {
        println!("Overall score: {score}");
    }
    Ok(())
}

fn fix(config: &Config, path: &str, write: bool) -> Result<()> {
    let mut controller = analysed(config, path)?;

    let report = controller.apply_all(Instant::now());
    log::info!(
        "Applied {} suggestion(s), skipped {}",
        report.applied.len(),
        report.skipped.len()
    );
    if !report.overlapping.is_empty() {
        log::warn!("Overlapping suggestions: {}", report.overlapping.join(", "));
    }

    let content = controller.session().content();
    if write {
        std::fs::write(path, content).with_context(|| format!("Failed to write {path}"))?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn rewrite(config: &Config, path: &str, goal: Option<&str>) -> Result<()> {
    let session = read_session(path)?;
    let goal = goal.unwrap_or(&config.goal);
    println!("{}", client(config)?.rewrite(session.content(), goal)?);
    Ok(())
}

fn summarize(config: &Config, path: &str) -> Result<()> {
    let session = read_session(path)?;
    println!("{}", client(config)?.summarize(session.content())?);
    Ok(())
}

fn chain(config: &Config, path: &str) -> Result<()> {
    let session = read_session(path)?;
    let outcome = run_chain(&client(config)?, &request(config, session.content()))?;
    println!("## Corrected\n\n{}\n", outcome.corrected);
    println!("## Rewritten\n\n{}\n", outcome.rewritten);
    println!("## Summary\n\n{}", outcome.summary);
    Ok(())
}

fn plagiarism(config: &Config, store: &PreferenceStore, path: &str) -> Result<()> {
    let session = read_session(path)?;
    let report = client(config)?.check_plagiarism(session.content())?;

    println!(
        "Similarity {:.1}% ({} risk), {} source(s) checked",
        report.overall_score, report.risk_level, report.sources_checked
    );
    for m in &report.matches {
        println!("  {:.1}% {} {}", m.similarity, m.source, m.url);
    }

    let mut checks = RecentChecks::load(store);
    checks.record(session.content(), report.overall_score, Utc::now());
    checks.save(store)?;
    Ok(())
}

fn stats(config: &Config, path: &str) -> Result<()> {
    let session = read_session(path)?;
    let stats = DocumentStats::compute(session.content(), 0);
    println!("Words:       {}", stats.words);
    println!("Characters:  {}", stats.characters);
    println!("Sentences:   {}", stats.sentences);
    println!("Readability: {}", stats.readability);
    println!("Tone:        {}", stats.tone);
    if stats.exceeds_word_limit(config.word_limit) {
        log::warn!("{path} exceeds the {} word limit", config.word_limit);
    }
    Ok(())
}

fn recent(store: &PreferenceStore) -> Result<()> {
    println!("Recent documents:");
    for doc in RecentDocuments::load(store).entries() {
        println!(
            "  {} ({} words, score {}) {}",
            doc.title,
            doc.word_count,
            doc.score,
            doc.last_modified.format("%Y-%m-%d %H:%M")
        );
    }
    println!("Recent plagiarism checks:");
    for check in RecentChecks::load(store).entries() {
        println!("  {:.1}% {:?} {}", check.score, check.content, check.date.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

fn file_arg(args: &[String], index: usize) -> Result<&str> {
    match args.get(index) {
        Some(path) if Path::new(path).is_file() => Ok(path.as_str()),
        Some(path) => bail!("No such file: {path}"),
        None => bail!("Missing file argument\n\n{USAGE}"),
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = Config::load().with_context(|| {
        format!("Failed to load config file {}", Config::config_path().display())
    })?;
    let file = |i: usize| file_arg(args, i);

    match args.get(1).map(String::as_str) {
        Some("check") => check(&config, file(2)?),
        Some("fix") => fix(&config, file(2)?, args.iter().any(|a| a == "--write")),
        Some("rewrite") => rewrite(&config, file(2)?, args.get(3).map(String::as_str)),
        Some("summarize") => summarize(&config, file(2)?),
        Some("chain") => chain(&config, file(2)?),
        Some("plagiarism") => {
            let store = PreferenceStore::open(&config.data_dir)?;
            plagiarism(&config, &store, file(2)?)
        }
        Some("stats") => stats(&config, file(2)?),
        Some("recent") => recent(&PreferenceStore::open(&config.data_dir)?),
        Some(other) => bail!("Unknown command: {other}\n\n{USAGE}"),
        None => bail!("{USAGE}"),
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
