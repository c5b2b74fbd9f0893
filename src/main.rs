// src/main.rs

use anyhow::{bail, Context};
use clap::Parser;
use docs2guide::config::{
    Command, CommandLineInput, KeysAction, OutputArgs, OutputFormat, SourceArgs,
};
use docs2guide::output::{deliver, render_guide, DeliveryTarget, OutputPlan};
use docs2guide::{
    AcquisitionRequest, AcquisitionResult, AppError, ContentOrigin, ConversationTurn, Credentials,
    DocsAssistant, DocsGuide, DocumentSource, ErrorKind, GuideAuthor, KeyStore, PipelineConfig,
    QuestionRequest, SummaryRequest, ValidatedUrl,
};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const DEFAULT_API_NAME: &str = "API Documentation";
const SUGGESTED_QUESTIONS: [&str; 3] = [
    "How do I authenticate?",
    "Show me how to create a post",
    "What are the rate limits?",
];

/// Console threshold; the log file always records debug.
fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Sets up logging: console on stderr so stdout stays clean for results, and
/// a debug-level log file in the temp directory.
fn setup_logging(verbose: bool) -> anyhow::Result<PathBuf> {
    let log_level = console_level(verbose);

    let log_file_path = std::env::temp_dir().join("docs2guide.log");

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("console", Box::new(console_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(log_file_path)
}

/// Builds the acquisition request, reading `--file` when given.
fn acquisition_request(source: &SourceArgs) -> anyhow::Result<AcquisitionRequest> {
    let text = match &source.file {
        Some(path) => Some(read_source_file(path)?),
        None => source.text.clone(),
    };
    Ok(AcquisitionRequest {
        url: source.url.clone(),
        text,
    })
}

fn read_source_file(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read documentation from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read documentation from {}", path.display()))
}

/// Display name: explicit flag, then the fetched page's host.
fn api_name_for(explicit: Option<&str>, acquired: &AcquisitionResult, url: Option<&str>) -> String {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if acquired.source == ContentOrigin::Direct {
        return DEFAULT_API_NAME.to_string();
    }
    url.and_then(|u| ValidatedUrl::parse(u).ok())
        .map(|u| u.host_label().to_string())
        .unwrap_or_else(|| DEFAULT_API_NAME.to_string())
}

/// Delivers `content` per the output flags and reports where it went.
fn emit(content: &str, output: &OutputArgs, label: &str) -> Result<(), AppError> {
    let plan = OutputPlan::for_content(content, output.output.clone(), output.clipboard);
    let report = deliver(plan);

    if !report.is_success() {
        return Err(AppError::DeliveryFailed {
            failures: report.failure_messages(),
        });
    }

    for completed in &report.completed {
        match &completed.operation {
            DeliveryTarget::WriteFile { path, .. } => {
                eprintln!("✓ {} saved to {}", label, path.display());
            }
            DeliveryTarget::CopyToClipboard { .. } => {
                eprintln!("✓ {} copied to clipboard", label);
            }
            DeliveryTarget::PrintToStdout { .. } => {}
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn acquire(guide: &DocsGuide, source: &SourceArgs) -> anyhow::Result<AcquisitionResult> {
    let request = acquisition_request(source)?;
    let acquired = guide.acquire(&request, &Credentials::default()).await?;
    eprintln!(
        "📄 Loaded {} characters ({})",
        acquired.content.chars().count(),
        acquired.source
    );
    Ok(acquired)
}

async fn run_acquire(
    config: &PipelineConfig,
    source: &SourceArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let guide = DocsGuide::new(config)?;
    let acquired = acquire(&guide, source).await?;
    let rendered = match output.format {
        OutputFormat::Markdown => acquired.content.clone(),
        OutputFormat::Json => to_json(&acquired)?,
    };
    emit(&rendered, output, "Documentation")?;
    Ok(())
}

async fn run_analyze(
    config: &PipelineConfig,
    source: &SourceArgs,
    intent: Option<String>,
    api_name: Option<&str>,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let guide = DocsGuide::new(config)?;
    let acquired = acquire(&guide, source).await?;
    let api_name = api_name_for(api_name, &acquired, source.url.as_deref());

    eprintln!("🔎 Analyzing {} with {}...", api_name, config.model);
    let request = SummaryRequest {
        content: acquired.content,
        user_intent: intent,
        api_name: Some(api_name),
    };
    let document = guide.summarize(&request, None).await?;

    let rendered = match output.format {
        OutputFormat::Markdown => format!(
            "{}\n---\n_Generated by docs2guide on {}_\n",
            render_guide(&document),
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        ),
        OutputFormat::Json => to_json(&document)?,
    };
    emit(&rendered, output, "Guide")?;
    Ok(())
}

fn load_history(path: &Path) -> anyhow::Result<Vec<ConversationTurn>> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("Invalid conversation history in {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn save_history(path: &Path, history: &[ConversationTurn]) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(history)?)
        .with_context(|| format!("Failed to save conversation history to {}", path.display()))
}

struct AskArgs<'a> {
    source: &'a SourceArgs,
    message: Option<String>,
    history: Option<&'a Path>,
    api_name: Option<&'a str>,
    output: &'a OutputArgs,
}

async fn run_ask(config: &PipelineConfig, args: AskArgs<'_>) -> anyhow::Result<()> {
    if args.message.is_none() && args.source.file.as_deref() == Some(Path::new("-")) {
        bail!("Reading documentation from stdin needs --message; interactive sessions read questions from stdin");
    }

    let guide = DocsGuide::new(config)?;
    let acquired = acquire(&guide, args.source).await?;
    let api_name = api_name_for(args.api_name, &acquired, args.source.url.as_deref());
    let history = match args.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };

    let mut request = QuestionRequest {
        message: String::new(),
        content: acquired.content,
        history,
        api_name: Some(api_name),
    };

    match args.message {
        Some(message) => {
            request.message = message;
            let answer = guide.ask(&request, None).await?;
            let rendered = match args.output.format {
                OutputFormat::Markdown => answer.clone(),
                OutputFormat::Json => to_json(&serde_json::json!({ "response": answer }))?,
            };
            emit(&rendered, args.output, "Answer")?;
            record_exchange(&mut request, answer);
        }
        None => interactive_session(&guide, &mut request).await?,
    }

    if let Some(path) = args.history {
        save_history(path, &request.history)?;
    }
    Ok(())
}

fn record_exchange(request: &mut QuestionRequest, answer: String) {
    let question = std::mem::take(&mut request.message);
    request.history.push(ConversationTurn::user(question));
    request.history.push(ConversationTurn::assistant(answer));
}

/// Question/answer loop on stdin; ends on EOF, `exit` or `quit`.
async fn interactive_session(guide: &DocsGuide, request: &mut QuestionRequest) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let api_name = request.api_name.clone().unwrap_or_default();
    stdout
        .write_all(format!("Ask me anything about {}. Try:\n", api_name).as_bytes())
        .await?;
    for question in SUGGESTED_QUESTIONS {
        stdout.write_all(format!("  • {}\n", question).as_bytes()).await?;
    }

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }

        request.message = question.to_string();
        match guide.ask(request, None).await {
            Ok(answer) => {
                stdout.write_all(format!("\n{}\n", answer.trim_end()).as_bytes()).await?;
                record_exchange(request, answer);
            }
            Err(e) => {
                // The question is not recorded so a retry replays the same history.
                log::error!("Chat failed: {}", e);
                eprintln!("❌ {}", e);
            }
        }
    }
    Ok(())
}

fn run_keys(store: &KeyStore, action: KeysAction) -> anyhow::Result<()> {
    match action {
        KeysAction::Set {
            llm_key,
            extractor_key,
        } => {
            if llm_key.is_none() && extractor_key.is_none() {
                bail!("Nothing to save: pass --llm-key and/or --extractor-key");
            }
            store.update(llm_key.as_deref(), extractor_key.as_deref())?;
            println!("✓ Keys saved to {}", store.path().display());
        }
        KeysAction::Show => {
            let keys = store.load()?;
            println!("Key store: {}", store.path().display());
            for (name, value) in keys.describe() {
                println!("  {}: {}", name, value);
            }
        }
        KeysAction::Clear => {
            store.clear()?;
            println!("✓ Keys removed from {}", store.path().display());
        }
    }
    Ok(())
}

async fn run(cli: CommandLineInput) -> anyhow::Result<()> {
    let store = KeyStore::open_default()?;

    if let Command::Keys { action } = &cli.command {
        return run_keys(&store, action.clone());
    }

    let stored = store
        .load()
        .with_context(|| format!("Failed to load keys from {}", store.path().display()))?;
    let config = PipelineConfig::resolve(&cli, &stored)?;

    match &cli.command {
        Command::Acquire { source, output } => run_acquire(&config, source, output).await,
        Command::Analyze {
            source,
            intent,
            api_name,
            output,
        } => run_analyze(&config, source, intent.clone(), api_name.as_deref(), output).await,
        Command::Ask {
            source,
            message,
            history,
            api_name,
            output,
        } => {
            run_ask(
                &config,
                AskArgs {
                    source,
                    message: message.clone(),
                    history: history.as_deref(),
                    api_name: api_name.as_deref(),
                    output,
                },
            )
            .await
        }
        Command::Serve { bind } => Ok(docs2guide::server::run_server(&config, bind).await?),
        Command::Keys { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Warning: logging unavailable: {:#}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            match e.chain().find_map(|cause| cause.downcast_ref::<AppError>()) {
                Some(app) if app.kind() == ErrorKind::Acquisition => {
                    eprintln!("❌ {}", app.cli_message())
                }
                _ => eprintln!("❌ {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_shows_warnings_unless_verbose() {
        assert_eq!(console_level(false), LevelFilter::Warn);
        assert_eq!(console_level(true), LevelFilter::Debug);
    }
}
