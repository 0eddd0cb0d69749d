// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{Read, Write};
use std::path::PathBuf;

use mtbatch::app_config::{Config, EngineKind, LogLevel};
use mtbatch::TranslationService;

/// CLI Wrapper for EngineKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEngine {
    Chatgpt,
    Google,
}

impl From<CliEngine> for EngineKind {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Chatgpt => EngineKind::ChatGpt,
            CliEngine::Google => EngineKind::Google,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text from an argument or stdin
    Translate(TranslateArgs),

    /// Detect the language of text from an argument or stdin
    Detect {
        /// Text to inspect; read from stdin when absent
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for mtbatch
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text to translate; read from stdin when absent
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Source language code (e.g., 'en', 'zh-TW'), or 'auto'
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'zh-TW')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Tab-separated translation memory corpus
    #[arg(short, long, value_name = "TSV_PATH")]
    memory: Option<PathBuf>,

    /// Treat every input line as an independent cell
    #[arg(long)]
    cells: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// mtbatch - resilient batch machine translation
///
/// Translates text with a chat language model, using a translation memory
/// for terminology and a direct machine translation engine as fallback.
#[derive(Parser, Debug)]
#[command(name = "mtbatch")]
#[command(version = "0.1.0")]
#[command(about = "Resilient batch machine translation")]
#[command(long_about = "mtbatch translates text with chat language models and a fallback MT engine.

EXAMPLES:
    mtbatch translate -t fr \"Hello world\"              # Translate an argument
    cat strings.txt | mtbatch translate -s zh -t en     # Translate stdin, keeping line breaks
    mtbatch translate --cells -m tm.tsv -t de < col.txt # One cell per line, with a TM
    mtbatch detect \"Bonjour tout le monde\"              # Detect the language
    mtbatch completions bash > mtbatch.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file does
    not exist, a default one is created. API keys may also be supplied through
    OPENAI_API_KEY and GOOGLE_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "mtbatch", &mut std::io::stdout());
            Ok(())
        }
        Commands::Detect { text, config_path } => {
            let config = load_config(&config_path)?;
            log::set_max_level(config.log_level.to_level_filter());

            let service = TranslationService::new(&config).context("Failed to build translation service")?;
            let text = read_input(text)?;
            let language = service.detect_language(&text).await?;
            println!("{}", language);
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

fn load_config(config_path: &str) -> Result<Config> {
    let mut config = Config::load_or_create(config_path)?;
    config.apply_env_overrides();
    Ok(config)
}

fn read_input(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(engine) = &options.engine {
        config.translation.engine = engine.clone().into();
    }
    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(memory) = &options.memory {
        config.memory.path = Some(memory.to_string_lossy().into_owned());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;
    let service = TranslationService::new(&config).context("Failed to build translation service")?;

    let text = read_input(options.text)?;
    if text.trim().is_empty() {
        return Err(anyhow!("Nothing to translate"));
    }

    info!(
        "Translating {} characters from {} to {}",
        text.chars().count(),
        config.source_language,
        config.target_language
    );

    let output = if options.cells {
        let cells: Vec<String> = text.lines().map(str::to_string).collect();
        debug!("Translating {} cells", cells.len());
        service
            .translate_texts(None, &cells, &config.source_language, &config.target_language)
            .await?
            .join("\n")
    } else {
        service
            .translate_text(None, &text, &config.source_language, &config.target_language)
            .await?
    };

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", output.trim_end_matches('\n'))?;
    Ok(())
}
