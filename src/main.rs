use anyhow::Result;
use cftdriver::{
    commands::{self, DownloadRequest, NotReady, Reported, config::{Config, ConfigOptions}},
    http::HttpClient,
    notice::{self, StderrSink},
    resolver::Platform,
    runtime::RealRuntime,
};
use clap::Parser;
use std::path::PathBuf;

/// cftdriver - ChromeDriver download URL resolver
///
/// Builds the Chrome for Testing download URL of the Windows ChromeDriver
/// matching a Chrome version, optionally detecting that version from a
/// browser's client hints or User-Agent string.
///
/// Examples:
///   cftdriver url 131.0.6778.140 -p win32
///   cftdriver detect --user-agent "$UA" --apply
///   cftdriver download 131.0.6778.140 --extract
#[derive(Parser, Debug)]
#[command(author, version = env!("CFTDRIVER_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bucket root to build URLs under (also via CFTDRIVER_BASE_URL)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the download URL for a Chrome version
    Url(UrlArgs),

    /// Detect the browser version and bitness
    Detect(DetectArgs),

    /// Download the ChromeDriver archive
    Download(DownloadArgs),

    /// Print the download URL and copy it to the clipboard
    Copy(UrlArgs),

    /// Print the URL template and where to find published versions
    Template,
}

#[derive(clap::Args, Debug)]
pub struct UrlArgs {
    /// Chrome version, four dot-separated numbers
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Target platform
    #[arg(long, short = 'p', value_enum, default_value_t = Platform::Win64)]
    pub platform: Platform,
}

#[derive(clap::Args, Debug, Default)]
pub struct SignalArgs {
    /// User-Agent string to detect from (also via CFTDRIVER_USER_AGENT)
    #[arg(long = "user-agent", value_name = "UA")]
    pub user_agent: Option<String>,

    /// High-entropy client hints as JSON (also via CFTDRIVER_CLIENT_HINTS)
    #[arg(long = "client-hints", value_name = "JSON", conflicts_with = "client_hints_file")]
    pub client_hints: Option<String>,

    /// File holding high-entropy client hints as JSON
    #[arg(long = "client-hints-file", value_name = "PATH")]
    pub client_hints_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub signals: SignalArgs,

    /// Apply the detection and print the resulting download URL
    #[arg(long)]
    pub apply: bool,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Chrome version; may be omitted with --use-detected
    #[arg(value_name = "VERSION", required_unless_present = "use_detected")]
    pub version: Option<String>,

    /// Target platform; overrides a detected bitness
    #[arg(long, short = 'p', value_enum)]
    pub platform: Option<Platform>,

    /// Directory to save into (also via CFTDRIVER_OUTPUT_DIR; defaults to the current directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Unpack the archive next to it
    #[arg(long)]
    pub extract: bool,

    /// Detect version and bitness first; explicit values still win
    #[arg(long = "use-detected")]
    pub use_detected: bool,

    #[command(flatten)]
    pub signals: SignalArgs,
}

fn config_options(base_url: Option<String>, signals: SignalArgs) -> ConfigOptions {
    ConfigOptions {
        base_url,
        user_agent: signals.user_agent,
        client_hints: signals.client_hints,
        client_hints_file: signals.client_hints_file,
        ..Default::default()
    }
}

async fn run(cli: Cli) -> Result<()> {
    let runtime = RealRuntime;
    let sink = notice::sink();

    match cli.command {
        Commands::Url(args) => {
            let config = Config::new(runtime, config_options(cli.base_url, SignalArgs::default()))?;
            commands::url(&args.version, args.platform, &config.base_url, sink)?;
        }
        Commands::Detect(args) => {
            let config = Config::new(runtime, config_options(cli.base_url, args.signals))?;
            commands::detect(&config, args.apply, sink).await?;
        }
        Commands::Download(args) => {
            let mut options = config_options(cli.base_url, args.signals);
            options.output_dir = args.output;
            let config = Config::new(runtime, options)?;
            let http_client = HttpClient::build()?;
            let request = DownloadRequest {
                version: args.version,
                platform: args.platform,
                use_detected: args.use_detected,
                extract: args.extract,
            };
            commands::download(&config, &http_client, request, sink).await?;
        }
        Commands::Copy(args) => {
            let config = Config::new(runtime, config_options(cli.base_url, SignalArgs::default()))?;
            commands::copy(
                &config.runtime,
                &args.version,
                args.platform,
                &config.base_url,
                sink,
            )?;
        }
        Commands::Template => commands::template(),
    }
    Ok(())
}

fn already_reported(error: &anyhow::Error) -> bool {
    error.downcast_ref::<NotReady>().is_some() || error.downcast_ref::<Reported>().is_some()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    notice::init(Box::new(StderrSink));

    match run(cli).await {
        // The notice has already been shown
        Err(e) if already_reported(&e) => std::process::exit(1),
        result => result,
    }
}
