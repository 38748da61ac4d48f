use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use truthlens::config::{Config, docs_url, github_url};
use truthlens::endpoints::Endpoint;
use truthlens::models::{AnalysisRequest, ChatMessage, ChatRequest, TranslationRequest};
use truthlens::retry::{RetryPolicy, RetryingClient};
use truthlens::scoring::{bias_score, tone_score};
use truthlens::validation::is_valid_url;
use truthlens::{ApiClient, Endpoints};

/// Command-line client for the TruthLens analysis backend
#[derive(Parser, Debug)]
#[command(name = "truthlens", version, about = "TruthLens analysis client")]
struct Cli {
    /// API base URL (overrides TRUTHLENS_API_BASE_URL and the environment table)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Retry transient failures using the configured retry policy
    #[arg(long, global = true)]
    retry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the resolved configuration
    Config,
    /// List every endpoint URL
    Endpoints,
    /// Probe the backend health endpoint
    Health,
    /// Analyze article text ("-" reads stdin)
    Analyze {
        text: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Ask a question about an article
    Chat {
        message: String,
        /// Article text to give the assistant as context
        #[arg(long)]
        article: Option<String>,
        #[arg(long)]
        web_search: bool,
    },
    /// Translate text
    Translate {
        text: String,
        #[arg(long, default_value = "en")]
        from: String,
        #[arg(long, default_value = "es")]
        to: String,
        #[arg(long, default_value = "literal")]
        mode: String,
        /// Also generate speech for the translation
        #[arg(long)]
        voice: bool,
    },
    /// Analyze an image file
    Image { path: PathBuf },
    /// Check whether text looks like an article URL
    UrlCheck { url: String },
}

#[derive(Serialize)]
struct ConfigView<'a> {
    environment: String,
    api_base_url: &'a str,
    frontend_url: &'a str,
    docs_url: &'a str,
    github_url: &'a str,
    timeout_ms: u128,
    retry_attempts: u32,
    retry_delay_ms: u128,
    health_check_enabled: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let config = with_api_base(
        Config::from_env().context("invalid configuration")?,
        cli.api_base,
    );
    config.log_summary();

    let client = ApiClient::from_config(&config);
    let policy = if cli.retry {
        RetryPolicy::from_settings(&config.api)
    } else {
        RetryPolicy::none()
    };

    match cli.command {
        Commands::Config => print_json(&ConfigView {
            environment: config.environment.to_string(),
            api_base_url: &config.api_base_url,
            frontend_url: &config.frontend_url,
            docs_url: docs_url(config.environment),
            github_url: github_url(),
            timeout_ms: config.api.timeout.as_millis(),
            retry_attempts: config.api.retry_attempts,
            retry_delay_ms: config.api.retry_delay.as_millis(),
            health_check_enabled: config.health_check_enabled,
        }),
        Commands::Endpoints => {
            let endpoints = Endpoints::from_config(&config);
            for endpoint in Endpoint::ALL {
                println!("{:<16} {}", endpoint, endpoints.url_for(endpoint));
            }
            Ok(())
        }
        Commands::Health => {
            if client.check_health().await {
                println!("healthy");
                Ok(())
            } else {
                bail!("backend at {} is not reachable", config.api_base_url)
            }
        }
        Commands::Analyze { text, url, title } => {
            let text = read_text(text).await?;
            let request = AnalysisRequest { text, url, title };
            let result = policy
                .run("analyze", || client.analyze_request(&request))
                .await?;
            println!(
                "bias score: {:.2}  tone score: {:.2}",
                bias_score(Some(&result.bias)),
                tone_score(Some(&result.emotional_tone))
            );
            print_json(&result)
        }
        Commands::Chat { message, article, web_search } => {
            let mut request = ChatRequest::new(vec![ChatMessage::user(message)]);
            request.article_text = article;
            request.use_web_search = web_search;
            let response = RetryingClient::new(client, policy).chat(&request).await?;
            println!("{}", response.message.content);
            Ok(())
        }
        Commands::Translate { text, from, to, mode, voice } => {
            let request = TranslationRequest::new(read_text(text).await?, from, to, mode);
            if voice {
                let result = client.translate_voice(&request).await?;
                print_json(&result)
            } else {
                let result = RetryingClient::new(client, policy).translate(&request).await?;
                println!("{}", result.translated_text);
                Ok(())
            }
        }
        Commands::Image { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let analysis = client
                .analyze_image(bytes, &file_name, image_mime(&path))
                .await?;
            print_json(&analysis)
        }
        Commands::UrlCheck { url } => {
            if is_valid_url(&url) {
                println!("valid");
                Ok(())
            } else {
                bail!("'{}' is not a valid URL", url)
            }
        }
    }
}

fn with_api_base(mut config: Config, api_base: Option<String>) -> Config {
    if let Some(base) = api_base.filter(|b| !b.is_empty()) {
        config.api_base_url = base;
    }
    config
}

async fn read_text(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read stdin")?;
    Ok(text)
}

fn image_mime(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn api_base_flag_overrides_resolved_config() {
        let cli = Cli::parse_from(["truthlens", "--api-base", "http://10.0.0.5:9000", "health"]);
        let config = with_api_base(Config::from_parts(false, None, None), cli.api_base);
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");

        let config = with_api_base(Config::from_parts(false, None, None), Some(String::new()));
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn parses_translate_defaults() {
        let cli = Cli::parse_from(["truthlens", "translate", "hello"]);
        match cli.command {
            Commands::Translate { from, to, mode, voice, .. } => {
                assert_eq!((from.as_str(), to.as_str(), mode.as_str()), ("en", "es", "literal"));
                assert!(!voice);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(image_mime(std::path::Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(image_mime(std::path::Path::new("scan.tiff")), "application/octet-stream");
    }
}
