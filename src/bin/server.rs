//! xpath-scraper HTTP server
//!
//! Serves `POST /api/scrape-xpaths`, launching a headless Chrome per request.

use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use xpath_scraper::classify::remote::DEFAULT_ENDPOINT;
use xpath_scraper::http::router;
use xpath_scraper::{ChromeNavigator, ClassifierKind, JobController, LaunchOptions, RemoteClassifierConfig, ScrapeConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClassifierChoice {
    /// Deterministic tag/type rule table (default)
    Rules,
    /// Remote label inference service
    Remote,
}

#[derive(Parser)]
#[command(name = "xpath-scraper")]
#[command(version)]
#[command(about = "Element XPath and UI-role extraction server", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "5000")]
    port: u16,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<String>,

    /// Disable Chrome's sandbox (needed in most containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Elements examined per page, in document order
    #[arg(long, default_value = "20")]
    max_nodes: usize,

    /// Characters of outer HTML kept per element
    #[arg(long, default_value = "2000")]
    html_cap: usize,

    /// Page load timeout in seconds
    #[arg(long, default_value = "60")]
    navigation_timeout_secs: u64,

    /// Classification strategy
    #[arg(long, value_enum, default_value = "rules")]
    classifier: ClassifierChoice,

    /// Label service endpoint
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    classifier_endpoint: String,

    /// Bearer token for the label service
    #[arg(long, env = "HF_API_KEY", hide_env_values = true)]
    classifier_token: Option<String>,

    /// Per-request label service timeout in seconds
    #[arg(long, default_value = "10")]
    classifier_timeout_secs: u64,

    /// Label requests in flight per job
    #[arg(long, default_value = "4")]
    classify_concurrency: usize,
}

impl Cli {
    fn scrape_config(&self) -> ScrapeConfig {
        let classifier = match self.classifier {
            ClassifierChoice::Rules => ClassifierKind::Rules,
            ClassifierChoice::Remote => {
                let mut remote = RemoteClassifierConfig::new(&self.classifier_endpoint)
                    .timeout(Duration::from_secs(self.classifier_timeout_secs));
                if let Some(token) = &self.classifier_token {
                    remote = remote.api_token(token);
                }
                ClassifierKind::Remote(remote)
            }
        };

        ScrapeConfig::new()
            .max_nodes(self.max_nodes)
            .html_cap(self.html_cap)
            .navigation_timeout(Duration::from_secs(self.navigation_timeout_secs))
            .classifier(classifier)
            .classify_concurrency(self.classify_concurrency)
    }

    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!self.headed).sandbox(!self.no_sandbox);
        if let Some(path) = &self.chrome_path {
            options = options.chrome_path(path);
        }
        options
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.scrape_config();
    let navigator = ChromeNavigator::new(cli.launch_options(), config.network_idle);

    log::info!("xpath-scraper v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Browser mode: {}", if cli.headed { "headed" } else { "headless" });
    log::info!("Classifier: {:?}, max nodes: {}", cli.classifier, config.max_nodes);

    let controller = JobController::new(Arc::new(navigator), config)?;
    let app = router(Arc::new(controller));

    let bind_addr = format!("{}:{}", cli.bind, cli.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
            log::info!("Shutting down");
        })
        .await?;

    Ok(())
}
