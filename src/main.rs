// src/main.rs
use std::path::PathBuf;
use std::sync::Arc;

use forex_analyzer::application::store::SNAPSHOT_FILE;
use forex_analyzer::application::{AnalysisStore, MarketAnalyzer};
use forex_analyzer::config::{Settings, SETTINGS_FILE};
use forex_analyzer::domain::errors::AppResult;
use forex_analyzer::domain::models::Analysis;
use forex_analyzer::infrastructure::feed::FeedFetcher;
use forex_analyzer::infrastructure::openai::OpenAiClient;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The error display is the user-facing message.
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    // Load configuration
    let mut settings = Settings::load(SETTINGS_FILE);
    settings.apply_env_overrides();

    // Initialize logging
    settings.init_logging()?;

    log::info!("Starting forex_analyzer v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using feed {}", settings.feed_url);

    // Fetch the news feed
    let fetcher = FeedFetcher::new(reqwest::Client::new());
    let mut news = fetcher.fetch(&settings.feed_url).await?;
    news.truncate(settings.news_count);
    log::info!("Fetched {} news item(s)", news.len());

    // Run one analysis pass through the store
    let chat = Arc::new(OpenAiClient::new()?);
    let analyzer = MarketAnalyzer::new(chat);
    let mut store = AnalysisStore::new(analyzer, Some(PathBuf::from(SNAPSHOT_FILE)));

    store
        .analyze_news(&news, &settings.api_key, &settings.model)
        .await?;

    if let Some(analysis) = store.analysis() {
        render_summary(analysis);
    }

    Ok(())
}

/// Log the validated snapshot, widget by widget.
fn render_summary(analysis: &Analysis) {
    if let Some(generated) = chrono::DateTime::from_timestamp_millis(analysis.timestamp) {
        log::info!("=== Analyse générée le {} ===", generated.format("%d/%m/%Y %H:%M"));
    }
    log::info!(
        "Sentiment : {} (confiance {}%, score global {}%)",
        analysis.market_sentiment.overall,
        analysis.market_sentiment.confidence,
        analysis.confidence
    );

    for currency in &analysis.currencies {
        log::info!(
            "{} : force {:.0} tendance {}",
            currency.currency,
            currency.strength,
            currency.trend
        );
    }

    for opportunity in &analysis.opportunities {
        log::info!(
            "{} {} ({}) force {:.0} risque {} SL {} TP {} R/R {}",
            opportunity.side,
            opportunity.pair,
            opportunity.timeframe,
            opportunity.strength,
            opportunity.risk,
            opportunity.stop_loss,
            opportunity.target,
            opportunity.risk_reward_ratio
        );
    }

    for correlation in &analysis.correlations {
        log::info!(
            "Corrélation {} : {:+.2} ({})",
            correlation.pair,
            correlation.correlation,
            correlation.explanation
        );
    }
}
