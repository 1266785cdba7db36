// src/domain/validation.rs
// Promotion of an untyped model response to the strict analysis types.
//
// Serde enforces field presence, types and enum membership per section; the
// explicit pass below enforces the numeric ranges. A violation anywhere
// rejects the whole document.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{
    AnalysisPayload, CurrencyCorrelation, CurrencyStrength, MarketSentiment, TradingOpportunity,
};

const INVALID_DOC: &str = "Données invalides";
const CURRENCIES_FAILED: &str = "Validation des devises échouée";
const OPPORTUNITIES_FAILED: &str = "Validation des opportunités échouée";
const CORRELATIONS_FAILED: &str = "Validation des corrélations échouée";
const SENTIMENT_FAILED: &str = "Validation du sentiment échouée";

/// Extract the first `{` .. last `}` span of `text`, tolerating incidental
/// prose around the JSON object.
pub fn extract_json_object(text: &str) -> AnalysisResult<&str> {
    let start = text.find('{').ok_or(AnalysisError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(AnalysisError::NoJsonObject)?;
    if end < start {
        return Err(AnalysisError::NoJsonObject);
    }
    Ok(&text[start..=end])
}

/// Validate a parsed response document and promote it to `AnalysisPayload`.
pub fn validate_payload(raw: Value) -> AnalysisResult<AnalysisPayload> {
    let Value::Object(mut doc) = raw else {
        return Err(AnalysisError::Validation(INVALID_DOC.to_string()));
    };

    let currencies: Vec<CurrencyStrength> = section(&mut doc, "currencies", CURRENCIES_FAILED)?;
    let opportunities: Vec<TradingOpportunity> =
        section(&mut doc, "opportunities", OPPORTUNITIES_FAILED)?;
    let correlations: Vec<CurrencyCorrelation> =
        section(&mut doc, "correlations", CORRELATIONS_FAILED)?;
    let market_sentiment: MarketSentiment =
        section(&mut doc, "marketSentiment", SENTIMENT_FAILED)?;

    for currency in &currencies {
        let scores = [
            currency.strength,
            currency.fundamentals.economic_growth,
            currency.fundamentals.inflation,
            currency.fundamentals.interest_rates,
            currency.fundamentals.employment,
            currency.fundamentals.trade_balance,
        ];
        if scores.iter().any(|score| !(0.0..=100.0).contains(score)) {
            return Err(AnalysisError::Validation(CURRENCIES_FAILED.to_string()));
        }
    }

    for opportunity in &opportunities {
        if !(0.0..=100.0).contains(&opportunity.strength) {
            return Err(AnalysisError::Validation(OPPORTUNITIES_FAILED.to_string()));
        }
    }

    for correlation in &correlations {
        if !(-1.0..=1.0).contains(&correlation.correlation) {
            return Err(AnalysisError::Validation(CORRELATIONS_FAILED.to_string()));
        }
    }

    let sentiment_scores = [
        market_sentiment.confidence,
        market_sentiment.fundamental_factors.economic_health,
        market_sentiment.fundamental_factors.geopolitical_risk,
        market_sentiment.fundamental_factors.market_liquidity,
        market_sentiment.fundamental_factors.global_growth,
    ];
    if sentiment_scores
        .iter()
        .any(|score| !(0.0..=100.0).contains(score))
    {
        return Err(AnalysisError::Validation(SENTIMENT_FAILED.to_string()));
    }

    Ok(AnalysisPayload {
        currencies,
        opportunities,
        correlations,
        market_sentiment,
    })
}

fn section<T: DeserializeOwned>(
    doc: &mut Map<String, Value>,
    key: &str,
    message: &str,
) -> AnalysisResult<T> {
    let value = doc
        .remove(key)
        .ok_or_else(|| AnalysisError::Validation(message.to_string()))?;

    serde_json::from_value(value).map_err(|e| {
        log::debug!("rejected '{}' section: {}", key, e);
        AnalysisError::Validation(message.to_string())
    })
}
