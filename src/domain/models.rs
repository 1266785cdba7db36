// src/domain/models.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Damping applied to the model's self-reported confidence when deriving the
/// top-level score. Fixed constant, no deeper rationale.
pub const CONFIDENCE_DAMPING: f64 = 0.8;

/// One entry of the syndicated news feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub pub_date: String,
    pub link: String,
}

/// Currency trend as reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Impact level of a dated economic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Suggested trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Horizon of a trading opportunity. Wire values are the French labels the
/// model is instructed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Court,
    Moyen,
    Long,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Timeframe::Court => write!(f, "court"),
            Timeframe::Moyen => write!(f, "moyen"),
            Timeframe::Long => write!(f, "long"),
        }
    }
}

/// Qualitative risk level, French wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "faible")]
    Faible,
    #[serde(rename = "modéré")]
    Modere,
    #[serde(rename = "élevé")]
    Eleve,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Faible => "faible",
            RiskLevel::Modere => "modéré",
            RiskLevel::Eleve => "élevé",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strength of a reported correlation, French wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    #[serde(rename = "forte")]
    Forte,
    #[serde(rename = "moyenne")]
    Moyenne,
    #[serde(rename = "faible")]
    Faible,
}

/// Observation window of a correlation: one day, one week, one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationPeriod {
    #[serde(rename = "1j")]
    Day,
    #[serde(rename = "1s")]
    Week,
    #[serde(rename = "1m")]
    Month,
}

/// Overall market mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentOverall {
    #[serde(rename = "risk-on")]
    RiskOn,
    #[serde(rename = "risk-off")]
    RiskOff,
    #[serde(rename = "neutral")]
    Neutral,
}

impl SentimentOverall {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentOverall::RiskOn => "risk-on",
            SentimentOverall::RiskOff => "risk-off",
            SentimentOverall::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentOverall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Central-bank policy stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonetaryPolicy {
    Hawkish,
    Dovish,
    Neutral,
}

/// Per-currency fundamental sub-scores, each on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFundamentals {
    pub economic_growth: f64,
    pub inflation: f64,
    pub interest_rates: f64,
    pub employment: f64,
    pub trade_balance: f64,
}

/// A dated event attached to a currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub impact: Impact,
    pub description: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyStrength {
    pub currency: String,
    pub strength: f64,
    pub trend: Trend,
    pub factors: Vec<String>,
    pub fundamentals: CurrencyFundamentals,
    pub events: Vec<EconomicEvent>,
}

/// Narrative factors backing an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityFactors {
    pub monetary_policy: String,
    pub economic_data: String,
    pub political_factors: String,
    pub market_sentiment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingOpportunity {
    pub pair: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub timeframe: Timeframe,
    pub strength: f64,
    pub reasoning: Vec<String>,
    pub risk: RiskLevel,
    pub stop_loss: Decimal,
    pub target: Decimal,
    pub risk_reward_ratio: Decimal,
    pub fundamental_factors: OpportunityFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyCorrelation {
    pub pair: String,
    pub correlation: f64,
    pub explanation: String,
    pub strength: CorrelationStrength,
    pub fundamental_drivers: Vec<String>,
    pub period: CorrelationPeriod,
}

/// Macro factors backing the sentiment call. Numeric fields are 0-100 scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentFactors {
    pub economic_health: f64,
    pub monetary_policy: MonetaryPolicy,
    pub geopolitical_risk: f64,
    pub market_liquidity: f64,
    pub global_growth: f64,
}

/// A dated market-moving event attached to the sentiment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub event: String,
    pub impact: Impact,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSentiment {
    pub overall: SentimentOverall,
    pub confidence: f64,
    pub drivers: Vec<String>,
    pub fundamental_factors: SentimentFactors,
    pub key_events: Vec<KeyEvent>,
}

/// The four validated sections of a model response, before the snapshot
/// metadata is attached. Only the validator constructs this.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPayload {
    pub currencies: Vec<CurrencyStrength>,
    pub opportunities: Vec<TradingOpportunity>,
    pub correlations: Vec<CurrencyCorrelation>,
    pub market_sentiment: MarketSentiment,
}

/// An immutable, fully validated analysis snapshot. Replaced wholesale on each
/// successful run; never exposed partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub currencies: Vec<CurrencyStrength>,
    pub opportunities: Vec<TradingOpportunity>,
    pub correlations: Vec<CurrencyCorrelation>,
    pub market_sentiment: MarketSentiment,
    /// Generation time, epoch milliseconds.
    pub timestamp: i64,
    /// Damped overall confidence, 0-100.
    pub confidence: u8,
}

impl Analysis {
    /// Promote a validated payload to a snapshot, deriving the damped
    /// top-level confidence from the sentiment's self-reported one.
    pub fn from_payload(payload: AnalysisPayload, timestamp: i64) -> Self {
        let confidence =
            (payload.market_sentiment.confidence * CONFIDENCE_DAMPING).round() as u8;

        Self {
            currencies: payload.currencies,
            opportunities: payload.opportunities,
            correlations: payload.correlations,
            market_sentiment: payload.market_sentiment,
            timestamp,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn confidence_is_damped_and_rounded() {
        let mut payload = crate::domain::fixtures::sample_payload();
        payload.market_sentiment.confidence = 75.0;

        let analysis = Analysis::from_payload(payload, 1_700_000_000_000);
        assert_eq!(analysis.confidence, 60);
        assert_eq!(analysis.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn french_wire_values_round_trip() {
        let risk: RiskLevel = serde_json::from_str("\"modéré\"").unwrap();
        assert_eq!(risk, RiskLevel::Modere);
        assert_eq!(serde_json::to_string(&risk).unwrap(), "\"modéré\"");

        let period: CorrelationPeriod = serde_json::from_str("\"1j\"").unwrap();
        assert_eq!(period, CorrelationPeriod::Day);

        let overall: SentimentOverall = serde_json::from_str("\"risk-off\"").unwrap();
        assert_eq!(overall, SentimentOverall::RiskOff);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        assert!(serde_json::from_str::<Trend>("\"sideways\"").is_err());
        assert!(serde_json::from_str::<Timeframe>("\"short\"").is_err());
    }
}
