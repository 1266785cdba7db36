// src/application/analyzer.rs
// News-to-analysis pipeline

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{Analysis, NewsItem};
use crate::domain::validation::{extract_json_object, validate_payload};
use crate::infrastructure::openai::ChatApi;

/// System instruction enumerating the exact JSON shape expected back.
pub const SYSTEM_PROMPT: &str = r#"En tant qu'analyste forex professionnel, analysez les nouvelles fournies et générez une analyse fondamentale structurée. Répondez UNIQUEMENT avec un objet JSON valide, sans formatage ou texte supplémentaire.

Format de réponse attendu :
{
  "currencies": [
    {
      "currency": "USD",
      "strength": 75,
      "trend": "up",
      "factors": ["Hausse des taux Fed", "Croissance robuste"],
      "fundamentals": {
        "economicGrowth": 80,
        "inflation": 65,
        "interestRates": 85,
        "employment": 75,
        "tradeBalance": 60
      },
      "events": [
        {
          "impact": "high",
          "description": "Réunion Fed",
          "date": "2024-03-20"
        }
      ]
    }
  ],
  "opportunities": [
    {
      "pair": "EUR/USD",
      "type": "sell",
      "timeframe": "moyen",
      "strength": 85,
      "reasoning": [
        "Divergence politique monétaire",
        "Différentiel de croissance favorable au USD"
      ],
      "risk": "modéré",
      "stopLoss": 1.0850,
      "target": 1.0650,
      "riskRewardRatio": 2.5,
      "fundamentalFactors": {
        "monetaryPolicy": "Divergence croissante Fed/BCE",
        "economicData": "USA plus robuste que Zone Euro",
        "politicalFactors": "Stabilité politique US",
        "marketSentiment": "Préférence pour le dollar"
      }
    }
  ],
  "correlations": [
    {
      "pair": "EUR/USD",
      "correlation": -0.85,
      "explanation": "Forte corrélation négative due à la divergence des politiques monétaires",
      "strength": "forte",
      "fundamentalDrivers": [
        "Différentiel de taux d'intérêt",
        "Croissance économique relative"
      ],
      "period": "1m"
    }
  ],
  "marketSentiment": {
    "overall": "risk-off",
    "confidence": 75,
    "drivers": [
      "Tensions géopolitiques",
      "Ralentissement chinois"
    ],
    "fundamentalFactors": {
      "economicHealth": 65,
      "monetaryPolicy": "hawkish",
      "geopoliticalRisk": 70,
      "marketLiquidity": 80,
      "globalGrowth": 60
    },
    "keyEvents": [
      {
        "event": "Publication PIB US",
        "impact": "high",
        "date": "2024-03-28"
      }
    ]
  }
}

IMPORTANT:
- Les tendances (trend) doivent être exactement "up", "down" ou "neutral"
- Les forces (strength) doivent être entre 0 et 100
- Les types d'opportunités doivent être "buy" ou "sell"
- Les timeframes doivent être "court", "moyen" ou "long"
- Les niveaux de risque doivent être "faible", "modéré" ou "élevé"
- Le sentiment global doit être "risk-on", "risk-off" ou "neutral"
- Les corrélations doivent être entre -1 et 1
- Les forces de corrélation doivent être "forte", "moyenne" ou "faible"
- Les périodes doivent être "1j", "1s" ou "1m""#;

/// Compact form of one news item as submitted to the model.
#[derive(Serialize)]
struct NewsDigest<'a> {
    title: &'a str,
    description: &'a str,
    date: &'a str,
}

/// Runs one news slice through the chat-completion endpoint and promotes the
/// response to a validated snapshot.
pub struct MarketAnalyzer {
    chat: Arc<dyn ChatApi>,
}

impl MarketAnalyzer {
    pub fn new(chat: Arc<dyn ChatApi>) -> Self {
        Self { chat }
    }

    /// Run one analysis over `news`. The caller truncates the slice to the
    /// configured count and enforces the cooldown; `progress` is invoked at
    /// the fixed milestones. Any failure is a single descriptive error, never
    /// a partial result.
    pub async fn analyze<F>(
        &self,
        news: &[NewsItem],
        api_key: &str,
        model: &str,
        mut progress: F,
    ) -> AnalysisResult<Analysis>
    where
        F: FnMut(u8, &str),
    {
        progress(10, "Préparation de l'analyse...");

        let digest: Vec<NewsDigest> = news
            .iter()
            .map(|item| NewsDigest {
                title: &item.title,
                description: &item.description,
                date: &item.pub_date,
            })
            .collect();
        let user_turn =
            serde_json::to_string(&digest).map_err(|e| AnalysisError::Parse(e.to_string()))?;

        progress(30, "Analyse des nouvelles...");
        let content = self
            .chat
            .complete(api_key, model, SYSTEM_PROMPT, &user_turn)
            .await?;

        progress(60, "Traitement de la réponse...");
        let span = extract_json_object(&content)?;
        let raw: serde_json::Value =
            serde_json::from_str(span).map_err(|e| AnalysisError::Parse(e.to_string()))?;

        progress(80, "Validation de l'analyse...");
        let payload = validate_payload(raw)?;
        let analysis = Analysis::from_payload(payload, Utc::now().timestamp_millis());

        progress(100, "Analyse terminée");
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_json;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeChat {
        response: String,
        calls: AtomicUsize,
    }

    impl FakeChat {
        fn returning(response: String) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatApi for FakeChat {
        async fn complete(
            &self,
            _api_key: &str,
            _model: &str,
            _system: &str,
            _user: &str,
        ) -> AnalysisResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn news() -> Vec<NewsItem> {
        vec![NewsItem {
            title: "Fed holds rates".to_string(),
            description: "No change this meeting".to_string(),
            pub_date: "Wed, 20 Mar 2024 14:00:00 GMT".to_string(),
            link: "https://example.test/1".to_string(),
        }]
    }

    #[tokio::test]
    async fn prose_wrapped_response_still_parses() {
        let chat = FakeChat::returning(format!("Voici le JSON : {} Merci !", sample_json()));
        let analyzer = MarketAnalyzer::new(chat.clone());

        let mut milestones = Vec::new();
        let analysis = analyzer
            .analyze(&news(), "sk-test", "gpt-4-turbo-preview", |value, _| {
                milestones.push(value)
            })
            .await
            .unwrap();

        assert_eq!(milestones, vec![10, 30, 60, 80, 100]);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
        // 75 reported by the model, damped to 60.
        assert_eq!(analysis.confidence, 60);
        assert_eq!(analysis.currencies.len(), 2);
    }

    #[tokio::test]
    async fn response_without_a_json_object_is_rejected() {
        let chat = FakeChat::returning("Désolé, aucune analyse possible.".to_string());
        let analyzer = MarketAnalyzer::new(chat);

        let err = analyzer
            .analyze(&news(), "sk-test", "gpt-4-turbo-preview", |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::NoJsonObject));
    }

    #[tokio::test]
    async fn unparseable_span_is_a_parse_error() {
        let chat = FakeChat::returning("voici { pas du json }".to_string());
        let analyzer = MarketAnalyzer::new(chat);

        let err = analyzer
            .analyze(&news(), "sk-test", "gpt-4-turbo-preview", |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[tokio::test]
    async fn schema_violation_stops_at_the_validation_milestone() {
        let mut doc = sample_json();
        doc["currencies"][0]["strength"] = serde_json::json!(150);
        let chat = FakeChat::returning(doc.to_string());
        let analyzer = MarketAnalyzer::new(chat);

        let mut milestones = Vec::new();
        let err = analyzer
            .analyze(&news(), "sk-test", "gpt-4-turbo-preview", |value, _| {
                milestones.push(value)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Validation(_)));
        assert_eq!(milestones, vec![10, 30, 60, 80]);
    }
}
