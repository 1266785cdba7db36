// src/domain/fixtures.rs
// Shared test fixtures: a well-formed model response document.

use serde_json::{json, Value};

use crate::domain::models::AnalysisPayload;
use crate::domain::validation::validate_payload;

/// A complete, schema-conforming response document.
pub fn sample_json() -> Value {
    json!({
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
            },
            {
                "currency": "EUR",
                "strength": 55,
                "trend": "down",
                "factors": ["Croissance atone en zone euro"],
                "fundamentals": {
                    "economicGrowth": 45,
                    "inflation": 55,
                    "interestRates": 60,
                    "employment": 58,
                    "tradeBalance": 52
                },
                "events": []
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
            "drivers": ["Tensions géopolitiques", "Ralentissement chinois"],
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
    })
}

/// The validated form of [`sample_json`].
pub fn sample_payload() -> AnalysisPayload {
    validate_payload(sample_json()).expect("fixture document must validate")
}
