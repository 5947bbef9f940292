use std::fmt;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub const PREDICT_PATH: &str = "/predict";
pub const PREDICT_MATCH_PATH: &str = "/api/predict/match";
pub const PREDICT_SCORE_PATH: &str = "/api/predict/score";
pub const PREDICT_SCORERS_PATH: &str = "/api/predict/scorers";

pub fn team_stats_path(team: TeamId) -> String {
    format!("/team-stats/{team}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Form selects submit their values as strings, so ids go over the wire the same way.
impl Serialize for TeamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSelection {
    pub home: TeamId,
    pub away: TeamId,
}

impl TeamSelection {
    pub fn new(home: TeamId, away: TeamId) -> Self {
        Self { home, away }
    }

    pub fn is_same_team(&self) -> bool {
        self.home == self.away
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
}

impl From<&TeamSelection> for PredictRequest {
    fn from(sel: &TeamSelection) -> Self {
        Self {
            home_team_id: sel.home,
            away_team_id: sel.away,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitRequest {
    pub home_team: TeamId,
    pub away_team: TeamId,
}

impl From<&TeamSelection> for SplitRequest {
    fn from(sel: &TeamSelection) -> Self {
        Self {
            home_team: sel.home,
            away_team: sel.away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedScore {
    pub home: u32,
    pub away: u32,
}

/// Payload of the combined `/predict` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub predicted_outcome: Option<String>,
    pub predicted_score: PredictedScore,
    pub outcome_probabilities: OutcomeProbabilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEnvelope {
    pub prediction: OutcomeProbabilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreGoals {
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEnvelope {
    pub prediction: ScoreGoals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerPrediction {
    pub player: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerLists {
    #[serde(default)]
    pub home_team_scorers: Vec<ScorerPrediction>,
    #[serde(default)]
    pub away_team_scorers: Vec<ScorerPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorersEnvelope {
    pub prediction: ScorerLists,
}

/// The three split-flow replies. They come from independent calls and are
/// only brought together when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPrediction {
    pub outcome: OutcomeEnvelope,
    pub score: ScoreEnvelope,
    pub scorers: ScorersEnvelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageStats {
    pub possession: f64,
    pub shots: f64,
    pub shots_on_target: f64,
    pub corners: f64,
    #[serde(default)]
    pub fouls: Option<f64>,
    #[serde(default)]
    pub goals_scored: Option<f64>,
    #[serde(default)]
    pub goals_conceded: Option<f64>,
    #[serde(default)]
    pub passes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMatch {
    pub date: String,
    pub opponent: String,
    pub team_score: u32,
    pub opponent_score: u32,
    #[serde(default)]
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_name: String,
    pub average_stats: AverageStats,
    #[serde(default)]
    pub recent_matches: Vec<RecentMatch>,
}

/// A decoded backend reply: either the payload, or an application-level
/// error the backend reported through an `error` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Data(T),
    Rejected(String),
}

impl<T> Reply<T> {
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Reply::Data(_) => None,
            Reply::Rejected(msg) => Some(msg),
        }
    }
}

pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Result<Reply<T>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid json reply")?;
    if let Some(message) = root.get("error").and_then(error_message) {
        return Ok(Reply::Rejected(message));
    }
    let data = serde_json::from_value(root).context("unexpected reply shape")?;
    Ok(Reply::Data(data))
}

fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_ids_serialize_as_strings() {
        let sel = TeamSelection::new(TeamId(7), TeamId(11));
        let body = serde_json::to_value(PredictRequest::from(&sel)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"home_team_id": "7", "away_team_id": "11"})
        );
    }

    #[test]
    fn falsy_error_fields_are_not_rejections() {
        let raw = r#"{"error": null, "prediction": {"home_goals": 1, "away_goals": 0}}"#;
        let reply = parse_reply::<ScoreEnvelope>(raw).unwrap();
        assert!(matches!(reply, Reply::Data(_)));

        let raw = r#"{"error": "", "success": false}"#;
        assert!(parse_reply::<ScoreEnvelope>(raw).is_err());
    }

    #[test]
    fn non_string_error_is_reported_as_json_text() {
        let reply = parse_reply::<ScoreEnvelope>(r#"{"error": {"code": 3}}"#).unwrap();
        assert_eq!(reply.rejection(), Some(r#"{"code":3}"#));
    }
}
