use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionFlow {
    /// Single `/predict` call; rejects identical teams before dispatch.
    Combined,
    /// Legacy three-call flow (outcome, score, scorers).
    Split,
}

impl PredictionFlow {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "split" | "legacy" => PredictionFlow::Split,
            _ => PredictionFlow::Combined,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PredictionFlow::Combined => PredictionFlow::Split,
            PredictionFlow::Split => PredictionFlow::Combined,
        }
    }
}

pub fn flow_label(flow: PredictionFlow) -> &'static str {
    match flow {
        PredictionFlow::Combined => "COMBINED",
        PredictionFlow::Split => "SPLIT",
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub flow: PredictionFlow,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            flow: PredictionFlow::Combined,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("PREDICTOR_BASE_URL")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let flow = lookup("PREDICTOR_FLOW")
            .map(|val| PredictionFlow::parse(&val))
            .unwrap_or(PredictionFlow::Combined);
        let timeout_secs = lookup("PREDICTOR_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        Self {
            base_url,
            flow,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
