use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{
    self, MatchPrediction, OutcomeEnvelope, PredictRequest, Reply, ScoreEnvelope,
    ScorersEnvelope, SplitPrediction, SplitRequest, TeamId, TeamSelection, TeamStats,
};
use crate::transport::Transport;

pub fn predict_combined(
    transport: &dyn Transport,
    selection: &TeamSelection,
) -> Result<Reply<MatchPrediction>> {
    post_reply(transport, api::PREDICT_PATH, &PredictRequest::from(selection))
        .context("match prediction")
}

/// Issues the outcome, score and scorer calls one after another. Every call is
/// made even if an earlier one was rejected; the first rejection is reported.
pub fn predict_split(
    transport: &dyn Transport,
    selection: &TeamSelection,
) -> Result<Reply<SplitPrediction>> {
    let body = SplitRequest::from(selection);
    let outcome: Reply<OutcomeEnvelope> =
        post_reply(transport, api::PREDICT_MATCH_PATH, &body).context("outcome prediction")?;
    let score: Reply<ScoreEnvelope> =
        post_reply(transport, api::PREDICT_SCORE_PATH, &body).context("score prediction")?;
    let scorers: Reply<ScorersEnvelope> =
        post_reply(transport, api::PREDICT_SCORERS_PATH, &body).context("scorer prediction")?;

    let reply = match (outcome, score, scorers) {
        (Reply::Data(outcome), Reply::Data(score), Reply::Data(scorers)) => {
            Reply::Data(SplitPrediction {
                outcome,
                score,
                scorers,
            })
        }
        (Reply::Rejected(msg), _, _)
        | (_, Reply::Rejected(msg), _)
        | (_, _, Reply::Rejected(msg)) => Reply::Rejected(msg),
    };
    Ok(reply)
}

pub fn fetch_team_stats(transport: &dyn Transport, team: TeamId) -> Result<Reply<TeamStats>> {
    let body = transport
        .get(&api::team_stats_path(team))
        .context("request failed")?;
    api::parse_reply(&body).with_context(|| format!("team stats for {team}"))
}

fn post_reply<B: Serialize, T: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
    body: &B,
) -> Result<Reply<T>> {
    let body = serde_json::to_value(body).context("serialize request body")?;
    let raw = transport.post_json(path, &body).context("request failed")?;
    api::parse_reply(&raw)
}
