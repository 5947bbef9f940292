//! Pure view builders: typed backend payloads in, display-ready values out.
//! Nothing here touches the terminal, so formatting is testable on its own.

use chrono::{NaiveDate, NaiveDateTime};

use crate::api::{
    MatchPrediction, OutcomeProbabilities, RecentMatch, ScorerLists, ScorerPrediction,
    SplitPrediction, TeamStats,
};

pub const RECENT_MATCHES_LIMIT: usize = 5;
pub const CHART_SUGGESTED_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "Home Win",
            Outcome::Draw => "Draw",
            Outcome::AwayWin => "Away Win",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Warning,
}

impl MatchResult {
    pub fn from_scores(team_score: u32, opponent_score: u32) -> Self {
        if team_score > opponent_score {
            MatchResult::Win
        } else if team_score < opponent_score {
            MatchResult::Loss
        } else {
            MatchResult::Draw
        }
    }

    pub fn letter(self) -> char {
        match self {
            MatchResult::Win => 'W',
            MatchResult::Loss => 'L',
            MatchResult::Draw => 'D',
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            MatchResult::Win => Tone::Success,
            MatchResult::Loss => Tone::Danger,
            MatchResult::Draw => Tone::Warning,
        }
    }
}

/// Highest of home_win, draw, away_win, evaluated in that order. A candidate
/// only takes over on strictly greater probability, so ties keep the earlier one.
pub fn most_likely(p: &OutcomeProbabilities) -> Outcome {
    let candidates = [
        (Outcome::HomeWin, p.home_win),
        (Outcome::Draw, p.draw),
        (Outcome::AwayWin, p.away_win),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// One decimal place, ties rounded away from zero (`12.25` shows as `12.3`).
pub fn format_pct(probability: f64) -> String {
    let pct = probability * 100.0;
    format!("{:.1}%", (pct * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityRow {
    pub outcome: Outcome,
    pub probability: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorerRow {
    pub player: String,
    pub probability: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorerColumns {
    pub home: Vec<ScorerRow>,
    pub away: Vec<ScorerRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub score_home: u32,
    pub score_away: u32,
    pub most_likely: Outcome,
    pub probabilities: [ProbabilityRow; 3],
    pub model_pick: Option<String>,
    pub scorers: Option<ScorerColumns>,
}

pub fn prediction_view(prediction: &MatchPrediction) -> PredictionView {
    PredictionView {
        home_team: prediction.home_team.clone(),
        away_team: prediction.away_team.clone(),
        score_home: prediction.predicted_score.home,
        score_away: prediction.predicted_score.away,
        most_likely: most_likely(&prediction.outcome_probabilities),
        probabilities: probability_rows(&prediction.outcome_probabilities),
        model_pick: prediction
            .predicted_outcome
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        scorers: None,
    }
}

pub fn split_prediction_view(prediction: &SplitPrediction) -> PredictionView {
    let probabilities = &prediction.outcome.prediction;
    let goals = &prediction.score.prediction;
    PredictionView {
        home_team: None,
        away_team: None,
        score_home: goals.home_goals,
        score_away: goals.away_goals,
        most_likely: most_likely(probabilities),
        probabilities: probability_rows(probabilities),
        model_pick: None,
        scorers: Some(scorer_columns(&prediction.scorers.prediction)),
    }
}

fn probability_rows(p: &OutcomeProbabilities) -> [ProbabilityRow; 3] {
    [
        (Outcome::HomeWin, p.home_win),
        (Outcome::Draw, p.draw),
        (Outcome::AwayWin, p.away_win),
    ]
    .map(|(outcome, probability)| ProbabilityRow {
        outcome,
        probability,
        text: format_pct(probability),
    })
}

fn scorer_columns(lists: &ScorerLists) -> ScorerColumns {
    ScorerColumns {
        home: lists.home_team_scorers.iter().map(scorer_row).collect(),
        away: lists.away_team_scorers.iter().map(scorer_row).collect(),
    }
}

fn scorer_row(scorer: &ScorerPrediction) -> ScorerRow {
    ScorerRow {
        player: scorer.player.clone(),
        probability: scorer.probability,
        text: format!("{} ({})", scorer.player, format_pct(scorer.probability)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentRow {
    pub date: String,
    pub result: MatchResult,
    pub opponent: String,
    pub score: String,
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub team_name: String,
    pub rows: [StatLine; 4],
    pub recent: Vec<RecentRow>,
}

pub fn stats_view(stats: &TeamStats) -> StatsView {
    let avg = &stats.average_stats;
    StatsView {
        team_name: stats.team_name.clone(),
        rows: [
            StatLine {
                label: "Average Possession",
                value: format!("{}%", avg.possession),
            },
            StatLine {
                label: "Average Shots",
                value: avg.shots.to_string(),
            },
            StatLine {
                label: "Shots on Target",
                value: avg.shots_on_target.to_string(),
            },
            StatLine {
                label: "Average Corners",
                value: avg.corners.to_string(),
            },
        ],
        recent: stats
            .recent_matches
            .iter()
            .take(RECENT_MATCHES_LIMIT)
            .map(recent_row)
            .collect(),
    }
}

fn recent_row(m: &RecentMatch) -> RecentRow {
    RecentRow {
        date: format_match_date(&m.date),
        result: MatchResult::from_scores(m.team_score, m.opponent_score),
        opponent: m.opponent.clone(),
        score: format!("{}-{}", m.team_score, m.opponent_score),
        venue: m.venue.clone(),
    }
}

pub fn format_match_date(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "-".to_string();
    }
    match parse_match_date(cleaned) {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => cleaned.to_string(),
    }
}

fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        // Flask serializes dates in this HTTP-date shape.
        "%a, %d %b %Y %H:%M:%S GMT",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub label: String,
    pub points: [(&'static str, f64); 6],
    pub suggested_max: f64,
}

pub fn chart_view(stats: &TeamStats) -> ChartView {
    let avg = &stats.average_stats;
    ChartView {
        label: stats.team_name.clone(),
        points: [
            ("Goals Scored", avg.goals_scored.unwrap_or(0.0)),
            ("Goals Conceded", avg.goals_conceded.unwrap_or(0.0)),
            ("Possession", avg.possession),
            ("Shots", avg.shots),
            ("Shots on Target", avg.shots_on_target),
            ("Passes", avg.passes.unwrap_or(0.0)),
        ],
        suggested_max: CHART_SUGGESTED_MAX,
    }
}

pub fn prediction_lines(view: &PredictionView) -> Vec<String> {
    let mut lines = Vec::new();
    if let (Some(home), Some(away)) = (&view.home_team, &view.away_team) {
        lines.push(format!("{home} vs {away}"));
    }
    lines.push(format!(
        "Predicted score: {} - {}",
        view.score_home, view.score_away
    ));
    lines.push(format!("Most likely outcome: {}", view.most_likely.label()));
    for row in &view.probabilities {
        lines.push(format!("{}: {}", row.outcome.label(), row.text));
    }
    if let Some(pick) = &view.model_pick {
        lines.push(format!("Model pick: {pick}"));
    }
    if let Some(scorers) = &view.scorers {
        lines.push("Likely scorers".to_string());
        lines.push(format!("  Home: {}", scorer_list(&scorers.home)));
        lines.push(format!("  Away: {}", scorer_list(&scorers.away)));
    }
    lines
}

fn scorer_list(rows: &[ScorerRow]) -> String {
    if rows.is_empty() {
        return "-".to_string();
    }
    rows.iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn stats_lines(view: &StatsView) -> Vec<String> {
    let mut lines = vec![view.team_name.clone()];
    for row in &view.rows {
        lines.push(format!("{}: {}", row.label, row.value));
    }
    lines.push("Recent Matches".to_string());
    if view.recent.is_empty() {
        lines.push("  none".to_string());
    }
    for m in &view.recent {
        lines.push(recent_line(m));
    }
    lines
}

pub fn recent_line(m: &RecentRow) -> String {
    let venue = if m.venue.is_empty() {
        String::new()
    } else {
        format!(" {}", m.venue)
    };
    format!(
        "  {} {} vs {} ({}){venue}",
        m.date,
        m.result.letter(),
        m.opponent,
        m.score
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_keep_one_decimal() {
        assert_eq!(format_pct(0.2), "20.0%");
        assert_eq!(format_pct(1.0), "100.0%");
        assert_eq!(format_pct(0.0), "0.0%");
        assert_eq!(format_pct(0.333), "33.3%");
    }

    #[test]
    fn percentage_ties_round_up() {
        assert_eq!(format_pct(0.0625), "6.3%");
        assert_eq!(format_pct(0.1225), "12.3%");
        assert_eq!(format_pct(0.0025), "0.3%");
        assert_eq!(format_pct(0.3125), "31.3%");
    }

    #[test]
    fn dates_fall_back_to_raw_text() {
        assert_eq!(format_match_date("2024-03-01"), "01 Mar 2024");
        assert_eq!(format_match_date("Fri, 01 Mar 2024 00:00:00 GMT"), "01 Mar 2024");
        assert_eq!(format_match_date("last week"), "last week");
        assert_eq!(format_match_date("  "), "-");
    }

    #[test]
    fn nan_probability_never_wins() {
        let p = OutcomeProbabilities {
            home_win: 0.3,
            draw: f64::NAN,
            away_win: 0.2,
        };
        assert_eq!(most_likely(&p), Outcome::HomeWin);
    }
}
