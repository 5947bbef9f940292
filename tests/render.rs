mod common;

use common::read_fixture;
use pl_predictor::api::{
    AverageStats, MatchPrediction, OutcomeEnvelope, OutcomeProbabilities, PredictedScore,
    RecentMatch, Reply, ScoreEnvelope, ScorersEnvelope, SplitPrediction, TeamStats, parse_reply,
};
use pl_predictor::render::{
    MatchResult, Outcome, RECENT_MATCHES_LIMIT, Tone, chart_view, most_likely, prediction_lines,
    prediction_view, split_prediction_view, stats_lines, stats_view,
};

fn probs(home_win: f64, draw: f64, away_win: f64) -> OutcomeProbabilities {
    OutcomeProbabilities {
        home_win,
        draw,
        away_win,
    }
}

fn data<T: serde::de::DeserializeOwned>(fixture: &str) -> T {
    match parse_reply::<T>(&read_fixture(fixture)).expect("fixture should parse") {
        Reply::Data(value) => value,
        Reply::Rejected(msg) => panic!("unexpected rejection: {msg}"),
    }
}

#[test]
fn clear_favourite_is_reported_with_one_decimal_percentages() {
    let prediction = MatchPrediction {
        home_team: Some("Arsenal".to_string()),
        away_team: Some("Chelsea".to_string()),
        predicted_outcome: None,
        predicted_score: PredictedScore { home: 2, away: 1 },
        outcome_probabilities: probs(0.55, 0.25, 0.20),
    };
    let view = prediction_view(&prediction);

    assert_eq!(view.most_likely, Outcome::HomeWin);
    assert_eq!(view.most_likely.label(), "Home Win");
    let texts = view
        .probabilities
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(texts, ["55.0%", "25.0%", "20.0%"]);
}

#[test]
fn ties_keep_the_earliest_outcome() {
    assert_eq!(most_likely(&probs(0.40, 0.40, 0.20)), Outcome::HomeWin);
    assert_eq!(most_likely(&probs(0.20, 0.40, 0.40)), Outcome::Draw);
    assert_eq!(most_likely(&probs(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)), Outcome::HomeWin);
    assert_eq!(most_likely(&probs(0.1, 0.2, 0.7)), Outcome::AwayWin);
}

#[test]
fn result_letters_and_tones_follow_the_score() {
    let cases = [
        (2, 1, MatchResult::Win, 'W', Tone::Success),
        (1, 2, MatchResult::Loss, 'L', Tone::Danger),
        (2, 2, MatchResult::Draw, 'D', Tone::Warning),
        (0, 0, MatchResult::Draw, 'D', Tone::Warning),
    ];
    for (team, opp, result, letter, tone) in cases {
        let derived = MatchResult::from_scores(team, opp);
        assert_eq!(derived, result, "{team}-{opp}");
        assert_eq!(derived.letter(), letter);
        assert_eq!(derived.tone(), tone);
    }
}

#[test]
fn stats_view_renders_table_and_recent_form() {
    let stats: TeamStats = data("team_stats.json");
    let view = stats_view(&stats);

    assert_eq!(view.team_name, "Liverpool");
    let rows = view
        .rows
        .iter()
        .map(|r| (r.label, r.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        [
            ("Average Possession", "55.5%"),
            ("Average Shots", "12.3"),
            ("Shots on Target", "5.2"),
            ("Average Corners", "6"),
        ]
    );

    let letters = view
        .recent
        .iter()
        .map(|m| m.result.letter())
        .collect::<String>();
    assert_eq!(letters, "WLD");
    assert_eq!(view.recent[0].date, "01 Mar 2024");
    assert_eq!(view.recent[0].score, "2-1");
    assert_eq!(view.recent[2].date, "17 Feb 2024");

    let lines = stats_lines(&view);
    assert!(lines.iter().any(|l| l == "  01 Mar 2024 W vs Everton (2-1) H"));
}

#[test]
fn recent_matches_are_capped() {
    let recent = (0..8)
        .map(|i| RecentMatch {
            date: format!("2024-01-{:02}", i + 1),
            opponent: format!("Team {i}"),
            team_score: i,
            opponent_score: 3,
            venue: "H".to_string(),
        })
        .collect::<Vec<_>>();
    let stats = TeamStats {
        team_name: "Test FC".to_string(),
        average_stats: AverageStats {
            possession: 50.0,
            shots: 10.0,
            shots_on_target: 4.0,
            corners: 5.0,
            fouls: None,
            goals_scored: None,
            goals_conceded: None,
            passes: None,
        },
        recent_matches: recent,
    };
    let view = stats_view(&stats);
    assert_eq!(view.recent.len(), RECENT_MATCHES_LIMIT);
    assert_eq!(view.recent[0].opponent, "Team 0");
}

#[test]
fn chart_covers_six_dimensions_with_missing_values_as_zero() {
    let stats: TeamStats = data("team_stats.json");
    let chart = chart_view(&stats);

    let labels = chart.points.iter().map(|(l, _)| *l).collect::<Vec<_>>();
    assert_eq!(
        labels,
        [
            "Goals Scored",
            "Goals Conceded",
            "Possession",
            "Shots",
            "Shots on Target",
            "Passes"
        ]
    );
    assert_eq!(chart.points[0].1, 2.4);
    assert_eq!(chart.points[1].1, 0.0);
    assert_eq!(chart.points[5].1, 512.0);
    assert_eq!(chart.suggested_max, 100.0);
    assert_eq!(chart.label, "Liverpool");
}

#[test]
fn split_view_combines_three_replies() {
    let prediction = SplitPrediction {
        outcome: data::<OutcomeEnvelope>("predict_match.json"),
        score: data::<ScoreEnvelope>("predict_score.json"),
        scorers: data::<ScorersEnvelope>("predict_scorers.json"),
    };
    let view = split_prediction_view(&prediction);

    assert_eq!(view.most_likely, Outcome::HomeWin);
    assert_eq!((view.score_home, view.score_away), (1, 1));
    let scorers = view.scorers.as_ref().expect("split view has scorers");
    assert_eq!(scorers.home[0].text, "B. Saka (42.0%)");
    assert_eq!(scorers.home[1].text, "K. Havertz (31.5%)");
    assert_eq!(scorers.away[0].text, "C. Palmer (38.0%)");

    let lines = prediction_lines(&view);
    assert!(lines.contains(&"Predicted score: 1 - 1".to_string()));
    assert!(lines.contains(&"Most likely outcome: Home Win".to_string()));
    assert!(lines.contains(&"  Away: C. Palmer (38.0%)".to_string()));
}

#[test]
fn combined_lines_include_names_and_model_pick() {
    let prediction: MatchPrediction = data("predict_combined.json");
    let lines = prediction_lines(&prediction_view(&prediction));
    assert_eq!(lines[0], "Arsenal vs Chelsea");
    assert!(lines.contains(&"Home Win: 55.0%".to_string()));
    assert!(lines.contains(&"Draw: 25.0%".to_string()));
    assert!(lines.contains(&"Away Win: 20.0%".to_string()));
    assert!(lines.contains(&"Model pick: H".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("Likely scorers")));
}
