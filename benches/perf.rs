use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pl_predictor::api::{MatchPrediction, Reply, TeamStats, parse_reply};
use pl_predictor::render::{prediction_lines, prediction_view, stats_lines, stats_view};

fn bench_prediction_parse_render(c: &mut Criterion) {
    c.bench_function("prediction_parse_render", |b| {
        b.iter(|| {
            let reply = parse_reply::<MatchPrediction>(black_box(PREDICTION_JSON)).unwrap();
            let Reply::Data(prediction) = reply else {
                panic!("fixture is not an error reply");
            };
            black_box(prediction_lines(&prediction_view(&prediction)));
        })
    });
}

fn bench_team_stats_parse_render(c: &mut Criterion) {
    let stats_json = team_stats_json(20);
    c.bench_function("team_stats_parse_render", |b| {
        b.iter(|| {
            let reply = parse_reply::<TeamStats>(black_box(&stats_json)).unwrap();
            let Reply::Data(stats) = reply else {
                panic!("fixture is not an error reply");
            };
            black_box(stats_lines(&stats_view(&stats)));
        })
    });
}

fn team_stats_json(matches: usize) -> String {
    let recent = (0..matches)
        .map(|idx| {
            format!(
                r#"{{"date":"2024-03-{:02}","opponent":"Team {idx}","team_score":{},"opponent_score":{},"venue":"{}"}}"#,
                idx % 28 + 1,
                idx % 4,
                (idx + 1) % 3,
                if idx % 2 == 0 { "H" } else { "A" }
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"team_name":"Test FC","recent_matches":[{recent}],"average_stats":{{"possession":55.5,"shots":12.3,"shots_on_target":5.2,"corners":6.1,"fouls":10.2}}}}"#
    )
}

const PREDICTION_JSON: &str = r#"{
    "home_team": "Arsenal",
    "away_team": "Chelsea",
    "predicted_outcome": "H",
    "outcome_probabilities": {"home_win": 0.55, "draw": 0.25, "away_win": 0.2},
    "predicted_score": {"home": 2, "away": 1}
}"#;

criterion_group!(
    benches,
    bench_prediction_parse_render,
    bench_team_stats_parse_render
);
criterion_main!(benches);
