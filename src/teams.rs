use crate::api::TeamId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

const PREMIER_LEAGUE: [(u32, &str); 20] = [
    (1, "Arsenal"),
    (2, "Aston Villa"),
    (3, "Bournemouth"),
    (4, "Brentford"),
    (5, "Brighton"),
    (6, "Burnley"),
    (7, "Chelsea"),
    (8, "Crystal Palace"),
    (9, "Everton"),
    (10, "Fulham"),
    (11, "Liverpool"),
    (12, "Luton"),
    (13, "Manchester City"),
    (14, "Manchester United"),
    (15, "Newcastle"),
    (16, "Nottingham Forest"),
    (17, "Sheffield United"),
    (18, "Tottenham"),
    (19, "West Ham"),
    (20, "Wolves"),
];

pub fn premier_league_teams() -> Vec<Team> {
    PREMIER_LEAGUE
        .iter()
        .map(|(id, name)| Team {
            id: TeamId(*id),
            name: name.to_string(),
        })
        .collect()
}

pub fn team_name(teams: &[Team], id: TeamId) -> Option<&str> {
    teams.iter().find(|t| t.id == id).map(|t| t.name.as_str())
}
