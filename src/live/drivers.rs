//! 2024 driver roster.

use serde::Serialize;

/// Car number and driver name.
const DRIVERS: &[(u32, &str)] = &[
    (1, "Max Verstappen"),
    (2, "Logan Sargeant"),
    (3, "Daniel Ricciardo"),
    (4, "Lando Norris"),
    (10, "Pierre Gasly"),
    (11, "Sergio Pérez"),
    (14, "Fernando Alonso"),
    (16, "Charles Leclerc"),
    (18, "Lance Stroll"),
    (20, "Kevin Magnussen"),
    (22, "Yuki Tsunoda"),
    (23, "Alexander Albon"),
    (24, "Zhou Guanyu"),
    (27, "Nico Hülkenberg"),
    (30, "Liam Lawson"),
    (31, "Esteban Ocon"),
    (43, "Franco Colapinto"),
    (44, "Lewis Hamilton"),
    (55, "Carlos Sainz Jr."),
    (63, "George Russell"),
    (77, "Valtteri Bottas"),
    (81, "Oscar Piastri"),
];

/// Team name and its car numbers, in picker order.
const TEAMS: &[(&str, &[u32])] = &[
    ("Red Bull", &[1, 11]),
    ("Mercedes", &[44, 63]),
    ("Ferrari", &[16, 55]),
    ("McLaren", &[4, 81]),
    ("Aston Martin", &[14, 18]),
    ("Alpine", &[10, 31]),
    ("Williams", &[2, 23]),
    ("AlphaTauri", &[3, 22]),
    ("Alfa Romeo", &[24, 77]),
    ("Haas", &[20, 27]),
    ("Reserve Drivers", &[30, 43]),
];

fn driver_name(number: u32) -> Option<&'static str> {
    DRIVERS
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterDriver {
    pub number: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterTeam {
    pub team: &'static str,
    pub drivers: Vec<RosterDriver>,
}

/// Drivers grouped by team.
pub fn roster() -> Vec<RosterTeam> {
    TEAMS
        .iter()
        .map(|&(team, numbers)| RosterTeam {
            team,
            drivers: numbers
                .iter()
                .filter_map(|n| driver_name(*n).map(|name| RosterDriver { number: *n, name }))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_name() {
        assert_eq!(driver_name(16), Some("Charles Leclerc"));
        assert_eq!(driver_name(99), None);
    }

    #[test]
    fn test_every_team_driver_is_known() {
        let teams = roster();
        assert_eq!(teams.len(), TEAMS.len());
        for team in &teams {
            assert_eq!(team.drivers.len(), 2, "{}", team.team);
        }
        let listed: usize = teams.iter().map(|t| t.drivers.len()).sum();
        assert_eq!(listed, DRIVERS.len());
    }
}
