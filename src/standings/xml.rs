//! Ergast MRData documents, only the parts the standings need.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct MrData {
    #[serde(rename = "StandingsTable", default)]
    pub standings_table: Option<StandingsTable>,
    #[serde(rename = "RaceTable", default)]
    pub race_table: Option<RaceTable>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StandingsTable {
    #[serde(rename = "StandingsList", default)]
    pub lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StandingsList {
    #[serde(rename = "DriverStanding", default)]
    pub drivers: Vec<DriverStandingNode>,
    #[serde(rename = "ConstructorStanding", default)]
    pub constructors: Vec<ConstructorStandingNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DriverStandingNode {
    #[serde(rename = "@position", default)]
    pub position: Option<u32>,
    #[serde(rename = "@points")]
    pub points: f64,
    #[serde(rename = "Driver")]
    pub driver: DriverNode,
    #[serde(rename = "Constructor", default)]
    pub constructors: Vec<ConstructorNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConstructorStandingNode {
    #[serde(rename = "@position", default)]
    pub position: Option<u32>,
    #[serde(rename = "@points")]
    pub points: f64,
    #[serde(rename = "Constructor")]
    pub constructor: ConstructorNode,
}

#[derive(Debug, Deserialize)]
pub(super) struct DriverNode {
    #[serde(rename = "@code", default)]
    pub code: Option<String>,
    #[serde(rename = "GivenName", default)]
    pub given_name: Option<String>,
    #[serde(rename = "FamilyName")]
    pub family_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConstructorNode {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RaceTable {
    #[serde(rename = "Race", default)]
    pub races: Vec<RaceNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RaceNode {
    #[serde(rename = "RaceName", default)]
    pub race_name: Option<String>,
    #[serde(rename = "ResultsList", default)]
    pub results_list: Option<ResultsList>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResultsList {
    #[serde(rename = "Result", default)]
    pub results: Vec<ResultNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResultNode {
    #[serde(rename = "@points")]
    pub points: f64,
    #[serde(rename = "Driver")]
    pub driver: DriverNode,
    #[serde(rename = "Constructor")]
    pub constructor: ConstructorNode,
}
