//! Standings Module
//!
//! Championship tables from Ergast, joined with the points each driver and
//! constructor scored at the most recent race.

mod xml;

use std::collections::HashMap;

use serde::Serialize;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::fetch::Fetch;
use crate::tasks::PollingCache;
use xml::MrData;

pub const STANDINGS_CACHE_KEY: &str = "standings";
pub const STANDINGS_MAX_AGE: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverStanding {
    pub position: Option<u32>,
    pub points: f64,
    pub last_race_points: f64,
    /// Family name, which is also the join key against race results.
    pub driver: String,
    pub given_name: Option<String>,
    pub code: Option<String>,
    pub constructor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorStanding {
    pub position: Option<u32>,
    pub points: f64,
    pub last_race_points: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    pub drivers: Vec<DriverStanding>,
    pub constructors: Vec<ConstructorStanding>,
    pub last_race: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct RaceResult {
    driver: String,
    constructor: String,
    points: f64,
}

fn parse(document: &str) -> Result<MrData, FetchError> {
    Ok(quick_xml::de::from_str(document)?)
}

fn parse_driver_standings(document: &str) -> Result<Vec<DriverStanding>, FetchError> {
    let data = parse(document)?;
    let list = data
        .standings_table
        .and_then(|table| table.lists.into_iter().next());

    Ok(list
        .map(|list| list.drivers)
        .unwrap_or_default()
        .into_iter()
        .map(|node| DriverStanding {
            position: node.position,
            points: node.points,
            last_race_points: 0.0,
            driver: node.driver.family_name,
            given_name: node.driver.given_name,
            code: node.driver.code,
            constructor: node.constructors.into_iter().next().map(|c| c.name),
        })
        .collect())
}

fn parse_constructor_standings(document: &str) -> Result<Vec<ConstructorStanding>, FetchError> {
    let data = parse(document)?;
    let list = data
        .standings_table
        .and_then(|table| table.lists.into_iter().next());

    Ok(list
        .map(|list| list.constructors)
        .unwrap_or_default()
        .into_iter()
        .map(|node| ConstructorStanding {
            position: node.position,
            points: node.points,
            last_race_points: 0.0,
            name: node.constructor.name,
        })
        .collect())
}

fn parse_last_race(document: &str) -> Result<(Option<String>, Vec<RaceResult>), FetchError> {
    let data = parse(document)?;
    let Some(race) = data.race_table.and_then(|table| table.races.into_iter().next()) else {
        return Ok((None, Vec::new()));
    };

    let results = race
        .results_list
        .map(|list| list.results)
        .unwrap_or_default()
        .into_iter()
        .map(|node| RaceResult {
            driver: node.driver.family_name,
            constructor: node.constructor.name,
            points: node.points,
        })
        .collect();
    Ok((race.race_name, results))
}

// == Join ==
fn join(
    mut drivers: Vec<DriverStanding>,
    mut constructors: Vec<ConstructorStanding>,
    last_race: Option<String>,
    results: &[RaceResult],
) -> Standings {
    let by_driver: HashMap<&str, f64> = results
        .iter()
        .rev()
        .map(|r| (r.driver.as_str(), r.points))
        .collect();
    for driver in &mut drivers {
        driver.last_race_points = by_driver.get(driver.driver.as_str()).copied().unwrap_or(0.0);
    }

    let mut by_constructor: HashMap<&str, f64> = HashMap::new();
    for result in results {
        *by_constructor.entry(result.constructor.as_str()).or_default() += result.points;
    }
    for constructor in &mut constructors {
        constructor.last_race_points = by_constructor
            .get(constructor.name.as_str())
            .copied()
            .unwrap_or(0.0);
    }

    Standings {
        drivers,
        constructors,
        last_race,
    }
}

// == Fetch ==
/// Fetches the three Ergast documents concurrently and joins them.
pub async fn fetch_standings(fetcher: &dyn Fetch, base: &str) -> Result<Standings, FetchError> {
    let drivers_url = format!("{base}/current/driverStandings");
    let constructors_url = format!("{base}/current/constructorStandings");
    let results_url = format!("{base}/current/last/results");

    let (drivers, constructors, results) = tokio::try_join!(
        fetcher.get_xml(&drivers_url),
        fetcher.get_xml(&constructors_url),
        fetcher.get_xml(&results_url),
    )?;

    let drivers = parse_driver_standings(&drivers)?;
    let constructors = parse_constructor_standings(&constructors)?;
    let (last_race, results) = parse_last_race(&results)?;
    Ok(join(drivers, constructors, last_race, &results))
}

/// Cached standings: fresh for an hour, then refetched. A failed refetch
/// serves the previous table when there is one.
pub async fn load(poller: &PollingCache, base: &str) -> Result<Standings, FetchError> {
    let cache = poller.cache();
    if let Some(standings) = cache.get_fresh::<Standings>(STANDINGS_CACHE_KEY, STANDINGS_MAX_AGE) {
        debug!("standings served from cache");
        return Ok(standings);
    }

    match fetch_standings(poller.fetcher().as_ref(), base).await {
        Ok(standings) => {
            cache.insert(STANDINGS_CACHE_KEY, standings.clone());
            Ok(standings)
        }
        Err(err) => match cache.get_stale::<Standings>(STANDINGS_CACHE_KEY) {
            Some(stale) => {
                warn!(error = %err, "standings refresh failed, serving stale table");
                Ok(stale)
            }
            None => Err(err),
        },
    }
}

#[cfg(test)]
mod fixtures {
    pub const DRIVER_STANDINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MRData xmlns="http://ergast.com/mrd/1.5" series="f1" limit="30" offset="0" total="3">
  <StandingsTable season="2024">
    <StandingsList season="2024" round="10">
      <DriverStanding position="1" positionText="1" points="219" wins="7">
        <Driver driverId="max_verstappen" code="VER">
          <PermanentNumber>33</PermanentNumber>
          <GivenName>Max</GivenName>
          <FamilyName>Verstappen</FamilyName>
        </Driver>
        <Constructor constructorId="red_bull">
          <Name>Red Bull</Name>
          <Nationality>Austrian</Nationality>
        </Constructor>
      </DriverStanding>
      <DriverStanding position="2" positionText="2" points="150" wins="1">
        <Driver driverId="norris" code="NOR">
          <GivenName>Lando</GivenName>
          <FamilyName>Norris</FamilyName>
        </Driver>
        <Constructor constructorId="mclaren">
          <Name>McLaren</Name>
        </Constructor>
      </DriverStanding>
      <DriverStanding position="3" positionText="3" points="148.5" wins="1">
        <Driver driverId="leclerc" code="LEC">
          <GivenName>Charles</GivenName>
          <FamilyName>Leclerc</FamilyName>
        </Driver>
        <Constructor constructorId="ferrari">
          <Name>Ferrari</Name>
        </Constructor>
      </DriverStanding>
    </StandingsList>
  </StandingsTable>
</MRData>"#;

    pub const CONSTRUCTOR_STANDINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MRData xmlns="http://ergast.com/mrd/1.5" series="f1">
  <StandingsTable season="2024">
    <StandingsList season="2024" round="10">
      <ConstructorStanding position="1" positionText="1" points="320" wins="7">
        <Constructor constructorId="red_bull">
          <Name>Red Bull</Name>
        </Constructor>
      </ConstructorStanding>
      <ConstructorStanding position="2" positionText="2" points="291" wins="1">
        <Constructor constructorId="ferrari">
          <Name>Ferrari</Name>
        </Constructor>
      </ConstructorStanding>
      <ConstructorStanding position="3" positionText="3" points="257" wins="1">
        <Constructor constructorId="mclaren">
          <Name>McLaren</Name>
        </Constructor>
      </ConstructorStanding>
    </StandingsList>
  </StandingsTable>
</MRData>"#;

    pub const LAST_RACE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MRData xmlns="http://ergast.com/mrd/1.5" series="f1">
  <RaceTable season="2024" round="10">
    <Race season="2024" round="10">
      <RaceName>Spanish Grand Prix</RaceName>
      <ResultsList>
        <Result number="1" position="1" positionText="1" points="25">
          <Driver driverId="max_verstappen" code="VER">
            <GivenName>Max</GivenName>
            <FamilyName>Verstappen</FamilyName>
          </Driver>
          <Constructor constructorId="red_bull">
            <Name>Red Bull</Name>
          </Constructor>
        </Result>
        <Result number="4" position="2" positionText="2" points="19">
          <Driver driverId="norris" code="NOR">
            <GivenName>Lando</GivenName>
            <FamilyName>Norris</FamilyName>
          </Driver>
          <Constructor constructorId="mclaren">
            <Name>McLaren</Name>
          </Constructor>
        </Result>
        <Result number="11" position="8" positionText="8" points="4">
          <Driver driverId="perez" code="PER">
            <GivenName>Sergio</GivenName>
            <FamilyName>Pérez</FamilyName>
          </Driver>
          <Constructor constructorId="red_bull">
            <Name>Red Bull</Name>
          </Constructor>
        </Result>
      </ResultsList>
    </Race>
  </RaceTable>
</MRData>"#;
}
