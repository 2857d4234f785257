//! Journey plans between two stations.

use std::fmt;

use chrono::Duration;

use super::RailTime;

/// One train of a travel solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    /// Where the passenger boards
    pub origin: String,
    /// Where the passenger alights
    pub destination: String,
    pub departure: RailTime,
    pub arrival: RailTime,
    pub category: Option<String>,
    /// Kept as text: upstream sometimes sends non-numeric ids for buses.
    pub number: String,
}

impl Vehicle {
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }

    /// `FR 9999`, or just the number without a category.
    pub fn display_identity(&self) -> String {
        match &self.category {
            Some(category) => format!("{category} {}", self.number),
            None => self.number.clone(),
        }
    }
}

/// A change between two consecutive vehicles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<'a> {
    pub station: &'a str,
    pub wait: Duration,
}

/// A way to get from one station to another, possibly changing trains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelSolution {
    pub vehicles: Vec<Vehicle>,
}

impl TravelSolution {
    /// Departure of the first vehicle to arrival of the last.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.vehicles.first()?;
        let last = self.vehicles.last()?;
        Some(last.arrival.signed_duration_since(first.departure))
    }

    /// The change after each vehicle but the last.
    pub fn changes(&self) -> Vec<Change<'_>> {
        self.vehicles
            .windows(2)
            .map(|pair| Change {
                station: &pair[0].destination,
                wait: pair[1].departure.signed_duration_since(pair[0].arrival),
            })
            .collect()
    }
}

/// Travel solutions as answered by upstream, earliest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelSolutions {
    pub origin: String,
    pub destination: String,
    pub solutions: Vec<TravelSolution>,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{} ({})",
            self.departure,
            self.arrival,
            self.display_identity()
        )
    }
}
