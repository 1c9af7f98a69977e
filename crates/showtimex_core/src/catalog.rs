//! crates/showtimex_core/src/catalog.rs
//!
//! The fixed ticket catalog: fare classes with their unit prices and the
//! exhibition time slots. Pure configuration data, no I/O, no mutation.

use std::fmt;
use std::str::FromStr;

/// The closed set of fare classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketType {
    Regular,
    Premium,
    Imax,
    FourDx,
}

impl TicketType {
    pub const ALL: [TicketType; 4] = [
        TicketType::Regular,
        TicketType::Premium,
        TicketType::Imax,
        TicketType::FourDx,
    ];

    /// Price of a single ticket of this class, in whole currency units.
    pub fn unit_price(self) -> i64 {
        match self {
            TicketType::Regular => 250,
            TicketType::Premium => 350,
            TicketType::Imax => 450,
            TicketType::FourDx => 600,
        }
    }

    /// The wire/storage token for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketType::Regular => "Regular",
            TicketType::Premium => "Premium",
            TicketType::Imax => "IMAX",
            TicketType::FourDx => "4DX",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown ticket type: {0}")]
pub struct UnknownTicketType(pub String);

impl FromStr for TicketType {
    type Err = UnknownTicketType;

    /// Tokens are matched exactly, the same way the catalog publishes them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" => Ok(TicketType::Regular),
            "Premium" => Ok(TicketType::Premium),
            "IMAX" => Ok(TicketType::Imax),
            "4DX" => Ok(TicketType::FourDx),
            other => Err(UnknownTicketType(other.to_string())),
        }
    }
}

/// The five contiguous three-hour exhibition windows of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    Morning,
    Midday,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 5] = [
        TimeSlot::Morning,
        TimeSlot::Midday,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    /// The wire/storage token for this window.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Morning => "09:00-12:00",
            TimeSlot::Midday => "12:00-15:00",
            TimeSlot::Afternoon => "15:00-18:00",
            TimeSlot::Evening => "18:00-21:00",
            TimeSlot::Night => "21:00-24:00",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid time slot: {0}")]
pub struct InvalidTimeSlot(pub String);

impl FromStr for TimeSlot {
    type Err = InvalidTimeSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| InvalidTimeSlot(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_prices_match_the_published_table() {
        assert_eq!(TicketType::Regular.unit_price(), 250);
        assert_eq!(TicketType::Premium.unit_price(), 350);
        assert_eq!(TicketType::Imax.unit_price(), 450);
        assert_eq!(TicketType::FourDx.unit_price(), 600);
    }

    #[test]
    fn ticket_type_tokens_round_trip() {
        for ticket_type in TicketType::ALL {
            let parsed: TicketType = ticket_type.as_str().parse().unwrap();
            assert_eq!(parsed, ticket_type);
        }
        assert!("Imax".parse::<TicketType>().is_err());
        assert!("VIP".parse::<TicketType>().is_err());
        assert!("".parse::<TicketType>().is_err());
    }

    #[test]
    fn slots_cover_the_fifteen_hour_day() {
        let tokens: Vec<&str> = TimeSlot::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            tokens,
            vec![
                "09:00-12:00",
                "12:00-15:00",
                "15:00-18:00",
                "18:00-21:00",
                "21:00-24:00",
            ]
        );
    }

    #[test]
    fn slot_membership_is_exact() {
        for slot in TimeSlot::ALL {
            assert_eq!(slot.as_str().parse::<TimeSlot>().unwrap(), slot);
        }
        assert!("07:00-09:00".parse::<TimeSlot>().is_err());
        assert!("09:00 - 12:00".parse::<TimeSlot>().is_err());
        assert!("24:00-03:00".parse::<TimeSlot>().is_err());
    }
}
