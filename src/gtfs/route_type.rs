use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Type of transportation used on a route.
/// https://gtfs.org/documentation/schedule/reference/#routestxt
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
}

impl RouteType {
    pub const ALL: [RouteType; 10] = [
        RouteType::Tram,
        RouteType::Subway,
        RouteType::Rail,
        RouteType::Bus,
        RouteType::Ferry,
        RouteType::CableTram,
        RouteType::AerialLift,
        RouteType::Funicular,
        RouteType::Trolleybus,
        RouteType::Monorail,
    ];

    /// The `route_type` code used in routes.txt.
    pub fn code(self) -> u8 {
        match self {
            RouteType::Tram => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableTram => 5,
            RouteType::AerialLift => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
        }
    }

    pub fn from_code(code: u8) -> Option<RouteType> {
        RouteType::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn description(self) -> &'static str {
        match self {
            RouteType::Tram => "Tram, Streetcar, Light rail. Any light rail or street level system within a metropolitan area.",
            RouteType::Subway => "Subway, Metro. Any underground rail system within a metropolitan area.",
            RouteType::Rail => "Rail. Used for intercity or long-distance travel.",
            RouteType::Bus => "Bus. Used for short- and long-distance bus routes.",
            RouteType::Ferry => "Ferry. Used for short- and long-distance boat service.",
            RouteType::CableTram => "Cable tram. Used for street-level rail cars where the cable runs beneath the vehicle (e.g., cable car in San Francisco).",
            RouteType::AerialLift => "Aerial lift, suspended cable car (e.g., gondola lift, aerial tramway). Cable transport where cabins, cars, gondolas or open chairs are suspended by means of one or more cables.",
            RouteType::Funicular => "Funicular. Any rail system designed for steep inclines.",
            RouteType::Trolleybus => "Trolleybus. Electric buses that draw power from overhead wires using poles.",
            RouteType::Monorail => "Monorail. Railway in which the track consists of a single rail or a beam.",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(RouteType::from_code)
            .ok_or_else(|| format!("unknown route type '{}'", s.trim()))
    }
}

/// Allowlist of route types for the stop pass. An empty filter allows all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTypeFilter {
    allowed: HashSet<RouteType>,
}

impl RouteTypeFilter {
    pub fn new<I: IntoIterator<Item = RouteType>>(types: I) -> RouteTypeFilter {
        RouteTypeFilter {
            allowed: types.into_iter().collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// Whether a raw `route_type` value from routes.txt passes the filter.
    /// Values outside the enumeration only pass an inactive filter.
    pub fn allows(&self, raw: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        raw.parse::<RouteType>()
            .map(|t| self.allowed.contains(&t))
            .unwrap_or(false)
    }
}

impl FromStr for RouteTypeFilter {
    type Err = String;

    /// Parses a comma-separated list of codes such as `"1,3"`. Blank entries
    /// are ignored, so `""` is the inactive filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let types = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(RouteType::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RouteTypeFilter::new(types))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", RouteType::Tram)]
    #[case("3", RouteType::Bus)]
    #[case(" 11 ", RouteType::Trolleybus)]
    #[case("12", RouteType::Monorail)]
    fn parses_route_type_codes(#[case] raw: &str, #[case] expected: RouteType) {
        assert_eq!(raw.parse::<RouteType>(), Ok(expected));
    }

    #[rstest]
    #[case("8")]
    #[case("700")]
    #[case("bus")]
    #[case("")]
    fn rejects_codes_outside_enumeration(#[case] raw: &str) {
        assert!(raw.parse::<RouteType>().is_err());
    }

    #[test]
    fn codes_round_trip_through_display() {
        for t in RouteType::ALL {
            assert_eq!(t.to_string().parse::<RouteType>(), Ok(t));
        }
    }

    #[test]
    fn empty_filter_allows_everything() {
        let filter: RouteTypeFilter = "".parse().expect("empty list parses");
        assert!(!filter.is_active());
        assert!(filter.allows("3"));
        assert!(filter.allows("not-a-type"));
    }

    #[test]
    fn active_filter_only_allows_listed_types() {
        let filter: RouteTypeFilter = "3,,1".parse().expect("list parses");
        assert!(filter.is_active());
        assert!(filter.allows("3"));
        assert!(filter.allows("1"));
        assert!(!filter.allows("2"));
        assert!(!filter.allows(""));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let err = "3,9".parse::<RouteTypeFilter>().unwrap_err();
        assert_eq!(err, "unknown route type '9'");
    }
}
