// src/core/parser.rs
// Splits delimited waypoint descriptors (`id,x0,y0,z0,x1,y1,z1`) into an identifier
// and numeric coordinates.

use std::fmt::Display;

/// Number of coordinates carried by an ROI descriptor (start xyz + end xyz)
pub const DESCRIPTOR_COORDINATES: usize = 6;

/// Identifier and coordinates extracted from a descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Waypoint identifier
    pub id: String,
    /// Coordinates in message order
    pub positions: Vec<f64>,
}

/// Descriptor parsing failures
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Descriptor has no identifier
    EmptyId,
    /// Identifier is only a number
    NumericId(String),
    /// Field is not a decimal number
    InvalidNumber(String),
    /// Field parses but is NaN or infinite
    NonFinite(String),
    /// Wrong number of numeric fields
    WrongArity {
        /// Expected coordinate count
        expected: usize,
        /// Coordinate count found in the message
        found: usize,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParseError::EmptyId => write!(f, "Invalid ID: descriptor has no identifier"),
            ParseError::NumericId(id) => write!(f, "Invalid ID: {} should not only be a number", id),
            ParseError::InvalidNumber(field) => write!(f, "Invalid argument: {} should be a number", field),
            ParseError::NonFinite(field) => write!(f, "Invalid argument: {} is not finite", field),
            ParseError::WrongArity { expected, found } => write!(
                f,
                "Wrong size, should be {} coordinates instead of {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// True if the whole string is a finite decimal number.
///
/// Leading or trailing whitespace makes the string invalid.
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Parser for delimited waypoint descriptors
#[derive(Debug, Clone, Copy)]
pub struct WaypointParser {
    delimiter: char,
}

impl Default for WaypointParser {
    fn default() -> Self {
        WaypointParser { delimiter: ',' }
    }
}

impl WaypointParser {
    /// Creates a parser splitting on `delimiter`
    pub fn new(delimiter: char) -> Self {
        WaypointParser { delimiter }
    }

    /// Field delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Splits `raw` on the delimiter and parses the fields.
    ///
    /// The number of coordinates is not checked here; see [`WaypointParser::unpack_roi`].
    pub fn unpack(&self, raw: &str) -> Result<Waypoint, ParseError> {
        let fields: Vec<&str> = raw.split(self.delimiter).collect();
        self.pack(&fields)
    }

    /// Parses fields the caller already split: first the identifier, then numbers
    pub fn pack<S: AsRef<str>>(&self, fields: &[S]) -> Result<Waypoint, ParseError> {
        let mut fields = fields.iter().map(|s| s.as_ref().trim());

        let id = fields.next().unwrap_or_default();
        if id.is_empty() {
            return Err(ParseError::EmptyId);
        }
        if is_number(id) {
            return Err(ParseError::NumericId(id.to_string()));
        }

        let positions = fields
            .map(|field| match field.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                Ok(_) => Err(ParseError::NonFinite(field.to_string())),
                Err(_) => Err(ParseError::InvalidNumber(field.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Waypoint {
            id: id.to_string(),
            positions,
        })
    }

    /// Unpacks an ROI descriptor and checks it carries exactly six coordinates
    pub fn unpack_roi(&self, raw: &str) -> Result<Waypoint, ParseError> {
        let waypoint = self.unpack(raw)?;
        if waypoint.positions.len() != DESCRIPTOR_COORDINATES {
            return Err(ParseError::WrongArity {
                expected: DESCRIPTOR_COORDINATES,
                found: waypoint.positions.len(),
            });
        }
        Ok(waypoint)
    }

    /// Builds a descriptor string from an identifier and coordinates
    pub fn format(&self, id: &str, positions: &[f64]) -> String {
        let mut descriptor = id.to_string();
        for position in positions {
            descriptor.push(self.delimiter);
            descriptor.push_str(&position.to_string());
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn splits_descriptor() {
        let waypoint = WaypointParser::default().unpack("waypoint1,1,2,3,4,5,6").unwrap();

        assert_eq!(waypoint.id, "waypoint1");
        assert_eq!(waypoint.positions, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn tolerates_spaces_around_fields() {
        let waypoint = WaypointParser::default().unpack_roi(" roi_a , 0.5, -1e-3 ,3,4,5,6 ").unwrap();

        assert_eq!(waypoint.id, "roi_a");
        assert_eq!(waypoint.positions[1], -1e-3);
    }

    #[test]
    fn custom_delimiter_round_trips() {
        let parser = WaypointParser::new(';');
        let descriptor = parser.format("crack-7", &[0.25, -1.0, 2.0, 3.5, 4.0, 5.0]);

        assert_eq!(descriptor, "crack-7;0.25;-1;2;3.5;4;5");
        assert_eq!(parser.unpack_roi(&descriptor).unwrap().positions[0], 0.25);
    }

    #[rstest]
    #[case("", ParseError::EmptyId)]
    #[case(",1,2,3,4,5,6", ParseError::EmptyId)]
    #[case("42,1,2,3,4,5,6", ParseError::NumericId("42".into()))]
    #[case("roi,1,2,x,4,5,6", ParseError::InvalidNumber("x".into()))]
    #[case("roi,1,2,,4,5,6", ParseError::InvalidNumber("".into()))]
    #[case("roi,1,2,inf,4,5,6", ParseError::NonFinite("inf".into()))]
    #[case("roi,1,2,3,4,5", ParseError::WrongArity { expected: 6, found: 5 })]
    #[case("roi,1,2,3,4,5,6,7", ParseError::WrongArity { expected: 6, found: 7 })]
    #[case("roi", ParseError::WrongArity { expected: 6, found: 0 })]
    fn rejects_malformed_descriptors(#[case] raw: &str, #[case] expected: ParseError) {
        assert_eq!(WaypointParser::default().unpack_roi(raw), Err(expected));
    }

    #[test]
    fn pack_accepts_presplit_fields() {
        let fields = vec!["wp".to_string(), "1.5".to_string(), "2".to_string()];
        let waypoint = WaypointParser::default().pack(&fields).unwrap();

        assert_eq!(waypoint.positions, vec![1.5, 2.0]);
    }

    #[rstest]
    #[case("3.14", true)]
    #[case("-2e5", true)]
    #[case(" 1", false)]
    #[case("1a", false)]
    #[case("", false)]
    #[case("NaN", false)]
    fn number_detection(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_number(input), expected);
    }
}
