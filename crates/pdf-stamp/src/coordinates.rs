//! `TEXT_X_POSITION = 65  # comment` style coordinate files

use crate::types::{Result, StampError};
use log::warn;
use std::io::ErrorKind;
use std::path::Path;

pub const X_KEY: &str = "TEXT_X_POSITION";
pub const Y_KEY: &str = "TEXT_Y_POSITION";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self { x: 65.0, y: 680.0 }
    }
}

/// Parse a coordinate file. Keys that do not appear keep their `default`.
pub fn parse_coordinates(text: &str, default: Coordinates) -> Result<Coordinates> {
    let mut coordinates = default;

    for line in text.lines() {
        let target = if line.contains(X_KEY) {
            &mut coordinates.x
        } else if line.contains(Y_KEY) {
            &mut coordinates.y
        } else {
            continue;
        };

        let value = line
            .split_once('=')
            .map(|(_, rest)| rest.split('#').next().unwrap_or("").trim())
            .ok_or_else(|| StampError::Config(format!("missing '=' in {:?}", line)))?;
        *target = value
            .parse()
            .map_err(|_| StampError::Config(format!("bad number {:?}", value)))?;
    }

    Ok(coordinates)
}

/// Read coordinates from `path`.
///
/// A missing file gives `default`. An unparsable file is reported and also
/// gives `default`.
pub async fn load_coordinates(path: impl AsRef<Path>, default: Coordinates) -> Result<Coordinates> {
    let path = path.as_ref();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(default),
        Err(e) => return Err(e.into()),
    };

    match parse_coordinates(&text, default) {
        Ok(coordinates) => Ok(coordinates),
        Err(e) => {
            warn!(
                "Error reading {}: {}. Using default coordinates.",
                path.display(),
                e
            );
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_comments() {
        let text = "TEXT_X_POSITION = 120  # left edge\nTEXT_Y_POSITION=700\n";
        let parsed = parse_coordinates(text, Coordinates::default()).unwrap();
        assert_eq!(parsed, Coordinates { x: 120.0, y: 700.0 });
    }

    #[test]
    fn test_missing_key_keeps_default() {
        let parsed = parse_coordinates("TEXT_Y_POSITION = 500", Coordinates::default()).unwrap();
        assert_eq!(parsed, Coordinates { x: 65.0, y: 500.0 });
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        let parsed = parse_coordinates("# header\n\nfoo = bar\n", Coordinates::default()).unwrap();
        assert_eq!(parsed, Coordinates::default());
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let result = parse_coordinates("TEXT_X_POSITION = left", Coordinates::default());
        assert!(matches!(result, Err(StampError::Config(_))));
    }
}
