use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use crate::geometry::Point2;

/// Accepted point file layouts
///
/// JSON may be a bare array of `[x, y]` pairs or an object with a `points`
/// field. TOML is always a table, so it uses `points = [[x, y], ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointFile {
    Bare(Vec<Point2>),
    Wrapped { points: Vec<Point2> },
}

impl PointFile {
    fn into_points(self) -> Vec<Point2> {
        match self {
            Self::Bare(points) | Self::Wrapped { points } => points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Toml,
}

impl InputFormat {
    /// Pick a format from the file extension, JSON when unknown
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parse drawn points from file contents
pub fn parse_points(contents: &str, format: InputFormat) -> Result<Vec<Point2>> {
    let file: PointFile = match format {
        InputFormat::Json => serde_json::from_str(contents).context("Invalid JSON point list")?,
        InputFormat::Toml => toml::from_str(contents).context("Invalid TOML point list")?,
    };

    let points = file.into_points();
    if let Some(i) = points.iter().position(|p| !p.0.is_finite() || !p.1.is_finite()) {
        bail!("Point {} has a non-finite coordinate", i);
    }

    Ok(points)
}

/// Read drawn points from a `.json` or `.toml` file
pub fn load_points(path: &Path) -> Result<Vec<Point2>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read point file: {}", path.display()))?;
    parse_points(&contents, InputFormat::from_path(path))
        .with_context(|| format!("Failed to parse point file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_bare_json() {
        let points = parse_points("[[0, 0], [1, 0], [1, 1.5]]", InputFormat::Json).unwrap();
        assert_eq!(points, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.5)]);
    }

    #[test]
    fn test_parse_wrapped_json() {
        let points =
            parse_points(r#"{"points": [[0, 0], [2, 0], [0, 2]]}"#, InputFormat::Json).unwrap();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_parse_toml() {
        let points = parse_points(
            "points = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]",
            InputFormat::Toml,
        )
        .unwrap();
        assert_eq!(points[2], (1.0, 1.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_points("{\"pts\": 3}", InputFormat::Json).is_err());
        assert!(parse_points("[[0, 0, 0]]", InputFormat::Json).is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(&PathBuf::from("a.TOML")), InputFormat::Toml);
        assert_eq!(InputFormat::from_path(&PathBuf::from("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(&PathBuf::from("points")), InputFormat::Json);
    }

    #[test]
    fn test_load_points_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.toml");
        std::fs::write(&path, "points = [[0, 0], [3, 0], [0, 4]]").unwrap();

        let points = load_points(&path).unwrap();
        assert_eq!(points, vec![(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)]);
    }
}
