//! Parsing and representation of Euclidean TSP instances.
//!
//! Handles TSPLIB-style files with 3D node coordinates: header lines
//! (`NAME`, `TYPE`, `COMMENT`, `DIMENSION`, `EDGE_WEIGHT_TYPE`) followed by a
//! `NODE_COORD_SECTION` with one `<1-based index> <x> <y> <z>` line per node.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// An immutable 3D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A complete TSP instance: an ordered sequence of `dimension` points,
/// indexed `0..dimension`. Read-only after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Instance type from the TYPE header (usually "TSP")
    pub instance_type: String,
    /// Comment/description
    pub comment: String,
    /// Edge weight type from the header (usually "EUC_3D")
    pub edge_weight_type: String,
    /// Number of nodes
    pub dimension: usize,
    /// Node coordinates, 0-indexed internally
    pub points: Vec<Point>,
}

impl TspInstance {
    /// Parse a TSP instance from a TSPLIB format file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path).map_err(|e| format!("Cannot open file: {}", e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a TSP instance from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut name = String::new();
        let mut instance_type = String::new();
        let mut comment = String::new();
        let mut edge_weight_type = String::new();
        let mut dimension = 0usize;
        let mut points: Vec<Point> = Vec::new();
        let mut in_coords = false;

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            if !in_coords {
                if line.starts_with("NODE_COORD_SECTION") {
                    in_coords = true;
                    points.reserve(dimension);
                    continue;
                }

                let (key, value) = match line.split_once(':') {
                    Some((k, v)) => (k.trim(), v.trim()),
                    None => continue,
                };

                match key {
                    "NAME" => name = value.to_string(),
                    "TYPE" => instance_type = value.to_string(),
                    // Multiple COMMENT lines are allowed; keep the first.
                    "COMMENT" => {
                        if comment.is_empty() {
                            comment = value.to_string();
                        }
                    }
                    "DIMENSION" => {
                        dimension = value.parse().map_err(|_| "Invalid dimension".to_string())?;
                    }
                    "EDGE_WEIGHT_TYPE" => edge_weight_type = value.to_string(),
                    _ => {}
                }
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 4 {
                let x: f64 = parts[1].parse().map_err(|_| "Invalid x coordinate".to_string())?;
                let y: f64 = parts[2].parse().map_err(|_| "Invalid y coordinate".to_string())?;
                let z: f64 = parts[3].parse().map_err(|_| "Invalid z coordinate".to_string())?;
                points.push(Point::new(x, y, z));
            }
        }

        if dimension == 0 {
            return Err("Missing or zero DIMENSION header".to_string());
        }
        if points.len() != dimension {
            return Err(format!(
                "DIMENSION is {} but NODE_COORD_SECTION has {} entries",
                dimension,
                points.len()
            ));
        }

        Ok(TspInstance {
            name,
            instance_type,
            comment,
            edge_weight_type,
            dimension,
            points,
        })
    }

    /// Build an instance directly from points (used by tests and embedding callers).
    pub fn from_points(name: &str, points: Vec<Point>) -> Self {
        TspInstance {
            name: name.to_string(),
            instance_type: "TSP".to_string(),
            comment: String::new(),
            edge_weight_type: "EUC_3D".to_string(),
            dimension: points.len(),
            points,
        }
    }

    /// Get statistics about the instance.
    pub fn statistics(&self) -> InstanceStatistics {
        let mut min_distance = f64::INFINITY;
        let mut max_distance = 0.0f64;
        let mut sum = 0.0;
        let mut count = 0usize;

        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                let d = self.points[i].distance_to(&self.points[j]);
                min_distance = min_distance.min(d);
                max_distance = max_distance.max(d);
                sum += d;
                count += 1;
            }
        }

        let avg_distance = if count > 0 { sum / count as f64 } else { 0.0 };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            edge_weight_type: self.edge_weight_type.clone(),
            avg_distance,
            min_distance: if count > 0 { min_distance } else { 0.0 },
            max_distance,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub edge_weight_type: String,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(f, "  Edge weight type: {}", self.edge_weight_type)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
NAME : stars5
TYPE : TSP
COMMENT : five synthetic stars
COMMENT : second comment line
DIMENSION : 5
EDGE_WEIGHT_TYPE : EUC_3D
NODE_COORD_SECTION
1 0.0 0.0 0.0
2 1.0 0.0 0.0
3 1.0 1.0 0.0
4 0.0 1.0 0.0
5 0.5 0.5 1.0
EOF
";

    #[test]
    fn test_parse_sample() {
        let instance = TspInstance::from_reader(Cursor::new(SAMPLE)).unwrap();

        assert_eq!(instance.name, "stars5");
        assert_eq!(instance.instance_type, "TSP");
        assert_eq!(instance.comment, "five synthetic stars");
        assert_eq!(instance.edge_weight_type, "EUC_3D");
        assert_eq!(instance.dimension, 5);
        assert_eq!(instance.points.len(), 5);
        assert_eq!(instance.points[4], Point::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let text = SAMPLE.replace("DIMENSION : 5", "DIMENSION : 6");
        let err = TspInstance::from_reader(Cursor::new(text)).unwrap_err();
        assert!(err.contains("DIMENSION"));
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 2.0, 2.0);
        assert!((a.distance_to(&b) - 3.0).abs() < 1e-12);
        assert!((a.distance_to(&a)).abs() < 1e-12);
    }
}
