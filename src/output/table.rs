use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use kurbo::Point;

use crate::error::ShapeError;

/// Write rows of numbers, tab-delimited, fixed `decimals`.
pub fn write_table<R: AsRef<[f64]>>(
    path: &Path,
    rows: &[R],
    decimals: usize,
) -> Result<(), ShapeError> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in rows {
        let line: Vec<String> = row
            .as_ref()
            .iter()
            .map(|v| format!("{:.*}", decimals, v))
            .collect();
        writeln!(out, "{}", line.join("\t"))?;
    }
    out.flush()?;
    Ok(())
}

/// Write a point list as two columns (x, y).
pub fn write_coordinates(path: &Path, points: &[Point], decimals: usize) -> Result<(), ShapeError> {
    let rows: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    write_table(path, &rows, decimals)
}

/// Read a two-column coordinate file back.
pub fn read_coordinates(path: &Path) -> Result<Vec<Point>, ShapeError> {
    let reader = BufReader::new(File::open(path)?);
    let mut points = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            return Err(ShapeError::Parse(format!(
                "{}:{}: expected 2 columns, found {}",
                path.display(),
                n + 1,
                fields.len()
            )));
        }
        let parse = |s: &str| {
            s.trim().parse::<f64>().map_err(|e| {
                ShapeError::Parse(format!("{}:{}: {:?}: {}", path.display(), n + 1, s, e))
            })
        };
        points.push(Point::new(parse(fields[0])?, parse(fields[1])?));
    }
    Ok(points)
}

/// Two-row CSV: recording paths, then frame counts.
pub fn write_manifest(path: &Path, entries: &[(String, usize)]) -> Result<(), ShapeError> {
    let names: Vec<String> = entries.iter().map(|(name, _)| csv_field(name)).collect();
    let counts: Vec<String> = entries.iter().map(|(_, n)| n.to_string()).collect();
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", names.join(","))?;
    writeln!(out, "{}", counts.join(","))?;
    out.flush()?;
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("outline-shape-table-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn coordinates_round_trip_at_two_decimals() {
        let dir = scratch("coords");
        let path = dir.join("Coords_0000.txt");
        let pts = vec![
            Point::new(12.3456, -0.004),
            Point::new(-7.126, 99.999),
            Point::new(0.0, 1.0 / 3.0),
        ];
        write_coordinates(&path, &pts, 2).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("12.35\t"));
        assert_eq!(text.lines().nth(1), Some("-7.13\t100.00"));

        let back = read_coordinates(&path).unwrap();
        assert_eq!(back.len(), pts.len());
        for (a, b) in pts.iter().zip(&back) {
            assert!((a.x - b.x).abs() <= 0.005 + 1e-9);
            assert!((a.y - b.y).abs() <= 0.005 + 1e-9);
        }
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let dir = scratch("bad");
        let path = dir.join("Coords_0001.txt");
        std::fs::write(&path, "1.00\t2.00\n3.00\n").unwrap();
        assert!(matches!(read_coordinates(&path), Err(ShapeError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn manifest_has_two_rows() {
        let dir = scratch("manifest");
        let path = dir.join("list_data.csv");
        let entries = vec![
            ("a/seg_1.avi".to_string(), 12),
            ("b/seg,2.avi".to_string(), 0),
        ];
        write_manifest(&path, &entries).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "a/seg_1.avi,\"b/seg,2.avi\"\n12,0\n");
        std::fs::remove_dir_all(&dir).ok();
    }
}
