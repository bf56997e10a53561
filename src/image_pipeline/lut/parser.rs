//! `.cube` 3D LUT text parser.

use std::path::Path;

use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::lut::types::Lut3D;

fn strip_comment(line: &str) -> &str {
    let content = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    content.trim()
}

fn parse_triple(keyword: &str, rest: &[&str], line_no: usize) -> Result<[f32; 3]> {
    let values: Vec<f32> = rest.iter().filter_map(|s| s.parse().ok()).collect();
    if values.len() != 3 {
        return Err(PipelineError::InvalidLut(format!(
            "line {}: {} expects 3 numbers",
            line_no, keyword
        )));
    }
    Ok([values[0], values[1], values[2]])
}

/// Parses `.cube` text into a [`Lut3D`].
///
/// Values are kept in file order. `LUT_3D_SIZE` must be present and enough
/// values must follow it; surplus values are kept but reported.
pub fn parse_cube(text: &str) -> Result<Lut3D> {
    let mut size = 0usize;
    let mut title = None;
    let mut domain_min = [0.0f32; 3];
    let mut domain_max = [1.0f32; 3];
    let mut data = Vec::new();
    let mut reading_data = false;

    for (i, raw_line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let first = parts[0];

        if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
            match first.to_ascii_uppercase().as_str() {
                "TITLE" => {
                    let raw = line[first.len()..].trim();
                    title = Some(raw.trim_matches('"').to_string());
                }
                "LUT_3D_SIZE" => {
                    size = parts
                        .get(1)
                        .and_then(|s| s.parse::<i64>().ok())
                        .filter(|&n| n > 0)
                        .and_then(|n| usize::try_from(n).ok())
                        .ok_or_else(|| {
                            PipelineError::InvalidLut(format!(
                                "line {}: invalid LUT_3D_SIZE",
                                line_no
                            ))
                        })?;
                    reading_data = true;
                }
                "DOMAIN_MIN" => domain_min = parse_triple("DOMAIN_MIN", &parts[1..], line_no)?,
                "DOMAIN_MAX" => domain_max = parse_triple("DOMAIN_MAX", &parts[1..], line_no)?,
                "LUT_1D_SIZE" => {
                    return Err(PipelineError::InvalidLut(
                        "expected 3D LUT, got 1D".into(),
                    ));
                }
                other => debug!(keyword = other, line_no, "Ignoring unknown LUT keyword"),
            }
            continue;
        }

        if !reading_data {
            debug!(line_no, "Ignoring data before LUT_3D_SIZE");
            continue;
        }

        for token in parts {
            match token.parse::<f32>() {
                Ok(v) => data.push(v),
                Err(_) => warn!(line_no, token, "Skipping non-numeric LUT token"),
            }
        }
    }

    if size == 0 {
        return Err(PipelineError::MissingLutSize);
    }

    let expected = Lut3D::expected_len(size)?;
    if data.len() < expected {
        return Err(PipelineError::InsufficientLutData {
            expected,
            got: data.len(),
        });
    }
    if data.len() > expected {
        warn!(
            expected,
            got = data.len(),
            "LUT has more values than its size needs, extra values ignored"
        );
    }

    debug!(size, title = title.as_deref().unwrap_or(""), "Parsed 3D LUT");

    Ok(Lut3D {
        title,
        size,
        data,
        domain_min,
        domain_max,
    })
}

/// Reads and parses a `.cube` file.
pub fn load_cube_file<P: AsRef<Path>>(path: P) -> Result<Lut3D> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;
    parse_cube(&text)
}
