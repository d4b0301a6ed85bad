//! Spectral response function table conversion.
//!
//! NOAA publishes ABI SRFs as whitespace-delimited tables of wavelength
//! (µm), wavenumber (cm⁻¹) and relative response. Downstream radiative
//! transfer tools expect two columns: wavelength in nanometers and
//! response.

use std::path::{Path, PathBuf};

use goes_common::{GoesError, GoesResult};
use tracing::info;

/// Convert SRF table text into `"{wavelength_nm} {response}"` lines.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// `InvalidFormat` naming the 1-based line number when a row has fewer
/// than three columns or a column is not a number.
pub fn reformat_srf_text(input: &str) -> GoesResult<String> {
    let mut out = String::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = trimmed.split_whitespace().collect();
        if columns.len() < 3 {
            return Err(GoesError::InvalidFormat(format!(
                "line {}: expected at least 3 columns, found {}",
                line_no,
                columns.len()
            )));
        }

        let wavelength = parse_column(columns[0], line_no)?;
        let response = parse_column(columns[2], line_no)?;

        out.push_str(&format_value(wavelength * 1000.0));
        out.push(' ');
        out.push_str(&format_value(response));
        out.push('\n');
    }

    Ok(out)
}

/// Convert the SRF table at `input` and write it to `{output}.dat`.
///
/// Returns the path written.
pub fn reformat_srf(input: &Path, output: &Path) -> GoesResult<PathBuf> {
    let text = std::fs::read_to_string(input)?;
    let converted = reformat_srf_text(&text)?;

    let mut target = output.as_os_str().to_owned();
    target.push(".dat");
    let target = PathBuf::from(target);

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, converted)?;

    info!(input = %input.display(), output = %target.display(), "Wrote SRF table");
    Ok(target)
}

fn parse_column(text: &str, line_no: usize) -> GoesResult<f64> {
    text.parse::<f64>().map_err(|_| {
        GoesError::InvalidFormat(format!("line {}: '{}' is not a number", line_no, text))
    })
}

/// Shortest round-trip representation, keeping a trailing `.0` on whole
/// numbers so every value reads as a float.
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10000.0), "10000.0");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(-3.0), "-3.0");
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let text = "# ABI band 13\n\n10.0 1000.0 0.5\n";
        assert_eq!(reformat_srf_text(text).unwrap(), "10000.0 0.5\n");
    }

    #[test]
    fn test_short_row_reports_line() {
        let err = reformat_srf_text("10.0 1000.0 0.5\n10.1 990.1\n").unwrap_err();
        match err {
            GoesError::InvalidFormat(msg) => assert!(msg.starts_with("line 2:"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = reformat_srf_text("# header\n10.0 1000.0 abc\n").unwrap_err();
        assert!(matches!(err, GoesError::InvalidFormat(msg) if msg.contains("line 2")));
    }
}
