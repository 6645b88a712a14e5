use std::fs;
use std::path::Path;

use crate::tle::error::TleError;
use crate::tle::record::TleRecord;

/// Load every element set in a TLE file.
pub fn load_tle_file(path: &Path) -> Result<Vec<TleRecord>, TleError> {
    let content = fs::read_to_string(path)?;
    let records = parse_tle_text(&content)?;
    log::debug!("Loaded {} element sets from {}", records.len(), path.display());
    Ok(records)
}

/// Parse multi-satellite TLE content.
///
/// Accepts the usual name/line1/line2 triples as well as bare two-line sets,
/// which are named after their catalog number. Lines that belong to neither
/// shape are skipped; a record that has the right shape but bad columns fails
/// the whole parse.
pub fn parse_tle_text(content: &str) -> Result<Vec<TleRecord>, TleError> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_line(lines[i], '1') && i + 1 < lines.len() && is_line(lines[i + 1], '2') {
            let name = lines[i]
                .get(2..7)
                .map(|id| format!("NORAD {}", id.trim()))
                .unwrap_or_else(|| "UNKNOWN".to_string());
            records.push(TleRecord::new(name, lines[i], lines[i + 1])?);
            i += 2;
        } else if i + 2 < lines.len() && is_line(lines[i + 1], '1') && is_line(lines[i + 2], '2')
        {
            records.push(TleRecord::new(lines[i], lines[i + 1], lines[i + 2])?);
            i += 3;
        } else {
            log::warn!("Skipping unrecognised TLE line: {}", lines[i]);
            i += 1;
        }
    }

    Ok(records)
}

fn is_line(line: &str, number: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(number) && chars.next() == Some(' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BEIDOU: &str = "BEIDOU 2
    1 31115U 07011A   21323.16884980 -.00000043  00000-0  00000-0 0  9993
    2 31115  51.9034 274.7604 0003928 314.2233  45.7206  1.77349177 46511
    BEIDOU 3
    1 36287U 10001A   21323.54986160 -.00000268  00000-0  00000-0 0  9995
    2 36287   1.7347  43.1625 0001966  74.6398 279.3247  1.00266671 43404";

    #[test]
    fn parses_indented_three_line_sets() {
        let records = parse_tle_text(BEIDOU).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "BEIDOU 2");
        assert_eq!(records[1].name(), "BEIDOU 3");
        assert!((records[0].mean_motion() - 1.77349177).abs() < 1e-9);
        assert!((records[1].orbital_period_minutes() - 1440.0 / 1.00266671).abs() < 1e-9);
    }

    #[test]
    fn names_bare_two_line_sets_by_catalog_number() {
        let text = "1 31115U 07011A   21323.16884980 -.00000043  00000-0  00000-0 0  9993\n\
                    2 31115  51.9034 274.7604 0003928 314.2233  45.7206  1.77349177 46511\n";
        let records = parse_tle_text(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "NORAD 31115");
    }

    #[test]
    fn skips_stray_lines_and_blank_lines() {
        let text = format!("# catalogue dump\n\n{BEIDOU}\n\n");
        let records = parse_tle_text(&text).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn fails_fast_on_bad_columns() {
        let text = "BROKEN
1 31115U 07011A   21323.16884980 -.00000043  00000-0  00000-0 0  9993
2 31115  51.9034 274.7604 0003928 314.2233  45.7206  x.77349177 46511";
        let err = parse_tle_text(text).unwrap_err();
        assert!(matches!(err, TleError::MalformedElementSet { ref name, .. } if name == "BROKEN"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BEIDOU.as_bytes()).unwrap();
        let records = load_tle_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_tle_file(Path::new("/nonexistent/sats.tle")).unwrap_err();
        assert!(matches!(err, TleError::FileRead(_)));
    }
}
