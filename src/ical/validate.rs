use crate::model::ValidationReport;

/// RFC 5545 recommends folding content lines longer than 75 octets.
/// Generated feeds are not folded; overlong lines are reported as warnings.
const LINE_LENGTH_LIMIT: usize = 75;

/// Structural sanity check over a generated calendar document.
///
/// Uses simple line-based inspection rather than a full iCal grammar
/// parser. This guards against regressions in envelope emission; it is not
/// a runtime defense against arbitrary input.
pub fn validate_calendar(document: &str) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let lines: Vec<&str> = document
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    if !lines.iter().any(|line| *line == "BEGIN:VCALENDAR") {
        errors.push("missing BEGIN:VCALENDAR".to_string());
    }
    if !lines.iter().any(|line| *line == "END:VCALENDAR") {
        errors.push("missing END:VCALENDAR".to_string());
    }
    if !lines.iter().any(|line| *line == "VERSION:2.0") {
        errors.push("missing VERSION:2.0".to_string());
    }
    if !lines.iter().any(|line| line.starts_with("PRODID:")) {
        errors.push("missing PRODID".to_string());
    }

    let event_begins = lines.iter().filter(|line| **line == "BEGIN:VEVENT").count();
    let event_ends = lines.iter().filter(|line| **line == "END:VEVENT").count();
    if event_begins != event_ends {
        errors.push(format!(
            "unbalanced VEVENT blocks: {event_begins} BEGIN vs {event_ends} END"
        ));
    }

    for (index, line) in lines.iter().enumerate() {
        if line.len() > LINE_LENGTH_LIMIT {
            warnings.push(format!(
                "line {} exceeds {LINE_LENGTH_LIMIT} octets ({} octets)",
                index + 1,
                line.len()
            ));
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
