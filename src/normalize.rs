//! Text normalization — remove quoting artifacts before analysis.
//!
//! Pure and deterministic: quoted-reply lines go, everything after the
//! signature delimiter goes, whitespace is collapsed.

use std::sync::LazyLock;

use regex::Regex;

/// Signature delimiter line per RFC 3676: two dashes and a trailing space.
const SIGNATURE_DELIMITER: &str = "-- ";

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Normalize an extracted email body.
///
/// - drops every line that begins with the quoted-reply marker `>`
/// - truncates at the first signature delimiter line, keeping what
///   precedes it (absent delimiter keeps everything)
/// - collapses runs of three or more newlines to exactly two
/// - collapses runs of spaces/tabs to a single space
/// - trims leading and trailing whitespace
pub fn normalize(text: &str) -> String {
    let mut kept = Vec::new();
    for line in text.lines() {
        if line == SIGNATURE_DELIMITER {
            break;
        }
        if line.starts_with('>') {
            continue;
        }
        kept.push(line);
    }

    let joined = kept.join("\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&joined, "\n\n");
    let collapsed = SPACE_RUNS.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}
