//! CSV export of catalog-wide progress.

use practice_core::catalog::Catalog;
use practice_core::model::ProgressRecord;

const HEADER: &str = "ID,Title,Difficulty,Topic,Status,Link";

/// Render one row per catalog problem with its solve status.
///
/// Rows follow catalog order; `Status` is `Solved` or `Unsolved` by solved-set
/// membership.
#[must_use]
pub fn progress_csv(catalog: &Catalog, record: &ProgressRecord) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for problem in catalog.problems() {
        let status = if record.is_solved(problem.id()) {
            "Solved"
        } else {
            "Unsolved"
        };
        let row = [
            problem.id().to_string(),
            field(problem.title()),
            problem.difficulty().to_string(),
            field(problem.topic()),
            status.to_string(),
            field(problem.link()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field when it contains a comma, quote, or line break.
fn field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}
