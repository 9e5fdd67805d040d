//! Block-level duplicate detection within a single file.
//!
//! For every pair of start offsets `i < j` the `min_lines` windows are
//! compared; on a match the run is extended forward while both sides stay in
//! bounds and keep matching. Each `(i, j)` pair yields at most one block, so
//! overlapping and nested duplicates are reported separately and left as is.
//! Worst case is O(n² · k) for n lines and average match length k.

use thiserror::Error;

/// Number of blocks rendered for display; the full count is always kept.
pub const DISPLAY_LIMIT: usize = 5;

/// Default minimum block length used by the `find_duplicates` tool
pub const DEFAULT_MIN_LINES: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuplicateError {
    #[error("min_lines must be at least 1")]
    ZeroMinLines,
}

/// Two ranges of identical lines within one file. Offsets are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateBlock {
    pub first_offset: usize,
    pub second_offset: usize,
    pub length: usize,
    /// The duplicated lines, newline-joined
    pub content: String,
}

impl DuplicateBlock {
    /// 1-based inclusive line range of the first occurrence
    pub fn first_lines(&self) -> (usize, usize) {
        (self.first_offset + 1, self.first_offset + self.length)
    }

    /// 1-based inclusive line range of the second occurrence
    pub fn second_lines(&self) -> (usize, usize) {
        (self.second_offset + 1, self.second_offset + self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateReport {
    pub blocks: Vec<DuplicateBlock>,
    pub min_lines: usize,
}

impl DuplicateReport {
    /// True number of findings, regardless of display truncation
    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    pub fn shown(&self) -> &[DuplicateBlock] {
        &self.blocks[..self.blocks.len().min(DISPLAY_LIMIT)]
    }

    pub fn hidden(&self) -> usize {
        self.total().saturating_sub(DISPLAY_LIMIT)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Human-readable report, naming the file as `display_path`
    pub fn render(&self, display_path: &str) -> String {
        if self.is_empty() {
            return format!(
                "No duplicate code blocks (of {}+ lines) found in '{}'",
                self.min_lines, display_path
            );
        }

        let mut out = format!(
            "Found {} duplicate code blocks in '{}':\n",
            self.total(),
            display_path
        );
        for (n, block) in self.shown().iter().enumerate() {
            let (a_start, a_end) = block.first_lines();
            let (b_start, b_end) = block.second_lines();
            out.push_str(&format!("\nDuplicate {}:\n", n + 1));
            out.push_str(&format!(
                "  Lines {}-{} and {}-{}\n",
                a_start, a_end, b_start, b_end
            ));
            out.push_str(&format!("  Length: {} lines\n", block.length));
            out.push_str(&format!("  Content:\n{}\n", block.content));
        }
        if self.hidden() > 0 {
            out.push_str(&format!("\n... and {} more duplicates\n", self.hidden()));
        }
        out
    }
}

/// Split text into lines with terminators (`\n`, `\r\n`) stripped
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Find duplicate blocks of at least `min_lines` lines.
pub fn find_duplicates<S: AsRef<str>>(
    lines: &[S],
    min_lines: usize,
) -> Result<DuplicateReport, DuplicateError> {
    if min_lines == 0 {
        return Err(DuplicateError::ZeroMinLines);
    }

    let n = lines.len();
    let mut blocks = Vec::new();
    if n < min_lines {
        return Ok(DuplicateReport { blocks, min_lines });
    }

    let same = |a: usize, b: usize| lines[a].as_ref() == lines[b].as_ref();
    let last_start = n - min_lines;

    for i in 0..=last_start {
        for j in (i + 1)..=last_start {
            if !(0..min_lines).all(|k| same(i + k, j + k)) {
                continue;
            }
            let mut length = min_lines;
            while j + length < n && same(i + length, j + length) {
                length += 1;
            }
            let content = lines[i..i + length]
                .iter()
                .map(|l| l.as_ref())
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(DuplicateBlock {
                first_offset: i,
                second_offset: j,
                length,
                content,
            });
        }
    }

    Ok(DuplicateReport { blocks, min_lines })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(report: &DuplicateReport) -> Vec<(usize, usize, usize)> {
        report
            .blocks
            .iter()
            .map(|b| (b.first_offset, b.second_offset, b.length))
            .collect()
    }

    #[test]
    fn test_repeated_run_extends_across_boundary() {
        let report = find_duplicates(&["A", "A", "A", "B"], 1).unwrap();
        let found = offsets(&report);

        assert!(found.contains(&(0, 1, 2)));
        assert!(found.iter().any(|&(i, j, _)| (i, j) == (1, 2)));
        assert!(found.iter().all(|&(_, _, len)| len >= 1));
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_maximal_block_reported() {
        let lines = ["x = 1", "y = 2", "z = 3", "other", "x = 1", "y = 2", "z = 3"];
        let report = find_duplicates(&lines, 3).unwrap();

        assert_eq!(offsets(&report), vec![(0, 4, 3)]);
        assert_eq!(report.blocks[0].content, "x = 1\ny = 2\nz = 3");
        assert_eq!(report.blocks[0].first_lines(), (1, 3));
        assert_eq!(report.blocks[0].second_lines(), (5, 7));
    }

    #[test]
    fn test_below_min_lines_not_reported() {
        let lines = ["a", "b", "c", "a", "b", "d"];
        assert!(find_duplicates(&lines, 3).unwrap().is_empty());
        assert_eq!(find_duplicates(&lines, 2).unwrap().total(), 1);
    }

    #[test]
    fn test_short_input() {
        assert!(find_duplicates::<&str>(&[], 3).unwrap().is_empty());
        assert!(find_duplicates(&["a", "a"], 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_min_lines_rejected() {
        assert_eq!(
            find_duplicates(&["a"], 0).unwrap_err(),
            DuplicateError::ZeroMinLines
        );
    }

    #[test]
    fn test_detection_is_deterministic() {
        let text = "a\nb\na\nb\na\nb\nc\n";
        let lines = split_lines(text);
        let first = find_duplicates(&lines, 2).unwrap();
        let second = find_duplicates(&lines, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_line_terminators_ignored() {
        let lines = split_lines("one\r\ntwo\none\ntwo");
        let report = find_duplicates(&lines, 2).unwrap();
        assert_eq!(offsets(&report), vec![(0, 2, 2)]);
    }

    #[test]
    fn test_display_truncated_but_total_exposed() {
        let lines = vec!["same"; 8];
        let report = find_duplicates(&lines, 1).unwrap();

        assert_eq!(report.total(), 28);
        assert_eq!(report.shown().len(), DISPLAY_LIMIT);
        assert_eq!(report.hidden(), 23);

        let text = report.render("f.py");
        assert!(text.starts_with("Found 28 duplicate code blocks in 'f.py':"));
        assert!(text.contains("Duplicate 5:"));
        assert!(!text.contains("Duplicate 6:"));
        assert!(text.contains("... and 23 more duplicates"));
    }

    #[test]
    fn test_render_empty() {
        let report = find_duplicates(&["a", "b"], 3).unwrap();
        assert_eq!(
            report.render("f.py"),
            "No duplicate code blocks (of 3+ lines) found in 'f.py'"
        );
    }
}
