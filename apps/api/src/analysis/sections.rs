//! Section scanning: locates labelled blocks ("SKILLS", "CERTIFICATIONS", ...) in résumé text.
//!
//! A line-oriented state machine rather than one large pattern:
//! a block opens on a header line carrying one of the requested labels and
//! closes on a blank line, on any all-caps header line, or at end of text.
//! Prefixed headers ("Key Technical Skills") only open a block from outside one.

pub const SKILL_HEADERS: &[&str] = &[
    "SKILLS",
    "TECHNICAL SKILLS",
    "SKILL SET",
    "EXPERTISE",
    "COMPETENCIES",
];

pub const CERTIFICATION_HEADERS: &[&str] =
    &["CERTIFICATIONS", "CERTIFICATE", "LICENSES", "TRAININGS"];

/// Words allowed in front of a label on a header line ("KEY TECHNICAL SKILLS").
const MAX_HEADER_PREFIX_WORDS: usize = 2;

/// A captured block: the header line that opened it and the content lines after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock<'a> {
    pub header: &'a str,
    pub lines: Vec<&'a str>,
}

impl SectionBlock<'_> {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

enum ScanState<'a> {
    SeekingHeader,
    InBlock(SectionBlock<'a>),
}

/// Returns every block opened by one of `labels`, in document order.
pub fn find_sections<'a>(text: &'a str, labels: &[&str]) -> Vec<SectionBlock<'a>> {
    let mut blocks = Vec::new();
    let mut state = ScanState::SeekingHeader;

    for line in text.lines() {
        state = match state {
            ScanState::SeekingHeader => {
                if is_labelled_header(line, labels) {
                    ScanState::InBlock(SectionBlock {
                        header: line.trim(),
                        lines: Vec::new(),
                    })
                } else {
                    ScanState::SeekingHeader
                }
            }
            ScanState::InBlock(mut block) => {
                if line.trim().is_empty() {
                    // Blank lines directly under the header do not end the block
                    if block.lines.is_empty() {
                        ScanState::InBlock(block)
                    } else {
                        blocks.push(block);
                        ScanState::SeekingHeader
                    }
                } else if is_exact_label(line, labels)
                    || (is_all_caps_header(line) && is_labelled_header(line, labels))
                {
                    blocks.push(block);
                    ScanState::InBlock(SectionBlock {
                        header: line.trim(),
                        lines: Vec::new(),
                    })
                } else if is_all_caps_header(line) {
                    blocks.push(block);
                    ScanState::SeekingHeader
                } else {
                    block.lines.push(line.trim_end());
                    ScanState::InBlock(block)
                }
            }
        };
    }

    if let ScanState::InBlock(block) = state {
        blocks.push(block);
    }

    blocks
}

/// Returns the first block opened by one of `labels`.
pub fn first_section<'a>(text: &'a str, labels: &[&str]) -> Option<SectionBlock<'a>> {
    find_sections(text, labels).into_iter().next()
}

/// True if `line` ends with one of `labels` (case-insensitive, optional trailing colon),
/// the label starts on a word boundary, and at most two words precede it.
pub fn is_labelled_header(line: &str, labels: &[&str]) -> bool {
    let upper = header_text(line).to_uppercase();
    if upper.is_empty() {
        return false;
    }

    labels.iter().any(|label| {
        let Some(prefix) = upper.strip_suffix(*label) else {
            return false;
        };
        let on_boundary = prefix
            .chars()
            .last()
            .map_or(true, |c| !c.is_alphanumeric());
        on_boundary && prefix.split_whitespace().count() <= MAX_HEADER_PREFIX_WORDS
    })
}

/// True if `line` is exactly one of `labels` (case-insensitive, optional trailing colon).
fn is_exact_label(line: &str, labels: &[&str]) -> bool {
    let upper = header_text(line).to_uppercase();
    labels.contains(&upper.as_str())
}

/// True for lines such as `EXPERIENCE`, `WORK HISTORY:` or `PROJECTS & AWARDS`.
///
/// Needs to start with a letter, hold at least two letters and no lowercase ones,
/// and contain nothing but letters, spaces, `&`, `/`, `-` and `'`. List lines
/// like `SQL, AWS` and bullets like `- CKA` do not qualify.
pub fn is_all_caps_header(line: &str) -> bool {
    let text = header_text(line);
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    text.starts_with(char::is_alphabetic)
        && letters >= 2
        && !text.chars().any(char::is_lowercase)
        && text
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, ' ' | '&' | '/' | '-' | '\''))
}

fn header_text(line: &str) -> &str {
    line.trim().trim_end_matches(':').trim_end()
}
