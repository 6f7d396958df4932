//! Fixed-width text layout for task receipts
//!
//! ```text
//! ================================================
//!                  BUY GROCERIES
//! ------------------------------------------------
//!                  PRIORITY: LOW
//! ================================================
//!
//! Pick up milk, eggs, bread, and coffee from the
//! store before 6pm.
//!
//! ------------------------------------------------
//!                2024-05-01  09:30
//! ================================================
//! ```

use super::Receipt;

/// Characters per line on 80mm paper (font A)
pub const CHAR_WIDTH: usize = 48;
/// Maximum description lines
pub const MAX_LINES: usize = 20;
/// Hard ceiling on description length, in characters
pub const CHAR_LIMIT: usize = CHAR_WIDTH * MAX_LINES;

const ELLIPSIS: &str = "...";

/// Line geometry of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptLayout {
    pub width: usize,
    pub max_lines: usize,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        Self {
            width: CHAR_WIDTH,
            max_lines: MAX_LINES,
        }
    }
}

impl ReceiptLayout {
    /// Layout for a different paper width, same line cap
    pub fn with_width(width: usize) -> Self {
        Self {
            width: width.max(ELLIPSIS.len() + 1),
            max_lines: MAX_LINES,
        }
    }

    pub fn border(&self) -> String {
        "=".repeat(self.width)
    }

    pub fn thin_border(&self) -> String {
        "-".repeat(self.width)
    }

    /// All lines of the receipt, top to bottom
    pub fn render(&self, receipt: &Receipt) -> Vec<String> {
        let body = self.body(receipt.description());
        let mut lines = Vec::with_capacity(body.len() + 10);

        // Header
        lines.push(self.border());
        lines.push(center(receipt.title(), self.width));
        lines.push(self.thin_border());
        lines.push(center(
            &format!("PRIORITY: {}", receipt.priority().label()),
            self.width,
        ));
        lines.push(self.border());

        // Body
        lines.push(String::new());
        lines.extend(body);
        lines.push(String::new());

        // Footer
        lines.push(self.thin_border());
        lines.push(center(receipt.timestamp(), self.width));
        lines.push(self.border());

        lines
    }

    /// Wrapped description, capped at `max_lines`
    ///
    /// When lines are dropped the last kept line ends in "...".
    fn body(&self, description: &str) -> Vec<String> {
        let mut wrapped = wrap(description, self.width);
        if wrapped.len() > self.max_lines {
            wrapped.truncate(self.max_lines);
            if let Some(last) = wrapped.last_mut() {
                let keep = self.width.saturating_sub(ELLIPSIS.len());
                let kept: String = last.chars().take(keep).collect();
                *last = format!("{}{}", kept.trim_end(), ELLIPSIS);
            }
        }
        wrapped
    }
}

/// Centre text in `width` columns; the odd space goes to the right
///
/// Text that is already too wide is returned unchanged.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

const TAB_SIZE: usize = 8;

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_letter(c: char) -> bool {
    is_word(c) && !c.is_numeric()
}

fn is_word_punct(c: char) -> bool {
    is_word(c) || matches!(c, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

/// Tabs expand to the next multiple of 8 columns, every other whitespace
/// character becomes one space
fn normalize_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            c if is_space(c) => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// End of a run of two or more hyphens at `i` that leads into a word
/// character (an em-dash written as `--`)
fn em_dash_end(text: &[char], i: usize) -> Option<usize> {
    let run = text[i.min(text.len())..]
        .iter()
        .take_while(|&&c| c == '-')
        .count();
    let end = i + run;
    (run >= 2 && text.get(end).is_some_and(|&c| is_word(c))).then_some(end)
}

/// Whether a word may break after the hyphen at `i`
///
/// The hyphen needs two letters (or letter-hyphen-letter) before it and a
/// letter, optionally hyphen, letter after it: `well-known` breaks, `x-1`
/// and `--flag` do not.
fn breaks_after_hyphen(text: &[char], i: usize) -> bool {
    let at = |j: Option<usize>| j.and_then(|j| text.get(j)).copied();
    let letter = |j: Option<usize>| at(j).is_some_and(is_letter);
    let back = |n: usize| i.checked_sub(n);

    let before = letter(back(1))
        && (letter(back(2)) || (at(back(2)) == Some('-') && letter(back(3))));
    let after = letter(Some(i + 1))
        && (letter(Some(i + 2)) || (at(Some(i + 2)) == Some('-') && letter(Some(i + 3))));
    before && after
}

/// Split into whitespace runs, em-dashes and words; words split after
/// hyphens that join letters
fn chunks(text: &[char]) -> Vec<Vec<char>> {
    let mut out = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = if text[start] == ' ' {
            start + text[start..].iter().take_while(|&&c| c == ' ').count()
        } else if let Some(end) = em_dash_end(text, start)
            && start > 0
            && is_word_punct(text[start - 1])
        {
            end
        } else {
            let mut end = start + 1;
            loop {
                if text.get(end) == Some(&'-') && breaks_after_hyphen(text, end) {
                    break end + 1;
                }
                if end == text.len() || text[end] == ' ' {
                    break end;
                }
                if is_word_punct(text[end - 1]) && em_dash_end(text, end).is_some() {
                    break end;
                }
                end += 1;
            }
        };
        out.push(text[start..end].to_vec());
        start = end;
    }
    out
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|&c| c == ' ')
}

/// Greedy word wrap at `width` characters
///
/// Behaves like Python's `textwrap.wrap`: whitespace inside a line is kept
/// as written (tabs expanded, newlines turned into spaces) and only dropped
/// at line breaks; leading whitespace of the text is kept. Lines may break
/// after a hyphen. Words longer than the width fill the rest of the current
/// line and are then broken, at a hyphen when one fits.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut pending = chunks(&normalize_whitespace(text));
    pending.reverse();
    let mut lines: Vec<String> = Vec::new();

    while !pending.is_empty() {
        let mut line: Vec<Vec<char>> = Vec::new();
        let mut len = 0;

        if !lines.is_empty() && pending.last().is_some_and(|c| is_blank(c)) {
            pending.pop();
        }

        while let Some(chunk) = pending.last() {
            if len + chunk.len() > width {
                break;
            }
            len += chunk.len();
            line.extend(pending.pop());
        }

        if let Some(chunk) = pending.last_mut()
            && chunk.len() > width
        {
            // may be 0: the empty piece is then dropped as trailing blank
            let space_left = width - len;
            let mut end = space_left;
            if let Some(hyphen) = chunk[..space_left].iter().rposition(|&c| c == '-')
                && hyphen > 0
                && chunk[..hyphen].iter().any(|&c| c != '-')
            {
                end = hyphen + 1;
            }
            let rest = chunk.split_off(end);
            len += chunk.len();
            line.push(std::mem::replace(chunk, rest));
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }

        if !line.is_empty() {
            lines.push(line.concat().into_iter().collect());
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::Priority;

    fn receipt(title: &str, description: &str, priority: Priority) -> Receipt {
        Receipt::new(title, description, priority).with_timestamp("2024-05-01  09:30")
    }

    #[test]
    fn test_center_odd_padding_goes_right() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("toolong", 3), "toolong");
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert!(wrap("   ", 10).is_empty());
        assert_eq!(wrap("exactly10!", 10), vec!["exactly10!"]);
    }

    #[test]
    fn test_wrap_keeps_inner_whitespace() {
        assert_eq!(wrap("Call Bob.  Then Sue", 48), vec!["Call Bob.  Then Sue"]);
        // runs at a break are dropped, newlines become spaces
        assert_eq!(wrap("one two  three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("a\nb", 10), vec!["a b"]);
        // tabs expand to the next multiple of 8
        assert_eq!(wrap("ab\tc", 20), vec!["ab      c"]);
        assert_eq!(wrap("  indented", 20), vec!["  indented"]);
    }

    #[test]
    fn test_wrap_breaks_after_hyphen() {
        let lead = "a".repeat(40);
        let text = format!("{} well-known-thing", lead);
        assert_eq!(
            wrap(&text, 48),
            vec![format!("{} well-", lead), "known-thing".to_string()]
        );
        // hyphens next to digits or at a word start are not break points
        assert_eq!(wrap("abc x-1 --flag", 6), vec!["abc", "x-1", "--flag"]);
    }

    #[test]
    fn test_long_word_breaks_at_hyphen() {
        assert_eq!(wrap("12-34567890", 6), vec!["12-", "345678", "90"]);
        assert_eq!(
            wrap("see e-mail-address-book", 9),
            vec!["see", "e-mail-", "address-", "book"]
        );
        // the chunk after a hyphen break still fills the line
        assert_eq!(wrap("aaaa-bbbbbbbbbb", 8), vec!["aaaa-bbb", "bbbbbbb"]);
    }

    #[test]
    fn test_wrap_em_dash() {
        assert_eq!(wrap("wait--what", 6), vec!["wait--", "what"]);
        assert_eq!(
            wrap("the quick  brown\tfox jumps", 10),
            vec!["the quick", "brown", "fox jumps"]
        );
    }

    #[test]
    fn test_wrap_long_word_fills_current_line() {
        assert_eq!(
            wrap("ab abcdefghijklmnop", 8),
            vec!["ab abcde", "fghijklm", "nop"]
        );
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_receipt_layout() {
        let r = receipt(
            "Buy Groceries",
            "Pick up milk, eggs, bread, and coffee from the store before 6pm.",
            Priority::Low,
        );
        let lines = r.lines();

        assert_eq!(lines[0], "=".repeat(48));
        assert_eq!(lines[1].trim(), "BUY GROCERIES");
        assert_eq!(lines[1].len(), 48);
        assert_eq!(lines[2], "-".repeat(48));
        assert_eq!(lines[3].trim(), "PRIORITY: LOW");
        assert_eq!(lines[4], "=".repeat(48));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Pick up milk, eggs, bread, and coffee from the");
        assert_eq!(lines[7], "store before 6pm.");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "-".repeat(48));
        assert_eq!(lines[10].trim(), "2024-05-01  09:30");
        assert_eq!(lines[11], "=".repeat(48));
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_body_capped_with_ellipsis() {
        // two 25-char words never share a line: ~36 lines within CHAR_LIMIT
        let word = "x".repeat(25);
        let description = vec![word.as_str(); 60].join(" ");
        let r = receipt("Long", &description, Priority::High);
        let lines = r.lines();

        let body = &lines[6..lines.len() - 4];
        assert_eq!(body.len(), MAX_LINES);
        let last = body.last().unwrap();
        assert_eq!(last, &format!("{}...", word));
        assert!(body.iter().all(|l| l.chars().count() <= CHAR_WIDTH));
    }

    #[test]
    fn test_ellipsis_trims_trailing_space() {
        let layout = ReceiptLayout {
            width: 10,
            max_lines: 1,
        };
        // first line "aaaaaa bbb"; kept 7 chars "aaaaaa " -> trimmed
        assert_eq!(layout.body("aaaaaa bbb ccc"), vec!["aaaaaa..."]);
    }

    #[test]
    fn test_narrow_layout() {
        let r = receipt("Fix Login Bug", "short", Priority::Medium);
        let lines = r.lines_with(&ReceiptLayout::with_width(32));
        assert!(lines.iter().all(|l| l.chars().count() <= 32));
        assert_eq!(lines[0], "=".repeat(32));
    }
}
