//! Character-limit ruler
//!
//! Produces filler text with `[N]` markers every `interval` characters.
//! Marker text counts towards the total, so each marker shows the true
//! position in the final string. Printing a ruler shows exactly how many
//! characters fit on a receipt.
//!
//! The length test prints numbered lines between `=` rules so the paper
//! used per line can be measured.

pub const DEFAULT_LIMIT: usize = 2000;
pub const DEFAULT_INTERVAL: usize = 25;

/// Lines in the length test, counting the title and rules
pub const LENGTH_TEST_LINES: usize = 21;
const RULE_WIDTH: usize = 32;

const LOREM: &str = "Lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod \
    tempor incididunt ut labore et dolore magna aliqua ut enim ad minim \
    veniam quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea \
    commodo consequat duis aute irure dolor in reprehenderit in voluptate \
    velit esse cillum dolore eu fugiat nulla pariatur excepteur sint occaecat \
    cupidatat non proident sunt in culpa qui officia deserunt mollit anim id \
    est laborum sed perspiciatis unde omnis iste natus error sit voluptatem \
    accusantium doloremque laudantium totam rem aperiam eaque ipsa quae ab \
    illo inventore veritatis et quasi architecto beatae vitae dicta explicabo \
    nemo enim ipsam voluptatem quia voluptas sit aspernatur aut odit aut fugit \
    sed quia consequuntur magni dolores eos qui ratione voluptatem sequi \
    nesciunt neque porro quisquam est qui dolorem ipsum quia dolor sit amet \
    consectetur adipisci velit sed quia non numquam eius modi tempora incidunt \
    ut labore et dolore magnam aliquam quaerat voluptatem ut enim ad minima \
    veniam quis nostrum exercitationem ullam corporis suscipit laboriosam nisi \
    ut aliquid ex ea commodi consequatur quis autem vel eum iure reprehenderit \
    qui in ea voluptate velit esse quam nihil molestiae consequatur vel illum \
    qui dolorem eum fugiat quo voluptas nulla pariatur at vero eos et accusamus \
    et iusto odio dignissimos ducimus qui blanditiis praesentium voluptatum \
    deleniti atque corrupti quos dolores et quas molestias excepturi occaecati";

/// Build a ruler string of exactly `limit` characters
///
/// A marker that would overshoot `limit` is cut off with the rest. An
/// `interval` of 0 disables markers.
pub fn build(limit: usize, interval: usize) -> String {
    let mut result = String::with_capacity(limit + 8);
    let mut count = 0;
    let mut next_mark = interval;

    for c in LOREM.chars().chain(std::iter::once(' ')).cycle() {
        if count >= limit {
            break;
        }
        result.push(c);
        count += 1;

        if interval > 0 && count == next_mark {
            let marker = format!("[{}]", next_mark);
            count += marker.len();
            result.push_str(&marker);
            next_mark += interval;
        }
    }

    // markers are ASCII, so byte length == char count
    result.truncate(limit);
    result
}

/// Paper length test: title between rules, `line 04` up to
/// `line {line_count - 1}`, closing rule
///
/// The first four slots are taken by the rules and the title, so fewer
/// than five lines prints no numbered line.
pub fn length_test(line_count: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone(), "  80MM LENGTH TEST".to_string(), rule.clone()];
    lines.extend((4..line_count).map(|i| format!("  line {:02}", i)));
    lines.push(rule);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length() {
        for limit in [0, 1, 24, 25, 26, 150, 550, 2000, 5000] {
            assert_eq!(build(limit, DEFAULT_INTERVAL).chars().count(), limit);
        }
    }

    #[test]
    fn test_markers_show_true_position() {
        let ruler = build(550, 25);
        let mut found = 0;
        let mut search = 0;
        while let Some(pos) = ruler[search..].find('[') {
            let start = search + pos;
            let Some(len) = ruler[start..].find(']') else {
                break;
            };
            let n: usize = ruler[start + 1..start + len].parse().unwrap();
            // marker directly follows character number n
            assert_eq!(start, n);
            found += 1;
            search = start + len + 1;
        }
        assert!(found >= 15);
    }

    #[test]
    fn test_starts_with_lorem() {
        assert_eq!(build(25, 25), "Lorem ipsum dolor sit ame");
        assert_eq!(build(29, 25), "Lorem ipsum dolor sit ame[25]");
    }

    #[test]
    fn test_wraps_source_text() {
        let ruler = build(5000, 0);
        assert_eq!(ruler.len(), 5000);
        assert!(!ruler.contains('['));
    }

    #[test]
    fn test_length_test_lines() {
        let text = length_test(LENGTH_TEST_LINES);
        let lines: Vec<&str> = text.lines().collect();
        // 3 header lines, line 04..=20, closing rule
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "=".repeat(32));
        assert_eq!(lines[1], "  80MM LENGTH TEST");
        assert_eq!(lines[3], "  line 04");
        assert_eq!(lines[19], "  line 20");
        assert_eq!(lines[20], lines[0]);
    }

    #[test]
    fn test_short_length_test_keeps_frame() {
        assert_eq!(length_test(0).lines().count(), 4);
        assert_eq!(length_test(5).lines().nth(3), Some("  line 04"));
    }
}
