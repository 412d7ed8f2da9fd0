use crate::parser::scan::{find, lines, trim_matches};
use crate::parser::traits::*;

/// Column divider between the name and value cells.
const DIVIDER: &[u8] = b" | ";

/// Characters stripped from both ends of a cell.
const CELL_BORDER: &[u8] = b"| ";

/// Parser for the interactive client's table output:
///
/// ```text
/// +-------------------+-------+
/// | Variable_name     | Value |
/// +-------------------+-------+
/// | Aborted_clients   | 10    |
/// | Threads_connected | 4     |
/// +-------------------+-------+
/// ```
///
/// The divider position is taken from the first data row and reused for the
/// rest of the record, relying on the columns being aligned. Values that
/// themselves contain ` | ` are not supported.
pub struct TabularParser;

impl RecordParser for TabularParser {
    fn parse(&self, record: &[u8]) -> ParsedRecord {
        let mut parsed = ParsedRecord::default();
        let mut divider: Option<usize> = None;

        for line in lines(record) {
            if !line.starts_with(b"|") {
                // Borders and blank lines are expected, everything else is noise
                if !line.is_empty() && !line.starts_with(b"+") {
                    parsed.discarded_lines += 1;
                }
                continue;
            }

            let at = match divider {
                Some(at) if line.len() < at => {
                    // Row truncated, probably at EOF
                    tracing::trace!(len = line.len(), divider = at, "tabular: row shorter than divider");
                    parsed.discarded_lines += 1;
                    continue;
                }
                Some(at) => at,
                None => match find(line, DIVIDER) {
                    Some(at) => {
                        divider = Some(at);
                        at
                    }
                    None => {
                        parsed.discarded_lines += 1;
                        continue;
                    }
                },
            };

            let key = trim_matches(&line[..at], CELL_BORDER);
            let value = trim_matches(&line[at..], CELL_BORDER);
            if key.is_empty() {
                parsed.discarded_lines += 1;
                continue;
            }

            parsed.sample.insert(
                &String::from_utf8_lossy(key),
                String::from_utf8_lossy(value).into_owned(),
            );
        }

        parsed
    }

    fn layout(&self) -> Layout {
        Layout::Tabular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabular_parser_basic() {
        let record = b"+-------------------+-------+\n\
                       | Aborted_clients   | 10    |\n\
                       | Threads_connected | 4     |\n\
                       | Uptime            | 100   |\n\
                       +-------------------+-------+\n";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.len(), 3);
        assert_eq!(parsed.sample.get("aborted_clients"), Some("10"));
        assert_eq!(parsed.sample.get("threads_connected"), Some("4"));
        assert_eq!(parsed.sample.get("uptime"), Some("100"));
        assert_eq!(parsed.discarded_lines, 0);
    }

    #[test]
    fn test_tabular_parser_value_with_spaces() {
        let record = b"| Ssl_cipher_list | TLS_AES_256 TLS_CHACHA20 |\n| Uptime          | 5                        |\n";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.get("ssl_cipher_list"), Some("TLS_AES_256 TLS_CHACHA20"));
        assert_eq!(parsed.sample.get("uptime"), Some("5"));
    }

    #[test]
    fn test_tabular_parser_empty_value() {
        let parsed = TabularParser.parse(b"| Ssl_cipher | |\n");
        assert_eq!(parsed.sample.get("ssl_cipher"), Some(""));
    }

    #[test]
    fn test_tabular_parser_skips_truncated_row() {
        let record = b"| Aborted_clients   | 10 |\n| Thre";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.len(), 1);
        assert_eq!(parsed.sample.get("aborted_clients"), Some("10"));
        assert_eq!(parsed.discarded_lines, 1);
    }

    #[test]
    fn test_tabular_parser_divider_fixed_per_record() {
        // Second row is misaligned; the first row's divider still applies
        let record = b"| foo | bar |\n| bazqux | 1 |\n";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.get("foo"), Some("bar"));
        assert_eq!(parsed.sample.get("baz"), Some("qux | 1"));
    }

    #[test]
    fn test_tabular_parser_row_without_divider_before_first_data_row() {
        let record = b"|garbage|\n| foo | bar |\n";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.len(), 1);
        assert_eq!(parsed.sample.get("foo"), Some("bar"));
        assert_eq!(parsed.discarded_lines, 1);
    }

    #[test]
    fn test_tabular_parser_ignores_non_table_lines() {
        let record = b"mysql> SHOW GLOBAL STATUS;\n+-----+-----+\n| foo | bar |\n+-----+-----+\n\n";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.len(), 1);
        assert_eq!(parsed.discarded_lines, 1);
    }

    #[test]
    fn test_tabular_parser_border_only_is_empty() {
        let parsed = TabularParser.parse(b"+-----+-----+\n");
        assert!(parsed.sample.is_empty());
        assert_eq!(parsed.discarded_lines, 0);
    }

    #[test]
    fn test_tabular_parser_key_case_last_wins() {
        let record = b"| Threads_connected | 1 |\n| threads_connected | 2 |\n";
        let parsed = TabularParser.parse(record);

        assert_eq!(parsed.sample.len(), 1);
        assert_eq!(parsed.sample.get("threads_connected"), Some("2"));
    }

    #[test]
    fn test_tabular_parser_layout() {
        assert_eq!(TabularParser.layout(), Layout::Tabular);
    }
}
