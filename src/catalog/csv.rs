//! Just enough CSV for the food catalog: comma separated, double-quote
//! escaping. Quoted fields may span lines.

pub fn write_record(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| quote(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Groups lines into records, joining lines while a quoted field is open.
/// Each record comes with the 1-based line it starts on.
pub fn split_records(body: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (n, line) in body.lines().enumerate() {
        let (start, mut record) = match pending.take() {
            Some((start, mut rec)) => {
                rec.push('\n');
                (start, rec)
            }
            None => (n + 1, String::new()),
        };
        record.push_str(line);
        // doubled quotes keep the count even, so odd means still inside a field
        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }
    records.extend(pending);
    records
}

/// Splits one record into fields. Returns `None` on an unterminated quote.
pub fn parse_record(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cur.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if cur.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut cur)),
            (c, _) => cur.push(c),
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(cur);
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_not_quoted() {
        let rec = write_record(&["apple".into(), "52".into()]);
        assert_eq!(rec, "apple,52");
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        let rec = write_record(&["rice, \"cooked\"".into(), "130".into()]);
        assert_eq!(rec, "\"rice, \"\"cooked\"\"\",130");
        assert_eq!(
            parse_record(&rec).unwrap(),
            vec!["rice, \"cooked\"".to_string(), "130".to_string()]
        );
    }

    #[test]
    fn empty_trailing_field_is_kept() {
        assert_eq!(
            parse_record("a,").unwrap(),
            vec!["a".to_string(), String::new()]
        );
    }

    #[test]
    fn quoted_newline_spans_lines() {
        let rec = write_record(&["soup\n(home)".into(), "40".into()]);
        let body = format!("Food,Calories\n{}\nrice,130\n", rec);
        let records = split_records(&body);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], (4, "rice,130".to_string()));
        assert_eq!(
            parse_record(&records[1].1).unwrap(),
            vec!["soup\n(home)".to_string(), "40".to_string()]
        );
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        assert!(parse_record("\"salmon,208").is_none());
    }
}
