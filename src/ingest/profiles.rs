//! CSV loader for structured user records
//!
//! A small RFC-4180-style reader: quoted fields, escaped quotes, newlines
//! inside quotes. The header row maps columns by name, so column order in
//! the source file does not matter. `user_id` and `name` are required;
//! everything else is optional.

use std::path::Path;

use crate::errors::NetRecError;
use crate::models::UserRecord;
use crate::Result;

/// Parse a users CSV file into records.
pub fn parse_users_csv<P: AsRef<Path>>(path: P) -> Result<Vec<UserRecord>> {
    let content = std::fs::read_to_string(&path)?;
    parse_users_csv_str(&content)
}

/// Parse CSV content into records.
pub fn parse_users_csv_str(content: &str) -> Result<Vec<UserRecord>> {
    let mut rows = parse_rows(content)?;
    if rows.is_empty() {
        return Err(NetRecError::Ingest("CSV file has no header row".to_string()));
    }

    let header: Vec<String> = rows
        .remove(0)
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column = |name: &str| header.iter().position(|h| h == name);

    let user_id_col = column("user_id")
        .ok_or_else(|| NetRecError::Ingest("CSV is missing the user_id column".to_string()))?;
    let name_col = column("name")
        .ok_or_else(|| NetRecError::Ingest("CSV is missing the name column".to_string()))?;
    let email_col = column("email");
    let company_col = column("company");
    let school_col = column("school");
    let location_col = column("location");
    let title_col = column("title");
    let bio_col = column("bio");

    let optional = |row: &[String], col: Option<usize>| -> Option<String> {
        col.and_then(|idx| row.get(idx))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    };

    let mut records = Vec::with_capacity(rows.len());
    for (line_no, row) in rows.into_iter().enumerate() {
        // Skip fully blank trailing rows
        if row.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let user_id = row
            .get(user_id_col)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                NetRecError::Ingest(format!("Row {}: empty user_id", line_no + 2))
            })?
            .to_string();
        let name = row
            .get(name_col)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| NetRecError::Ingest(format!("Row {}: empty name", line_no + 2)))?
            .to_string();

        records.push(UserRecord {
            user_id,
            name,
            email: optional(&row, email_col),
            company: optional(&row, company_col),
            school: optional(&row, school_col),
            location: optional(&row, location_col),
            title: optional(&row, title_col),
            bio: optional(&row, bio_col),
        });
    }

    Ok(records)
}

/// Split CSV content into rows of fields, honoring quoting rules.
fn parse_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        // Escaped quote
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => {
                    row.push(std::mem::take(&mut field));
                }
                '\r' => {
                    // Part of CRLF; the newline handling below closes the row
                }
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(ch),
            }
        }
    }

    if in_quotes {
        return Err(NetRecError::Ingest(
            "CSV ends inside a quoted field".to_string(),
        ));
    }

    // Final row without trailing newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "user_id,name,email,company,school,location,title,bio\n\
                   u001,Alice Heart,alice@acme.com,Acme,MIT,Boston,Engineer,Builds systems\n\
                   u002,Bob Stone,bob@acme.com,Acme,,,,\n";
        let records = parse_users_csv_str(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, "u001");
        assert_eq!(records[0].school.as_deref(), Some("MIT"));
        assert_eq!(records[1].company.as_deref(), Some("Acme"));
        assert_eq!(records[1].school, None);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let csv = "user_id,name,title\n\
                   u001,\"Heart, Alice\",\"Engineer, \"\"Staff\"\"\"\n";
        let records = parse_users_csv_str(csv).unwrap();
        assert_eq!(records[0].name, "Heart, Alice");
        assert_eq!(records[0].title.as_deref(), Some("Engineer, \"Staff\""));
    }

    #[test]
    fn test_parse_newline_inside_quotes() {
        let csv = "user_id,name,bio\nu001,Alice,\"line one\nline two\"\n";
        let records = parse_users_csv_str(csv).unwrap();
        assert_eq!(records[0].bio.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "name,user_id\nAlice,u001\n";
        let records = parse_users_csv_str(csv).unwrap();
        assert_eq!(records[0].user_id, "u001");
        assert_eq!(records[0].name, "Alice");
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "user_id,email\nu001,a@b.c\n";
        assert!(parse_users_csv_str(csv).is_err());
    }

    #[test]
    fn test_empty_required_field() {
        let csv = "user_id,name\nu001,\n";
        assert!(parse_users_csv_str(csv).is_err());
    }

    #[test]
    fn test_unterminated_quote() {
        let csv = "user_id,name\nu001,\"Alice\n";
        assert!(parse_users_csv_str(csv).is_err());
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv = "user_id,name\r\nu001,Alice\r\n";
        let records = parse_users_csv_str(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alice");
    }
}
