use std::path::Path;

use anyhow::Context;

use crate::neural_network::prelude::Float;

/// Parse table of numbers.
///
/// Each line is a row of values separated by commas, semicolons or tabs.
/// The separator is taken from the first row and must be the same for the
/// whole table. Lines starting with `#` are comments, empty lines are skipped.
/// All the rows must have the same amount of values.
///
/// ```
/// use perceptlib::table::parse_table;
///
/// let table = parse_table::<f64>("# x, y\n1, 2.5\n\n3, -4\n").unwrap();
///
/// assert_eq!(table, [vec![1.0, 2.5], vec![3.0, -4.0]]);
///
/// let table = parse_table::<f64>("1;2\n3;4\n").unwrap();
///
/// assert_eq!(table, [vec![1.0, 2.0], vec![3.0, 4.0]]);
/// ```
pub fn parse_table<F: Float>(text: &str) -> anyhow::Result<Vec<Vec<F>>> {
    parse_table_with_delimiter(text, detect_delimiter(text))
}

/// Parse table of numbers with explicitly given values separator.
pub fn parse_table_with_delimiter<F: Float>(text: &str, delimiter: u8) -> anyhow::Result<Vec<Vec<F>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(text.as_bytes());

    let mut table = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|err| {
            let line = err.position().map(|position| position.line()).unwrap_or_default();

            anyhow::Error::new(err).context(format!("failed to read row at line {line}"))
        })?;

        let line = record.position().map(|position| position.line()).unwrap_or_default();

        let row = record.iter()
            .map(|value| {
                value.parse::<f64>()
                    .map(F::from_f64)
                    .with_context(|| format!("failed to parse value {value:?} at line {line}"))
            })
            .collect::<anyhow::Result<Vec<F>>>()?;

        table.push(row);
    }

    Ok(table)
}

/// Find values separator used by the first row of the table.
///
/// Defaults to comma.
pub fn detect_delimiter(text: &str) -> u8 {
    let row = text.lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .unwrap_or_default();

    if row.contains(';') {
        b';'
    } else if row.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Read table of numbers from the file.
pub fn load_table<F: Float>(path: impl AsRef<Path>) -> anyhow::Result<Vec<Vec<F>>> {
    let path = path.as_ref();

    log::trace!("Loading table from {path:?}");

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table from {path:?}"))?;

    let table = parse_table(&text)
        .with_context(|| format!("failed to parse table from {path:?}"))?;

    log::debug!("Loaded {} rows from {path:?}", table.len());

    Ok(table)
}

/// Format table as comma separated rows.
pub fn format_table<F: Float>(table: &[Vec<F>]) -> String {
    let mut text = String::new();

    for row in table {
        let row = row.iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>();

        text.push_str(&row.join(","));
        text.push('\n');
    }

    text
}

#[test]
fn test_parse_table() -> anyhow::Result<()> {
    let table = parse_table::<f32>("1,2,3\n\n4, 5 ,6\n# comment\n7,8,9\n")?;

    assert_eq!(table, [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]]);

    assert_eq!(parse_table::<f64>("1\t2\n3\t4\n")?, [vec![1.0, 2.0], vec![3.0, 4.0]]);
    assert_eq!(parse_table::<f64>("# a; b\n1; 2\n")?, [vec![1.0, 2.0]]);

    assert!(parse_table::<f64>("")?.is_empty());
    assert!(parse_table::<f64>("# only comment\n\n")?.is_empty());

    Ok(())
}

#[test]
fn test_detect_delimiter() {
    assert_eq!(detect_delimiter("# a, b\n1;2\n"), b';');
    assert_eq!(detect_delimiter("\n1\t2\n"), b'\t');
    assert_eq!(detect_delimiter("1,2\n"), b',');
    assert_eq!(detect_delimiter("7\n"), b',');
    assert_eq!(detect_delimiter(""), b',');
}

#[test]
fn test_parse_invalid_table() {
    let err = parse_table::<f64>("1,2\n3,4,5\n").unwrap_err();

    assert!(err.to_string().contains("line 2"));

    let err = parse_table::<f64>("1,2\n3,two\n").unwrap_err();

    assert!(err.to_string().contains("\"two\" at line 2"));

    // Mixed separators are not the same table.
    assert!(parse_table::<f64>("1;2\n3,4\n").is_err());
}

#[test]
fn test_format_table() -> anyhow::Result<()> {
    let table = vec![vec![0.5, -1.0], vec![2.25, 3.0]];

    let text = format_table(&table);

    assert_eq!(text, "0.5,-1\n2.25,3\n");
    assert_eq!(parse_table::<f64>(&text)?, table);

    Ok(())
}

#[test]
fn test_load_table() -> anyhow::Result<()> {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new()?;

    file.write_all(b"# a, b\n1,2\n3,4\n")?;

    assert_eq!(load_table::<f64>(file.path())?, [vec![1.0, 2.0], vec![3.0, 4.0]]);

    assert!(load_table::<f64>("/this/file/does/not/exist.csv").is_err());

    Ok(())
}
