use super::domain::{RawRow, RawValue};
use std::io::Read;

/// Reads a headed CSV into raw rows, typing each cell as empty, numeric or text.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let cell = record.get(index).unwrap_or_default();
                (header.to_string(), typed_cell(cell))
            })
            .collect::<RawRow>();
        rows.push(row);
    }

    Ok(rows)
}

fn typed_cell(cell: &str) -> RawValue {
    if cell.is_empty() {
        return RawValue::Empty;
    }

    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => RawValue::Number(value),
        _ => RawValue::Text(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cells_are_typed_by_content() {
        let rows = parse_rows(Cursor::new(
            "Name,TAM,Competition\nLedgerly, 250 ,8/10\nQuiet,,\n",
        ))
        .expect("parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name"), Some(&RawValue::text("Ledgerly")));
        assert_eq!(rows[0].get("TAM"), Some(&RawValue::Number(250.0)));
        assert_eq!(rows[0].get("Competition"), Some(&RawValue::text("8/10")));
        assert_eq!(rows[1].get("TAM"), Some(&RawValue::Empty));
    }

    #[test]
    fn short_records_pad_with_empty_cells() {
        let rows = parse_rows(Cursor::new("Name,TAM,SAM\nShort,5\n")).expect("parse");
        assert_eq!(rows[0].get("SAM"), Some(&RawValue::Empty));
    }

    #[test]
    fn nan_and_infinity_stay_textual() {
        assert_eq!(typed_cell("NaN"), RawValue::text("NaN"));
        assert_eq!(typed_cell("inf"), RawValue::text("inf"));
    }
}
