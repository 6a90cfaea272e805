use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::record::{ColumnSet, ProductRecord};

const BOM: &[u8] = b"\xEF\xBB\xBF";

// header goes out even with no records
pub fn write_records<W: Write>(
    mut out: W,
    records: &[ProductRecord],
    columns: ColumnSet,
) -> Result<(), ScrapeError> {
    out.write_all(BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns.headers())?;
    for rec in records {
        writer.write_record(rec.row(columns))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, records: &[ProductRecord], columns: ColumnSet) -> Result<(), ScrapeError> {
    if records.is_empty() {
        warn!(path = %path.display(), "no records scraped; writing header only");
    }
    let file = BufWriter::new(File::create(path)?);
    write_records(file, records, columns)?;
    info!(path = %path.display(), rows = records.len(), "csv written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Audience;

    fn sample() -> ProductRecord {
        ProductRecord {
            scraped_at: "2026-10-17 09:30:00".into(),
            section: "Footwear".into(),
            name: "Sparx \"Air\" Sneakers, Blue".into(),
            price: "Rs. 899".into(),
            rating_listing: "4.3".into(),
            reviews_listing: 128,
            audience: Audience::Male,
            product_url: "https://www.snapdeal.com/product/sparx/1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn starts_with_bom_and_header() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[], ColumnSet::Basic).unwrap();
        assert!(buf.starts_with(BOM));
        let text = String::from_utf8(buf[BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "Scraped At,Section,Product Name,Price,Rating,Image URL,Product URL\n"
        );
    }

    #[test]
    fn fields_are_quoted_only_when_needed() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[sample()], ColumnSet::Basic).unwrap();
        let text = String::from_utf8(buf[BOM.len()..].to_vec()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#"2026-10-17 09:30:00,Footwear,"Sparx ""Air"" Sneakers, Blue",Rs. 899,4.3,,https://www.snapdeal.com/product/sparx/1"#
        );
    }

    #[test]
    fn rich_rows_have_every_column() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[sample(), ProductRecord::default()], ColumnSet::Rich).unwrap();
        let mut reader = csv::Reader::from_reader(&buf[BOM.len()..]);
        assert_eq!(reader.headers().unwrap().len(), 22);
        let rows: Vec<_> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 22));
        assert_eq!(&rows[0][12], "Male");
        assert_eq!(&rows[1][21], "0");
    }

    #[test]
    fn save_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        save_csv(&path, &[sample()], ColumnSet::Rich).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(BOM));
        assert_eq!(String::from_utf8_lossy(&bytes).lines().count(), 2);
    }
}
