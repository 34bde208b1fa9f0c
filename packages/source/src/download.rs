//! Disclosure file downloader and parser.
//!
//! Downloads a CSV-form disclosure file (optionally gzip-compressed) from
//! a URL, parses it, and returns every row as a [`serde_json::Value`]
//! object keyed by the column headers in the first row — the shape the
//! aggregation pipeline consumes.

use std::io::Read as _;

use serde_json::Value;

use crate::SourceError;

/// Downloader for one OFLC disclosure file.
#[derive(Debug, Clone)]
pub struct DisclosureDownload {
    /// URL of the disclosure CSV.
    url: String,
    /// Whether the response body is gzip-compressed.
    is_gzipped: bool,
    /// Field delimiter byte (defaults to `,`).
    delimiter: u8,
    /// Optional cap on the number of rows to parse.
    max_rows: Option<u64>,
}

impl DisclosureDownload {
    /// Creates a downloader with default settings (comma-delimited, not
    /// gzipped, no row limit).
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            is_gzipped: false,
            delimiter: b',',
            max_rows: None,
        }
    }

    /// Marks the download as gzip-compressed so that the response body will
    /// be decompressed before CSV parsing.
    #[must_use]
    pub const fn with_gzip(mut self, gzipped: bool) -> Self {
        self.is_gzipped = gzipped;
        self
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV files).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Limits the number of rows parsed from the file.
    #[must_use]
    pub const fn with_max_rows(mut self, max: u64) -> Self {
        self.max_rows = Some(max);
        self
    }

    /// Downloads and parses the file. Only the first (and only) table of
    /// the CSV form is read; the header row defines the column names.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the download returns a non-success
    /// status, decompression fails, or the CSV cannot be parsed. There is
    /// no retry; the caller decides what a failed fetch means for the run.
    pub async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let response = reqwest::get(&self.url).await?.error_for_status()?;
        let bytes = response.bytes().await?;

        log::debug!("Downloaded {} bytes from {}", bytes.len(), self.url);

        let csv_bytes: Vec<u8> = if self.is_gzipped {
            let mut decoder = flate2::read::GzDecoder::new(&bytes[..]);
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            log::debug!("Decompressed to {} bytes", decompressed.len());
            decompressed
        } else {
            bytes.to_vec()
        };

        self.parse(csv_bytes.as_slice())
    }

    /// Parses CSV bytes into row objects keyed by the header row.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the header row is missing or a record is
    /// malformed beyond what `flexible` parsing tolerates.
    pub fn parse(&self, csv_bytes: &[u8]) -> Result<Vec<Value>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(csv_bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();

        if headers.is_empty() {
            return Err(SourceError::Parse {
                message: "CSV file contains no header row".to_owned(),
            });
        }

        let mut rows: Vec<Value> = Vec::new();

        for result in reader.records() {
            let record = result?;

            let mut map = serde_json::Map::new();
            for (i, header) in headers.iter().enumerate() {
                let value = record.get(i).unwrap_or("").trim().to_owned();
                map.insert(header.clone(), Value::String(value));
            }
            rows.push(Value::Object(map));

            if let Some(max) = self.max_rows
                && rows.len() as u64 >= max
            {
                log::info!("Reached max_rows limit ({max}), stopping CSV parse");
                break;
            }
        }

        log::info!("Parsed {} rows from {}", rows.len(), self.url);

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_keyed_by_header() {
        let csv = b"occupation_title,county_code,pw_amount\nEngineer,6075,\"$95,000\"\nAccountant,17031,72000\n";
        let rows = DisclosureDownload::new("http://example.test/file.csv")
            .parse(csv)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["occupation_title"], "Engineer");
        assert_eq!(rows[0]["pw_amount"], "$95,000");
        assert_eq!(rows[1]["county_code"], "17031");
    }

    #[test]
    fn trims_headers_and_values() {
        let csv = b" occupation_title , pw_amount \n Engineer , 95000 \n";
        let rows = DisclosureDownload::new("http://example.test/file.csv")
            .parse(csv)
            .unwrap();
        assert_eq!(rows[0]["occupation_title"], "Engineer");
        assert_eq!(rows[0]["pw_amount"], "95000");
    }

    #[test]
    fn respects_max_rows() {
        let csv = b"a,b\n1,2\n3,4\n5,6\n";
        let rows = DisclosureDownload::new("http://example.test/file.csv")
            .with_max_rows(2)
            .parse(csv)
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn short_rows_fill_missing_cells_with_empty() {
        let csv = b"a,b,c\n1,2\n";
        let rows = DisclosureDownload::new("http://example.test/file.csv")
            .parse(csv)
            .unwrap();
        assert_eq!(rows[0]["c"], "");
    }
}
