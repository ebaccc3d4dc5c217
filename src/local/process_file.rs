use crate::config::Band;
use crate::error::{Error, Result};
use crate::filters::bandpass::BandpassDesign;

use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

/// Reads the first column of `path` as samples. A non-numeric first line is
/// treated as a header; blank lines are skipped.
pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let field = line.split(',').next().unwrap_or("").trim();
        if field.is_empty() {
            continue;
        }
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() => samples.push(value),
            Err(_) if index == 0 => continue,
            _ => {
                return Err(Error::InvalidSample {
                    line: index + 1,
                    value: field.to_string(),
                })
            }
        }
    }

    Ok(samples)
}

/// Filters the single-column signal in `input` and writes
/// `sample,raw,filtered` rows to `output`. Returns the sample count.
pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    band: Band,
    design: BandpassDesign,
    fs: f64,
) -> Result<usize> {
    let start = Instant::now();
    let raw = read_samples(&input)?;
    let filter = design.design(band, fs)?;
    let filtered = filter.apply(&raw)?;

    let mut writer = csv::Writer::from_path(&output)?;
    writer.write_record(["sample", "raw", "filtered"])?;
    for (i, (x, y)) in raw.iter().zip(filtered.iter()).enumerate() {
        writer.write_record([i.to_string(), x.to_string(), y.to_string()])?;
    }
    writer.flush()?;

    info!(
        "filtered {} samples from {} into {} with {} in {:?}",
        raw.len(),
        input.as_ref().display(),
        output.as_ref().display(),
        design.label(),
        start.elapsed()
    );
    Ok(raw.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::processing::signal::composite_sine;
    use std::io::Write;

    fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("input.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn header_and_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "voltage\n1.5\n\n-2,ignored\n3e-1\n");
        assert_eq!(read_samples(&path).unwrap(), vec![1.5, -2.0, 0.3]);
    }

    #[test]
    fn bad_sample_names_its_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "1.0\n2.0\nabc\n");
        match read_samples(&path) {
            Err(Error::InvalidSample { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn filtered_file_has_one_row_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let fs = 500.0;
        let signal = composite_sine(&[10.0, 60.0], fs, 1000);
        let body: String = signal.iter().map(|x| format!("{}\n", x)).collect();
        let input = write_input(dir.path(), &format!("signal\n{}", body));
        let output = dir.path().join("output.csv");

        let count = process_file(
            &input,
            &output,
            Band::new(8.0, 12.0),
            BandpassDesign::Butterworth { order: 3 },
            fs,
        )
        .unwrap();
        assert_eq!(count, 1000);

        let mut reader = csv::Reader::from_path(&output).unwrap();
        assert_eq!(reader.headers().unwrap(), vec!["sample", "raw", "filtered"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1000);
        assert_eq!(&rows[999][0], "999");
    }

    #[test]
    fn short_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "1\n2\n3\n");
        let output = dir.path().join("output.csv");
        let result = process_file(
            &input,
            &output,
            Band::new(8.0, 12.0),
            BandpassDesign::Butterworth { order: 3 },
            500.0,
        );
        assert!(matches!(
            result,
            Err(Error::Filter(FilterError::SignalTooShort { len: 3, .. }))
        ));
    }
}
