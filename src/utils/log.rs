use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const LOG_DIR: &str = "logs";

fn log_path(filename: &str) -> io::Result<PathBuf> {
    // Create directory if it doesn't exist
    if !Path::new(LOG_DIR).exists() {
        fs::create_dir_all(LOG_DIR)?;
    }
    Ok(Path::new(LOG_DIR).join(filename))
}

/// Logs a message to a file with timestamp
///
/// # Arguments
///
/// * `filename` - The name of the log file (created under `logs/`)
/// * `message` - The message to log
pub fn log_to_file(filename: &str, message: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(filename)?)?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

    writeln!(file, "\n--- Log entry at {} ---", timestamp)?;
    writeln!(file, "{}", message)?;
    writeln!(file, "--- End of entry ---")?;
    file.flush()
}

/// Logs a message to a file with a detailed formatted header
pub fn log_with_header(filename: &str, header: &str, message: &str) -> io::Result<()> {
    let formatted_message = format!(
        "===== {} =====\n{}\n====================",
        header, message
    );
    log_to_file(filename, &formatted_message)
}

/// Appends a row to a CSV file under `logs/`, writing headers if the file is new
pub fn log_csv(filename: &str, headers: &[&str], data: &[&str]) -> Result<(), csv::Error> {
    let path = log_path(filename)?;
    let file_exists = path.exists();

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let mut writer = csv::Writer::from_writer(file);

    if !file_exists && !headers.is_empty() {
        writer.write_record(headers)?;
    }
    writer.write_record(data)?;
    writer.flush()?;
    Ok(())
}

/// Writes equal-length columns to a new CSV file at `path`.
pub fn write_columns_csv(path: &Path, headers: &[&str], columns: &[&[f64]]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;

    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    for i in 0..rows {
        writer.write_record(columns.iter().map(|c| c[i].to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_written_row_by_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.csv");
        write_columns_csv(&path, &["f", "gain"], &[&[0.0, 1.5], &[1.0, 0.5]]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "f,gain\n0,1\n1.5,0.5\n");
    }
}
