use std::process::{Command, Stdio};

use chrono::{Local, NaiveDate};

use crate::transforms::case;

/// Formats bytes into a human-readable string (KB, MB, etc.)
///
/// # Arguments
///
/// * `bytes` - The number of bytes to format
///
/// # Returns
///
/// A string representing the number of bytes in a human-readable format
///
/// # Examples
///
/// ```
/// use toolshed::utils::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KB");
/// assert_eq!(format_bytes(10 * 1024 * 1024), "10.0 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Checks if a command exists and is executable.
///
/// # Arguments
/// * `cmd` - The command to check
///
/// # Returns
/// `true` if the command exists and is executable, `false` otherwise
pub fn command_exists(cmd: &str) -> bool {
    if cmd.trim().is_empty() {
        return false;
    }
    let finder = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };
    Command::new(finder)
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Returns the first command of the list found in the `PATH`
pub fn first_available<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|cmd| command_exists(cmd))
}

/// Builds a download file name `<tool>-<context>.<ext>`, the context being
/// converted to kebab case and omitted when empty
///
/// # Examples
///
/// ```
/// use toolshed::utils::download_filename;
///
/// assert_eq!(download_filename("converted", "Title Case", "txt"), "converted-title-case.txt");
/// assert_eq!(download_filename("gradient", "", "css"), "gradient.css");
/// ```
pub fn download_filename(tool: &str, context: &str, ext: &str) -> String {
    let context = case::kebab(context);
    if context.is_empty() {
        format!("{}.{}", tool, ext)
    } else {
        format!("{}-{}.{}", tool, context, ext)
    }
}

/// Builds a date stamped file name `<prefix>-YYYY-MM-DD.<ext>`
pub fn dated_filename(prefix: &str, ext: &str, date: NaiveDate) -> String {
    format!("{}-{}.{}", prefix, date.format("%Y-%m-%d"), ext)
}

/// Inserts `-YYYY-MM-DD` before the extension of a file name
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use toolshed::utils::with_date_stamp;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(with_date_stamp("gradient.css", date), "gradient-2024-01-31.css");
/// assert_eq!(with_date_stamp("notes", date), "notes-2024-01-31");
/// ```
pub fn with_date_stamp(filename: &str, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d");
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, stamp, ext),
        _ => format!("{}-{}", filename, stamp),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
