use std::borrow::Cow;
use std::env;
use std::path::Path;

/// True when the file name ends in `.csv`, compared case-insensitively
///
/// A file named just `.csv` qualifies.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use chemvis::utils::has_csv_extension;
///
/// assert!(has_csv_extension(Path::new("plant/EQUIPMENT.CSV")));
/// assert!(!has_csv_extension(Path::new("equipment.xlsx")));
/// ```
pub fn has_csv_extension(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        let bytes = name.as_encoded_bytes();
        bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".csv")
    })
}

/// File name component used as the dataset's display name
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use chemvis::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/tmp/reports/CHEMVIS_Report_1.pdf");
/// assert!(format_path_with_tilde(&path).ends_with("CHEMVIS_Report_1.pdf"));
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref()).filter(|h| !h.is_empty());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.to_string_lossy());
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
