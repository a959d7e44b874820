//! Target location computation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ConfigEntry;
use crate::constants::KNOWN_SAMPLE_PREFIXES;

static SAMPLE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    let prefixes: Vec<String> = KNOWN_SAMPLE_PREFIXES.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&format!(r"^(?:{})?(.*\.(?:json|xml))$", prefixes.join("|")))
        .expect("Failed to compile regex pattern for SAMPLE_PREFIX")
});

/// Relative path an entry is written to, derived from its sample location
///
/// With an override the file name of the sample location is replaced first. A known
/// leading prefix is then stripped from `.json` and `.xml` locations.
///
/// # Examples
///
/// ```
/// use testpack_gen::config::{ConfigEntry, TestPack};
/// use testpack_gen::resolver::target_location;
///
/// let pack = TestPack::new("Events", "drr.regulation.common.TransactionReportInstruction");
/// let entry = ConfigEntry::new(pack, "result-json-files/fpml-5-10/events/Partial-Novation.json")
///     .target_file_name("partial-novation-new-trade.json");
/// assert_eq!(
///     target_location(&entry),
///     "fpml-5-10/events/partial-novation-new-trade.json"
/// );
/// ```
pub fn target_location(entry: &ConfigEntry) -> String {
    match entry.override_target_file_name.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            remove_file_prefix(&rewrite_location(&entry.sample_location, name))
        }
        _ => remove_file_prefix(&entry.sample_location),
    }
}

/// Replaces the last path segment of `location` with `file_name`
pub(crate) fn rewrite_location(location: &str, file_name: &str) -> String {
    match location.rfind('/') {
        Some(index) => format!("{}{}", &location[..=index], file_name),
        None => file_name.to_string(),
    }
}

pub(crate) fn remove_file_prefix(location: &str) -> String {
    SAMPLE_PREFIX.replace(location, "$1").into_owned()
}
