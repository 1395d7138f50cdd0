use crate::metadata::MediaVariant;
use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

pub const DEFAULT_FILE_NAME: &str = "video.mp4";

/// `125` -> `"2m 5s"`
pub fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

pub fn quality_label(variant: &MediaVariant) -> String {
    format!("Quality {}", variant.quality)
}

/// Download name for a video title; every non-word character becomes `_`.
pub fn file_name_for(title: Option<&str>) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("{}.mp4", NON_WORD.replace_all(title, "_")),
        None => DEFAULT_FILE_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(3600), "60m 0s");
    }

    #[test]
    fn labels() {
        assert_eq!(quality_label(&MediaVariant::new("720p", "u1")), "Quality 720p");
    }

    #[test]
    fn file_names() {
        assert_eq!(file_name_for(Some("My Cat: part 2!")), "My_Cat__part_2_.mp4");
        assert_eq!(file_name_for(Some("Ünïcode")), "_n_code.mp4");
        assert_eq!(file_name_for(Some("   ")), "video.mp4");
        assert_eq!(file_name_for(None), "video.mp4");
    }
}
