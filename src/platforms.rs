use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub struct Platform {
    pub name: &'static str,
    pub hosts: &'static [&'static str],
    /// Brand colour for the icon strip
    pub color: &'static str,
}

pub static SUPPORTED_PLATFORMS: &[Platform] = &[
    Platform {
        name: "Facebook",
        hosts: &["facebook.com", "fb.watch"],
        color: "#3b82f6",
    },
    Platform {
        name: "YouTube",
        hosts: &["youtube.com", "youtu.be"],
        color: "#ef4444",
    },
    Platform {
        name: "Instagram",
        hosts: &["instagram.com"],
        color: "#ec4899",
    },
    Platform {
        name: "Twitter",
        hosts: &["twitter.com", "x.com"],
        color: "#3b82f6",
    },
    Platform {
        name: "TikTok",
        hosts: &["tiktok.com"],
        color: "#000000",
    },
    Platform {
        name: "LinkedIn",
        hosts: &["linkedin.com"],
        color: "#3b82f6",
    },
];

impl Platform {
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("").to_lowercase();
        self.hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
    }
}

/// Which supported platform a pasted URL belongs to, if any.
pub fn detect(url_str: &str) -> Option<&'static Platform> {
    let url = Url::parse(url_str.trim()).ok()?;
    SUPPORTED_PLATFORMS.iter().find(|p| p.matches(&url))
}
