use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Hosts treated as video hosting; subdomains match too.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

/// Spreadsheet formula errors that leak into exported cells.
const SHEET_ERROR_MARKERS: &[&str] = &["#VALUE!", "#REF!"];

static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube-nocookie\.com/embed/)([^&\n?#/]+)",
        r"youtube\.com/watch\?.*v=([^&\n?#]+)",
        r"youtube\.com/shorts/([^&\n?#/]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid video id regex"))
    .collect()
});

static HTTP_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").expect("Invalid scheme regex"));

/// Domain and path shown on a web link card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInfo {
    pub domain: String,
    pub path: String,
}

/// What a consumer should render for a link cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPreview {
    /// Nothing usable yet; show a "coming soon" placeholder.
    Unavailable,
    Video {
        id: String,
        thumbnail: String,
        fallback_thumbnail: String,
        embed_url: String,
    },
    Web {
        url: String,
        domain: String,
        path: String,
        image: String,
    },
    /// Neither a resolvable video nor an http(s) page.
    Plain { url: String },
}

/// Empty, whitespace-only, or carrying a spreadsheet error marker.
pub fn is_absent(url: Option<&str>) -> bool {
    match url {
        None => true,
        Some(u) => u.trim().is_empty() || SHEET_ERROR_MARKERS.iter().any(|m| u.contains(m)),
    }
}

// Cells often hold links pasted without a scheme, e.g. `youtu.be/abc123`.
fn host_of(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = Url::parse(url).ok().filter(|u| u.host_str().is_some());
    let parsed = match parsed {
        Some(u) => u,
        None if !url.contains("://") => Url::parse(&format!("https://{}", url)).ok()?,
        None => return None,
    };
    parsed.host_str().map(|h| h.to_lowercase())
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

pub fn is_video_url(url: &str) -> bool {
    host_of(url)
        .map(|host| VIDEO_HOSTS.iter().any(|d| host_matches(&host, d)))
        .unwrap_or(false)
}

/// First capture of the ordered host patterns. `None` off the video hosts.
pub fn extract_video_id(url: &str) -> Option<String> {
    if !is_video_url(url) {
        return None;
    }
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn is_web_url(url: &str) -> bool {
    HTTP_SCHEME.is_match(url.trim()) && !is_video_url(url)
}

pub fn thumbnail_for(url: &str) -> String {
    extract_video_id(url)
        .map(|id| format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", id))
        .unwrap_or_default()
}

/// Lower-resolution thumbnail; always exists when the video does.
pub fn fallback_thumbnail_for(url: &str) -> String {
    extract_video_id(url)
        .map(|id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id))
        .unwrap_or_default()
}

pub fn embed_url_for(url: &str) -> String {
    extract_video_id(url)
        .map(|id| format!("https://www.youtube.com/embed/{}", id))
        .unwrap_or_default()
}

pub fn preview_info_for(url: &str) -> PreviewInfo {
    match Url::parse(url.trim()) {
        Ok(parsed) => PreviewInfo {
            domain: parsed.host_str().unwrap_or_default().to_string(),
            path: parsed.path().to_string(),
        },
        Err(_) => PreviewInfo {
            domain: "unknown".to_string(),
            path: "/".to_string(),
        },
    }
}

/// Favicon-style preview image for a web link.
pub fn preview_image_for(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };

    if host_matches(host, "google.com") {
        return "https://www.google.com/favicon.ico".to_string();
    }
    if host_matches(host, "github.com") {
        return "https://github.com/favicon.ico".to_string();
    }

    format!("{}://{}/favicon.ico", parsed.scheme(), host)
}

pub fn classify(url: Option<&str>) -> LinkPreview {
    let url = match url {
        Some(u) if !is_absent(Some(u)) => u.trim(),
        _ => return LinkPreview::Unavailable,
    };

    if is_video_url(url) {
        if let Some(id) = extract_video_id(url) {
            return LinkPreview::Video {
                thumbnail: thumbnail_for(url),
                fallback_thumbnail: fallback_thumbnail_for(url),
                embed_url: embed_url_for(url),
                id,
            };
        }
    }

    if is_web_url(url) {
        let info = preview_info_for(url);
        return LinkPreview::Web {
            url: url.to_string(),
            domain: info.domain,
            path: info.path,
            image: preview_image_for(url),
        };
    }

    LinkPreview::Plain { url: url.to_string() }
}
