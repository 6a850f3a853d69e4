use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlType {
    Page,
    Images,
    Media,
    Gfx,
    Css,
    Js,
    Font,
    Other,
}

impl UrlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlType::Page => "page",
            UrlType::Images => "images",
            UrlType::Media => "media",
            UrlType::Gfx => "gfx",
            UrlType::Css => "css",
            UrlType::Js => "js",
            UrlType::Font => "font",
            UrlType::Other => "other",
        }
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order; the first matching prefix wins.
const PREFIXES: &[(&str, UrlType)] = &[
    ("/media/images/", UrlType::Images),
    ("/media/", UrlType::Media),
    ("/gfx/", UrlType::Gfx),
    ("/css/", UrlType::Css),
    ("/js/", UrlType::Js),
    ("/fonts/", UrlType::Font),
];

/// Classify a raw request URL by its path prefix.
///
/// Returns the type together with the URL as it should be recorded: the query
/// string is always dropped, and image URLs are reduced to their file name.
pub fn classify_url(raw: &str) -> (UrlType, &str) {
    let path = raw.split('?').next().unwrap_or_default();

    let url_type = PREFIXES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|(_, kind)| *kind)
        .unwrap_or_else(|| {
            if path.contains('.') {
                UrlType::Other
            } else {
                UrlType::Page
            }
        });

    match url_type {
        UrlType::Images => (url_type, path.rsplit('/').next().unwrap_or(path)),
        _ => (url_type, path),
    }
}
