use crate::domain::catalog::Media;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

pub const DEFAULT_MEDIA_BASE: &str = "https://image/";

/// Characters left alone by `encodeURI`: alphanumerics plus `;,/?:@&=+$-_.!~*'()#`.
const URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, URI).to_string()
}

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Absolute means a scheme plus an authority; `mailto:` style URLs and bare
/// file names do not qualify.
pub fn is_absolute_url(raw: &str) -> bool {
    Url::parse(raw).map(|url| url.has_host()).unwrap_or(false)
}

/// Turns upstream image references into media descriptors. Absolute URLs pass
/// through untouched; anything else is treated as an identifier on the media
/// host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrlResolver {
    base: String,
}

impl MediaUrlResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn resolve(&self, raw: Option<&str>) -> Vec<Media> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Vec::new();
        };

        let url = if is_absolute_url(raw) {
            raw.to_string()
        } else {
            encode_uri(&format!("{}{}", self.base, raw))
        };
        vec![Media { url }]
    }
}

impl Default for MediaUrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_passes_through() {
        let resolver = MediaUrlResolver::default();
        let media = resolver.resolve(Some("http://x.com/a.png"));
        assert_eq!(
            media,
            vec![Media {
                url: "http://x.com/a.png".to_string()
            }]
        );
    }

    #[test]
    fn test_bare_identifier_is_prefixed_and_encoded() {
        let resolver = MediaUrlResolver::default();
        let media = resolver.resolve(Some("foo bar"));
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].url, "https://image/foo%20bar");
    }

    #[test]
    fn test_absent_or_empty_yields_nothing() {
        let resolver = MediaUrlResolver::default();
        assert!(resolver.resolve(None).is_empty());
        assert!(resolver.resolve(Some("")).is_empty());
    }

    #[test]
    fn test_host_less_urls_are_synthesized() {
        let resolver = MediaUrlResolver::new("https://cdn.example.org/media/");
        let media = resolver.resolve(Some("logo.png"));
        assert_eq!(media[0].url, "https://cdn.example.org/media/logo.png");

        let media = resolver.resolve(Some("mailto:someone"));
        assert_eq!(media[0].url, "https://cdn.example.org/media/mailto:someone");
    }

    #[test]
    fn test_encode_uri_keeps_reserved_characters() {
        assert_eq!(
            encode_uri("https://image/a b?x=1&y=(2)#frag"),
            "https://image/a%20b?x=1&y=(2)#frag"
        );
        assert_eq!(encode_uri("100%"), "100%25");
        assert_eq!(encode_uri("café"), "caf%C3%A9");
    }

    #[test]
    fn test_encode_uri_component_escapes_separators() {
        assert_eq!(encode_uri_component("Navi Mumbai"), "Navi%20Mumbai");
        assert_eq!(encode_uri_component("a/b&c=d"), "a%2Fb%26c%3Dd");
        assert_eq!(encode_uri_component("Low Vision (LV)"), "Low%20Vision%20(LV)");
    }
}
