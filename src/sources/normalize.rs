//! HTML entity decoding for fetched feed text.
//!
//! Feeds routinely escape their titles twice (`&amp;amp;`), so decoding runs
//! until nothing changes. Every successful decode shortens the string, which
//! bounds the loop and makes `normalize` idempotent.

use crate::domain::ParsedFeed;

/// Longest entity body we try to decode, e.g. `#x10FFFF` or `hellip`.
const MAX_ENTITY_LEN: usize = 10;

/// Decode HTML entities in the channel and item titles and descriptions.
pub fn normalize(mut feed: ParsedFeed) -> ParsedFeed {
    feed.title = unescape(&feed.title);
    feed.description = unescape(&feed.description);
    for item in &mut feed.items {
        item.title = unescape(&item.title);
        item.description = unescape(&item.description);
    }
    feed
}

/// Decode entities repeatedly until the text is stable.
pub fn unescape(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = decode_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn decode_once(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&after[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &after[end + 1..];
            }
            None => {
                // Not an entity we know, keep the ampersand literally
                result.push('&');
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix('x').or_else(|| numeric.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0');
    }

    let c = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "bull" => '\u{2022}',
        "middot" => '\u{b7}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "deg" => '\u{b0}',
        "times" => '\u{d7}',
        "euro" => '\u{20ac}',
        "pound" => '\u{a3}',
        "cent" => '\u{a2}',
        "yen" => '\u{a5}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParsedItem;

    #[test]
    fn test_named_entities() {
        assert_eq!(unescape("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
        assert_eq!(unescape("&quot;hi&quot; &apos;there&apos;"), "\"hi\" 'there'");
        assert_eq!(unescape("Wait&hellip;"), "Wait\u{2026}");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(unescape("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape("caf&#233;"), "café");
        assert_eq!(unescape("&#x1F980;"), "\u{1F980}");
    }

    #[test]
    fn test_double_escaped_decodes_fully() {
        assert_eq!(unescape("&amp;lt;p&amp;gt;"), "<p>");
        assert_eq!(unescape("R&amp;amp;D"), "R&D");
    }

    #[test]
    fn test_unknown_and_malformed_left_alone() {
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&;"), "&;");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
        assert_eq!(unescape("&#0;"), "&#0;");
        assert_eq!(unescape("trailing &"), "trailing &");
        assert_eq!(unescape("&averyveryverylongname;"), "&averyveryverylongname;");
    }

    #[test]
    fn test_normalize_touches_titles_and_descriptions_only() {
        let feed = ParsedFeed {
            title: "News &amp; Views".to_string(),
            link: "https://example.com/?a=1&amp;b=2".to_string(),
            description: "All the &quot;news&quot;".to_string(),
            items: vec![ParsedItem::new(
                "Q&amp;A".to_string(),
                "https://example.com/qa?x=1&amp;y=2".to_string(),
            )
            .with_description("&lt;p&gt;Answers&lt;/p&gt;".to_string())],
        };

        let normalized = normalize(feed);
        assert_eq!(normalized.title, "News & Views");
        assert_eq!(normalized.description, "All the \"news\"");
        assert_eq!(normalized.link, "https://example.com/?a=1&amp;b=2");
        assert_eq!(normalized.items[0].title, "Q&A");
        assert_eq!(normalized.items[0].description, "<p>Answers</p>");
        assert_eq!(normalized.items[0].link, "https://example.com/qa?x=1&amp;y=2");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "plain text",
            "&amp;amp;amp;",
            "&amp;#38;lt;",
            "&#38;amp;",
            "a & b &c; &#; &#x; &amp",
            "&lt;script&gt;&amp;nbsp;&lt;/script&gt;",
            "&&amp;;",
            "\u{1F980} &#129408; &#x1f980;",
        ];

        for sample in samples {
            let feed = ParsedFeed {
                title: sample.to_string(),
                description: sample.to_string(),
                items: vec![ParsedItem::new(sample.to_string(), String::new())
                    .with_description(sample.to_string())],
                ..Default::default()
            };

            let once = normalize(feed);
            let twice = normalize(once.clone());
            assert_eq!(once, twice, "normalize not idempotent for {:?}", sample);
        }
    }
}
