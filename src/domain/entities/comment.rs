use serde::{Deserialize, Serialize};

/// A single comment of a photo's comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    user_fullname: String,
    comment_body: String,
    user_picture_url: String,
}

impl Comment {
    #[must_use]
    pub fn new(
        user_fullname: impl Into<String>,
        comment_body: impl Into<String>,
        user_picture_url: impl Into<String>,
    ) -> Self {
        Self {
            user_fullname: user_fullname.into(),
            comment_body: comment_body.into(),
            user_picture_url: user_picture_url.into(),
        }
    }

    #[must_use]
    pub fn user_fullname(&self) -> &str {
        &self.user_fullname
    }

    /// Raw comment body. May contain inline HTML.
    #[must_use]
    pub fn comment_body(&self) -> &str {
        &self.comment_body
    }

    /// Comment body with inline markup tags removed and character references
    /// decoded, for plain-text rendering.
    #[must_use]
    pub fn plain_body(&self) -> String {
        let mut text = String::with_capacity(self.comment_body.len());
        let mut in_tag = false;
        for c in self.comment_body.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        decode_entities(&text)
    }

    #[must_use]
    pub fn user_picture_url(&self) -> &str {
        &self.user_picture_url
    }
}

/// Longest reference body we try to decode, e.g. `#x10FFFF`.
const MAX_ENTITY_LEN: usize = 8;

/// Decodes `&name;`, `&#NNN;` and `&#xHH;` references in one pass.
/// Unknown or malformed references are kept verbatim.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&candidate[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "hellip" => Some('…'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201c}'),
        "rdquo" => Some('\u{201d}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_plain_body_strips_tags() {
        let comment = Comment::new("Ann", "Nice <b>shot</b> &amp; colors<br/>", "");
        assert_eq!(comment.plain_body(), "Nice shot & colors");
    }

    #[test]
    fn test_plain_body_keeps_plain_text() {
        let comment = Comment::new("Ann", "just text", "");
        assert_eq!(comment.plain_body(), "just text");
    }

    #[test_case("It&#8217;s great" => "It\u{2019}s great"; "decimal reference")]
    #[test_case("don&#x27;t" => "don't"; "hex reference")]
    #[test_case("&quot;wow&quot; &amp; &apos;yes&apos;" => "\"wow\" & 'yes'"; "named references")]
    #[test_case("&amp;lt;" => "&lt;"; "decoded once")]
    #[test_case("fish & chips" => "fish & chips"; "bare ampersand")]
    #[test_case("&bogus; &#xZZ; &#1114112;" => "&bogus; &#xZZ; &#1114112;"; "unknown references kept")]
    #[test_case("trailing &" => "trailing &"; "ampersand at end")]
    fn test_plain_body_decodes_references(body: &str) -> String {
        Comment::new("Ann", body, "").plain_body()
    }
}
