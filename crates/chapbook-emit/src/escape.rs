//! Escaping for the generated JavaScript module.
//!
//! Rendered markup lands inside a template literal, so backticks and `${`
//! must not survive unescaped; metadata lands in double-quoted string
//! literals with their own rules. HTML text content gets the usual entity
//! treatment.

/// Escape content destined for the inside of a template literal.
///
/// Backticks would terminate the literal and `${` would open an
/// interpolation; both are neutralized. Applied after [`escape_html`] where
/// both are needed.
#[must_use]
pub fn escape_template(value: &str) -> String {
    value.replace('`', "\\`").replace("${", "\\${")
}

/// Reverse of [`escape_template`].
#[must_use]
pub fn unescape_template(value: &str) -> String {
    value.replace("\\${", "${").replace("\\`", "`")
}

/// Escape text content for HTML element bodies.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_html`]. `&amp;` is replaced last so entity prefixes
/// are not double-decoded.
#[must_use]
pub fn unescape_html(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Escape text for an HTML attribute value in double quotes.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    escape_html(value).replace('"', "&quot;")
}

/// Render a JavaScript double-quoted string literal.
#[must_use]
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_template_escaping() {
        assert_eq!(escape_template("a `tick` and ${expr}"), "a \\`tick\\` and \\${expr}");
        assert_eq!(escape_template("plain"), "plain");
    }

    #[test]
    fn test_template_round_trip() {
        let gnarly = "const s = `x ${y}`;";
        assert_eq!(unescape_template(&escape_template(gnarly)), gnarly);
    }

    #[test]
    fn test_html_escaping() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_html_round_trip() {
        let gnarly = "if (a < b && b > 0) { /* &amp; */ }";
        assert_eq!(unescape_html(&escape_html(gnarly)), gnarly);
    }

    #[test]
    fn test_attr_escaping() {
        assert_eq!(escape_attr("say \"hi\" & go"), "say &quot;hi&quot; &amp; go");
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string("plain"), "\"plain\"");
        assert_eq!(js_string("a \"b\" \\ c\n"), "\"a \\\"b\\\" \\\\ c\\n\"");
    }
}
