use std::collections::{HashMap, HashSet};

/// Clean author-supplied HTML before it is injected with `dangerous_inner_html`.
///
/// TeX delimiters are plain text to the sanitizer, so math survives for MathJax.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "u", "sub", "sup", "code", "pre",
        "blockquote", "ul", "ol", "li", "table", "thead", "tbody", "tr", "th", "td", "img", "a",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());
    attributes.insert("img", ["src", "alt"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .generic_attributes(["class"].into_iter().collect())
        .clean(html)
        .to_string()
}
