//! Sanitization policy: allow-lists and URL/CSS safety checks
//!
//! A [`SanitizationPolicy`] is an immutable configuration value consumed by
//! the sanitizer. It carries:
//!
//! - the set of tags that may remain as elements
//! - the attributes allowed on each tag
//! - the CSS properties that may survive inside a `style` attribute
//! - the editor's own origin, used to decide which links open in a new tab
//!
//! # Threat Model
//!
//! Pasted or dropped markup is untrusted. It may contain:
//! - Script-bearing elements (`<script>`, `<iframe>`, ...)
//! - Event handler attributes (`onclick`, `onload`, ...)
//! - `javascript:` URLs and `data:` URLs carrying HTML
//! - CSS that executes code (`expression(...)`, `url(javascript:...)`)
//!
//! Everything is allow-listed: tags and attributes not named by the policy
//! are removed. The URL and CSS checks below apply on top of the allow-list
//! and cannot be configured away.

use std::collections::{BTreeMap, BTreeSet};

/// Tags kept by the default policy
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "pre",
    "code",
    "a",
    "strong",
    "em",
    "u",
    "s",
    "img",
    "table",
    "thead",
    "tbody",
    "tr",
    "td",
    "th",
    "hr",
    "br",
    "sup",
    "sub",
    "span",
    "div",
];

/// Attributes allowed per tag by the default policy
const DEFAULT_ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "rel", "title"]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("table", &["border", "cellpadding", "cellspacing", "width"]),
    ("th", &["colspan", "rowspan", "scope", "width"]),
    ("td", &["colspan", "rowspan", "width"]),
    ("span", &["style"]),
    ("div", &["style"]),
    ("p", &["style"]),
    ("h1", &["style"]),
    ("h2", &["style"]),
    ("h3", &["style"]),
    ("h4", &["style"]),
    ("h5", &["style"]),
    ("h6", &["style"]),
];

/// CSS properties kept inside `style` by the default policy
pub const DEFAULT_ALLOWED_CSS_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "text-decoration",
    "text-align",
    "margin",
    "margin-left",
    "margin-right",
    "margin-top",
    "margin-bottom",
    "padding",
    "padding-left",
    "padding-right",
    "padding-top",
    "padding-bottom",
    "border",
    "border-left",
    "border-right",
    "border-top",
    "border-bottom",
    "width",
    "height",
    "max-width",
    "max-height",
    "min-width",
    "min-height",
    "display",
    "line-height",
    "vertical-align",
    "text-indent",
];

/// URL schemes that execute script when followed
const SCRIPT_URL_SCHEMES: &[&str] = &[
    "javascript:", // JavaScript execution
    "vbscript:",   // VBScript execution (legacy IE)
];

/// The only family of `data:` URLs allowed through
const SAFE_DATA_URL_PREFIX: &str = "data:image/";

/// Substrings that disqualify a CSS value
const DANGEROUS_STYLE_PATTERNS: &[&str] = &["expression", "javascript:", "eval(", "url("];

/// Allow-list configuration for the sanitizer
///
/// # Examples
///
/// ```
/// use rte_content::policy::SanitizationPolicy;
///
/// let policy = SanitizationPolicy::with_allowed_tags(&["p", "a"])
///     .with_origin("https://editor.example");
/// assert!(policy.allows_tag("a"));
/// assert!(!policy.allows_tag("img"));
/// assert!(policy.allows_attribute("a", "href"));
/// assert!(!policy.allows_attribute("p", "onclick"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationPolicy {
    allowed_tags: BTreeSet<String>,
    allowed_attributes: BTreeMap<String, BTreeSet<String>>,
    allowed_css_properties: BTreeSet<String>,
    origin: Option<String>,
}

impl SanitizationPolicy {
    /// Create the built-in default policy
    pub fn new() -> Self {
        Self::with_allowed_tags::<&str>(&[])
    }

    /// Create a policy for a caller-supplied tag list
    ///
    /// An empty list selects [`DEFAULT_ALLOWED_TAGS`]. Attribute and CSS
    /// allow-lists start from the defaults either way.
    pub fn with_allowed_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let allowed_tags = if tags.is_empty() {
            DEFAULT_ALLOWED_TAGS.iter().map(|tag| tag.to_string()).collect()
        } else {
            tags.iter()
                .map(|tag| tag.as_ref().trim().to_ascii_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect()
        };

        let allowed_attributes = DEFAULT_ALLOWED_ATTRIBUTES
            .iter()
            .map(|(tag, attrs)| {
                (
                    tag.to_string(),
                    attrs.iter().map(|attr| attr.to_string()).collect(),
                )
            })
            .collect();

        Self {
            allowed_tags,
            allowed_attributes,
            allowed_css_properties: DEFAULT_ALLOWED_CSS_PROPERTIES
                .iter()
                .map(|prop| prop.to_string())
                .collect(),
            origin: None,
        }
    }

    /// Allow an additional attribute on a tag
    pub fn allow_attribute(mut self, tag: &str, attr: &str) -> Self {
        self.allowed_attributes
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .insert(attr.to_ascii_lowercase());
        self
    }

    /// Replace the attribute allow-list for a tag
    pub fn set_allowed_attributes(mut self, tag: &str, attrs: &[&str]) -> Self {
        self.allowed_attributes.insert(
            tag.to_ascii_lowercase(),
            attrs.iter().map(|attr| attr.to_ascii_lowercase()).collect(),
        );
        self
    }

    /// Allow an additional CSS property inside `style`
    pub fn allow_css_property(mut self, property: &str) -> Self {
        self.allowed_css_properties
            .insert(property.trim().to_ascii_lowercase());
        self
    }

    /// Set the editor's origin (`scheme://host[:port]`)
    ///
    /// Links starting with the origin are treated as internal and do not get
    /// `target="_blank"`.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    pub fn allows_attribute(&self, tag: &str, attr: &str) -> bool {
        self.allowed_attributes
            .get(tag)
            .is_some_and(|attrs| attrs.contains(attr))
    }

    pub fn allows_css_property(&self, property: &str) -> bool {
        self.allowed_css_properties.contains(property)
    }

    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags.iter().map(String::as_str)
    }

    /// Whether an `http(s)` link points away from the editor's origin
    ///
    /// # Examples
    ///
    /// ```
    /// use rte_content::policy::SanitizationPolicy;
    ///
    /// let policy = SanitizationPolicy::new().with_origin("https://editor.example");
    /// assert!(policy.is_external_link("https://other.example/page"));
    /// assert!(!policy.is_external_link("https://editor.example/page"));
    /// assert!(!policy.is_external_link("/relative"));
    /// ```
    pub fn is_external_link(&self, href: &str) -> bool {
        let href = href.trim_start();
        if !href.starts_with("http") {
            return false;
        }
        match &self.origin {
            Some(origin) => !href.starts_with(origin.as_str()),
            None => true,
        }
    }

    /// Filter a `style` attribute value down to allowed, safe declarations
    ///
    /// Returns `None` when no declaration survives.
    ///
    /// # Examples
    ///
    /// ```
    /// use rte_content::policy::SanitizationPolicy;
    ///
    /// let policy = SanitizationPolicy::new();
    /// assert_eq!(
    ///     policy.clean_style("COLOR: red; position: fixed; width: expression(alert(1))"),
    ///     Some("color: red".to_string())
    /// );
    /// assert_eq!(policy.clean_style("position: absolute"), None);
    /// ```
    pub fn clean_style(&self, style: &str) -> Option<String> {
        let declarations: Vec<String> = split_declarations(style)
            .into_iter()
            .filter_map(|declaration| declaration.split_once(':'))
            .map(|(property, value)| (property.trim().to_ascii_lowercase(), value.trim()))
            .filter(|(property, value)| {
                !property.is_empty()
                    && !value.is_empty()
                    && self.allows_css_property(property)
                    && !is_dangerous_style_value(value)
            })
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect();

        if declarations.is_empty() {
            None
        } else {
            Some(declarations.join("; "))
        }
    }
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if an `href`/`src` value must be stripped
///
/// Script-executing schemes are always rejected; `data:` URLs are rejected
/// unless they carry an image. Matching ignores ASCII case, leading
/// whitespace and embedded tab/newline characters (browsers ignore those
/// inside a scheme).
///
/// # Examples
///
/// ```
/// use rte_content::policy::is_dangerous_url;
///
/// assert!(is_dangerous_url("javascript:alert('xss')"));
/// assert!(is_dangerous_url(" JaVa\tScript:alert(1)"));
/// assert!(is_dangerous_url("data:text/html,<script>alert('xss')</script>"));
/// assert!(!is_dangerous_url("data:image/png;base64,iVBORw0KGgo="));
/// assert!(!is_dangerous_url("https://example.com"));
/// assert!(!is_dangerous_url("/relative/path"));
/// ```
pub fn is_dangerous_url(url: &str) -> bool {
    let normalized: String = url
        .trim_start_matches(|c: char| c.is_ascii_whitespace() || c.is_ascii_control())
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take(32)
        .collect::<String>()
        .to_ascii_lowercase();

    if SCRIPT_URL_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        return true;
    }

    normalized.starts_with("data:") && !normalized.starts_with(SAFE_DATA_URL_PREFIX)
}

/// Split a style attribute on `;` outside quoted strings and parentheses
fn split_declarations(style: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in style.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                declarations.push(&style[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    declarations.push(&style[start..]);
    declarations
}

/// Check a CSS value for script-executing or resource-loading constructs
pub fn is_dangerous_style_value(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    DANGEROUS_STYLE_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}
