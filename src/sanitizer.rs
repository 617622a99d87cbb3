//! Allow-list sanitizer over the node tree
//!
//! The sanitizer rewrites a node list depth-first, pre-order:
//!
//! 1. Text passes through unchanged.
//! 2. An element whose tag is not allowed is *unwrapped*: its children are
//!    spliced into the parent at the element's position and sanitized in
//!    turn, so nothing is skipped. Content is kept, only the tag goes.
//! 3. An allowed element loses every attribute outside the tag's allow-list.
//!    A surviving `style` is filtered down to allowed, safe declarations (or
//!    removed when none survive). A surviving `href`/`src` is removed when it
//!    uses a script-executing scheme or a non-image `data:` URL.
//! 4. An `a` that still has an `href` gets `rel="noopener noreferrer"`, and
//!    `target="_blank"` when the link points away from the editor's origin.
//!
//! Nodes are consumed and rebuilt, so each surviving node is visited exactly
//! once. The rewrite cannot fail: malformed input has already been repaired
//! by the parser and anything unexpected is simply stripped.
//!
//! Sanitizing is idempotent: every decision depends only on the node itself
//! and the policy, and every output of a pass already satisfies the policy.

use crate::dom::{Element, Node};
use crate::policy::{SanitizationPolicy, is_dangerous_url};

/// `rel` value forced onto links
pub const LINK_REL: &str = "noopener noreferrer";

/// What a sanitizer pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Elements replaced by their children
    pub unwrapped_elements: usize,
    /// Attributes removed outright (style rewrites are not counted)
    pub removed_attributes: usize,
}

/// Sanitizer bound to a policy
///
/// # Examples
///
/// ```
/// use rte_content::dom::{serialize, Element, Node};
/// use rte_content::policy::SanitizationPolicy;
/// use rte_content::sanitizer::Sanitizer;
///
/// let policy = SanitizationPolicy::with_allowed_tags(&["p"]);
/// let tree = vec![Node::Element(
///     Element::new("p")
///         .with_attribute("onclick", "x()")
///         .with_children(vec![
///             Node::text("hi "),
///             Node::element("script", vec![Node::text("bad()")]),
///         ]),
/// )];
///
/// let clean = Sanitizer::new(&policy).sanitize(tree);
/// assert_eq!(serialize(&clean), "<p>hi bad()</p>");
/// ```
pub struct Sanitizer<'p> {
    policy: &'p SanitizationPolicy,
}

impl<'p> Sanitizer<'p> {
    pub fn new(policy: &'p SanitizationPolicy) -> Self {
        Self { policy }
    }

    /// Sanitize a node list
    pub fn sanitize(&self, nodes: Vec<Node>) -> Vec<Node> {
        self.sanitize_with_report(nodes).0
    }

    /// Sanitize a node list and report what was stripped
    pub fn sanitize_with_report(&self, nodes: Vec<Node>) -> (Vec<Node>, SanitizeReport) {
        let mut report = SanitizeReport::default();
        let clean = self.sanitize_children(nodes, &mut report);

        log::debug!(
            "sanitized fragment: {} element(s) unwrapped, {} attribute(s) removed",
            report.unwrapped_elements,
            report.removed_attributes
        );

        (clean, report)
    }

    fn sanitize_children(&self, nodes: Vec<Node>, report: &mut SanitizeReport) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.sanitize_node(node, &mut out, report);
        }
        out
    }

    fn sanitize_node(&self, node: Node, out: &mut Vec<Node>, report: &mut SanitizeReport) {
        let mut element = match node {
            Node::Text(text) => {
                push_text(out, text);
                return;
            }
            Node::Element(element) => element,
        };

        if !self.policy.allows_tag(&element.tag) {
            log::trace!("unwrapping disallowed <{}>", element.tag);
            report.unwrapped_elements += 1;
            // Splice the children in place and keep walking through them
            for child in std::mem::take(&mut element.children) {
                self.sanitize_node(child, out, report);
            }
            return;
        }

        self.clean_attributes(&mut element, report);
        self.harden_link(&mut element);

        let children = std::mem::take(&mut element.children);
        element.children = self.sanitize_children(children, report);
        out.push(Node::Element(element));
    }

    fn clean_attributes(&self, element: &mut Element, report: &mut SanitizeReport) {
        let policy = self.policy;
        let tag = element.tag.as_str();
        let mut cleaned_style = None;

        element.attributes.retain(|name, value| {
            let keep = if !policy.allows_attribute(tag, name) {
                false
            } else {
                match name {
                    "style" => {
                        cleaned_style = policy.clean_style(value);
                        cleaned_style.is_some()
                    }
                    "href" | "src" => !is_dangerous_url(value),
                    _ => true,
                }
            };

            if !keep {
                log::trace!("removing attribute {}=\"{}\" from <{}>", name, value, tag);
                report.removed_attributes += 1;
            }
            keep
        });

        if let Some(style) = cleaned_style {
            element.attributes.set("style", style);
        }
    }

    fn harden_link(&self, element: &mut Element) {
        if element.tag != "a" {
            return;
        }
        let Some(href) = element.attribute("href") else {
            return;
        };

        let external = self.policy.is_external_link(href);
        element.attributes.set("rel", LINK_REL);
        if external {
            element.attributes.set("target", "_blank");
        }
    }
}

/// Sanitize a node list with `policy`
pub fn sanitize(nodes: Vec<Node>, policy: &SanitizationPolicy) -> Vec<Node> {
    Sanitizer::new(policy).sanitize(nodes)
}

/// Append text, merging with a preceding text node
fn push_text(out: &mut Vec<Node>, text: String) {
    if let Some(Node::Text(previous)) = out.last_mut() {
        previous.push_str(&text);
    } else {
        out.push(Node::Text(text));
    }
}
