// src/utils/html.rs

use std::{str::FromStr, sync::LazyLock};

use html5ever::{
    ParseOpts, parse_document,
    serialize::{SerializeOpts, TraversalScope, serialize},
    tendril::TendrilSink,
    tree_builder::TreeBuilderOpts,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use regex::Regex;

/// Returned whenever sanitizing leaves nothing behind, so renderers
/// always receive a parseable, non-blank fragment.
pub const EMPTY_FRAGMENT: &str = "<p></p>";

/// Elements removed together with their whole subtree.
/// Browsers parse `noscript` contents as raw text, so it can't be scrubbed.
pub const DENIED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "form", "noscript",
];

/// Wrappers that are dropped when they end up without text or media.
pub const PRUNABLE_CONTAINERS: &[&str] = &["p", "div", "figure"];

/// Descendants that keep an otherwise text-less container alive.
pub const MEANINGFUL_DESCENDANTS: &[&str] = &[
    "img",
    "video",
    "ul",
    "ol",
    "pre",
    "code",
    "blockquote",
    "figcaption",
];

/// Which cleaning strategy is applied to author HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HtmlPolicy {
    /// Strip the known-dangerous constructs, keep all other formatting.
    #[default]
    Denylist,
    /// Denylist pass followed by an ammonia allowlist pass.
    Strict,
}

impl FromStr for HtmlPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "denylist" | "" => Ok(HtmlPolicy::Denylist),
            "strict" | "allowlist" => Ok(HtmlPolicy::Strict),
            other => Err(format!("unknown html policy '{}'", other)),
        }
    }
}

/// Cleans author-supplied rich text before it is stored or rendered.
///
/// The fragment is parsed leniently (malformed markup is auto-closed), then:
/// 1. [`DENIED_TAGS`] elements (`script`, `iframe`, `form`, ...) are removed.
/// 2. Every remaining element loses `style`, all `on*` handlers, and any
///    `href`/`src` pointing at `javascript:`.
/// 3. `<img>` elements with a `data:image` source are removed entirely; on any
///    other element only the `src` attribute is dropped.
/// 4. Empty `p`/`div`/`figure` wrappers (no text, no media/list/code/quote) are pruned.
///
/// Never fails: empty input or an empty result yields [`EMPTY_FRAGMENT`].
pub fn sanitize_html(input: Option<&str>) -> String {
    let Some(input) = input.filter(|html| !html.is_empty()) else {
        return EMPTY_FRAGMENT.to_string();
    };

    let dom = parse(input);
    let Some(body) = find_body(&dom.document) else {
        return EMPTY_FRAGMENT.to_string();
    };

    scrub_children(&body);
    prune_empty_containers(&body);

    let html = serialize_children(&body);
    let html = html.trim();
    if html.is_empty() {
        EMPTY_FRAGMENT.to_string()
    } else {
        html.to_string()
    }
}

/// Runs [`sanitize_html`] and, for [`HtmlPolicy::Strict`], an additional
/// allowlist pass through ammonia.
pub fn sanitize_with_policy(input: Option<&str>, policy: HtmlPolicy) -> String {
    let cleaned = sanitize_html(input);
    match policy {
        HtmlPolicy::Denylist => cleaned,
        HtmlPolicy::Strict => {
            let strict = strict_cleaner().clean(&cleaned).to_string();
            // The allowlist may strip the only content of a wrapper.
            sanitize_html(Some(&strict))
        }
    }
}

fn strict_cleaner() -> ammonia::Builder<'static> {
    let mut cleaner = ammonia::Builder::default();
    cleaner
        .strip_comments(true)
        .add_tags(&["figure", "figcaption", "video", "source"])
        .add_tag_attributes("video", &["src", "poster", "controls", "preload"])
        .add_tag_attributes("source", &["src", "type"])
        .link_rel(Some("noopener noreferrer nofollow"));
    cleaner
}

/// Returns true when the body embeds images as inline `data:` URIs.
/// Such content is rejected on save; images go through uploads instead.
pub fn contains_inline_data_uri(html: &str) -> bool {
    html.contains("src=\"data:")
}

static LOOKS_LIKE_HTML: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*[a-z][\s\S]*>").expect("valid html regex"));
static H3_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^###\s*(.+)$").expect("valid h3 regex"));
static H2_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s*(.+)$").expect("valid h2 regex"));
static H1_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s*(.+)$").expect("valid h1 regex"));
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid paragraph regex"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid newline regex"));

/// Turns a stored body into displayable HTML.
///
/// HTML passes through untouched. Plain text / light markdown gets `#` headings
/// and blank-line separated paragraphs. Callers still sanitize the result.
pub fn to_readable_html(source: &str) -> String {
    let raw = source.trim();
    if LOOKS_LIKE_HTML.is_match(raw) {
        return raw.to_string();
    }

    let with_heads = H3_LINE.replace_all(raw, "<h3>$1</h3>");
    let with_heads = H2_LINE.replace_all(&with_heads, "<h2>$1</h2>");
    let with_heads = H1_LINE.replace_all(&with_heads, "<h1>$1</h1>");

    PARAGRAPH_BREAK
        .split(&with_heads)
        .map(|paragraph| LINE_BREAKS.replace_all(paragraph, " ").trim().to_string())
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| format!("<p>{}</p>", paragraph))
        .collect()
}

fn parse(input: &str) -> RcDom {
    // Match DOMParser: documents are parsed with scripting disabled.
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts).one(input)
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let roots = document.children.borrow();
    let body = roots
        .iter()
        .filter(|node| element_name(node) == Some("html"))
        .flat_map(|html| html.children.borrow().clone())
        .find(|node| element_name(node) == Some("body"));
    body
}

fn scrub_children(parent: &Handle) {
    let children = parent.children.take();
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        if scrub_node(&child) {
            kept.push(child);
        } else {
            child.parent.set(None);
        }
    }
    *parent.children.borrow_mut() = kept;
}

/// Cleans one node in place. Returns false when it must be detached.
fn scrub_node(node: &Handle) -> bool {
    if let NodeData::Element { name, attrs, .. } = &node.data {
        let tag = &*name.local;
        if DENIED_TAGS.contains(&tag) {
            return false;
        }

        let is_img = tag == "img";
        let mut drop_element = false;
        attrs.borrow_mut().retain(|attr| {
            let attr_name = attr.name.local.to_ascii_lowercase().to_string();
            if attr_name == "style" || attr_name.starts_with("on") {
                return false;
            }
            if (attr_name == "href" || attr_name == "src") && !attr.value.is_empty() {
                let value = attr.value.trim().to_lowercase();
                if value.starts_with("javascript:") {
                    return false;
                }
                if attr_name == "src" && value.starts_with("data:image") {
                    drop_element |= is_img;
                    return false;
                }
            }
            true
        });

        if drop_element {
            return false;
        }
    }

    scrub_children(node);
    true
}

fn prune_empty_containers(parent: &Handle) {
    let children = parent.children.take();
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        if is_empty_container(&child) {
            child.parent.set(None);
            continue;
        }
        prune_empty_containers(&child);
        kept.push(child);
    }
    *parent.children.borrow_mut() = kept;
}

fn is_empty_container(node: &Handle) -> bool {
    match element_name(node) {
        Some(tag) if PRUNABLE_CONTAINERS.contains(&tag) => {
            !has_text(node) && !has_meaningful_descendant(node)
        }
        _ => false,
    }
}

fn has_text(node: &Handle) -> bool {
    node.children.borrow().iter().any(|child| match &child.data {
        NodeData::Text { contents } => !contents.borrow().trim().is_empty(),
        NodeData::Element { .. } => has_text(child),
        _ => false,
    })
}

fn has_meaningful_descendant(node: &Handle) -> bool {
    node.children.borrow().iter().any(|child| match element_name(child) {
        Some(tag) => MEANINGFUL_DESCENDANTS.contains(&tag) || has_meaningful_descendant(child),
        None => false,
    })
}

fn serialize_children(node: &Handle) -> String {
    let handle: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        scripting_enabled: false,
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };

    let mut out = Vec::new();
    if let Err(e) = serialize(&mut out, &handle, opts) {
        tracing::warn!("Failed to serialize sanitized html: {:?}", e);
        return String::new();
    }
    String::from_utf8_lossy(&out).into_owned()
}
