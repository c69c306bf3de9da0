#![forbid(unsafe_code)]

//! The inspectable-text heuristic.
//!
//! Decides whether an arbitrary DOM node is worth inspecting: visible,
//! on-screen, carrying enough directly-owned text to describe. The decision
//! procedure is ordered and fail-fast — cheap tag/visibility/geometry
//! checks run before the text-content heuristics.
//!
//! Generic containers (`div`) get their own rule because they are both the
//! most common false positive (layout wrappers owning no text of their own)
//! and the most common false negative (text set directly on a container
//! with no inline wrapper).
//!
//! # Invariants
//!
//! 1. Deterministic: identical `(tag, style, geometry, text)` inputs yield
//!    identical classifications on every call.
//! 2. A missing or non-element node is rejected, never an error.

use unicode_segmentation::UnicodeSegmentation;

use crate::dom::{DomTree, NodeId, ResolvedStyle};

/// Minimum run of letters/digits/ideographs for text to count as content.
const MEANINGFUL_RUN: usize = 3;

/// Thresholds for the classifier, fixed as explicit constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierPolicy {
    /// Minimum rendered width and height in pixels.
    pub min_box_px: f32,
    /// Minimum direct text length for allowlisted tags.
    pub min_text_len: usize,
    /// Direct text length at which a `div` counts as a rich text container.
    pub container_rich_len: usize,
    /// Direct text length at which a styled `div` counts as a text container.
    pub container_styled_len: usize,
    /// The document's default font-family, captured at session activation.
    ///
    /// A `div` whose own family differs from this counts as deliberately
    /// styled. Empty means unknown, in which case any non-empty family
    /// counts.
    pub default_font_family: String,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            min_box_px: 10.0,
            min_text_len: 3,
            container_rich_len: 20,
            container_styled_len: 5,
            default_font_family: String::new(),
        }
    }
}

impl ClassifierPolicy {
    /// Set the document default font-family used by the container rule.
    #[must_use]
    pub fn default_font_family(mut self, family: impl Into<String>) -> Self {
        self.default_font_family = family.into();
        self
    }
}

/// Why a node was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptReason {
    /// Block-level text tag with enough direct text.
    BlockText,
    /// Inline text tag with enough direct text.
    InlineText,
    /// Table cell, list item, or interactive text control.
    TextCell,
    /// Generic container owning a rich amount of direct text.
    RichContainer,
    /// Generic container with deliberate text styling and some direct text.
    StyledContainer,
}

/// Why a node was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No node under the pointer.
    NoNode,
    /// The node is not an element.
    NotAnElement,
    /// The tag is on the fixed non-text denylist.
    DeniedTag,
    /// `display: none`, `visibility: hidden`, or opacity rounding to zero.
    NotVisible,
    /// Trimmed text content is empty.
    EmptyText,
    /// Rendered box below the minimum size.
    TooSmall,
    /// Rendered box entirely outside the viewport.
    OffViewport,
    /// No run of meaningful characters after punctuation stripping.
    NoMeaningfulContent,
    /// Not enough text owned directly by the node itself.
    SparseDirectText,
}

/// Outcome of classifying one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The node qualifies for inspection.
    Accepted(AcceptReason),
    /// The node does not qualify.
    Rejected(RejectReason),
}

impl Classification {
    /// Whether this outcome accepts the node.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Classify `node`, reporting why it was accepted or rejected.
#[must_use]
pub fn classify<D: DomTree + ?Sized>(
    dom: &D,
    node: Option<NodeId>,
    policy: &ClassifierPolicy,
) -> Classification {
    use Classification::{Accepted, Rejected};

    let Some(node) = node else {
        return Rejected(RejectReason::NoNode);
    };
    let Some(tag) = dom.tag_name(node) else {
        return Rejected(RejectReason::NotAnElement);
    };
    if is_denied_tag(&tag) {
        return Rejected(RejectReason::DeniedTag);
    }
    let Some(style) = dom.resolved_style(node) else {
        return Rejected(RejectReason::NotAnElement);
    };
    if !is_visible(&style) {
        return Rejected(RejectReason::NotVisible);
    }

    let text = dom.text_content(node);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Rejected(RejectReason::EmptyText);
    }

    let rect = dom.bounding_rect(node);
    if rect.width < policy.min_box_px || rect.height < policy.min_box_px {
        return Rejected(RejectReason::TooSmall);
    }
    if !rect.intersects(&dom.viewport()) {
        return Rejected(RejectReason::OffViewport);
    }

    if !has_meaningful_run(trimmed) {
        return Rejected(RejectReason::NoMeaningfulContent);
    }

    let direct_len = direct_text_len(dom, node);

    let outcome = if is_block_text_tag(&tag) && direct_len >= policy.min_text_len {
        Accepted(AcceptReason::BlockText)
    } else if is_inline_text_tag(&tag) && direct_len >= policy.min_text_len {
        Accepted(AcceptReason::InlineText)
    } else if is_text_cell_tag(&tag) && direct_len >= policy.min_text_len {
        Accepted(AcceptReason::TextCell)
    } else if tag == "div" {
        if direct_len >= policy.container_rich_len {
            Accepted(AcceptReason::RichContainer)
        } else if direct_len >= policy.container_styled_len
            && has_custom_font(&style, policy)
            && has_explicit_align(&style)
        {
            Accepted(AcceptReason::StyledContainer)
        } else {
            Rejected(RejectReason::SparseDirectText)
        }
    } else {
        Rejected(RejectReason::SparseDirectText)
    };

    #[cfg(feature = "tracing")]
    crate::trace!(?outcome, tag = %tag, direct_len, "classified node");

    outcome
}

/// Boolean view of [`classify`].
#[must_use]
pub fn is_inspectable<D: DomTree + ?Sized>(
    dom: &D,
    node: Option<NodeId>,
    policy: &ClassifierPolicy,
) -> bool {
    classify(dom, node, policy).is_accepted()
}

/// Sum of trimmed direct text-node lengths, counted in grapheme clusters.
fn direct_text_len<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> usize {
    dom.direct_text_nodes(node)
        .iter()
        .map(|t| t.trim().graphemes(true).count())
        .sum()
}

fn is_visible(style: &ResolvedStyle) -> bool {
    style.display != "none" && style.visibility != "hidden" && style.opacity.round() as i32 != 0
}

/// Strip the fixed punctuation class, then look for a run of at least
/// [`MEANINGFUL_RUN`] characters from {ASCII letters, digits, CJK
/// ideographs}. Stripping first means characters separated only by
/// punctuation still form a run.
fn has_meaningful_run(text: &str) -> bool {
    let mut run = 0usize;
    for c in text.chars().filter(|c| !is_stripped_punct(*c)) {
        if is_meaningful_char(c) {
            run += 1;
            if run >= MEANINGFUL_RUN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

fn is_meaningful_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_stripped_punct(c: char) -> bool {
    matches!(
        c,
        '.' | ','
            | ';'
            | ':'
            | '!'
            | '?'
            | '\''
            | '"'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '/'
            | '\\'
            | '|'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '&'
            | '*'
            | '-'
            | '_'
            | '+'
            | '='
            | '~'
            | '`'
    )
}

fn has_custom_font(style: &ResolvedStyle, policy: &ClassifierPolicy) -> bool {
    let family = style.font_family.trim();
    !family.is_empty() && family != policy.default_font_family
}

fn has_explicit_align(style: &ResolvedStyle) -> bool {
    let align = style.text_align.trim();
    !align.is_empty() && align != "start"
}

/// Structural, media, void, non-text form-control, and metadata tags.
fn is_denied_tag(tag: &str) -> bool {
    matches!(
        tag,
        // document metadata
        "html" | "head" | "meta" | "title" | "link" | "base" | "style" | "script" | "noscript"
            | "template"
            // media and embeds
            | "img" | "svg" | "picture" | "canvas" | "video" | "audio" | "source" | "track"
            | "iframe" | "object" | "embed" | "map" | "area"
            // void elements and separators
            | "br" | "hr" | "wbr" | "col" | "colgroup"
            // non-text form controls
            | "input" | "select" | "option" | "optgroup" | "form" | "fieldset" | "datalist"
            | "progress" | "meter"
            // structural containers
            | "body" | "ul" | "ol" | "dl" | "table" | "thead" | "tbody" | "tfoot" | "tr"
            | "nav" | "header" | "footer" | "aside" | "main" | "section" | "article" | "menu"
            | "dialog"
    )
}

/// Paragraph/heading/quote/code-like block tags.
fn is_block_text_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "blockquote"
            | "pre"
            | "code"
            | "figcaption"
            | "dt"
            | "dd"
            | "summary"
    )
}

/// Span/anchor/emphasis-like inline tags.
fn is_inline_text_tag(tag: &str) -> bool {
    matches!(
        tag,
        "span"
            | "a"
            | "em"
            | "strong"
            | "i"
            | "b"
            | "u"
            | "s"
            | "small"
            | "sub"
            | "sup"
            | "mark"
            | "abbr"
            | "cite"
            | "q"
            | "label"
            | "time"
            | "kbd"
            | "samp"
            | "var"
            | "del"
            | "ins"
    )
}

/// Table cells, list items, and interactive text controls.
fn is_text_cell_tag(tag: &str) -> bool {
    matches!(tag, "td" | "th" | "li" | "caption" | "button" | "textarea")
}
