#![forbid(unsafe_code)]

//! Host message types.
//!
//! The messaging transport itself belongs to the host; this module only
//! defines what travels over it. Every message is a JSON object tagged by
//! an `action` field, and the field names are part of the wire contract —
//! tests pin the exact serialized shape.

use serde::{Deserialize, Serialize};

/// Messages the host sends to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum HostCommand {
    /// Toggle session activation. Idempotent toggle, not a set: tolerated
    /// in either state.
    #[serde(rename = "toggleExtension")]
    ToggleExtension,

    /// Deactivate the session and tear down the UI.
    #[serde(rename = "deactivateExtension")]
    DeactivateExtension {
        /// Keep pinned tooltips alive through the teardown.
        #[serde(rename = "preservePinned", default)]
        preserve_pinned: bool,
    },
}

/// Notifications the engine sends to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum HostSignal {
    /// Emitted exactly once per user-initiated deactivation (Escape).
    #[serde(rename = "deactivateExtension")]
    DeactivateExtension,

    /// The user activated a font-family value; the host turns this into an
    /// external lookup. Carries the raw resolved family list.
    #[serde(rename = "searchFontFamily")]
    SearchFontFamily {
        /// The resolved font-family list, first entry taking display
        /// priority.
        #[serde(rename = "fontFamily")]
        font_family: String,
    },
}
