//! Field extraction heuristics over captured panel text.
//!
//! Every heuristic is a pure function of the captured snapshot, so each
//! strategy stays testable against fixture text. Phone strategies form an
//! ordered list applied with first-success-wins.

use crate::PanelSnapshot;

/// Sigil marking a self-assigned public-name fragment.
const PUBLIC_NAME_SIGIL: char = '~';

/// Minimum digit count for a string to qualify as a phone number.
const MIN_PHONE_DIGITS: usize = 10;

/// Fields resolved so far for one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedFields {
    pub public_name: String,
    pub phone_number: String,
}

impl ExtractedFields {
    /// The panel-read retry loop stops once either field is resolved.
    pub fn any_resolved(&self) -> bool {
        !self.public_name.is_empty() || !self.phone_number.is_empty()
    }
}

/// Inputs available to the phone resolution strategies.
#[derive(Debug, Clone, Copy)]
pub struct PhoneContext<'a> {
    pub display_label: &'a str,
    pub panel: Option<&'a PanelSnapshot>,
}

type PhoneStrategy = fn(&PhoneContext<'_>) -> Option<String>;

/// Resolution order is strict: the display label wins over the panel text,
/// which wins over the directional fragments.
const PHONE_STRATEGIES: &[PhoneStrategy] = &[
    phone_from_display_label,
    phone_from_panel_lines,
    phone_from_directional_fragments,
];

/// True for strings composed of digits, spaces and hyphens with an optional
/// leading `+`, carrying at least ten digits.
pub fn is_phone_like(text: &str) -> bool {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if rest.is_empty() {
        return false;
    }
    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return false;
    }
    rest.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

/// First nested fragment that, trimmed, is longer than one character and
/// starts with the public-name sigil.
pub fn extract_public_name(panel: &PanelSnapshot) -> Option<String> {
    panel
        .fragments
        .iter()
        .map(|fragment| fragment.trim())
        .find(|t| t.starts_with(PUBLIC_NAME_SIGIL) && t.chars().count() > 1)
        .map(str::to_string)
}

/// Apply the ordered phone strategies; first match wins.
pub fn resolve_phone(ctx: &PhoneContext<'_>) -> Option<String> {
    PHONE_STRATEGIES.iter().find_map(|strategy| strategy(ctx))
}

fn phone_from_display_label(ctx: &PhoneContext<'_>) -> Option<String> {
    is_phone_like(ctx.display_label).then(|| ctx.display_label.trim().to_string())
}

fn phone_from_panel_lines(ctx: &PhoneContext<'_>) -> Option<String> {
    let panel = ctx.panel?;
    panel
        .full_text
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('+') && is_phone_like(line))
        .map(str::to_string)
}

fn phone_from_directional_fragments(ctx: &PhoneContext<'_>) -> Option<String> {
    let panel = ctx.panel?;
    panel
        .directional_fragments
        .iter()
        .map(|fragment| fragment.trim())
        .find(|fragment| is_phone_like(fragment))
        .map(str::to_string)
}

/// Fill any still-missing field from one captured panel. Fields resolved on
/// an earlier attempt are kept as-is.
pub fn fill_missing(
    fields: &mut ExtractedFields,
    display_label: &str,
    panel: Option<&PanelSnapshot>,
) {
    if fields.public_name.is_empty() {
        if let Some(name) = panel.and_then(extract_public_name) {
            fields.public_name = name;
        }
    }
    if fields.phone_number.is_empty() {
        if let Some(phone) = resolve_phone(&PhoneContext {
            display_label,
            panel,
        }) {
            fields.phone_number = phone;
        }
    }
}
