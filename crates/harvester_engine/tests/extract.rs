mod support;

use harvester_engine::{
    extract_public_name, fill_missing, is_phone_like, resolve_phone, ExtractedFields, PhoneContext,
};
use pretty_assertions::assert_eq;
use support::panel;

#[test]
fn phone_pattern_accepts_formatted_international_numbers() {
    assert!(is_phone_like("+1 555-123-4567"));
    assert!(is_phone_like("123-456-7890"));
    assert!(is_phone_like("  +49 170 1234567  "));
}

#[test]
fn phone_pattern_rejects_letters_and_short_numbers() {
    assert!(!is_phone_like("abc"));
    assert!(!is_phone_like("12345"));
    // Nine digits is one short.
    assert!(!is_phone_like("+123456789"));
    assert!(!is_phone_like("555 123 4567x"));
    assert!(!is_phone_like("+"));
    assert!(!is_phone_like(""));
}

#[test]
fn public_name_takes_first_sigil_fragment_in_document_order() {
    let panel = panel("", &["Alice", "  ~Ali  ", "~Backup"], &[]);
    assert_eq!(extract_public_name(&panel), Some("~Ali".to_string()));
}

#[test]
fn bare_sigil_fragment_is_skipped() {
    let panel = panel("", &["~", "~Real"], &[]);
    assert_eq!(extract_public_name(&panel), Some("~Real".to_string()));
}

#[test]
fn no_sigil_fragment_yields_no_public_name() {
    let panel = panel("", &["Alice", "online"], &[]);
    assert_eq!(extract_public_name(&panel), None);
}

#[test]
fn display_label_phone_wins_over_panel_lines() {
    let panel = panel("+9 999-999-9999\nabout", &[], &[]);
    let resolved = resolve_phone(&PhoneContext {
        display_label: "+1 555-123-4567",
        panel: Some(&panel),
    });
    assert_eq!(resolved, Some("+1 555-123-4567".to_string()));
}

#[test]
fn panel_line_must_start_with_plus_to_beat_directional_fragments() {
    // The second line is phone-like but has no leading '+', so rule 2
    // passes it over and rule 3 picks the directional fragment.
    let panel = panel(
        "status\n1 111-111-1111",
        &[],
        &["2 222-222-2222"],
    );
    let resolved = resolve_phone(&PhoneContext {
        display_label: "Alice",
        panel: Some(&panel),
    });
    assert_eq!(resolved, Some("2 222-222-2222".to_string()));
}

#[test]
fn panel_line_phone_wins_over_directional_fragment() {
    let panel = panel(
        "about\n+1 111-111-1111",
        &[],
        &["+2 222-222-2222"],
    );
    let resolved = resolve_phone(&PhoneContext {
        display_label: "Alice",
        panel: Some(&panel),
    });
    assert_eq!(resolved, Some("+1 111-111-1111".to_string()));
}

#[test]
fn label_phone_resolves_without_any_panel() {
    let resolved = resolve_phone(&PhoneContext {
        display_label: "+1 555-123-4567",
        panel: None,
    });
    assert_eq!(resolved, Some("+1 555-123-4567".to_string()));
}

#[test]
fn fill_missing_keeps_fields_resolved_on_earlier_attempts() {
    let mut fields = ExtractedFields {
        public_name: "~First".to_string(),
        phone_number: String::new(),
    };
    let later = panel("+1 555-123-4567", &["~Second"], &[]);
    fill_missing(&mut fields, "Alice", Some(&later));

    assert_eq!(fields.public_name, "~First");
    assert_eq!(fields.phone_number, "+1 555-123-4567");
}

#[test]
fn fields_report_resolved_once_either_is_present() {
    let mut fields = ExtractedFields::default();
    assert!(!fields.any_resolved());
    fields.public_name = "~Ali".to_string();
    assert!(fields.any_resolved());
}
