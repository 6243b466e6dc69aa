use std::path::PathBuf;

use pretty_assertions::assert_eq;
use vela_theme::{
    fragment, resolve, select_breakpoint, ConditionSet, LayoutDirection, Orientation, OverrideMap,
    StyleFragment, ThemeSpec,
};

fn fixture() -> ThemeSpec {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/responsive.toml");
    ThemeSpec::load(path).unwrap()
}

fn conditions(
    direction: LayoutDirection,
    orientation: Orientation,
    smallest_width: Option<&str>,
) -> ConditionSet {
    ConditionSet {
        layout_direction: Some(direction),
        orientation: Some(orientation),
        smallest_width: smallest_width.map(str::to_string),
    }
}

#[test]
fn resolution_is_deterministic() {
    let spec = fixture();
    let cond = conditions(LayoutDirection::Rtl, Orientation::Landscape, Some("sw600"));
    let mut overrides = OverrideMap::new();
    overrides.insert("scheme".to_string(), "dark".to_string());

    let first = resolve(&spec, &cond, &overrides);
    let second = resolve(&spec, &cond, &overrides);
    assert_eq!(first, second);
    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
}

#[test]
fn later_breakpoint_entry_wins() {
    let spec = ThemeSpec::new()
        .with_entry("base", fragment([("bg", "white")]))
        .with_entry("sw600", fragment([("bg", "gray")]));

    let breakpoint = select_breakpoint(&spec, 700.0);
    assert_eq!(breakpoint.as_deref(), Some("sw600"));

    let cond = ConditionSet {
        smallest_width: breakpoint,
        ..Default::default()
    };
    let theme = resolve(&spec, &cond, &OverrideMap::new());
    assert_eq!(theme["bg"].as_str(), Some("gray"));
}

#[test]
fn rtl_entry_is_inert_for_ltr() {
    let spec = fixture();
    let ltr = resolve(
        &spec,
        &conditions(LayoutDirection::Ltr, Orientation::Portrait, None),
        &OverrideMap::new(),
    );
    let rtl = resolve(
        &spec,
        &conditions(LayoutDirection::Rtl, Orientation::Portrait, None),
        &OverrideMap::new(),
    );

    assert_eq!(ltr["align"].as_str(), Some("start"));
    assert_eq!(rtl["align"].as_str(), Some("end"));
}

#[test]
fn breakpoint_selection_follows_declaration_order() {
    let spec = fixture();
    // sw400, sw800, sw600 are all <= 900; sw600 is declared last
    assert_eq!(select_breakpoint(&spec, 900.0).as_deref(), Some("sw600"));

    let theme = resolve(
        &spec,
        &conditions(LayoutDirection::Ltr, Orientation::Landscape, Some("sw600")),
        &OverrideMap::new(),
    );
    // Only the selected breakpoint is active, so sw400 and sw800 entries don't apply
    assert_eq!(theme["columns"].as_f64(), Some(2.0));
    assert_eq!(theme["gutter"].as_f64(), Some(16.0));
}

#[test]
fn orientation_entries() {
    let spec = fixture();
    let none = OverrideMap::new();

    let land = resolve(
        &spec,
        &conditions(LayoutDirection::Ltr, Orientation::Landscape, None),
        &none,
    );
    let port = resolve(
        &spec,
        &conditions(LayoutDirection::Ltr, Orientation::Portrait, None),
        &none,
    );
    assert_eq!(land["header_height"].as_f64(), Some(48.0));
    assert_eq!(port["header_height"].as_f64(), Some(56.0));
}

#[test]
fn unknown_conditions_only_apply_base() {
    let spec = fixture();
    let theme = resolve(&spec, &ConditionSet::default(), &OverrideMap::new());

    let mut names: Vec<_> = theme.keys().map(String::as_str).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["align", "background", "columns", "gutter"]);
}

#[test]
fn conflicting_entries_resolve_by_declaration_order() {
    // Not validated: both entries match, the later one silently wins
    let spec = ThemeSpec::new()
        .with_entry("land", fragment([("density", "compact")]))
        .with_entry("land-ldltr", fragment([("density", "comfortable")]))
        .with_entry("ldltr", fragment([("density", "spacious")]));

    let theme = resolve(
        &spec,
        &conditions(LayoutDirection::Ltr, Orientation::Landscape, None),
        &OverrideMap::new(),
    );
    assert_eq!(theme["density"].as_str(), Some("spacious"));

    let reordered = ThemeSpec::new()
        .with_entry("ldltr", fragment([("density", "spacious")]))
        .with_entry("land-ldltr", fragment([("density", "comfortable")]));
    let theme = resolve(
        &reordered,
        &conditions(LayoutDirection::Ltr, Orientation::Landscape, None),
        &OverrideMap::new(),
    );
    assert_eq!(theme["density"].as_str(), Some("comfortable"));
}

#[test]
fn dark_override_replaces_palette_whole() {
    let spec = fixture();
    let mut overrides = OverrideMap::new();
    overrides.insert("scheme".to_string(), "dark".to_string());

    let theme = resolve(&spec, &ConditionSet::default(), &overrides);
    assert_eq!(theme["background"].as_str(), Some("black"));

    let palette = theme["palette"].as_table().unwrap();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette["surface"].as_str(), Some("#121212"));
}

#[test]
fn empty_spec_resolves_to_empty_theme() {
    let theme = resolve(
        &ThemeSpec::new(),
        &conditions(LayoutDirection::Rtl, Orientation::Portrait, Some("sw600")),
        &OverrideMap::new(),
    );
    assert!(theme.is_empty());

    let empty_entries = ThemeSpec::new().with_entry("base", StyleFragment::new());
    assert!(empty_entries
        .resolve(&ConditionSet::default(), &OverrideMap::new())
        .is_empty());
}
