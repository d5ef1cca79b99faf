use textile_color::color::{self, LabColor, colorimeter};
use textile_color::conflicts::{CatalogColor, ConflictDetector, conflict_map, hex_to_lab};

fn catalog() -> Vec<CatalogColor> {
    vec![
        CatalogColor::new("A", "Vermelho").with_hex("#FF0000"),
        CatalogColor::new("B", "Vermelho escuro").with_hex("#FE0101"),
        CatalogColor::new("C", "Azul").with_hex("#0000FF"),
    ]
}

#[test]
fn near_duplicate_reds_conflict_and_blue_does_not() {
    let pairs = ConflictDetector::default().find_all_conflicts(&catalog());
    assert_eq!(pairs.len(), 1);
    let pair = &pairs[0];
    assert_eq!(pair.first.id, "A");
    assert_eq!(pair.second.id, "B");
    assert!(pair.delta_e < 1.0, "got {}", pair.delta_e);
    assert!(pairs.iter().all(|pair| pair.first.id != "C" && pair.second.id != "C"));
}

#[test]
fn pruned_scan_agrees_on_the_scenario() {
    let detector = ConflictDetector::default().with_lightness_pruning(true);
    let pruned = detector.find_all_conflicts(&catalog());
    assert_eq!(
        pruned,
        ConflictDetector::default().find_all_conflicts(&catalog())
    );
}

#[test]
fn new_color_is_checked_against_the_catalog() {
    let detector = ConflictDetector::default();
    let candidate = hex_to_lab("#FD0000").unwrap();
    let conflict = detector.find_conflict(candidate, &catalog()).unwrap();
    assert!(conflict.id == "A" || conflict.id == "B");
    assert!(detector.has_conflict(candidate, &catalog()));
    assert!(!detector.has_conflict(hex_to_lab("#00FF00").unwrap(), &catalog()));
}

#[test]
fn captured_colors_join_the_catalog_as_stored_lab() {
    let mut bytes = vec![0xAB, 0x44, 0, 0, 0, 0, 0, 0];
    for value in [5_000u16.to_le_bytes(), 1_000i16.to_le_bytes(), (-500i16).to_le_bytes()] {
        bytes.extend_from_slice(&value);
    }
    bytes.resize(64, 0);
    let capture = colorimeter::capture(&bytes).unwrap();

    let mut colors = catalog();
    colors.push(CatalogColor::new("D", "Capturada").with_lab(capture.lab));
    colors.push(CatalogColor::new("E", "Capturada de novo").with_lab(LabColor::new(
        capture.lab.l + 0.5,
        capture.lab.a,
        capture.lab.b,
    )));

    let pairs = ConflictDetector::default().find_all_conflicts(&colors);
    assert_eq!(pairs.len(), 2);
    let map = conflict_map(&pairs);
    assert_eq!(map["D"].len(), 1);
    assert_eq!(map["D"][0].id, "E");
    assert_eq!(map["E"][0].id, "D");
    assert_eq!(map["A"][0].id, "B");
}

#[test]
fn hex_round_trip_through_lab_is_stable() {
    for hex in ["#FF0000", "#00FF00", "#0000FF", "#808080", "#1F2A44", "#C8A2C8"] {
        let lab = hex_to_lab(hex).unwrap();
        assert_eq!(color::lab_to_hex(lab), hex);
    }
}
