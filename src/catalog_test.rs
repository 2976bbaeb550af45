use super::*;
use crate::config::PosturePreference;
use crate::pose::test_helpers::{pose, sitting, standing};

fn sample() -> Catalog {
    Catalog::new(vec![standing("mountain"), standing("eagle-right"), standing("eagle-left"), sitting("seated-twist")])
        .expect("sample catalog is valid")
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn new_indexes_poses_by_id() {
    let catalog = sample();
    assert_eq!(catalog.len(), 4);
    assert!(!catalog.is_empty());
    assert_eq!(catalog.get("eagle-left").map(|p| p.id.as_str()), Some("eagle-left"));
    assert!(catalog.contains("mountain"));
    assert!(catalog.get("missing").is_none());
}

#[test]
fn new_rejects_duplicate_ids() {
    let err = Catalog::new(vec![standing("mountain"), standing("mountain")]).expect_err("duplicate");
    assert!(matches!(err, CatalogError::DuplicateId(id) if id == "mountain"));
}

#[test]
fn new_rejects_side_suffix_mismatch() {
    let mut bad = standing("eagle-right");
    bad.side = Some(Side::Left);
    let err = Catalog::new(vec![bad]).expect_err("mismatch");
    assert!(matches!(err, CatalogError::SideSuffixMismatch { side: Side::Left, .. }));
}

#[test]
fn empty_catalog_is_valid() {
    let catalog = Catalog::new(Vec::new()).expect("empty is fine");
    assert!(catalog.is_empty());
    assert!(catalog.eligible(&SessionConfig::default()).is_empty());
}

// =============================================================================
// sibling
// =============================================================================

#[test]
fn sibling_finds_mirrored_pose() {
    let catalog = sample();
    let right = catalog.get("eagle-right").expect("present");
    assert_eq!(catalog.sibling(right).map(|p| p.id.as_str()), Some("eagle-left"));
}

#[test]
fn sibling_is_none_for_unsided_or_unpaired_pose() {
    let catalog = Catalog::new(vec![standing("mountain"), standing("tree-right")]).expect("valid");
    let mountain = catalog.get("mountain").expect("present");
    let tree = catalog.get("tree-right").expect("present");
    assert!(catalog.sibling(mountain).is_none());
    assert!(catalog.sibling(tree).is_none());
}

// =============================================================================
// eligible
// =============================================================================

#[test]
fn eligible_keeps_catalog_order() {
    let catalog = sample();
    let config = SessionConfig::default().with_posture(PosturePreference::Standing);
    let ids: Vec<&str> = catalog.eligible(&config).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["mountain", "eagle-right", "eagle-left"]);
}

#[test]
fn eligible_applies_focus_filter() {
    let catalog = Catalog::new(vec![
        pose("wrist-circles", Posture::Sitting, Visibility::CameraOn, &[FocusArea::Wrists]),
        sitting("breath"),
    ])
    .expect("valid");
    let config = SessionConfig::default().with_focus_area(FocusArea::Wrists);
    let ids: Vec<&str> = catalog.eligible(&config).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["wrist-circles"]);
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn from_json_parses_pose_array() {
    let raw = r#"[
        {"id": "mountain", "name": "Mountain",
         "tags": {"allowed_posture": "standing", "visibility": "camera off", "focus_areas": []}},
        {"id": "eagle-right", "name": "Eagle (Right)", "side": "right",
         "tags": {"allowed_posture": "standing", "visibility": "camera off"}}
    ]"#;
    let catalog = Catalog::from_json(raw).expect("valid json");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("eagle-right").and_then(|p| p.side), Some(Side::Right));
}

#[test]
fn from_json_rejects_malformed_input() {
    let err = Catalog::from_json("{not json").expect_err("malformed");
    assert!(matches!(err, CatalogError::Json(_)));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("poses.json");
    let json = serde_json::to_string(&vec![standing("mountain")]).expect("serialize");
    std::fs::write(&path, json).expect("write");
    let catalog = Catalog::load(&path).expect("load");
    assert!(catalog.contains("mountain"));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Catalog::load(&dir.path().join("nope.json")).expect_err("missing");
    assert!(matches!(err, CatalogError::Io(_)));
}

// =============================================================================
// Bundled data
// =============================================================================

#[test]
fn builtin_catalog_passes_validation() {
    let builtin = Catalog::builtin();
    let revalidated = Catalog::new(builtin.poses().to_vec()).expect("bundled poses are valid");
    assert_eq!(revalidated.len(), builtin.len());
}

#[test]
fn builtin_sided_poses_all_have_siblings_with_same_tags() {
    let catalog = Catalog::builtin();
    for pose in catalog.poses().iter().filter(|p| p.side.is_some()) {
        let sibling = catalog.sibling(pose).unwrap_or_else(|| panic!("{} has no sibling", pose.id));
        assert_eq!(sibling.tags, pose.tags, "{} and {} disagree on tags", pose.id, sibling.id);
    }
}

#[test]
fn builtin_has_both_postures() {
    let catalog = Catalog::builtin();
    let any = SessionConfig::default().with_posture(PosturePreference::Any);
    let standing_only = SessionConfig::default().with_posture(PosturePreference::Standing);
    assert_eq!(catalog.eligible(&any).len(), catalog.len());
    assert!(!catalog.eligible(&standing_only).is_empty());
}
