mod common;

use common::fixtures::{ScriptedTracker, StubCamera, StubNode, StubObject};
use common::synthetic_image::checkerboard_frame;
use observation_fusion::camera::FeatureState;
use observation_fusion::manager::FEATURE_NAN_PENALTY;
use observation_fusion::node::FrameData;
use observation_fusion::tracker::TrackedFeature;
use observation_fusion::{NodeFilter, ObjectType, ObservationError, ObservationManager, Rect};

fn scored_manager() -> ObservationManager {
    let mut manager = ObservationManager::default();
    manager.insert_node(StubNode::boxed("hog", 1.5, vec![Rect::new(10, 10, 20, 40)]));
    manager.insert_node(StubNode::boxed("face", 0.5, Vec::new()));
    manager.insert_node(StubNode::boxed("hog", 2.0, Vec::new()));
    manager
}

#[test]
fn out_of_height_objects_get_the_fixed_penalty() {
    let mut manager = scored_manager();
    manager.set_parameter("min_height", "1.3").unwrap();
    let camera = StubCamera::simplified(1.2, 240.0);

    let short = StubObject::with_height(1.0);
    let tall = StubObject::with_height(2.5);
    for filter in [NodeFilter::All, NodeFilter::from_name("hog")] {
        assert_eq!(manager.object_confidence(&short, &camera, &filter), -15.0);
        assert_eq!(manager.object_confidence(&tall, &camera, &filter), -15.0);
    }

    let empty = ObservationManager::default();
    assert_eq!(
        empty.object_confidence(&short, &StubCamera::full(), &NodeFilter::All),
        -15.0
    );
}

#[test]
fn object_score_sums_selected_nodes_and_applies_weight() {
    let mut manager = scored_manager();
    let camera = StubCamera::simplified(1.2, 240.0);
    let person = StubObject::with_height(1.7);

    assert_eq!(manager.object_confidence(&person, &camera, &NodeFilter::All), 4.0);
    assert_eq!(
        manager.object_confidence(&person, &camera, &NodeFilter::from_name("hog")),
        3.5
    );
    assert_eq!(
        manager.object_confidence(&person, &camera, &NodeFilter::from_name("car")),
        0.0
    );

    manager.set_parameter("total_weight", "0.5").unwrap();
    assert_eq!(manager.object_confidence(&person, &camera, &NodeFilter::All), 2.0);
}

#[test]
fn height_bounds_are_inclusive() {
    let manager = scored_manager();
    let camera = StubCamera::simplified(1.2, 240.0);
    let at_min = StubObject::with_height(1.3);
    let at_max = StubObject::with_height(2.3);
    assert_eq!(manager.object_confidence(&at_min, &camera, &NodeFilter::All), 4.0);
    assert_eq!(manager.object_confidence(&at_max, &camera, &NodeFilter::All), 4.0);
}

/// Manager with a single kept feature at full-frame (100, 300).
fn feature_manager() -> ObservationManager {
    let mut manager = ObservationManager::default();
    let (_, shared) = ScriptedTracker::shared(vec![TrackedFeature::new(1, 100.0, 60.0, 1.0)]);
    manager.set_data(FrameData::FeatureTracker(shared)).unwrap();
    manager
        .set_data(FrameData::MonoImage(checkerboard_frame(640, 480, 32)))
        .unwrap();
    manager.select_features(&[], 1, &[]).unwrap();
    manager
}

#[test]
fn exact_reprojection_scores_the_offset_break_even() {
    let manager = feature_manager();
    let camera = StubCamera::simplified(1.2, 240.0);
    let score = manager
        .feature_confidence(&FeatureState::new(100.0, 300.0, 5.0), 0, &camera)
        .unwrap();
    // Two axes, each 0.5 * 1.4^2 above the break-even density.
    assert!((score - 1.96).abs() < 1e-9, "score={score}");
}

#[test]
fn reprojection_error_lowers_the_score() {
    let mut manager = feature_manager();
    manager.set_parameter("feat_sigma_u", "2.0").unwrap();
    manager.set_parameter("feat_sigma_v", "4.0").unwrap();
    let camera = StubCamera::simplified(1.2, 240.0);

    let score = manager
        .feature_confidence(&FeatureState::new(102.0, 304.0, 5.0), 0, &camera)
        .unwrap();
    // One sigma off on both axes.
    assert!((score - (1.96 - 1.0)).abs() < 1e-9, "score={score}");
}

#[test]
fn undefined_reprojection_falls_back_to_penalty() {
    let manager = feature_manager();
    let camera = StubCamera::simplified(1.2, 240.0);
    let score = manager
        .feature_confidence(&FeatureState::new(f64::NAN, 300.0, 5.0), 0, &camera)
        .unwrap();
    assert_eq!(score, FEATURE_NAN_PENALTY);
    assert_eq!(score, -100.0);

    let mut degenerate = feature_manager();
    degenerate.set_parameter("feat_sigma_u", "0").unwrap();
    let score = degenerate
        .feature_confidence(&FeatureState::new(100.0, 300.0, 5.0), 0, &camera)
        .unwrap();
    assert_eq!(score, -100.0);
}

#[test]
fn feature_index_must_be_in_range() {
    let manager = feature_manager();
    let camera = StubCamera::simplified(1.2, 240.0);
    let err = manager
        .feature_confidence(&FeatureState::new(0.0, 0.0, 1.0), 3, &camera)
        .unwrap_err();
    assert_eq!(err, ObservationError::FeatureIndexOutOfRange { index: 3, len: 1 });
}

#[test]
fn horizon_votes_follow_detection_heights() {
    let mut manager = ObservationManager::default();
    manager.insert_node(StubNode::boxed(
        "hog",
        0.0,
        vec![Rect::new(0, 300, 60, 170), Rect::new(0, 100, 30, 85)],
    ));

    let votes = manager.horizon_votes(1.2);
    assert_eq!(votes.len(), 2);
    // 170 px tall person: feet-to-camera span is 0.5 / 1.7 of the box.
    assert_eq!(votes[0].row, 350.0);
    assert!((votes[0].std - 10.0).abs() < 1e-9);
    assert_eq!(votes[1].row, 125.0);
    assert!((votes[1].std - 5.0).abs() < 1e-9);

    manager.set_object_type(ObjectType::Car);
    let votes = manager.horizon_votes(1.2);
    // 170 * 0.3 / 1.5 = 34
    assert_eq!(votes[0].row, 334.0);
}
