// Static hand pose classification from fingertip geometry
//
// Every frame is classified on its own: no smoothing, no history.

use crate::models::hand::{ClassifierProfile, Gesture, LandmarkSet};
use serde::{Deserialize, Serialize};

/// Default max thumb/index tip gap (per axis, pixels) for the OK sign
pub const OK_THRESHOLD_PX: f32 = 20.0;
/// Default min horizontal gap (pixels) between neighbouring tips for Spread Fingers
pub const SPREAD_THRESHOLD_PX: f32 = 50.0;

// ==============================================================================
// Configuration
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub profile: ClassifierProfile,
    pub ok_threshold_px: f32,
    pub spread_threshold_px: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            profile: ClassifierProfile::Full,
            ok_threshold_px: OK_THRESHOLD_PX,
            spread_threshold_px: SPREAD_THRESHOLD_PX,
        }
    }
}

// ==============================================================================
// Predicates
// ==============================================================================

/// Fingertips of one hand in pixel space
#[derive(Debug, Clone, Copy)]
struct Tips {
    t: (f32, f32),
    i: (f32, f32),
    m: (f32, f32),
    r: (f32, f32),
    p: (f32, f32),
}

impl Tips {
    fn of(set: &LandmarkSet) -> Self {
        let xy = |l: crate::models::hand::Landmark| (l.x, l.y);
        Self {
            t: xy(set.thumb_tip()),
            i: xy(set.index_tip()),
            m: xy(set.middle_tip()),
            r: xy(set.ring_tip()),
            p: xy(set.pinky_tip()),
        }
    }

    /// M.y > R.y > P.y, shared by several poses
    fn lower_three_descending(&self) -> bool {
        self.m.1 > self.r.1 && self.r.1 > self.p.1
    }
}

type Predicate = fn(&Tips, &ClassifierConfig) -> bool;

fn open_hand(t: &Tips, _: &ClassifierConfig) -> bool {
    t.t.1 < t.i.1 && t.i.1 < t.m.1 && t.m.1 < t.r.1 && t.r.1 < t.p.1
}

fn closed_fist(t: &Tips, _: &ClassifierConfig) -> bool {
    t.t.1 > t.i.1 && t.i.1 > t.m.1 && t.lower_three_descending()
}

fn thumbs_up(t: &Tips, _: &ClassifierConfig) -> bool {
    t.t.1 < t.i.1 && t.i.1 > t.m.1 && t.lower_three_descending()
}

/// Same geometry as `closed_fist`, so it never wins under the full table.
/// Kept as observed rather than guessing at the intended pose.
fn thumbs_down(t: &Tips, _: &ClassifierConfig) -> bool {
    t.t.1 > t.i.1 && t.i.1 > t.m.1 && t.lower_three_descending()
}

fn peace(t: &Tips, _: &ClassifierConfig) -> bool {
    t.t.1 > t.i.1 && t.i.1 < t.m.1 && t.lower_three_descending()
}

fn pointing(t: &Tips, _: &ClassifierConfig) -> bool {
    t.i.1 < t.m.1 && t.lower_three_descending()
}

fn ok_sign(t: &Tips, c: &ClassifierConfig) -> bool {
    (t.t.0 - t.i.0).abs() < c.ok_threshold_px
        && (t.t.1 - t.i.1).abs() < c.ok_threshold_px
        && t.lower_three_descending()
}

fn rock_on(t: &Tips, _: &ClassifierConfig) -> bool {
    t.i.1 < t.m.1 && t.p.1 < t.r.1 && t.m.1 > t.r.1
}

fn spread_fingers(t: &Tips, c: &ClassifierConfig) -> bool {
    (t.i.0 - t.m.0).abs() > c.spread_threshold_px
        && (t.m.0 - t.r.0).abs() > c.spread_threshold_px
        && (t.r.0 - t.p.0).abs() > c.spread_threshold_px
}

fn index_above_middle(t: &Tips, _: &ClassifierConfig) -> bool {
    t.i.1 < t.m.1
}

/// Ordered table; the first match wins
const FULL_TABLE: [(Gesture, Predicate); 9] = [
    (Gesture::OpenHand, open_hand),
    (Gesture::ClosedFist, closed_fist),
    (Gesture::ThumbsUp, thumbs_up),
    (Gesture::ThumbsDown, thumbs_down),
    (Gesture::Peace, peace),
    (Gesture::Pointing, pointing),
    (Gesture::Ok, ok_sign),
    (Gesture::RockOn, rock_on),
    (Gesture::SpreadFingers, spread_fingers),
];

const POINTING_ONLY_TABLE: [(Gesture, Predicate); 1] = [(Gesture::Pointing, index_above_middle)];

// ==============================================================================
// Classifier
// ==============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    fn table(&self) -> &'static [(Gesture, Predicate)] {
        match self.config.profile {
            ClassifierProfile::Full => &FULL_TABLE,
            ClassifierProfile::PointingOnly => &POINTING_ONLY_TABLE,
        }
    }

    /// Classify one hand. Landmarks must be in pixel space.
    pub fn classify(&self, landmarks: &LandmarkSet) -> Gesture {
        let tips = Tips::of(landmarks);
        self.table()
            .iter()
            .find(|(_, matches)| matches(&tips, &self.config))
            .map(|(gesture, _)| *gesture)
            .unwrap_or(Gesture::Unknown)
    }

    /// Classify a frame's detections. Only the first hand is considered.
    pub fn classify_frame(&self, hands: &[LandmarkSet]) -> Gesture {
        match hands.first() {
            Some(hand) => self.classify(hand),
            None => Gesture::None,
        }
    }

    /// Every gesture whose predicate holds, in table order
    pub fn matching_gestures(&self, landmarks: &LandmarkSet) -> Vec<Gesture> {
        let tips = Tips::of(landmarks);
        self.table()
            .iter()
            .filter(|(_, matches)| matches(&tips, &self.config))
            .map(|(gesture, _)| *gesture)
            .collect()
    }
}

/// Classify with the full table and default thresholds
pub fn classify(landmarks: &LandmarkSet) -> Gesture {
    GestureClassifier::default().classify(landmarks)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::hand::{Landmark, LANDMARK_COUNT};

    /// Hand with the given fingertips (thumb, index, middle, ring, pinky); other joints at origin
    pub(crate) fn hand_with_tips(tips: [(f32, f32); 5]) -> LandmarkSet {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (slot, (x, y)) in [4, 8, 12, 16, 20].into_iter().zip(tips) {
            points[slot] = Landmark::new(x, y, 0.0);
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn test_open_hand() {
        let hand = hand_with_tips([(100.0, 100.0), (200.0, 150.0), (300.0, 200.0), (400.0, 250.0), (500.0, 300.0)]);
        assert_eq!(classify(&hand), Gesture::OpenHand);
    }

    #[test]
    fn test_closed_fist_wins_over_thumbs_down() {
        let hand = hand_with_tips([(0.0, 300.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0), (0.0, 100.0)]);
        let classifier = GestureClassifier::default();

        let matches = classifier.matching_gestures(&hand);
        assert!(matches.contains(&Gesture::ClosedFist));
        assert!(matches.contains(&Gesture::ThumbsDown));
        assert_eq!(classifier.classify(&hand), Gesture::ClosedFist);
    }

    #[test]
    fn test_thumbs_up() {
        let hand = hand_with_tips([(0.0, 50.0), (0.0, 300.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0)]);
        assert_eq!(classify(&hand), Gesture::ThumbsUp);
    }

    #[test]
    fn test_peace() {
        let hand = hand_with_tips([(0.0, 300.0), (0.0, 100.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0)]);
        assert_eq!(classify(&hand), Gesture::Peace);
    }

    #[test]
    fn test_pointing() {
        let hand = hand_with_tips([(0.0, 50.0), (0.0, 100.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0)]);
        assert_eq!(classify(&hand), Gesture::Pointing);
    }

    #[test]
    fn test_ok_sign() {
        let hand = hand_with_tips([(100.0, 200.0), (110.0, 200.0), (200.0, 180.0), (250.0, 150.0), (300.0, 120.0)]);
        assert_eq!(classify(&hand), Gesture::Ok);
    }

    #[test]
    fn test_ok_sign_respects_threshold() {
        let hand = hand_with_tips([(100.0, 200.0), (125.0, 200.0), (200.0, 180.0), (250.0, 150.0), (300.0, 120.0)]);
        assert_ne!(classify(&hand), Gesture::Ok);

        let loose = GestureClassifier::new(ClassifierConfig {
            ok_threshold_px: 30.0,
            ..ClassifierConfig::default()
        });
        assert_eq!(loose.classify(&hand), Gesture::Ok);
    }

    #[test]
    fn test_rock_on_is_shadowed_by_pointing() {
        // I above M, P above R, M below R: also satisfies Pointing, which is checked first
        let hand = hand_with_tips([(0.0, 0.0), (0.0, 100.0), (0.0, 300.0), (0.0, 200.0), (0.0, 150.0)]);
        let classifier = GestureClassifier::default();
        assert!(classifier.matching_gestures(&hand).contains(&Gesture::RockOn));
        assert_eq!(classifier.classify(&hand), Gesture::Pointing);
    }

    #[test]
    fn test_spread_fingers() {
        let hand = hand_with_tips([(0.0, 100.0), (100.0, 100.0), (200.0, 100.0), (300.0, 100.0), (400.0, 100.0)]);
        assert_eq!(classify(&hand), Gesture::SpreadFingers);
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        let hand = hand_with_tips([(100.0, 100.0); 5]);
        let classifier = GestureClassifier::default();
        assert!(classifier.matching_gestures(&hand).is_empty());
        assert_eq!(classifier.classify(&hand), Gesture::Unknown);
    }

    #[test]
    fn test_no_hands_is_none_not_unknown() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify_frame(&[]), Gesture::None);
    }

    #[test]
    fn test_only_first_hand_is_classified() {
        let open = hand_with_tips([(100.0, 100.0), (200.0, 150.0), (300.0, 200.0), (400.0, 250.0), (500.0, 300.0)]);
        let fist = hand_with_tips([(0.0, 300.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0), (0.0, 100.0)]);
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify_frame(&[open, fist]), Gesture::OpenHand);
        assert_eq!(classifier.classify_frame(&[fist, open]), Gesture::ClosedFist);
    }

    #[test]
    fn test_classification_is_repeatable() {
        let hand = hand_with_tips([(0.0, 50.0), (0.0, 100.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0)]);
        let classifier = GestureClassifier::default();
        let first = classifier.classify(&hand);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&hand), first);
        }
    }

    #[test]
    fn test_pointing_only_profile() {
        let classifier = GestureClassifier::new(ClassifierConfig {
            profile: ClassifierProfile::PointingOnly,
            ..ClassifierConfig::default()
        });
        // Open hand geometry still has the index tip above the middle tip
        let open = hand_with_tips([(100.0, 100.0), (200.0, 150.0), (300.0, 200.0), (400.0, 250.0), (500.0, 300.0)]);
        assert_eq!(classifier.classify(&open), Gesture::Pointing);

        let fist = hand_with_tips([(0.0, 300.0), (0.0, 250.0), (0.0, 200.0), (0.0, 150.0), (0.0, 100.0)]);
        assert_eq!(classifier.classify(&fist), Gesture::Unknown);
        assert_eq!(classifier.classify_frame(&[]), Gesture::None);
    }
}
