use std::sync::{Arc, Mutex};

use grove_core::model::object::{GEO_FEATURE_GROUP_TYPE, GROUP_TYPE};
use grove_core::ops::group_ops;
use grove_core::{Document, MembershipObserver};

#[allow(dead_code)]
pub const FEATURE_TYPE: &str = "Core::Feature";

/// Observer that records every notification it receives
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingObserver {
    notifications: Mutex<Vec<(String, Vec<String>)>>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notifications(&self) -> Vec<(String, Vec<String>)> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Notifications received for one group, oldest first
    pub fn for_group(&self, group_id: &str) -> Vec<Vec<String>> {
        self.notifications()
            .into_iter()
            .filter(|(g, _)| g == group_id)
            .map(|(_, members)| members)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut n) = self.notifications.lock() {
            n.clear();
        }
    }
}

impl MembershipObserver for RecordingObserver {
    fn membership_changed(&self, group_id: &str, members: &[String]) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push((group_id.to_string(), members.to_vec()));
        }
    }
}

/// Create a base group named `name`
#[allow(dead_code)]
pub fn group(doc: &mut Document, name: &str) -> String {
    doc.create_object(GROUP_TYPE, name).unwrap()
}

/// Create a geo-feature group named `name`
#[allow(dead_code)]
pub fn geo_group(doc: &mut Document, name: &str) -> String {
    doc.create_object(GEO_FEATURE_GROUP_TYPE, name).unwrap()
}

/// Create a plain, non-group feature named `name`
#[allow(dead_code)]
pub fn feature(doc: &mut Document, name: &str) -> String {
    doc.create_object(FEATURE_TYPE, name).unwrap()
}

/// Build G1 = [x, y] and an empty G2
///
/// Returns (doc, g1, g2, x, y)
#[allow(dead_code)]
pub fn setup_two_groups() -> (Document, String, String, String, String) {
    let mut doc = Document::new();
    let g1 = group(&mut doc, "G1");
    let g2 = group(&mut doc, "G2");
    let x = feature(&mut doc, "x");
    let y = feature(&mut doc, "y");
    group_ops::add_object(&mut doc, &g1, &x).unwrap();
    group_ops::add_object(&mut doc, &g1, &y).unwrap();
    (doc, g1, g2, x, y)
}

/// Build Outer -> Inner -> leaf
///
/// Returns (doc, outer, inner, leaf)
#[allow(dead_code)]
pub fn setup_nested() -> (Document, String, String, String) {
    let mut doc = Document::new();
    let outer = group(&mut doc, "Outer");
    let inner = group(&mut doc, "Inner");
    let leaf = feature(&mut doc, "leaf");
    group_ops::add_object(&mut doc, &outer, &inner).unwrap();
    group_ops::add_object(&mut doc, &inner, &leaf).unwrap();
    (doc, outer, inner, leaf)
}
