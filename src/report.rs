//! Generated report expectations
//!
//! Models the pieces of an Allure report the acceptance tests look at: the
//! essential static files and the behaviors data tree (feature → story →
//! suite → test case). The tree is read-only; tests walk it and assert on
//! names and counts.

use serde::Deserialize;

use crate::common::{Error, Result};

/// Files every generated report must contain, non-empty
pub const REPORT_FILES: &[&str] = &["index.html", "app.js", "styles.css"];

/// A node in Allure's behaviors tree
///
/// The root's `name` is absent in `behaviors.json`; every other level
/// carries a display name and an ordered child list.
#[derive(Debug, Deserialize)]
pub struct BehaviorNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<BehaviorNode>,
}

impl BehaviorNode {
    /// Child at `index`, or an error naming the missing position
    pub fn child(&self, index: usize) -> Result<&BehaviorNode> {
        self.children.get(index).ok_or_else(|| {
            Error::BehaviorNode(format!(
                "'{}' has {} children, wanted index {}",
                if self.name.is_empty() { "<root>" } else { &self.name },
                self.children.len(),
                index
            ))
        })
    }

    /// Names of the direct children, in order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Parse a `behaviors.json` body into its tree
pub fn parse_behaviors(body: &str) -> Result<BehaviorNode> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEHAVIORS: &str = r#"{
        "uid": "root",
        "children": [
            {
                "name": "End-to-end test suit",
                "children": [
                    {
                        "name": "Selenium",
                        "children": [
                            {
                                "name": "Test selenium grid is alive",
                                "children": [
                                    { "name": "test_selenium[Browser: chrome]", "status": "passed" },
                                    { "name": "test_selenium[Browser: edge]", "status": "passed" },
                                    { "name": "test_selenium[Browser: firefox]", "status": "passed" }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn walks_four_levels() {
        let root = parse_behaviors(BEHAVIORS).unwrap();
        let feature = root.child(0).unwrap();
        assert_eq!(feature.name, "End-to-end test suit");

        let story = feature.child(0).unwrap();
        assert_eq!(story.name, "Selenium");

        let suite = story.child(0).unwrap();
        assert_eq!(suite.name, "Test selenium grid is alive");
        assert_eq!(suite.children.len(), 3);
        assert!(suite
            .child_names()
            .iter()
            .all(|n| n.starts_with("test_selenium[Browser:")));
    }

    #[test]
    fn missing_child_names_the_position() {
        let root = parse_behaviors(r#"{"children": []}"#).unwrap();
        let err = root.child(0).unwrap_err();
        assert!(err.to_string().contains("<root>"), "got {err}");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let root = parse_behaviors(r#"{"uid": "x", "children": [{"name": "f", "status": "passed"}]}"#)
            .unwrap();
        assert_eq!(root.child(0).unwrap().name, "f");
    }
}
