//! Reduces a region's labels to one spoken phrase by fixed precedence

use crate::processing::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator used when joining a region's labels into the matched text.
pub const LABEL_SEPARATOR: &str = "、";

/// Template used when no rule matches.
pub const FALLBACK_TEMPLATE: &str = "{region}有{labels}";

/// A precedence rule: if any term occurs in the joined label text, the
/// region is described with `template`.
///
/// Templates may reference `{region}` (spoken region name) and `{labels}`
/// (the joined label text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRule {
    pub name: String,
    pub terms: Vec<String>,
    pub template: String,
}

impl PriorityRule {
    pub fn new(name: &str, terms: &[&str], template: &str) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
            template: template.to_string(),
        }
    }

    /// Case-sensitive substring test against the joined label text.
    pub fn matches(&self, text: &str) -> bool {
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }

    pub fn render(&self, region: Region, text: &str) -> String {
        render(&self.template, region, text)
    }
}

fn render(template: &str, region: Region, text: &str) -> String {
    template
        .replace("{region}", region.spoken_name())
        .replace("{labels}", text)
}

fn join_labels(labels: &BTreeSet<String>) -> String {
    labels
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

/// Safety-ranked rule table, highest priority first.
pub fn default_rules() -> Vec<PriorityRule> {
    vec![
        PriorityRule::new("crosswalk", &["斑馬線", "crosswalk"], "{region}是斑馬線，請注意過馬路安全"),
        PriorityRule::new("person", &["人", "person"], "{region}有人"),
        PriorityRule::new("bicycle", &["腳踏車", "bicycle"], "{region}有腳踏車"),
        PriorityRule::new("traffic_light", &["交通燈", "traffic light"], "{region}是交通燈號，請注意等候或通行"),
        PriorityRule::new("vehicle", &["車", "car"], "{region}有車輛經過，請小心通行"),
        PriorityRule::new("dog", &["狗", "dog"], "{region}有狗"),
        PriorityRule::new("chair", &["椅子", "chair"], "{region}有椅子"),
        PriorityRule::new("trash_can", &["垃圾桶", "trash can"], "{region}有垃圾桶"),
        PriorityRule::new("stairs", &["樓梯", "stair", "stairs"], "{region}是樓梯，請注意上下台階安全"),
    ]
}

/// First-match-wins phrase resolution over an ordered rule table.
///
/// Matching is raw substring containment on the joined labels, so a label
/// that merely contains a term (人行道 contains 人) triggers that term's rule.
#[derive(Debug, Clone)]
pub struct PhraseResolver {
    rules: Vec<PriorityRule>,
}

impl Default for PhraseResolver {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl PhraseResolver {
    pub fn new(rules: Vec<PriorityRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PriorityRule] {
        &self.rules
    }

    /// Phrase describing `labels` in `region`, or `None` for an empty set.
    pub fn resolve(&self, region: Region, labels: &BTreeSet<String>) -> Option<String> {
        if labels.is_empty() {
            return None;
        }

        let text = join_labels(labels);

        let phrase = match self.rules.iter().find(|rule| rule.matches(&text)) {
            Some(rule) => rule.render(region, &text),
            None => render(FALLBACK_TEMPLATE, region, &text),
        };
        Some(phrase)
    }

    /// Rule that would fire, `None` meaning fallback or empty.
    pub fn matching_rule(&self, labels: &BTreeSet<String>) -> Option<&PriorityRule> {
        let text = join_labels(labels);
        self.rules.iter().find(|rule| rule.matches(&text))
    }
}
