//! Pipeline-step trees for a streaming assistant response.
//!
//! While an answer streams, the backend emits one [`StepRecord`] per step
//! update (intent detection, retrieval, SQL generation, …). Records refer
//! to their parent by `parent_id` and may also arrive already nested in
//! `sub_steps`. This module rebuilds the forest and rolls up counts,
//! durations, and token usage for display.
//!
//! Everything here is a pure function of the record list: no step is ever
//! dropped, and malformed linkage degrades to extra roots rather than
//! errors.
//!
//! # Counting rule
//!
//! A record is a *sub-step* when its `parent_id` resolves to another
//! record of the same list. [`compute_summary`] counts only records that
//! are roots of [`build_forest`]'s output, never the completed marker,
//! and uses the same roots when it has to sum durations and tokens.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::locale::Locale;

/// Step type of the synthetic record carrying grand totals.
pub const COMPLETED_STEP_TYPE: &str = "completed";

/// Lifecycle of a step: `running` then `completed` or `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

/// One step update as emitted by the streaming backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    pub label: String,
    pub step_type: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub sub_steps: Vec<StepRecord>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<StepRecord>, D::Error> {
    Ok(Option::<Vec<StepRecord>>::deserialize(d)?.unwrap_or_default())
}

impl StepRecord {
    /// The record's id, or `""` when it has none yet.
    pub fn id(&self) -> &str {
        self.step_id.as_deref().unwrap_or("")
    }

    fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    /// True for the synthetic grand-total record.
    pub fn is_completed_marker(&self) -> bool {
        self.step_type == COMPLETED_STEP_TYPE && self.status == StepStatus::Completed
    }

    /// Copy without `sub_steps`.
    fn detached(&self) -> StepRecord {
        StepRecord {
            step_id: self.step_id.clone(),
            label: self.label.clone(),
            step_type: self.step_type.clone(),
            status: self.status,
            parent_id: self.parent_id.clone(),
            duration: self.duration,
            tokens: self.tokens,
            sub_steps: Vec::new(),
        }
    }
}

/// Roll-up figures for one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub completed_count: usize,
    pub failed_count: usize,
    pub running_count: usize,
    /// Seconds.
    pub total_duration: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
}

/// Deepest nesting [`build_forest`] produces. A parent chain longer than
/// this continues as a new root.
pub const MAX_TREE_DEPTH: usize = 64;

/// Flatten nested input depth first into one record per id.
///
/// Missing ids get a fresh UUID. A nested child without `parent_id`
/// inherits its container's id. A repeated id overwrites the earlier
/// record in place, so the latest update wins but keeps its original
/// position.
pub fn flatten(steps: &[StepRecord]) -> Vec<StepRecord> {
    let mut flat: Vec<StepRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stack: Vec<(&StepRecord, Option<String>)> =
        steps.iter().rev().map(|s| (s, None)).collect();

    while let Some((step, container)) = stack.pop() {
        let mut record = step.detached();
        let id = match step.step_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        record.step_id = Some(id.clone());
        if record.parent().is_none() {
            record.parent_id = container;
        }

        match index.get(&id) {
            Some(&i) => flat[i] = record,
            None => {
                index.insert(id.clone(), flat.len());
                flat.push(record);
            }
        }

        stack.extend(step.sub_steps.iter().rev().map(|c| (c, Some(id.clone()))));
    }
    flat
}

/// How flattened records hang together.
struct Links {
    /// Children per record, in first-seen order.
    children: Vec<Vec<usize>>,
    /// Parent each record is attached under; `None` for roots.
    attached: Vec<Option<usize>>,
    /// Roots in first-seen order.
    roots: Vec<usize>,
    /// Roots that only exist because their chain hit [`MAX_TREE_DEPTH`].
    continued: Vec<bool>,
    /// Pre-order over every tree.
    order: Vec<usize>,
}

fn link(flat: &[StepRecord]) -> Links {
    let n = flat.len();
    let index: HashMap<&str, usize> = flat.iter().enumerate().map(|(i, s)| (s.id(), i)).collect();
    let parent_of: Vec<Option<usize>> = flat
        .iter()
        .enumerate()
        .map(|(i, s)| s.parent().and_then(|p| index.get(p).copied()).filter(|&p| p != i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, parent) in parent_of.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(i);
        }
    }

    let mut links = Links {
        children,
        attached: vec![None; n],
        roots: Vec::new(),
        continued: vec![false; n],
        order: Vec::with_capacity(n),
    };
    let mut placed = vec![false; n];
    let mut depth = vec![0usize; n];
    let mut pending: Vec<usize> = (0..n).rev().filter(|&i| parent_of[i].is_none()).collect();
    let mut scan = 0;

    loop {
        let root = match pending.pop() {
            Some(r) => r,
            None => {
                // Anything still unplaced hangs off a cycle.
                while scan < n && placed[scan] {
                    scan += 1;
                }
                if scan == n {
                    break;
                }
                cycle_entry(scan, &parent_of)
            }
        };
        if placed[root] {
            continue;
        }
        placed[root] = true;
        links.roots.push(root);

        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            links.order.push(i);
            for &c in links.children[i].iter().rev() {
                if placed[c] {
                    continue;
                }
                if depth[i] + 1 >= MAX_TREE_DEPTH {
                    links.continued[c] = true;
                    pending.push(c);
                    continue;
                }
                placed[c] = true;
                depth[c] = depth[i] + 1;
                links.attached[c] = Some(i);
                stack.push(c);
            }
        }
    }

    links.roots.sort_unstable();
    links
}

/// Where to cut the parent cycle above `start`: its earliest record.
fn cycle_entry(start: usize, parent_of: &[Option<usize>]) -> usize {
    let mut seen = HashSet::new();
    let mut i = start;
    while seen.insert(i) {
        match parent_of[i] {
            Some(p) => i = p,
            None => return i,
        }
    }
    let mut first = i;
    let mut j = i;
    while let Some(p) = parent_of[j] {
        if p == i {
            break;
        }
        first = first.min(p);
        j = p;
    }
    first
}

/// Rebuild the step forest from flat or partly nested records.
///
/// Returns the roots in first-seen order, each with `sub_steps` populated.
/// A record becomes a root when its parent is absent, unknown, or itself.
/// A parent cycle is cut at its earliest record, which becomes a root.
/// Chains deeper than [`MAX_TREE_DEPTH`] continue as extra roots. Every
/// input record appears exactly once in the result. The completed marker
/// is kept; see [`display_roots`].
pub fn build_forest(steps: &[StepRecord]) -> Vec<StepRecord> {
    let mut flat = flatten(steps);
    let links = link(&flat);

    // Reverse pre-order builds every child before its parent.
    let mut built: Vec<Option<StepRecord>> = vec![None; flat.len()];
    for &i in links.order.iter().rev() {
        let mut node = std::mem::take(&mut flat[i]);
        for &c in &links.children[i] {
            if links.attached[c] == Some(i) {
                if let Some(child) = built[c].take() {
                    node.sub_steps.push(child);
                }
            }
        }
        built[i] = Some(node);
    }

    links.roots.iter().filter_map(|&r| built[r].take()).collect()
}

/// Count statuses and total durations and tokens for a response.
///
/// When the top-level list holds a completed marker, its duration and
/// tokens are the totals (the last marker wins if several were sent).
/// Otherwise totals are summed over root steps only, since a parent's
/// duration already includes its sub-steps. Token totals saturate.
pub fn compute_summary(steps: &[StepRecord]) -> StepSummary {
    let mut summary = StepSummary::default();
    let flat = flatten(steps);
    let links = link(&flat);
    let roots: Vec<&StepRecord> = links
        .roots
        .iter()
        .filter(|&&r| !links.continued[r])
        .map(|&r| &flat[r])
        .collect();

    for step in roots.iter().filter(|s| !s.is_completed_marker()) {
        match step.status {
            StepStatus::Completed => summary.completed_count += 1,
            StepStatus::Failed => summary.failed_count += 1,
            StepStatus::Running => summary.running_count += 1,
        }
    }

    match steps.iter().rev().find(|s| s.is_completed_marker()) {
        Some(marker) => {
            let tokens = marker.tokens.unwrap_or_default();
            summary.total_duration = marker.duration.unwrap_or(0.0);
            summary.total_input_tokens = tokens.input;
            summary.total_output_tokens = tokens.output;
        }
        None => {
            for step in &roots {
                let tokens = step.tokens.unwrap_or_default();
                summary.total_duration += step.duration.unwrap_or(0.0);
                summary.total_input_tokens =
                    summary.total_input_tokens.saturating_add(tokens.input);
                summary.total_output_tokens =
                    summary.total_output_tokens.saturating_add(tokens.output);
            }
        }
    }

    summary
}

/// Localized description of a step type, or the step type itself.
pub fn label_for(step_type: &str, locale: &Locale) -> String {
    locale
        .step_label(step_type)
        .map(str::to_string)
        .unwrap_or_else(|| step_type.to_string())
}

/// Root list for display: the forest without the completed marker.
pub fn display_roots(roots: &[StepRecord]) -> Vec<&StepRecord> {
    roots.iter().filter(|s| !s.is_completed_marker()).collect()
}

/// Depth-first pre-order traversal; `visit` receives `(depth, step)`.
pub fn walk<'a, F>(steps: &'a [StepRecord], visit: &mut F)
where
    F: FnMut(usize, &'a StepRecord),
{
    let mut stack: Vec<(usize, &'a StepRecord)> = steps.iter().rev().map(|s| (0, s)).collect();
    while let Some((depth, step)) = stack.pop() {
        visit(depth, step);
        stack.extend(step.sub_steps.iter().rev().map(|c| (depth + 1, c)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, parent: Option<&str>, status: StepStatus, duration: f64) -> StepRecord {
        StepRecord {
            step_id: Some(id.to_string()),
            label: id.to_string(),
            step_type: "retrieval".to_string(),
            status,
            parent_id: parent.map(str::to_string),
            duration: Some(duration),
            ..Default::default()
        }
    }

    fn marker(duration: f64, input: u64, output: u64) -> StepRecord {
        StepRecord {
            step_id: Some("done".to_string()),
            label: "Completed".to_string(),
            step_type: COMPLETED_STEP_TYPE.to_string(),
            status: StepStatus::Completed,
            duration: Some(duration),
            tokens: Some(TokenUsage { input, output }),
            ..Default::default()
        }
    }

    fn count_nodes(roots: &[StepRecord]) -> usize {
        let mut n = 0;
        walk(roots, &mut |_, _| n += 1);
        n
    }

    #[test]
    fn test_child_nested_under_parent() {
        let steps = vec![
            step("a", None, StepStatus::Completed, 1.0),
            step("b", Some("a"), StepStatus::Completed, 0.5),
        ];
        let roots = build_forest(&steps);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id(), "a");
        assert_eq!(roots[0].sub_steps.len(), 1);
        assert_eq!(roots[0].sub_steps[0].id(), "b");
        assert!(roots.iter().all(|r| r.id() != "b"));
    }

    #[test]
    fn test_child_before_parent() {
        let steps = vec![
            step("b", Some("a"), StepStatus::Running, 0.0),
            step("a", None, StepStatus::Running, 0.0),
        ];
        let roots = build_forest(&steps);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id(), "a");
        assert_eq!(roots[0].sub_steps[0].id(), "b");
    }

    #[test]
    fn test_unknown_parent_becomes_root() {
        let steps = vec![
            step("a", None, StepStatus::Completed, 1.0),
            step("orphan", Some("missing"), StepStatus::Completed, 1.0),
        ];
        let roots = build_forest(&steps);
        let ids: Vec<&str> = roots.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "orphan"]);
    }

    #[test]
    fn test_self_parent_is_root() {
        let roots = build_forest(&[step("a", Some("a"), StepStatus::Running, 0.0)]);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].sub_steps.is_empty());
    }

    #[test]
    fn test_cycle_keeps_every_step() {
        let steps = vec![
            step("a", Some("b"), StepStatus::Running, 0.0),
            step("b", Some("a"), StepStatus::Running, 0.0),
            step("c", None, StepStatus::Running, 0.0),
        ];
        let roots = build_forest(&steps);
        assert_eq!(count_nodes(&roots), 3);
        let ids: Vec<&str> = roots.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(roots[0].sub_steps[0].id(), "b");
    }

    #[test]
    fn test_cycle_cut_at_earliest_record() {
        // "x" hangs off the b -> c -> b cycle and is listed first.
        let steps = vec![
            step("x", Some("c"), StepStatus::Running, 0.0),
            step("root", None, StepStatus::Running, 0.0),
            step("b", Some("c"), StepStatus::Running, 0.0),
            step("c", Some("b"), StepStatus::Running, 0.0),
        ];
        let roots = build_forest(&steps);
        let ids: Vec<&str> = roots.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["root", "b"]);
        assert_eq!(roots[1].sub_steps[0].id(), "c");
        let under_c: Vec<&str> = roots[1].sub_steps[0].sub_steps.iter().map(|s| s.id()).collect();
        assert_eq!(under_c, vec!["x"]);
        assert_eq!(count_nodes(&roots), 4);
    }

    fn chain(len: usize) -> Vec<StepRecord> {
        (0..len)
            .map(|i| {
                let parent = (i > 0).then(|| format!("s{}", i - 1));
                step(&format!("s{}", i), parent.as_deref(), StepStatus::Completed, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_long_parent_chain_keeps_every_step() {
        let steps = chain(20_000);
        let roots = build_forest(&steps);

        assert_eq!(count_nodes(&roots), 20_000);
        assert_eq!(roots.len(), (20_000 + MAX_TREE_DEPTH - 1) / MAX_TREE_DEPTH);
        assert_eq!(roots[0].id(), "s0");
        assert_eq!(roots[1].id(), format!("s{}", MAX_TREE_DEPTH));

        let mut deepest = 0;
        walk(&roots, &mut |depth, _| deepest = deepest.max(depth));
        assert_eq!(deepest, MAX_TREE_DEPTH - 1);

        let summary = compute_summary(&steps);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.total_duration, 1.0);
        drop(roots);
    }

    #[test]
    fn test_deeply_nested_input_flattens() {
        let mut nested = step("n0", None, StepStatus::Running, 0.0);
        for i in 1..5_000 {
            let mut outer = step(&format!("n{}", i), None, StepStatus::Running, 0.0);
            outer.sub_steps = vec![nested];
            nested = outer;
        }
        let flat = flatten(std::slice::from_ref(&nested));
        assert_eq!(flat.len(), 5_000);
        assert_eq!(flat[0].id(), "n4999");
        assert_eq!(flat[1].parent_id.as_deref(), Some("n4999"));
        // Tear the input down by hand; the nested value is as deep as it was built.
        let mut stack = vec![nested];
        while let Some(mut s) = stack.pop() {
            stack.append(&mut s.sub_steps);
        }
    }

    #[test]
    fn test_token_totals_saturate() {
        let mut a = step("a", None, StepStatus::Completed, 1.0);
        a.tokens = Some(TokenUsage {
            input: u64::MAX,
            output: u64::MAX - 1,
        });
        let mut b = step("b", None, StepStatus::Completed, 1.0);
        b.tokens = Some(TokenUsage {
            input: u64::MAX,
            output: 5,
        });

        let summary = compute_summary(&[a, b]);
        assert_eq!(summary.total_input_tokens, u64::MAX);
        assert_eq!(summary.total_output_tokens, u64::MAX);
        assert_eq!(summary.completed_count, 2);
    }

    #[test]
    fn test_missing_ids_generated() {
        let steps = vec![
            StepRecord {
                label: "first".to_string(),
                ..Default::default()
            },
            StepRecord {
                step_id: Some(String::new()),
                label: "second".to_string(),
                ..Default::default()
            },
        ];
        let roots = build_forest(&steps);
        assert_eq!(roots.len(), 2);
        assert!(!roots[0].id().is_empty());
        assert!(!roots[1].id().is_empty());
        assert_ne!(roots[0].id(), roots[1].id());
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let steps = vec![
            step("a", None, StepStatus::Running, 0.0),
            step("b", None, StepStatus::Running, 0.0),
            step("a", None, StepStatus::Completed, 2.5),
        ];
        let roots = build_forest(&steps);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].id(), "a");
        assert_eq!(roots[0].status, StepStatus::Completed);
        assert_eq!(roots[0].duration, Some(2.5));
    }

    #[test]
    fn test_pre_nested_input_is_relinked_once() {
        let mut parent = step("a", None, StepStatus::Completed, 1.0);
        parent.sub_steps = vec![
            step("b", Some("a"), StepStatus::Completed, 0.3),
            // Nested without parent_id: inherits the container.
            step("c", None, StepStatus::Completed, 0.2),
        ];
        // The producer also re-sent "b" flat.
        let steps = vec![parent, step("b", Some("a"), StepStatus::Completed, 0.3)];

        let roots = build_forest(&steps);
        assert_eq!(roots.len(), 1);
        let kids: Vec<&str> = roots[0].sub_steps.iter().map(|s| s.id()).collect();
        assert_eq!(kids, vec!["b", "c"]);
        assert_eq!(count_nodes(&roots), 3);
    }

    #[test]
    fn test_deep_nesting() {
        let steps = vec![
            step("root", None, StepStatus::Completed, 3.0),
            step("mid", Some("root"), StepStatus::Completed, 2.0),
            step("leaf", Some("mid"), StepStatus::Failed, 1.0),
        ];
        let roots = build_forest(&steps);
        let mut seen = Vec::new();
        walk(&roots, &mut |depth, s| seen.push((depth, s.id().to_string())));
        assert_eq!(
            seen,
            vec![
                (0, "root".to_string()),
                (1, "mid".to_string()),
                (2, "leaf".to_string())
            ]
        );
    }

    #[test]
    fn test_marker_kept_in_forest_but_not_displayed() {
        let steps = vec![step("a", None, StepStatus::Completed, 1.0), marker(9.9, 100, 50)];
        let roots = build_forest(&steps);
        assert_eq!(roots.len(), 2);
        let shown = display_roots(&roots);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id(), "a");
    }

    #[test]
    fn test_summary_excludes_sub_steps() {
        let steps = vec![
            step("a", None, StepStatus::Completed, 1.0),
            step("b", Some("a"), StepStatus::Completed, 0.5),
        ];
        let summary = compute_summary(&steps);
        assert_eq!(summary.total_duration, 1.0);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.failed_count, 0);
    }

    #[test]
    fn test_summary_uses_marker_totals() {
        let mut a = step("a", None, StepStatus::Completed, 1.0);
        a.tokens = Some(TokenUsage { input: 7, output: 3 });
        let steps = vec![a, step("b", Some("a"), StepStatus::Completed, 0.5), marker(9.9, 100, 50)];

        let summary = compute_summary(&steps);
        assert_eq!(summary.total_duration, 9.9);
        assert_eq!(summary.total_input_tokens, 100);
        assert_eq!(summary.total_output_tokens, 50);
        assert_eq!(summary.completed_count, 1);
    }

    #[test]
    fn test_running_marker_is_an_ordinary_step() {
        let mut pending = marker(9.9, 100, 50);
        pending.status = StepStatus::Running;
        pending.duration = None;
        pending.tokens = None;
        let steps = vec![step("a", None, StepStatus::Completed, 1.0), pending];

        let summary = compute_summary(&steps);
        assert_eq!(summary.total_duration, 1.0);
        assert_eq!(summary.running_count, 1);
    }

    #[test]
    fn test_summary_sums_tokens_over_roots() {
        let mut a = step("a", None, StepStatus::Completed, 1.25);
        a.tokens = Some(TokenUsage { input: 10, output: 4 });
        let mut b = step("b", Some("a"), StepStatus::Completed, 1.0);
        b.tokens = Some(TokenUsage { input: 10, output: 4 });
        let mut c = step("c", None, StepStatus::Failed, 0.75);
        c.tokens = Some(TokenUsage { input: 5, output: 0 });

        let summary = compute_summary(&[a, b, c]);
        assert_eq!(summary.total_duration, 2.0);
        assert_eq!(summary.total_input_tokens, 15);
        assert_eq!(summary.total_output_tokens, 4);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.failed_count, 1);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(compute_summary(&[]), StepSummary::default());
        assert!(build_forest(&[]).is_empty());
    }

    #[test]
    fn test_label_for_falls_back_to_type() {
        let empty = Locale {
            steps: HashMap::new(),
            ..Locale::english()
        };
        assert_eq!(label_for("unknown_step_type", &empty), "unknown_step_type");
        assert_eq!(label_for("retrieval", &Locale::english()), "Searching documents");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::json!({
            "step_id": "s1",
            "label": "Retrieve",
            "step_type": "retrieval",
            "status": "completed",
            "parent_id": null,
            "duration": 0.42,
            "tokens": {"input": 12, "output": 3},
            "sub_steps": null
        });
        let record: StepRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id(), "s1");
        assert_eq!(record.status, StepStatus::Completed);
        assert_eq!(record.tokens, Some(TokenUsage { input: 12, output: 3 }));
        assert!(record.sub_steps.is_empty());

        let bad = serde_json::json!({"label": "x", "status": "paused"});
        assert!(serde_json::from_value::<StepRecord>(bad).is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!StepStatus::Running.is_terminal());
        assert!(StepStatus::Completed.is_terminal());
        assert!(StepStatus::Failed.is_terminal());
    }
}
