//! Reader for the JSON document XGBoost writes with `Booster.save_model("*.json")`.
//!
//! Only the parts needed for inference are read: the gbtree node arrays,
//! `learner_model_param.base_score` and the objective name. Leaf outputs live
//! in `split_conditions` at nodes whose left child is `-1`.

use crate::model::{Aggregation, RegressionTree, SplitRule, TreeEnsemble};
use serde::Deserialize;

/// Objectives whose raw margin is already the predicted value.
const IDENTITY_OBJECTIVES: &[&str] = &[
    "reg:squarederror",
    "reg:linear",
    "reg:absoluteerror",
    "reg:pseudohubererror",
    "reg:quantileerror",
];

/// Top level of an XGBoost model file.
#[derive(Debug, Deserialize)]
pub struct XgbModelFile {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    gradient_booster: GradientBooster,
    learner_model_param: LearnerModelParam,
    objective: Objective,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    name: String,
    #[serde(default)]
    model: Option<GbTreeModel>,
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    #[serde(default)]
    trees: Vec<XgbTree>,
}

// XGBoost writes every scalar here as a string.
#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    num_feature: String,
    #[serde(default)]
    num_target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

#[derive(Debug, Deserialize)]
struct XgbTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<usize>,
    split_conditions: Vec<f64>,
    #[serde(default)]
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<u8>,
}

/// `default_left` is `0`/`1` in current releases and `true`/`false` in older ones.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(flag) => flag,
            Flag::Int(flag) => flag != 0,
        }
    }
}

impl XgbModelFile {
    /// Converts the booster into a summing ensemble. Anything this crate
    /// cannot evaluate faithfully is refused with a reason.
    pub fn into_ensemble(self) -> Result<TreeEnsemble, String> {
        let Learner {
            gradient_booster,
            learner_model_param: params,
            objective,
        } = self.learner;

        if gradient_booster.name != "gbtree" {
            return Err(format!(
                "booster '{}' is not supported, expected gbtree",
                gradient_booster.name
            ));
        }
        if !IDENTITY_OBJECTIVES.contains(&objective.name.as_str()) {
            return Err(format!(
                "objective '{}' does not predict raw scores",
                objective.name
            ));
        }

        let n_features = params
            .num_feature
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("num_feature '{}' is not a count", params.num_feature))?;
        if let Some(raw) = &params.num_target {
            let targets = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("num_target '{raw}' is not a count"))?;
            if targets > 1 {
                return Err(format!("model has {targets} targets, expected one"));
            }
        }
        let base_score = parse_base_score(&params.base_score)?;

        let model = gradient_booster
            .model
            .ok_or_else(|| "gbtree booster carries no trees".to_string())?;
        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, tree)| tree.into_tree().map_err(|reason| format!("tree {index}: {reason}")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TreeEnsemble {
            n_features,
            aggregation: Aggregation::Sum,
            base_score,
            split_rule: SplitRule::Lt,
            f32_features: true,
            trees,
        })
    }
}

impl XgbTree {
    fn into_tree(self) -> Result<RegressionTree, String> {
        if let Some(node) = self.split_type.iter().position(|&kind| kind != 0) {
            return Err(format!("node {node} uses a categorical split"));
        }

        // Conditions are f32 in the booster; the text form is the shortest round-trip.
        let split_conditions: Vec<f64> = self
            .split_conditions
            .iter()
            .map(|&condition| f64::from(condition as f32))
            .collect();
        let values = self
            .left_children
            .iter()
            .zip(&split_conditions)
            .map(|(&left, &condition)| if left == -1 { condition } else { 0.0 })
            .collect();

        Ok(RegressionTree {
            split_indices: self.split_indices,
            split_conditions,
            left_children: self.left_children,
            right_children: self.right_children,
            default_left: self.default_left.into_iter().map(Flag::is_set).collect(),
            values,
        })
    }
}

/// Accepts `"6.85E1"` (2.x) and the bracketed `"[6.85E1]"` (3.x) forms.
fn parse_base_score(raw: &str) -> Result<f64, String> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let mut parts = inner.split(',').map(str::trim);
    match (parts.next(), parts.next()) {
        (Some(value), None) => value
            .parse::<f64>()
            .map_err(|_| format!("base_score '{raw}' is not a number")),
        _ => Err(format!("base_score '{raw}' holds more than one value")),
    }
}
