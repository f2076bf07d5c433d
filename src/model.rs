use crate::error::{ModelError, ReportError};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::xgboost::XgbModelFile;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which of the two trained models scores a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelKind {
    RandomForest,
    #[serde(rename = "XGBoost")]
    XgBoost,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::RandomForest, ModelKind::XgBoost];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::RandomForest => "RandomForest",
            ModelKind::XgBoost => "XGBoost",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "RandomForest" | "Random Forest" => Ok(ModelKind::RandomForest),
            "XGBoost" => Ok(ModelKind::XgBoost),
            other => Err(ReportError::UnknownModel(other.to_string())),
        }
    }
}

/// A pre-trained regressor: one prediction per input row.
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError>;
}

/// How tree outputs combine into one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Random forests average their trees.
    Mean,
    /// Boosted ensembles add every tree to the base score.
    Sum,
}

/// Comparison used at split nodes to send a value left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitRule {
    /// `x < threshold` (XGBoost).
    Lt,
    /// `x <= threshold` (scikit-learn).
    Le,
}

/// One regression tree stored as parallel node arrays.
///
/// Node 0 is the root. A node whose left child is `-1` is a leaf and
/// predicts `values[node]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub split_indices: Vec<usize>,
    pub split_conditions: Vec<f64>,
    pub left_children: Vec<i64>,
    pub right_children: Vec<i64>,
    #[serde(default)]
    pub default_left: Vec<bool>,
    pub values: Vec<f64>,
}

impl RegressionTree {
    fn node_count(&self) -> usize {
        self.values.len()
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        let lengths = [
            self.split_indices.len(),
            self.split_conditions.len(),
            self.left_children.len(),
            self.right_children.len(),
        ];
        if lengths.iter().any(|&len| len != nodes) {
            return Err(format!("node arrays disagree in length (expected {nodes})"));
        }
        if !self.default_left.is_empty() && self.default_left.len() != nodes {
            return Err(format!("default_left has {} entries for {nodes} nodes", self.default_left.len()));
        }

        for node in 0..nodes {
            let left = self.left_children[node];
            if left == -1 {
                continue;
            }
            let right = self.right_children[node];
            for child in [left, right] {
                // Children after their parent keeps every walk finite.
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            if self.split_indices[node] >= n_features {
                return Err(format!(
                    "node {node} splits on feature {} of {n_features}",
                    self.split_indices[node]
                ));
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>, rule: SplitRule, f32_features: bool) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.left_children[node];
            if left == -1 {
                return self.values[node];
            }
            let mut value = row[self.split_indices[node]];
            if f32_features {
                value = f64::from(value as f32);
            }
            let threshold = self.split_conditions[node];
            let go_left = if value.is_nan() {
                self.default_left.get(node).copied().unwrap_or(true)
            } else {
                match rule {
                    SplitRule::Lt => value < threshold,
                    SplitRule::Le => value <= threshold,
                }
            };
            node = if go_left {
                left as usize
            } else {
                self.right_children[node] as usize
            };
        }
    }
}

/// Tree-ensemble regressor exported from the training environment as JSON.
///
/// Two files are accepted. XGBoost's own `save_model("*.json")` document is
/// recognised by its `learner` key and converted by [`crate::xgboost`].
/// Anything else is read as this struct directly, which is how a
/// scikit-learn `RandomForestRegressor` is shipped. Per fitted estimator,
/// `est.tree_` maps onto one [`RegressionTree`]:
///
/// | field              | from `tree_`                        |
/// |--------------------|-------------------------------------|
/// | `split_indices`    | `feature`, with leaf `-2` set to `0` |
/// | `split_conditions` | `threshold`                         |
/// | `left_children`    | `children_left`                     |
/// | `right_children`   | `children_right`                    |
/// | `values`           | `value[:, 0, 0]`                    |
///
/// with `n_features = n_features_in_`, `aggregation = "mean"`,
/// `split_rule = "le"`, `base_score = 0` and `f32_features = true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub split_rule: SplitRule,
    /// Round inputs to `f32` before comparing, as both XGBoost and
    /// scikit-learn do at prediction time.
    #[serde(default)]
    pub f32_features: bool,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    /// Reads and validates an export. Any failure makes the model unavailable.
    pub fn load(kind: ModelKind, path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Unavailable {
            model: kind.as_str(),
            path: path.to_path_buf(),
            source,
        })?;
        let malformed = |source| ModelError::Malformed {
            model: kind.as_str(),
            path: path.to_path_buf(),
            source,
        };
        let document: serde_json::Value = serde_json::from_str(&raw).map_err(malformed)?;
        let ensemble = if document.get("learner").is_some() {
            let file: XgbModelFile = serde_json::from_value(document).map_err(malformed)?;
            file.into_ensemble().map_err(|reason| ModelError::Invalid {
                model: kind.as_str(),
                reason,
            })?
        } else {
            serde_json::from_value::<TreeEnsemble>(document).map_err(malformed)?
        };
        ensemble.validate(kind)?;
        Ok(ensemble)
    }

    pub fn validate(&self, kind: ModelKind) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::Invalid {
            model: kind.as_str(),
            reason,
        };
        if self.n_features != FEATURE_COUNT {
            return Err(invalid(format!(
                "trained on {} features, the form produces {FEATURE_COUNT}",
                self.n_features
            )));
        }
        if self.trees.is_empty() {
            return Err(invalid("ensemble has no trees".to_string()));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|reason| invalid(format!("tree {index}: {reason}")))?;
        }
        Ok(())
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        if rows.ncols() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: rows.ncols(),
            });
        }

        let predictions = rows
            .rows()
            .into_iter()
            .map(|row| {
                let total: f64 = self
                    .trees
                    .iter()
                    .map(|tree| tree.predict_row(row, self.split_rule, self.f32_features))
                    .sum();
                match self.aggregation {
                    Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
                    Aggregation::Sum => self.base_score + total,
                }
            })
            .collect();
        Ok(predictions)
    }
}

/// Artifact locations for both models.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub random_forest: PathBuf,
    pub xgboost: PathBuf,
}

/// Summary of a loaded model for the info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model: ModelKind,
    pub path: PathBuf,
    pub trees: usize,
    pub aggregation: Aggregation,
}

struct LoadedModel {
    regressor: Box<dyn Regressor>,
    info: ModelInfo,
}

/// Both models, loaded once at startup and shared read-only across requests.
pub struct ModelRegistry {
    random_forest: LoadedModel,
    xgboost: LoadedModel,
}

impl ModelRegistry {
    /// Loads both artifacts. Either one missing is fatal.
    pub fn load(paths: &ModelPaths) -> Result<Self, ModelError> {
        let random_forest = Self::load_one(ModelKind::RandomForest, &paths.random_forest)?;
        let xgboost = Self::load_one(ModelKind::XgBoost, &paths.xgboost)?;
        Ok(ModelRegistry {
            random_forest,
            xgboost,
        })
    }

    fn load_one(kind: ModelKind, path: &Path) -> Result<LoadedModel, ModelError> {
        let ensemble = TreeEnsemble::load(kind, path)?;
        tracing::info!(
            model = %kind,
            path = %path.display(),
            trees = ensemble.tree_count(),
            "model loaded"
        );
        let info = ModelInfo {
            model: kind,
            path: path.to_path_buf(),
            trees: ensemble.tree_count(),
            aggregation: ensemble.aggregation,
        };
        Ok(LoadedModel {
            regressor: Box::new(ensemble),
            info,
        })
    }

    /// Builds a registry from already-constructed regressors.
    pub fn from_regressors(
        random_forest: Box<dyn Regressor>,
        xgboost: Box<dyn Regressor>,
    ) -> Self {
        let info = |model: ModelKind| ModelInfo {
            model,
            path: PathBuf::new(),
            trees: 0,
            aggregation: match model {
                ModelKind::RandomForest => Aggregation::Mean,
                ModelKind::XgBoost => Aggregation::Sum,
            },
        };
        ModelRegistry {
            random_forest: LoadedModel {
                regressor: random_forest,
                info: info(ModelKind::RandomForest),
            },
            xgboost: LoadedModel {
                regressor: xgboost,
                info: info(ModelKind::XgBoost),
            },
        }
    }

    fn slot(&self, kind: ModelKind) -> &LoadedModel {
        match kind {
            ModelKind::RandomForest => &self.random_forest,
            ModelKind::XgBoost => &self.xgboost,
        }
    }

    pub fn regressor(&self, kind: ModelKind) -> &dyn Regressor {
        self.slot(kind).regressor.as_ref()
    }

    pub fn info(&self) -> Vec<ModelInfo> {
        ModelKind::ALL
            .iter()
            .map(|&kind| self.slot(kind).info.clone())
            .collect()
    }

    /// Scores one feature vector with exactly the selected model.
    pub fn predict(&self, kind: ModelKind, features: &FeatureVector) -> Result<f64, ModelError> {
        let row = features.to_row();
        let predictions = self.regressor(kind).predict(row.view())?;
        predictions.get(0).copied().ok_or(ModelError::EmptyOutput)
    }
}
