#![allow(dead_code)]

use ndarray::{Array1, ArrayView2};
use student_performance_analyzer::error::ModelError;
use student_performance_analyzer::features::ProfileForm;
use student_performance_analyzer::model::{ModelRegistry, Regressor};
use student_performance_analyzer::ReportRequest;

/// Predicts the same score for every row.
pub struct FixedScore(pub f64);

impl Regressor for FixedScore {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        Ok(Array1::from_elem(rows.nrows(), self.0))
    }
}

/// Always fails, to prove there is no fallback to the other model.
pub struct Broken;

impl Regressor for Broken {
    fn predict(&self, _rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        Err(ModelError::EmptyOutput)
    }
}

pub fn fixed_registry(random_forest: f64, xgboost: f64) -> ModelRegistry {
    ModelRegistry::from_regressors(
        Box::new(FixedScore(random_forest)),
        Box::new(FixedScore(xgboost)),
    )
}

pub fn default_form() -> ProfileForm {
    ProfileForm {
        gender: "Male".to_string(),
        age: 20,
        department: "Engineering".to_string(),
        attendance: 85.0,
        midterm: 75.0,
        final_score: 80.0,
        assignments: 70.0,
        quizzes: 80.0,
        participation: 78.0,
        projects: 90.0,
        grade: "A".to_string(),
        study_hours: 10.0,
        extracurricular: "Yes".to_string(),
        internet: "Yes".to_string(),
        parent_education: "Bachelor's".to_string(),
        family_income: "Medium".to_string(),
        stress: 5.0,
        sleep: 8.0,
    }
}

pub fn request(model: &str, profile: ProfileForm) -> ReportRequest {
    ReportRequest {
        model: model.to_string(),
        profile,
    }
}

pub const STUMP_FOREST: &str = r#"{
    "n_features": 18,
    "aggregation": "mean",
    "split_rule": "le",
    "trees": [
        {
            "split_indices": [3, 0, 0],
            "split_conditions": [75.0, 0.0, 0.0],
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "values": [0.0, 50.0, 90.0]
        }
    ]
}"#;

/// Two-tree booster in the layout of XGBoost's `save_model("*.json")`:
/// attendance < 75 → -10 else +5, stress < 7.5 → +2 else -3, base score 65.
pub const XGBOOST_NATIVE: &str = r#"{
    "learner": {
        "attributes": {},
        "feature_names": [],
        "feature_types": [],
        "gradient_booster": {
            "model": {
                "gbtree_model_param": {"num_parallel_tree": "1", "num_trees": "2"},
                "iteration_indptr": [0, 1, 2],
                "tree_info": [0, 0],
                "trees": [
                    {
                        "base_weights": [-1.5E0, -1E1, 5E0],
                        "categories": [],
                        "categories_nodes": [],
                        "categories_segments": [],
                        "categories_sizes": [],
                        "default_left": [1, 0, 0],
                        "id": 0,
                        "left_children": [1, -1, -1],
                        "loss_changes": [8.4E2, 0E0, 0E0],
                        "parents": [2147483647, 0, 0],
                        "right_children": [2, -1, -1],
                        "split_conditions": [7.5E1, -1E1, 5E0],
                        "split_indices": [3, 0, 0],
                        "split_type": [0, 0, 0],
                        "sum_hessian": [4E1, 1.6E1, 2.4E1],
                        "tree_param": {"num_deleted": "0", "num_feature": "18", "num_nodes": "3", "size_leaf_vector": "1"}
                    },
                    {
                        "base_weights": [4E-1, 2E0, -3E0],
                        "categories": [],
                        "categories_nodes": [],
                        "categories_segments": [],
                        "categories_sizes": [],
                        "default_left": [0, 0, 0],
                        "id": 1,
                        "left_children": [1, -1, -1],
                        "loss_changes": [2.1E2, 0E0, 0E0],
                        "parents": [2147483647, 0, 0],
                        "right_children": [2, -1, -1],
                        "split_conditions": [7.5E0, 2E0, -3E0],
                        "split_indices": [16, 0, 0],
                        "split_type": [0, 0, 0],
                        "sum_hessian": [4E1, 2.8E1, 1.2E1],
                        "tree_param": {"num_deleted": "0", "num_feature": "18", "num_nodes": "3", "size_leaf_vector": "1"}
                    }
                ]
            },
            "name": "gbtree"
        },
        "learner_model_param": {
            "base_score": "[6.5E1]",
            "boost_from_average": "1",
            "num_class": "0",
            "num_feature": "18",
            "num_target": "1"
        },
        "objective": {"name": "reg:squarederror", "reg_loss_param": {"scale_pos_weight": "1"}}
    },
    "version": [3, 0, 0]
}"#;
