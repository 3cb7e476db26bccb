use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::data::features::{FeatureSchema, FeatureVector, SchemaError};
use crate::data::model::FraudFlag;

// ---------------------------------------------------------------------------
// Classifier capability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("row {row}: expected {expected} features, got {got}")]
    Shape { row: usize, expected: usize, got: usize },
    #[error("classifier returned {got} labels for {expected} rows")]
    LabelCount { expected: usize, got: usize },
}

/// A trained binary fraud classifier.
///
/// Implementations receive vectors built with their own [`schema`](Self::schema)
/// and return one flag per vector.
pub trait Classifier {
    fn schema(&self) -> &FeatureSchema;

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<FraudFlag>, ClassifierError>;
}

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// On-disk model file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Column order the model was trained on; defaults to the standard layout.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    DecisionTree { nodes: Vec<TreeNode> },
    Logistic {
        bias: f64,
        weights: Vec<f64>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

fn default_threshold() -> f64 {
    0.5
}

/// Flattened tree node. Splits go left when `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("decision tree has no nodes")]
    EmptyTree,
    #[error("node {node}: feature index {feature} out of range (schema has {width} columns)")]
    FeatureOutOfRange { node: usize, feature: usize, width: usize },
    #[error("node {node}: child {child} must come after its parent and exist")]
    BadChild { node: usize, child: usize },
    #[error("node {node}: leaf class {class} is not 0 or 1")]
    BadClass { node: usize, class: u8 },
    #[error("logistic model has {got} weights but schema has {expected} columns")]
    WeightCount { expected: usize, got: usize },
}

/// A validated model ready for inference.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    schema: FeatureSchema,
    kind: ModelKind,
}

#[derive(Debug, Clone)]
enum ModelKind {
    Tree(Vec<TreeNode>),
    Logistic { bias: f64, weights: Vec<f64>, threshold: f64 },
}

impl LoadedModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let schema = match &artifact.feature_names {
            Some(names) => FeatureSchema::from_names(names.as_slice())?,
            None => FeatureSchema::default(),
        };
        let width = schema.len();

        let kind = match artifact.model {
            ModelSpec::DecisionTree { nodes } => {
                check_tree(&nodes, width)?;
                ModelKind::Tree(nodes)
            }
            ModelSpec::Logistic {
                bias,
                weights,
                threshold,
            } => {
                if weights.len() != width {
                    return Err(ModelError::WeightCount {
                        expected: width,
                        got: weights.len(),
                    });
                }
                ModelKind::Logistic {
                    bias,
                    weights,
                    threshold,
                }
            }
        };
        Ok(Self { schema, kind })
    }

    fn predict_one(&self, x: &[f64]) -> FraudFlag {
        match &self.kind {
            ModelKind::Tree(nodes) => {
                let mut i = 0;
                loop {
                    match &nodes[i] {
                        TreeNode::Leaf { class } => {
                            return FraudFlag::from_label(*class).unwrap_or(FraudFlag::Legitimate)
                        }
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            i = if x[*feature] <= *threshold { *left } else { *right };
                        }
                    }
                }
            }
            ModelKind::Logistic {
                bias,
                weights,
                threshold,
            } => {
                let z = bias + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
                let p = 1.0 / (1.0 + (-z).exp());
                if p >= *threshold {
                    FraudFlag::Suspicious
                } else {
                    FraudFlag::Legitimate
                }
            }
        }
    }
}

/// Children must point strictly forward, so every walk terminates at a leaf.
fn check_tree(nodes: &[TreeNode], width: usize) -> Result<(), ModelError> {
    if nodes.is_empty() {
        return Err(ModelError::EmptyTree);
    }
    for (node, n) in nodes.iter().enumerate() {
        match *n {
            TreeNode::Leaf { class } => {
                if FraudFlag::from_label(class).is_none() {
                    return Err(ModelError::BadClass { node, class });
                }
            }
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => {
                if feature >= width {
                    return Err(ModelError::FeatureOutOfRange {
                        node,
                        feature,
                        width,
                    });
                }
                for child in [left, right] {
                    if child <= node || child >= nodes.len() {
                        return Err(ModelError::BadChild { node, child });
                    }
                }
            }
        }
    }
    Ok(())
}

impl Classifier for LoadedModel {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<FraudFlag>, ClassifierError> {
        let expected = self.schema.len();
        rows.iter()
            .enumerate()
            .map(|(row, v)| {
                if v.len() != expected {
                    return Err(ClassifierError::Shape {
                        row,
                        expected,
                        got: v.len(),
                    });
                }
                Ok(self.predict_one(&v.values))
            })
            .collect()
    }
}

/// Read and validate a model artifact from disk.
pub fn load_model(path: &Path) -> anyhow::Result<LoadedModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading model file {}", path.display()))?;
    let artifact: ModelArtifact = serde_json::from_str(&text).context("parsing model JSON")?;
    let model = LoadedModel::from_artifact(artifact).context("validating model")?;
    log::info!(
        "Loaded model from {} ({} features)",
        path.display(),
        model.schema().len()
    );
    Ok(model)
}
