//! Deployment service descriptors.
//!
//! The orchestration layer describes how a VM was deployed with a model name
//! and a list of attributes. The model decides which provenance field, if
//! any, leads the instance data.

use crate::details::VmDataField;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const CLONE_FROM_VM_MODEL: &str = "vCenter Clone VM From VM";
pub const LINKED_CLONE_MODEL: &str = "VCenter Deploy VM From Linked Clone";
pub const FROM_IMAGE_MODEL: &str = "vCenter VM From Image";
pub const FROM_TEMPLATE_MODEL: &str = "vCenter VM From Template";

pub const VCENTER_VM_ATTRIBUTE: &str = "vCenter VM";
pub const VCENTER_IMAGE_ATTRIBUTE: &str = "vCenter Image";
pub const VCENTER_TEMPLATE_ATTRIBUTE: &str = "vCenter Template";

/// A named attribute of a deployment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentAttribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// The deployment service a VM was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentService {
    /// Deployment model name.
    pub model: String,
    #[serde(default)]
    pub attributes: Vec<DeploymentAttribute>,
}

impl DeploymentService {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(DeploymentAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Parse a deployment service from JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::deployment(e.to_string()))
    }

    /// Load a deployment service from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::deployment(format!("{}: {}", path.display(), e)))
    }

    /// Attributes keyed by name. A repeated name keeps its last value.
    pub fn attribute_map(&self) -> HashMap<&str, &str> {
        self.attributes
            .iter()
            .map(|attribute| (attribute.name.as_str(), attribute.value.as_str()))
            .collect()
    }

    /// The recognized deployment model, if any.
    pub fn deployment_model(&self) -> Option<DeploymentModel> {
        DeploymentModel::from_model_name(&self.model)
    }

    /// The field recording where the VM came from, for recognized models.
    pub fn provenance_field(&self) -> Option<VmDataField> {
        let model = self.deployment_model()?;
        let attributes = self.attribute_map();
        let value = attributes.get(model.source_attribute()).copied().unwrap_or("");

        let value = match model {
            DeploymentModel::FromTemplate => value.rsplit('/').next().unwrap_or(""),
            _ => value,
        };

        Some(VmDataField::new(model.field_label(), value))
    }
}

/// Deployment models with a provenance field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentModel {
    /// Full clone of an existing VM.
    CloneFromVm,
    /// Linked clone of an existing VM snapshot.
    LinkedClone,
    /// Deployed from an OVF/OVA image.
    FromImage,
    /// Deployed from a vCenter template.
    FromTemplate,
}

impl DeploymentModel {
    /// Match a model name exactly.
    pub fn from_model_name(model: &str) -> Option<Self> {
        match model {
            CLONE_FROM_VM_MODEL => Some(DeploymentModel::CloneFromVm),
            LINKED_CLONE_MODEL => Some(DeploymentModel::LinkedClone),
            FROM_IMAGE_MODEL => Some(DeploymentModel::FromImage),
            FROM_TEMPLATE_MODEL => Some(DeploymentModel::FromTemplate),
            _ => None,
        }
    }

    /// Label of the provenance field.
    pub fn field_label(&self) -> &'static str {
        match self {
            DeploymentModel::CloneFromVm | DeploymentModel::LinkedClone => "Cloned VM Name",
            DeploymentModel::FromImage => "Base Image Name",
            DeploymentModel::FromTemplate => "Template Name",
        }
    }

    /// Deployment attribute holding the provenance value.
    pub fn source_attribute(&self) -> &'static str {
        match self {
            DeploymentModel::CloneFromVm | DeploymentModel::LinkedClone => VCENTER_VM_ATTRIBUTE,
            DeploymentModel::FromImage => VCENTER_IMAGE_ATTRIBUTE,
            DeploymentModel::FromTemplate => VCENTER_TEMPLATE_ATTRIBUTE,
        }
    }
}
