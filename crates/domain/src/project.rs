use serde::{Deserialize, Serialize};

use crate::ProjectId;

wire_enum!(
    /// Project classifier.
    ProjectClassifier, "project classifier" {
        /// Application.
        Application => "APPLICATION",
        /// Framework.
        Framework => "FRAMEWORK",
        /// Library.
        Library => "LIBRARY",
        /// Container image.
        Container => "CONTAINER",
        /// Operating system.
        OperatingSystem => "OPERATING_SYSTEM",
        /// Hardware device.
        Device => "DEVICE",
        /// Firmware.
        Firmware => "FIRMWARE",
        /// Single file.
        File => "FILE",
        /// Platform.
        Platform => "PLATFORM",
        /// Device driver.
        DeviceDriver => "DEVICE_DRIVER",
        /// Machine learning model.
        MachineLearningModel => "MACHINE_LEARNING_MODEL",
        /// Data set.
        Data => "DATA",
    }
);

impl Default for ProjectClassifier {
    fn default() -> Self {
        Self::Application
    }
}

/// Project as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier.
    pub id: ProjectId,
    /// Desired attributes echoed by the server.
    pub attributes: ProjectInput,
}

/// Desired project attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    /// Project name.
    pub name: String,
    /// Optional version.
    pub version: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional namespace or group.
    pub group: Option<String>,
    /// Optional publisher.
    pub publisher: Option<String>,
    /// Optional author.
    pub author: Option<String>,
    /// Classifier.
    pub classifier: ProjectClassifier,
    /// Whether the project is active.
    pub active: bool,
    /// Optional CPE.
    pub cpe: Option<String>,
    /// Optional package URL.
    pub purl: Option<String>,
    /// Optional SWID tag identifier.
    pub swid_tag_id: Option<String>,
    /// Optional parent project.
    pub parent: Option<ProjectId>,
}
