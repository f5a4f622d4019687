//! MCP prompts: named templates rendered into a single user message.

mod templates;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use k8s_shared_types::ToolProfile;
use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};
use serde_json::{json, Value};

use crate::error::DispatchError;

/// Declared argument of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Flag published by discovery.
    pub required: bool,
}

const FULL_FILE_PATH: PromptArgumentSpec = PromptArgumentSpec {
    name: "full_file_path",
    description: "The path to the k8 file",
    required: false,
};

const FOLDER_PATH: PromptArgumentSpec = PromptArgumentSpec {
    name: "folder_path",
    description: "The path to the k8 folder",
    required: true,
};

const NAMESPACE: PromptArgumentSpec = PromptArgumentSpec {
    name: "namespace",
    description: "The Kubernetes namespace",
    required: true,
};

const POD_NAME: PromptArgumentSpec = PromptArgumentSpec {
    name: "name",
    description: "The name of the pod",
    required: true,
};

/// The closed set of prompt names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptName {
    GetFile,
    ListFolder,
    GetPods,
    DeletePod,
    DeletePods,
}

impl PromptName {
    /// Every prompt, in discovery order.
    pub const ALL: [PromptName; 5] = [
        PromptName::GetFile,
        PromptName::ListFolder,
        PromptName::GetPods,
        PromptName::DeletePod,
        PromptName::DeletePods,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptName::GetFile => "get-file",
            PromptName::ListFolder => "list-folder",
            PromptName::GetPods => "get-pods",
            PromptName::DeletePod => "delete-pod",
            PromptName::DeletePods => "delete-pods",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PromptName::GetFile => "A prompt to explore a k8s file as a devops engineer",
            PromptName::ListFolder => "A prompt to explore a k8s folder as a devops engineer",
            PromptName::GetPods => "A prompt to list the pods in a k8s namespace",
            PromptName::DeletePod => "A prompt to delete a pod in a k8s namespace",
            PromptName::DeletePods => "A prompt to delete every pod in a k8s namespace",
        }
    }

    /// Declared arguments, in the order the template substitutes them.
    pub fn arguments(&self) -> &'static [PromptArgumentSpec] {
        match self {
            PromptName::GetFile => &[FULL_FILE_PATH],
            PromptName::ListFolder => &[FOLDER_PATH],
            PromptName::GetPods | PromptName::DeletePods => &[NAMESPACE],
            PromptName::DeletePod => &[POD_NAME, NAMESPACE],
        }
    }

    fn template(&self) -> &'static str {
        match self {
            PromptName::GetFile => templates::EXPLORE_FILE,
            PromptName::ListFolder => templates::EXPLORE_FOLDER,
            PromptName::GetPods => templates::GET_PODS,
            PromptName::DeletePod => templates::DELETE_POD,
            PromptName::DeletePods => templates::DELETE_PODS,
        }
    }

    fn result_description(&self) -> &'static str {
        match self {
            PromptName::GetFile => "Kubernetes configuration exploration template for {full_file_path}",
            PromptName::ListFolder => "Kubernetes configuration exploration template for {folder_path}",
            PromptName::GetPods => "Retrieving pods in the namespace: {namespace}",
            PromptName::DeletePod => "Delete pod with the given name: {name}",
            PromptName::DeletePods => "Delete pods in the given namespace: {namespace}",
        }
    }

    /// Whether the prompt drives cluster tools.
    pub fn requires_cluster(&self) -> bool {
        matches!(
            self,
            PromptName::GetPods | PromptName::DeletePod | PromptName::DeletePods
        )
    }

    /// Whether the prompt is registered under `profile`.
    pub fn is_available(&self, profile: ToolProfile) -> bool {
        !self.requires_cluster() || profile.needs_cluster()
    }

    /// Render the prompt.
    ///
    /// Every argument the template uses must be present, whatever its declared
    /// `required` flag. Values are substituted verbatim.
    pub fn render(
        &self,
        arguments: Option<&HashMap<String, String>>,
    ) -> Result<GetPromptResult, DispatchError> {
        let empty = HashMap::new();
        let arguments = arguments.unwrap_or(&empty);

        if let Some(missing) = self
            .arguments()
            .iter()
            .find(|arg| !arguments.contains_key(arg.name))
        {
            return Err(DispatchError::MissingArgument(missing.name.to_string()));
        }

        let lookup = |key: &str| {
            self.arguments()
                .iter()
                .any(|arg| arg.name == key)
                .then(|| arguments.get(key).map(String::as_str))
                .flatten()
        };
        let text = templates::fill(self.template(), lookup);
        let description = templates::fill(self.result_description(), lookup);

        Ok(GetPromptResult {
            description: Some(description),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                text.trim().to_string(),
            )],
        })
    }

    /// Discovery entry for `prompts/list`.
    pub fn to_listing(&self) -> Value {
        let arguments: Vec<Value> = self
            .arguments()
            .iter()
            .map(|arg| {
                json!({
                    "name": arg.name,
                    "description": arg.description,
                    "required": arg.required
                })
            })
            .collect();
        json!({
            "name": self.as_str(),
            "description": self.description(),
            "arguments": arguments
        })
    }
}

impl fmt::Display for PromptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptName {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptName::ALL
            .into_iter()
            .find(|prompt| prompt.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownPrompt(s.to_string()))
    }
}

/// Prompts registered under `profile`, in discovery order.
pub fn prompts_for_profile(profile: ToolProfile) -> Vec<PromptName> {
    PromptName::ALL
        .into_iter()
        .filter(|prompt| prompt.is_available(profile))
        .collect()
}
