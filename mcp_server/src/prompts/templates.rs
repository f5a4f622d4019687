//! Prompt template text. `{key}` placeholders are filled by `render`.

pub(crate) const EXPLORE_FILE: &str = r#"
You are an expert Kubernetes configuration analyzer. Your task is to review YAML configurations for Kubernetes resources, identify misconfigurations, and provide fixes. You should ensure your responses are structured and actionable.

Load the given kubernetes .yaml or .yml file from the following path:

<full_file_path>
{full_file_path}
</full_file_path>


You have access to the following tools for your analysis:
1. read_k8s_yaml: Use this to load the kubernetes .yaml or .yml file.

Please follow these steps carefully:

1. Load the kubernetes .yaml or .yml file using the get_files_in_directory tool.

2. Analyze the provided Kubernetes configuration for misconfigurations and security issues. Specifically check for:
    - Missing required fields
    - Incorrect syntax, indentation, label or metadata
    - Invalid API versions
    - Security best practices violations (e.g., running as root, privileged containers)
    - Resource constraints missing
    - Network policy issues
    - Pod security context problems
    - Deprecated API usage

Remember to prioritize stability and manageability in your review. If at any point you encounter potential issues with file, adjust your approach accordingly.

Please begin your analysis by loading the kubernetes .yaml or .yml file file and providing an initial exploration of the file.
"#;

pub(crate) const EXPLORE_FOLDER: &str = r#"
You are an expert Kubernetes configuration analyzer. Your task is to review YAML configurations for Kubernetes resources, identify misconfigurations, and provide fixes. You should ensure your responses are structured and actionable.

Go through the folder at the directory:

<folder_path>
{folder_path}
</folder_path>


You have access to the following tools for your analysis:
1. get_files_in_directory: Use this to load each of the kubernetes .yaml or .yml file.

Please follow these steps carefully:

1. Load each kubernetes .yaml or .yml file using the get_files_in_directory tool.

2. For each file, analyze the provided Kubernetes configuration for misconfigurations and security issues. Specifically check for:
    - Missing required fields
    - Incorrect syntax, indentation, label or metadata
    - Invalid API versions
    - Security best practices violations (e.g., running as root, privileged containers)
    - Resource constraints missing
    - Network policy issues
    - Pod security context problems
    - Deprecated API usage

3. If you find any misconfiguration or errors in a file, mention the file name with the error

Remember to prioritize stability and manageability in your review. If at any point you encounter potential issues with file, adjust your approach accordingly.

Please begin your analysis by loading the kubernetes .yaml or .yml file file and providing an initial exploration of the file.
"#;

pub(crate) const GET_PODS: &str = r#"
Retrieve the list of pods for the given <namespace>{namespace}</namespace>.
"#;

pub(crate) const DELETE_POD: &str = r#"
Delete the pod with the given <name>{name}</name> and <namespace>{namespace}</namespace>.
"#;

pub(crate) const DELETE_PODS: &str = r#"
Delete all pods in the given <namespace>{namespace}</namespace>.
"#;

/// Fill `{key}` placeholders in one pass. Substituted values are not
/// rescanned, and unknown placeholders are left as written.
pub(crate) fn fill<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
