/*!

Decoding of the untyped provider state parameters into the request structs the state handlers
work with. The consumer fixtures nest their values under a `params` object:

```json
{ "params": { "appName": "myapp", "namespace": "default" } }
{ "params": { "components": [ { "app": { "appName": "myapp", "namespace": "default" },
                                "repo": "https://github.com/...", "compName": "nodejs" } ] } }
```

Every field is required and must be non-empty; nothing is defaulted.

!*/

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{ensure, OptionExt, ResultExt, Snafu};
use std::fmt::{Display, Formatter};

/// The key under which consumer fixtures nest their parameters.
pub const PARAMS_KEY: &str = "params";

/// A named precondition requested by the contract verifier, along with its parameters.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ProviderState {
    pub name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl ProviderState {
    pub fn new<S: Into<String>>(name: S, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// The error returned when provider state parameters do not have the expected shape.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecodeError {
    #[snafu(display("the parameters do not contain a '{}' object", PARAMS_KEY))]
    MissingParams,

    #[snafu(display("malformed parameters at '{}': {}", path, source))]
    Malformed {
        path: String,
        source: serde_json::Error,
    },

    #[snafu(display("'{}' must not be empty", path))]
    EmptyField { path: String },

    #[snafu(display("'{}.components' must contain at least one component", PARAMS_KEY))]
    NoComponents,
}

/// Identifies one `Application`.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct AppParams {
    pub app_name: String,
    pub namespace: String,
}

impl AppParams {
    fn validate(&self, path: &str) -> Result<(), DecodeError> {
        non_empty(&self.app_name, path, "appName")?;
        non_empty(&self.namespace, path, "namespace")
    }
}

impl Display for AppParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.app_name)
    }
}

/// One component to create for the application referenced by `app`.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct ComponentParams {
    pub app: AppParams,
    #[serde(rename = "repo")]
    pub repository_url: String,
    #[serde(rename = "compName")]
    pub component_name: String,
}

impl ComponentParams {
    fn validate(&self, path: &str) -> Result<(), DecodeError> {
        self.app.validate(&format!("{}.app", path))?;
        non_empty(&self.repository_url, path, "repo")?;
        non_empty(&self.component_name, path, "compName")
    }
}

#[derive(Deserialize)]
struct ComponentsPayload {
    components: Vec<Value>,
}

/// A component entry whose `app` is decoded separately so that its errors carry the nested path.
#[derive(Deserialize)]
struct ComponentEntry {
    app: Value,
    repo: String,
    #[serde(rename = "compName")]
    comp_name: String,
}

/// Deserialize `value`, naming `path` in the error if its shape is wrong.
fn decode_at<T: DeserializeOwned>(value: Value, path: &str) -> Result<T, DecodeError> {
    serde_json::from_value(value).context(MalformedSnafu { path })
}

fn decode_component(value: Value, path: &str) -> Result<ComponentParams, DecodeError> {
    let entry: ComponentEntry = decode_at(value, path)?;
    let component = ComponentParams {
        app: decode_at(entry.app, &format!("{}.app", path))?,
        repository_url: entry.repo,
        component_name: entry.comp_name,
    };
    component.validate(path)?;
    Ok(component)
}

fn non_empty(value: &str, path: &str, field: &str) -> Result<(), DecodeError> {
    ensure!(
        !value.is_empty(),
        EmptyFieldSnafu {
            path: format!("{}.{}", path, field)
        }
    );
    Ok(())
}

fn params_object(parameters: &Map<String, Value>) -> Result<&Value, DecodeError> {
    parameters
        .get(PARAMS_KEY)
        .filter(|value| value.is_object())
        .context(MissingParamsSnafu)
}

/// Decode the `AppParams` used by the application states.
pub fn decode_app_params(parameters: &Map<String, Value>) -> Result<AppParams, DecodeError> {
    let app: AppParams = decode_at(params_object(parameters)?.clone(), PARAMS_KEY)?;
    app.validate(PARAMS_KEY)?;
    Ok(app)
}

/// Decode the ordered list of components used by the "has components" state.
pub fn decode_component_params(
    parameters: &Map<String, Value>,
) -> Result<Vec<ComponentParams>, DecodeError> {
    let payload: ComponentsPayload = decode_at(params_object(parameters)?.clone(), PARAMS_KEY)?;
    ensure!(!payload.components.is_empty(), NoComponentsSnafu);
    payload
        .components
        .into_iter()
        .enumerate()
        .map(|(i, value)| decode_component(value, &format!("{}.components[{}]", PARAMS_KEY, i)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn parameters(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn app_params() {
        let params = parameters(json!({"params": {"appName": "myapp", "namespace": "default"}}));
        let app = decode_app_params(&params).unwrap();
        assert_eq!(app.app_name, "myapp");
        assert_eq!(app.namespace, "default");
        assert_eq!(app.to_string(), "default/myapp");
    }

    #[test]
    fn app_params_missing_namespace() {
        let params = parameters(json!({"params": {"appName": "myapp"}}));
        let err = decode_app_params(&params).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { ref path, .. } if path == "params"));
        assert!(err.to_string().contains("namespace"));
    }

    #[test]
    fn app_params_wrong_type() {
        let params = parameters(json!({"params": {"appName": 7, "namespace": "default"}}));
        assert!(matches!(
            decode_app_params(&params).unwrap_err(),
            DecodeError::Malformed { .. }
        ));
    }

    #[test]
    fn app_params_empty_name() {
        let params = parameters(json!({"params": {"appName": "", "namespace": "default"}}));
        let err = decode_app_params(&params).unwrap_err();
        assert_eq!(err.to_string(), "'params.appName' must not be empty");
    }

    #[test]
    fn missing_params_object() {
        let params = parameters(json!({"appName": "myapp", "namespace": "default"}));
        assert!(matches!(
            decode_app_params(&params).unwrap_err(),
            DecodeError::MissingParams
        ));
        let params = parameters(json!({"params": "myapp"}));
        assert!(matches!(
            decode_app_params(&params).unwrap_err(),
            DecodeError::MissingParams
        ));
    }

    #[test]
    fn component_params_keep_order() {
        let params = parameters(json!({"params": {"components": [
            {"app": {"appName": "myapp", "namespace": "default"},
             "repo": "https://github.com/devfile-samples/devfile-sample-nodejs", "compName": "nodejs"},
            {"app": {"appName": "myapp", "namespace": "default"},
             "repo": "https://github.com/devfile-samples/devfile-sample-java-springboot-basic",
             "compName": "java-springboot"}
        ]}}));
        let components = decode_component_params(&params).unwrap();
        let names: Vec<&str> = components
            .iter()
            .map(|c| c.component_name.as_str())
            .collect();
        assert_eq!(names, vec!["nodejs", "java-springboot"]);
        assert_eq!(
            components[1].repository_url,
            "https://github.com/devfile-samples/devfile-sample-java-springboot-basic"
        );
        assert_eq!(components[0].app.app_name, "myapp");
    }

    #[test]
    fn component_params_report_path_of_empty_field() {
        let params = parameters(json!({"params": {"components": [
            {"app": {"appName": "myapp", "namespace": "default"}, "repo": "r", "compName": "a"},
            {"app": {"appName": "myapp", "namespace": ""}, "repo": "r", "compName": "b"}
        ]}}));
        let err = decode_component_params(&params).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'params.components[1].app.namespace' must not be empty"
        );
    }

    #[test]
    fn component_params_report_path_of_missing_field() {
        let params = parameters(json!({"params": {"components": [
            {"app": {"appName": "myapp", "namespace": "default"}, "repo": "r", "compName": "a"},
            {"app": {"appName": "myapp"}, "repo": "r", "compName": "b"}
        ]}}));
        let err = decode_component_params(&params).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed { ref path, .. } if path == "params.components[1].app"
        ));
        let message = err.to_string();
        assert!(message.contains("params.components[1].app"));
        assert!(message.contains("namespace"));
    }

    #[test]
    fn component_params_report_path_of_wrong_type() {
        let params = parameters(json!({"params": {"components": [
            {"app": {"appName": "myapp", "namespace": "default"}, "repo": 3, "compName": "a"}
        ]}}));
        let err = decode_component_params(&params).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed { ref path, .. } if path == "params.components[0]"
        ));
    }

    #[test]
    fn component_params_require_components() {
        let params = parameters(json!({"params": {"components": []}}));
        assert!(matches!(
            decode_component_params(&params).unwrap_err(),
            DecodeError::NoComponents
        ));
        let params = parameters(json!({"params": {}}));
        assert!(matches!(
            decode_component_params(&params).unwrap_err(),
            DecodeError::Malformed { .. }
        ));
    }
}
