//! Step traces recorded by the external engine
//!
//! A run of the traced program appends one descriptor per logged line:
//! ```json
//! {"line": 3, "code": "ll.append(20)", "action": "Appended 20 to 'll'",
//!  "instances": {"ll": [10, 20]}}
//! ```
//! [`TraceModel`] validates the shape of the whole array up front. A single
//! malformed descriptor rejects the run, so a trace is either complete or
//! absent.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Default cap on the number of steps a single run may record
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Instance name -> snapshot of its contents, in engine order
pub type InstanceMap = IndexMap<String, Vec<String>, FxBuildHasher>;

/// Errors raised while building a trace from engine output
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    #[error("trace is not an array of steps: {message}")]
    NotAnArray { message: String },

    #[error("malformed step {step}: {message}")]
    MalformedStep { step: usize, message: String },

    #[error("step {step}: instance '{instance}' holds a non-scalar value at position {position}")]
    NonScalar {
        step: usize,
        instance: String,
        position: usize,
    },

    #[error("trace has {steps} steps, limit is {limit}")]
    StepLimitExceeded { steps: usize, limit: usize },
}

/// Raw step as emitted by the engine
#[derive(Debug, Clone, Deserialize)]
pub struct StepDescriptor {
    pub line: usize,
    pub code: String,
    #[serde(default)]
    pub action: Option<String>,
    pub instances: IndexMap<String, Vec<JsonValue>, FxBuildHasher>,
}

/// One validated, immutable snapshot of every tracked instance
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    line_number: usize,
    code_text: String,
    action_label: Option<String>,
    instances: InstanceMap,
}

impl StepRecord {
    pub fn new(
        line_number: usize,
        code_text: impl Into<String>,
        action_label: Option<String>,
        instances: InstanceMap,
    ) -> Self {
        StepRecord {
            line_number,
            code_text: code_text.into(),
            // An empty label counts as missing
            action_label: action_label.filter(|a| !a.is_empty()),
            instances,
        }
    }

    fn from_descriptor(step: usize, descriptor: StepDescriptor) -> Result<Self, TraceError> {
        let mut instances = InstanceMap::default();
        for (name, values) in descriptor.instances {
            let mut snapshot = Vec::with_capacity(values.len());
            for (position, value) in values.iter().enumerate() {
                match scalar_text(value) {
                    Some(text) => snapshot.push(text),
                    None => {
                        return Err(TraceError::NonScalar {
                            step,
                            instance: name,
                            position,
                        })
                    }
                }
            }
            instances.insert(name, snapshot);
        }

        Ok(StepRecord::new(
            descriptor.line,
            descriptor.code,
            descriptor.action,
            instances,
        ))
    }

    /// 1-based source line this step corresponds to (0 when unknown)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn code_text(&self) -> &str {
        &self.code_text
    }

    pub fn action_label(&self) -> Option<&str> {
        self.action_label.as_deref()
    }

    /// Human-readable description: the action label, or the code when absent
    pub fn description(&self) -> &str {
        self.action_label.as_deref().unwrap_or(&self.code_text)
    }

    pub fn instances(&self) -> &InstanceMap {
        &self.instances
    }

    pub fn instance(&self, name: &str) -> Option<&[String]> {
        self.instances.get(name).map(Vec::as_slice)
    }
}

/// Display text for a JSON scalar, `None` for arrays and objects
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => Some(String::new()),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Ordered, immutable step history from one engine run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceModel {
    steps: Vec<StepRecord>,
}

impl TraceModel {
    /// A trace with no steps
    pub fn empty() -> Self {
        TraceModel::default()
    }

    /// Build from already-validated records
    pub fn from_records(steps: Vec<StepRecord>) -> Self {
        TraceModel { steps }
    }

    /// Build from the engine's JSON trace value
    pub fn from_json(value: JsonValue, max_steps: usize) -> Result<Self, TraceError> {
        let items = match value {
            JsonValue::Array(items) => items,
            other => {
                return Err(TraceError::NotAnArray {
                    message: format!("found {}", json_kind(&other)),
                })
            }
        };

        let mut descriptors = Vec::with_capacity(items.len());
        for (step, item) in items.into_iter().enumerate() {
            let descriptor: StepDescriptor =
                serde_json::from_value(item).map_err(|e| TraceError::MalformedStep {
                    step,
                    message: e.to_string(),
                })?;
            descriptors.push(descriptor);
        }

        Self::from_descriptors(descriptors, max_steps)
    }

    /// Parse a JSON document holding the trace array
    pub fn parse(json: &str, max_steps: usize) -> Result<Self, TraceError> {
        let value: JsonValue =
            serde_json::from_str(json).map_err(|e| TraceError::NotAnArray {
                message: e.to_string(),
            })?;
        Self::from_json(value, max_steps)
    }

    /// Build from engine descriptors, rejecting the lot on the first bad one
    pub fn from_descriptors(
        descriptors: Vec<StepDescriptor>,
        max_steps: usize,
    ) -> Result<Self, TraceError> {
        if descriptors.len() > max_steps {
            return Err(TraceError::StepLimitExceeded {
                steps: descriptors.len(),
                limit: max_steps,
            });
        }

        let steps = descriptors
            .into_iter()
            .enumerate()
            .map(|(step, descriptor)| StepRecord::from_descriptor(step, descriptor))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TraceModel { steps })
    }

    pub fn get(&self, index: usize) -> Option<&StepRecord> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_steps_in_order() {
        let trace = TraceModel::from_json(
            json!([
                {"line": 1, "code": "ll = LinkedList()", "action": "Created LinkedList 'll'", "instances": {"ll": []}},
                {"line": 2, "code": "ll.append(10)", "instances": {"ll": [10]}},
            ]),
            DEFAULT_MAX_STEPS,
        )
        .unwrap();

        assert_eq!(trace.len(), 2);
        let first = trace.get(0).unwrap();
        assert_eq!(first.line_number(), 1);
        assert_eq!(first.description(), "Created LinkedList 'll'");
        assert_eq!(first.instance("ll").map(<[String]>::len), Some(0));

        let second = trace.get(1).unwrap();
        assert_eq!(second.action_label(), None);
        assert_eq!(second.description(), "ll.append(10)");
        assert_eq!(second.instance("ll").unwrap(), ["10"]);
    }

    #[test]
    fn test_empty_action_falls_back_to_code() {
        let trace = TraceModel::from_json(
            json!([{"line": 4, "code": "s.pop()", "action": "", "instances": {}}]),
            DEFAULT_MAX_STEPS,
        )
        .unwrap();
        assert_eq!(trace.get(0).unwrap().description(), "s.pop()");
    }

    #[test]
    fn test_instance_order_follows_engine() {
        let trace = TraceModel::parse(
            r#"[{"line": 1, "code": "x", "instances": {"zeta": [1], "alpha": [2], "mid": [3]}}]"#,
            DEFAULT_MAX_STEPS,
        )
        .unwrap();
        let names: Vec<&str> = trace
            .get(0)
            .unwrap()
            .instances()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_scalar_rendering() {
        let trace = TraceModel::from_json(
            json!([{"line": 1, "code": "x", "instances": {"s": ["a", 1.5, true, null]}}]),
            DEFAULT_MAX_STEPS,
        )
        .unwrap();
        assert_eq!(trace.get(0).unwrap().instance("s").unwrap(), ["a", "1.5", "true", ""]);
    }

    #[test]
    fn test_missing_field_rejects_run() {
        let err = TraceModel::from_json(
            json!([
                {"line": 1, "code": "ok", "instances": {}},
                {"line": 2, "instances": {}},
            ]),
            DEFAULT_MAX_STEPS,
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::MalformedStep { step: 1, .. }));
    }

    #[test]
    fn test_nested_value_rejects_run() {
        let err = TraceModel::from_json(
            json!([{"line": 1, "code": "x", "instances": {"ll": [1, [2]]}}]),
            DEFAULT_MAX_STEPS,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TraceError::NonScalar {
                step: 0,
                instance: "ll".to_string(),
                position: 1
            }
        );
    }

    #[test]
    fn test_non_array_rejected() {
        assert!(matches!(
            TraceModel::from_json(json!({"line": 1}), DEFAULT_MAX_STEPS),
            Err(TraceError::NotAnArray { .. })
        ));
        assert!(matches!(
            TraceModel::parse("not json", DEFAULT_MAX_STEPS),
            Err(TraceError::NotAnArray { .. })
        ));
    }

    #[test]
    fn test_step_limit() {
        let steps: Vec<_> = (1..=3)
            .map(|i| json!({"line": i, "code": "x", "instances": {}}))
            .collect();
        let err = TraceModel::from_json(JsonValue::Array(steps), 2).unwrap_err();
        assert_eq!(err, TraceError::StepLimitExceeded { steps: 3, limit: 2 });
    }

    #[test]
    fn test_empty_array_is_empty_trace() {
        let trace = TraceModel::from_json(json!([]), DEFAULT_MAX_STEPS).unwrap();
        assert!(trace.is_empty());
    }
}
