//! Build the Step → Action tree from a raw job document.

use serde_json::{Map, Value};

use crate::core::{BuildAction, BuildStep};
use crate::provider::RawJobDocument;
use crate::{CompareError, CompareResult};

type Object = Map<String, Value>;

/// Convert the `steps` array of a job document into typed steps.
///
/// Order is preserved at both levels. The first step or action missing a
/// required field fails the whole build; no partial tree is returned.
///
/// # Errors
/// `MalformedResponse` naming the offending step/action and field.
pub fn build_steps(doc: &RawJobDocument) -> CompareResult<Vec<BuildStep>> {
    let steps = array_field(doc, "steps", "job document")?;
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| build_step(index, step))
        .collect()
}

fn build_step(index: usize, step: &Value) -> CompareResult<BuildStep> {
    let context = format!("step {index}");
    let obj = as_object(step, &context)?;
    let name = string_field(obj, "name", &context)?;

    let context = format!("step {index} ({name:?})");
    let actions = array_field(obj, "actions", &context)?
        .iter()
        .enumerate()
        .map(|(action_index, action)| build_action(&context, action_index, action))
        .collect::<CompareResult<Vec<_>>>()?;

    Ok(BuildStep::new(name, actions))
}

fn build_action(step_context: &str, index: usize, action: &Value) -> CompareResult<BuildAction> {
    let context = format!("action {index} of {step_context}");
    let obj = as_object(action, &context)?;

    // Key presence is required; CircleCI reports `null` commands for built-in
    // actions and `null` output URLs for actions without output.
    let name = string_field(obj, "name", &context)?;
    let output_url = nullable_string_field(obj, "output_url", &context)?;
    let status = string_field(obj, "status", &context)?;
    let infrastructure_fail = flag_field(obj, "infrastructure_fail", &context)?;
    let bash_command = nullable_string_field(obj, "bash_command", &context)?;

    Ok(BuildAction::new(
        name,
        bash_command,
        status,
        infrastructure_fail,
        output_url,
    ))
}

fn as_object<'a>(value: &'a Value, context: &str) -> CompareResult<&'a Object> {
    value
        .as_object()
        .ok_or_else(|| CompareError::malformed(context, "expected a JSON object"))
}

fn field<'a>(obj: &'a Object, key: &str, context: &str) -> CompareResult<&'a Value> {
    obj.get(key)
        .ok_or_else(|| CompareError::malformed(context, format!("missing field `{key}`")))
}

fn array_field<'a>(obj: &'a Object, key: &str, context: &str) -> CompareResult<&'a Vec<Value>> {
    field(obj, key, context)?
        .as_array()
        .ok_or_else(|| CompareError::malformed(context, format!("field `{key}` is not an array")))
}

fn string_field(obj: &Object, key: &str, context: &str) -> CompareResult<String> {
    field(obj, key, context)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CompareError::malformed(context, format!("field `{key}` is not a string")))
}

fn nullable_string_field(obj: &Object, key: &str, context: &str) -> CompareResult<Option<String>> {
    match field(obj, key, context)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(CompareError::malformed(
            context,
            format!("field `{key}` is not a string"),
        )),
    }
}

fn flag_field(obj: &Object, key: &str, context: &str) -> CompareResult<bool> {
    match field(obj, key, context)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        _ => Err(CompareError::malformed(
            context,
            format!("field `{key}` is not a boolean"),
        )),
    }
}
