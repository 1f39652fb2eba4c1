use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::Error;
use crate::Result;

fn variable_regex() -> &'static Regex {
    static VARIABLE: OnceLock<Regex> = OnceLock::new();
    VARIABLE.get_or_init(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("valid regex"))
}

/// A prompt template using `{variable}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringPromptTemplate {
    /// The template string with {variable} placeholders
    template: String,

    /// The variables found in the template, in order of first appearance
    input_variables: Vec<String>,
}

impl StringPromptTemplate {
    /// Create a new prompt template, extracting its variables
    pub fn from_template(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut input_variables: Vec<String> = Vec::new();

        for cap in variable_regex().captures_iter(&template) {
            if let Some(name) = cap.get(1) {
                let name = name.as_str().to_string();
                if !input_variables.contains(&name) {
                    input_variables.push(name);
                }
            }
        }

        Self {
            template,
            input_variables,
        }
    }

    /// The input variables required by this template
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Format the template with the given values.
    ///
    /// Placeholders are filled in a single pass, so text inside a value is
    /// never treated as a placeholder.
    pub fn format(&self, values: &HashMap<String, Value>) -> Result<String> {
        if let Some(missing) = self.input_variables.iter().find(|v| !values.contains_key(*v)) {
            return Err(Error::PromptTemplate(format!("Variable not found: {}", missing)));
        }

        let result = variable_regex().replace_all(&self.template, |caps: &Captures| {
            match values.get(&caps[1]) {
                Some(Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        });

        Ok(result.into_owned())
    }

    /// Format the template from string pairs
    pub fn format_pairs(&self, pairs: &[(&str, &str)]) -> Result<String> {
        let values: HashMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        self.format(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_variables_once() {
        let template = StringPromptTemplate::from_template("{query} and {query} about {topic}");
        assert_eq!(template.input_variables(), &["query".to_string(), "topic".to_string()]);
    }

    #[test]
    fn test_format_values() {
        let template = StringPromptTemplate::from_template("Forecast for: {query}. Year {year}.");
        let mut values = HashMap::new();
        values.insert("query".to_string(), json!("Jawan"));
        values.insert("year".to_string(), json!(2023));
        assert_eq!(
            template.format(&values).unwrap(),
            "Forecast for: Jawan. Year 2023."
        );
    }

    #[test]
    fn test_missing_variable() {
        let template = StringPromptTemplate::from_template("Question: {question}");
        let err = template.format_pairs(&[("query", "x")]).unwrap_err();
        assert!(matches!(err, Error::PromptTemplate(_)));
    }

    #[test]
    fn test_braces_in_values_are_not_reexpanded() {
        let template = StringPromptTemplate::from_template("Q: {query}");
        assert_eq!(
            template.format_pairs(&[("query", "what is {plot}?")]).unwrap(),
            "Q: what is {plot}?"
        );
    }

    #[test]
    fn test_earlier_value_does_not_fill_later_placeholder() {
        let template = StringPromptTemplate::from_template("{context}\nQuestion: {question}");
        let prompt = template
            .format_pairs(&[("context", "Doc says {question} literally"), ("question", "Who?")])
            .unwrap();
        assert_eq!(prompt, "Doc says {question} literally\nQuestion: Who?");
    }
}
