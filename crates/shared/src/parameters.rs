use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Результат вычисления длины
pub type ParameterResult = Result<f64, ParameterError>;

/// Ошибки при вычислении текстового поля длины
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Пустое поле
    Empty,
    /// Ошибка парсинга формулы
    ParseError(String),
    /// Ошибка вычисления формулы
    EvaluationError(String),
    /// Неверный тип значения
    InvalidType(String),
    /// NaN или бесконечность
    NonFinite,
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::Empty => write!(f, "Value is empty"),
            ParameterError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ParameterError::EvaluationError(msg) => write!(f, "Evaluation error: {}", msg),
            ParameterError::InvalidType(msg) => write!(f, "Invalid type: {}", msg),
            ParameterError::NonFinite => write!(f, "Value is not a finite number"),
        }
    }
}

impl std::error::Error for ParameterError {}

/// Именованные параметры профиля (например `R_nose`), доступные в формулах
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    values: BTreeMap<String, f64>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.values.iter()
    }
}

/// Вычислить текстовое поле длины: число (`2.5`) или формулу (`R_nose * 2`).
///
/// Целочисленные операнды делятся нацело (`5/2` = 2), для дробей нужно `5.0/2`.
pub fn evaluate_length(text: &str, parameters: &ParameterTable) -> ParameterResult {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParameterError::Empty);
    }
    // Запятая в инвариантной культуре не является десятичным разделителем
    if text.contains(',') {
        return Err(ParameterError::ParseError(format!(
            "'{}' is not an invariant decimal number",
            text
        )));
    }

    if let Ok(v) = text.parse::<f64>() {
        return finite(v);
    }

    let mut context = HashMapContext::new();
    for (name, value) in parameters.iter() {
        context
            .set_value(name.clone(), Value::Float(*value))
            .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;
    }

    // Добавить математические константы
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .ok();
    context
        .set_value("E".to_string(), Value::Float(std::f64::consts::E))
        .ok();

    let tree = build_operator_tree(text).map_err(|e| ParameterError::ParseError(e.to_string()))?;

    let value = tree
        .eval_with_context(&context)
        .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;

    match value {
        Value::Float(f) => finite(f),
        Value::Int(i) => Ok(i as f64),
        _ => Err(ParameterError::InvalidType(format!(
            "Expected number, got {:?}",
            value
        ))),
    }
}

fn finite(v: f64) -> ParameterResult {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParameterError::NonFinite)
    }
}
