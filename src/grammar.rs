//! Grammar definitions: the raw record format and the validated [`GrammarSpec`].
//!
//! Definitions arrive as a stream of JSON records (concatenated objects, or a
//! single array of them). Each record is validated independently so that one
//! malformed definition never hides the others.

use crate::config::WhitespacePolicy;
use crate::error::LsysError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One grammar definition exactly as it appears in the input.
///
/// `order` is signed so that negative counts are reported as configuration
/// errors rather than as opaque parse failures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarRecord {
    pub title: String,
    #[serde(default)]
    pub refs: Vec<String>,
    pub angle: f64,
    pub start: String,
    #[serde(default)]
    pub order: Vec<i64>,
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
    #[serde(default)]
    pub post_rules: BTreeMap<String, String>,
}

impl GrammarRecord {
    pub fn new(title: impl Into<String>, angle: f64, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            angle,
            start: start.into(),
            ..Default::default()
        }
    }

    /// Adds a rewrite rule (builder pattern).
    pub fn rule(mut self, symbol: char, replacement: impl Into<String>) -> Self {
        self.rules.insert(symbol.to_string(), replacement.into());
        self
    }

    /// Adds a post-rule applied once after rewriting (builder pattern).
    pub fn post_rule(mut self, symbol: char, replacement: impl Into<String>) -> Self {
        self.post_rules
            .insert(symbol.to_string(), replacement.into());
        self
    }

    pub fn with_order(mut self, order: impl IntoIterator<Item = i64>) -> Self {
        self.order = order.into_iter().collect();
        self
    }

    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.refs.push(reference.into());
        self
    }

    /// Validates this record into an immutable [`GrammarSpec`].
    pub fn validate(self, whitespace: WhitespacePolicy) -> Result<GrammarSpec, LsysError> {
        if !(self.angle.is_finite() && self.angle > 0.0) {
            return Err(LsysError::configuration(
                "angle",
                format!("must be a positive number of degrees, got {}", self.angle),
            ));
        }

        let order = self
            .order
            .iter()
            .map(|&n| {
                u32::try_from(n).map_err(|_| {
                    LsysError::configuration(
                        "order",
                        format!("generation counts must be non-negative, got {n}"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let start = clean_body("start", &self.start, whitespace)?;
        let rules = clean_rule_map("rules", self.rules, whitespace)?;
        let post_rules = clean_rule_map("post_rules", self.post_rules, whitespace)?;

        Ok(GrammarSpec {
            title: self.title,
            refs: self.refs,
            angle: self.angle,
            start,
            order,
            rules,
            post_rules,
        })
    }
}

impl TryFrom<GrammarRecord> for GrammarSpec {
    type Error = LsysError;

    fn try_from(record: GrammarRecord) -> Result<Self, Self::Error> {
        record.validate(WhitespacePolicy::default())
    }
}

impl From<&GrammarSpec> for GrammarRecord {
    fn from(spec: &GrammarSpec) -> Self {
        let to_strings = |map: &BTreeMap<char, String>| -> BTreeMap<String, String> {
            map.iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        };
        Self {
            title: spec.title.clone(),
            refs: spec.refs.clone(),
            angle: spec.angle,
            start: spec.start.clone(),
            order: spec.order.iter().map(|&n| i64::from(n)).collect(),
            rules: to_strings(&spec.rules),
            post_rules: to_strings(&spec.post_rules),
        }
    }
}

fn clean_body(
    field: &str,
    body: &str,
    whitespace: WhitespacePolicy,
) -> Result<String, LsysError> {
    let cleaned: String = match whitespace {
        WhitespacePolicy::Strip => body.chars().filter(|c| !c.is_whitespace()).collect(),
        WhitespacePolicy::Inert => body.to_string(),
    };
    if let Some((i, c)) = cleaned.chars().enumerate().find(|(_, c)| c.is_control()) {
        return Err(LsysError::configuration(
            field,
            format!("non-printable character {c:?} at position {i}"),
        ));
    }
    Ok(cleaned)
}

fn clean_rule_map(
    field: &str,
    map: BTreeMap<String, String>,
    whitespace: WhitespacePolicy,
) -> Result<BTreeMap<char, String>, LsysError> {
    map.into_iter()
        .map(|(key, body)| {
            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) if !c.is_whitespace() && !c.is_control() => c,
                _ => {
                    return Err(LsysError::configuration(
                        field,
                        format!("rule key {key:?} must be a single printable symbol"),
                    ));
                }
            };
            let body = clean_body(&format!("{field}.{symbol}"), &body, whitespace)?;
            Ok((symbol, body))
        })
        .collect()
}

/// A validated, immutable L-System definition.
#[derive(Clone, Debug, PartialEq)]
pub struct GrammarSpec {
    title: String,
    refs: Vec<String>,
    angle: f64,
    start: String,
    order: Vec<u32>,
    rules: BTreeMap<char, String>,
    post_rules: BTreeMap<char, String>,
}

impl GrammarSpec {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn refs(&self) -> &[String] {
        &self.refs
    }

    /// Turning angle in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    /// Requested generation counts. Empty means "use the configured default".
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn rules(&self) -> &BTreeMap<char, String> {
        &self.rules
    }

    pub fn post_rules(&self) -> &BTreeMap<char, String> {
        &self.post_rules
    }

    pub fn rule(&self, symbol: char) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    pub fn post_rule(&self, symbol: char) -> Option<&str> {
        self.post_rules.get(&symbol).map(String::as_str)
    }

    /// Human-readable rule listing for page annotations.
    ///
    /// `order` is the list of generations actually drawn, which may differ
    /// from [`GrammarSpec::order`] when the default was substituted.
    pub fn describe(&self, order: &[u32]) -> Vec<String> {
        let order = order
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut lines = vec![
            format!("Angle : {}", self.angle),
            format!("Order : [{order}]"),
            format!("Start : {}", self.start),
        ];
        lines.extend(self.rules.iter().map(|(k, v)| format!("{k} : {v}")));
        lines.extend(self.post_rules.iter().map(|(k, v)| format!("{k} => {v}")));
        lines
    }
}

/// Parses a stream of grammar records.
///
/// Accepts concatenated JSON objects or JSON arrays of objects. Each record
/// yields its own result; a syntax error in the stream itself ends parsing
/// with a final [`LsysError::Parse`].
pub fn parse_records(
    text: &str,
    whitespace: WhitespacePolicy,
) -> Vec<Result<GrammarSpec, LsysError>> {
    let mut out = Vec::new();
    let stream = serde_json::Deserializer::from_str(text).into_iter::<serde_json::Value>();
    for value in stream {
        match value {
            Ok(serde_json::Value::Array(items)) => {
                out.extend(items.into_iter().map(|v| parse_value(v, whitespace)));
            }
            Ok(v) => out.push(parse_value(v, whitespace)),
            Err(e) => {
                out.push(Err(e.into()));
                break;
            }
        }
    }
    out
}

fn parse_value(
    value: serde_json::Value,
    whitespace: WhitespacePolicy,
) -> Result<GrammarSpec, LsysError> {
    let record: GrammarRecord = serde_json::from_value(value)?;
    record.validate(whitespace)
}
