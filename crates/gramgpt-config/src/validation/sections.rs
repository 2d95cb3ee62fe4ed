//! Per-section validation: model, chat, proxy.

use std::sync::LazyLock;

use gramgpt_common::LanguageTag;
use regex::Regex;

use crate::schema::GramConfig;

use super::helpers::{validate_range, validate_range_f64};

/// `ll-RR` shaped BCP-47 tag.
static LANGUAGE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}-[A-Z]{2}$").unwrap());

pub(crate) fn validate_model(errors: &mut Vec<String>, config: &GramConfig) {
    let model = &config.model;
    if model.name.trim().is_empty() {
        errors.push("model.name must not be empty".into());
    }
    if !model.api_base.starts_with("http://") && !model.api_base.starts_with("https://") {
        errors.push(format!(
            "model.api_base = {:?} must be an http(s) URL",
            model.api_base
        ));
    }
    validate_range_f64(errors, "model.temperature", model.temperature, 0.0, 2.0);
    validate_range(errors, "model.top_k", model.top_k, 1, 100);
    validate_range_f64(errors, "model.top_p", model.top_p, 0.0, 1.0);
    validate_range(
        errors,
        "model.max_output_tokens",
        model.max_output_tokens,
        1,
        65536,
    );
    validate_range_f64(
        errors,
        "model.summary_temperature",
        model.summary_temperature,
        0.0,
        2.0,
    );
    validate_range_f64(
        errors,
        "model.suggestion_temperature",
        model.suggestion_temperature,
        0.0,
        2.0,
    );
    validate_range(
        errors,
        "model.connect_timeout_secs",
        model.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "model.request_timeout_secs",
        model.request_timeout_secs,
        5,
        600,
    );
}

pub(crate) fn validate_chat(errors: &mut Vec<String>, config: &GramConfig) {
    let tag = config.chat.language.as_str();
    if !LANGUAGE_TAG_RE.is_match(tag) {
        errors.push(format!("chat.language = {tag:?} is not a language tag like \"hi-IN\""));
    } else if LanguageTag::parse(tag).is_err() {
        errors.push(format!("chat.language = {tag:?} is not a supported language"));
    }
}

pub(crate) fn validate_proxy(errors: &mut Vec<String>, config: &GramConfig) {
    validate_range(errors, "proxy.port", config.proxy.port, 1, 65535);
    if config.proxy.bind.trim().is_empty() {
        errors.push("proxy.bind must not be empty".into());
    }
}
