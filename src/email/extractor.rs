//! E-mail address extractor.
//!
//! Scans every textual event for address-like tokens, filters them against
//! the target's scope, and emits one `EMAILADDR` event per accepted match.
//! The derived event is attached to the scanned event's parent, so it sits
//! alongside the scanned event in the causal tree rather than under it.

use std::collections::HashSet;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ScopeConfig;
use crate::email::scope::ScopeFilter;
use crate::error::{ConfigError, Result};
use crate::event::{EMAILADDR, Event, EventSink};
use crate::module::{Module, ModuleInfo, WatchedEvents};

/// Name stamped on every event this module produces.
pub const MODULE_NAME: &str = "email";

/// Permissive on purpose: no TLD or dot-placement validation.
const EMAIL_PATTERN: &str = r"[a-zA-Z.0-9_\-]+@[a-zA-Z.0-9_\-]+";

/// Extracts in-scope e-mail addresses from event payloads.
///
/// One instance serves one scan run against one base domain.
pub struct EmailExtractor<S: EventSink> {
    config: ScopeConfig,
    filter: ScopeFilter,
    pattern: Regex,
    /// Every candidate that passed the prefilter, emitted or not.
    results: HashSet<String>,
    sink: S,
}

impl<S: EventSink> EmailExtractor<S> {
    /// Create an extractor from a user option overlay.
    pub fn new(base_domain: &str, overlay: &Map<String, Value>, sink: S) -> Result<Self> {
        let config = ScopeConfig::from_overlay(overlay)?;
        Self::with_config(base_domain, config, sink)
    }

    /// Create an extractor from an already-built config.
    pub fn with_config(base_domain: &str, config: ScopeConfig, sink: S) -> Result<Self> {
        let base_domain = base_domain.trim();
        if base_domain.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "base_domain".into(),
                hint: "The scan target's root domain must be set.".into(),
            }
            .into());
        }

        let pattern = Regex::new(EMAIL_PATTERN).map_err(|e| ConfigError::InvalidValue {
            key: "pattern".into(),
            message: e.to_string(),
        })?;

        Ok(Self {
            filter: ScopeFilter::new(base_domain, &config),
            config,
            pattern,
            results: HashSet::new(),
            sink,
        })
    }

    /// The lowercased base domain this instance is bound to.
    pub fn base_domain(&self) -> &str {
        self.filter.base_domain()
    }

    /// The effective scope configuration.
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Candidates recorded so far in this run.
    pub fn results(&self) -> &HashSet<String> {
        &self.results
    }

    /// Forget recorded candidates, e.g. when the host starts a new run.
    pub fn reset(&mut self) {
        self.results.clear();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn scan(&mut self, text: &str, event: &Event) {
        for found in self.pattern.find_iter(text) {
            let candidate = found.as_str();
            debug!(candidate, "Found possible e-mail address");

            if let Err(rejection) = self.filter.prefilter(candidate) {
                debug!(candidate, reason = rejection.label(), "Skipping candidate");
                continue;
            }

            self.results.insert(candidate.to_string());

            if let Err(rejection) = self.filter.check_scope(candidate) {
                debug!(candidate, reason = rejection.label(), "Address out of scope");
                continue;
            }

            info!(address = candidate, "Found e-mail address");
            let derived = Event::new(
                EMAILADDR,
                candidate,
                MODULE_NAME,
                event.source_event.clone(),
            );
            self.sink.notify(derived);
        }
    }
}

impl<S: EventSink> Module for EmailExtractor<S> {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            name: MODULE_NAME,
            category: "E-Mail",
            description: "Identify e-mail addresses in any obtained data.",
        }
    }

    fn watched_events(&self) -> WatchedEvents {
        WatchedEvents::All
    }

    fn produced_events(&self) -> &'static [&'static str] {
        &[EMAILADDR]
    }

    fn handle_event(&mut self, event: &Event) {
        if event.event_type == EMAILADDR {
            return;
        }

        debug!(
            event_type = %event.event_type,
            module = %event.module,
            "Received event"
        );

        let Some(text) = event.data.as_text() else {
            debug!(
                payload = event.data.kind(),
                "Unhandled payload type for e-mail extraction"
            );
            return;
        };

        self.scan(text, event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::event::Payload;

    fn extractor(overlay: Value) -> EmailExtractor<Vec<Event>> {
        let overlay = match overlay {
            Value::Object(map) => map,
            other => panic!("overlay must be an object, got {other:?}"),
        };
        EmailExtractor::new("example.com", &overlay, Vec::new()).unwrap()
    }

    fn content_event(data: impl Into<Payload>) -> (Arc<Event>, Event) {
        let root = Arc::new(Event::root("example.com"));
        let event = Event::new("RAW_DATA", data, "spider", Some(Arc::clone(&root)));
        (root, event)
    }

    fn emitted(ex: &EmailExtractor<Vec<Event>>) -> Vec<&str> {
        ex.sink()
            .iter()
            .map(|e| e.data.as_text().unwrap_or_default())
            .collect()
    }

    #[test]
    fn emits_exact_domain_address() {
        let mut ex = extractor(json!({}));
        let (_, event) = content_event("Contact user@example.com for details.");
        ex.handle_event(&event);

        assert_eq!(emitted(&ex), vec!["user@example.com"]);
        let out = &ex.sink()[0];
        assert_eq!(out.event_type, EMAILADDR);
        assert_eq!(out.module, MODULE_NAME);
    }

    #[test]
    fn subdomains_dropped_when_disabled() {
        let mut ex = extractor(json!({ "includesubdomains": false }));
        let (_, event) = content_event("contact@mail.example.com");
        ex.handle_event(&event);
        assert!(ex.sink().is_empty());

        let (_, event) = content_event("contact@example.com");
        ex.handle_event(&event);
        assert_eq!(emitted(&ex), vec!["contact@example.com"]);
    }

    #[test]
    fn subdomains_kept_by_default() {
        let mut ex = extractor(json!({}));
        let (_, event) = content_event("contact@mail.example.com");
        ex.handle_event(&event);
        assert_eq!(emitted(&ex), vec!["contact@mail.example.com"]);
    }

    #[test]
    fn unrelated_domain_never_emitted() {
        for overlay in [json!({}), json!({ "includeexternal": true })] {
            let mut ex = extractor(overlay);
            let (_, event) = content_event("person@other.com");
            ex.handle_event(&event);
            assert!(ex.sink().is_empty());
            assert!(ex.results().is_empty());
        }
    }

    #[test]
    fn external_with_base_domain_inside_needs_opt_in() {
        let text = "spoof@example.com.evil.net";

        let mut ex = extractor(json!({}));
        ex.handle_event(&content_event(text).1);
        assert!(ex.sink().is_empty());

        let mut ex = extractor(json!({ "includeexternal": true }));
        ex.handle_event(&content_event(text).1);
        assert_eq!(emitted(&ex), vec![text]);
    }

    #[test]
    fn short_matches_rejected() {
        let mut ex = extractor(json!({ "includeexternal": true }));
        ex.handle_event(&content_event("a@b and x@y").1);
        assert!(ex.sink().is_empty());
        assert!(ex.results().is_empty());
    }

    #[test]
    fn own_event_type_is_ignored() {
        let mut ex = extractor(json!({}));
        let root = Arc::new(Event::root("example.com"));
        let event = Event::new(EMAILADDR, "user@example.com", MODULE_NAME, Some(root));
        ex.handle_event(&event);
        assert!(ex.sink().is_empty());
        assert!(ex.results().is_empty());
    }

    #[test]
    fn non_text_payloads_ignored() {
        let mut ex = extractor(json!({}));
        for data in [
            json!(42),
            json!({ "body": "user@example.com" }),
            json!(["user@example.com"]),
            json!(null),
        ] {
            ex.handle_event(&content_event(data).1);
        }
        assert!(ex.sink().is_empty());
    }

    #[test]
    fn derived_event_attaches_to_scanned_events_parent() {
        let mut ex = extractor(json!({}));
        let (root, event) = content_event("user@example.com");
        ex.handle_event(&event);

        let out = &ex.sink()[0];
        assert_eq!(out.source_id(), Some(root.id));
        assert_ne!(out.source_id(), Some(event.id));
    }

    #[test]
    fn case_preserved_in_payload() {
        let mut ex = extractor(json!({}));
        ex.handle_event(&content_event("Write to John.Doe@Example.COM today").1);
        assert_eq!(emitted(&ex), vec!["John.Doe@Example.COM"]);
    }

    #[test]
    fn matches_emitted_in_order_without_dedup() {
        let mut ex = extractor(json!({}));
        ex.handle_event(&content_event("b@example.com, a@example.com; b@example.com").1);
        assert_eq!(
            emitted(&ex),
            vec!["b@example.com", "a@example.com", "b@example.com"]
        );
        assert_eq!(ex.results().len(), 2);
    }

    #[test]
    fn prefiltered_but_rejected_addresses_are_recorded() {
        let mut ex = extractor(json!({ "includesubdomains": false }));
        ex.handle_event(&content_event("ops@dev.example.com").1);
        assert!(ex.sink().is_empty());
        assert!(ex.results().contains("ops@dev.example.com"));
    }

    #[test]
    fn permissive_pattern_keeps_odd_tokens() {
        let mut ex = extractor(json!({}));
        ex.handle_event(&content_event("<a href=\"mailto:..x..@example.com\">").1);
        assert_eq!(emitted(&ex), vec!["..x..@example.com"]);
    }

    #[test]
    fn reset_clears_results() {
        let mut ex = extractor(json!({}));
        ex.handle_event(&content_event("user@example.com").1);
        assert_eq!(ex.results().len(), 1);
        ex.reset();
        assert!(ex.results().is_empty());
    }

    #[test]
    fn empty_base_domain_rejected() {
        let err = EmailExtractor::new("  ", &Map::new(), Vec::<Event>::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn invalid_overlay_rejected() {
        let overlay = match json!({ "includeexternal": 1 }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(EmailExtractor::new("example.com", &overlay, Vec::<Event>::new()).is_err());
    }

    #[test]
    fn declares_wildcard_interest_and_output() {
        let ex = extractor(json!({}));
        assert_eq!(ex.watched_events(), WatchedEvents::All);
        assert_eq!(ex.produced_events(), &[EMAILADDR]);
        assert_eq!(ex.info().category, "E-Mail");
        assert_eq!(ex.name(), MODULE_NAME);
    }
}
