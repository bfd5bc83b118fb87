//! Shared fixtures: a scripted host, in-memory grids, a notification bus.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use apprel_core::models::{ReleaseVersion, Rule};
use apprel_core::types::Timestamp;
use apprel_events::{Notification, NotificationBus, NotificationSink};
use apprel_host::{
    AppRef, DeleteVersionCallback, DeleteVersionResponse, Grid, InvokeMessage, InvokeResponse,
    InvokeSlot, MemoryGrid, ReleaseApi, VersionCoordinates, VersionMethod,
};
use apprel_pruner::{PrunerConfig, ReleasePruner};
use chrono::{TimeZone, Utc};
use tokio::sync::broadcast;

/// How the fake host answers one delete call.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Answer immediately with this failure message (empty = success).
    Respond(String),
    /// Answer with a version delete response.
    RespondVersion(DeleteVersionResponse),
    /// Never answer.
    Silent,
}

/// Every call the pruner made into the host, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    DeleteRule {
        version: String,
        uuid: String,
        datacenters: Vec<String>,
    },
    DeleteVersion {
        method: VersionMethod,
        app_name: String,
        version: VersionCoordinates,
        datacenters: Vec<String>,
    },
    LoadAllRules(String),
    LoadVersions(String, String),
}

/// A host whose delete outcomes are scripted per call.
///
/// Rule deletes travel through the host's invoke slot like the real admin
/// UI: the transport handler queues the message and the fake answers it
/// (or leaves it parked) according to the script.
pub struct FakeHost {
    slot: Arc<InvokeSlot>,
    outbox: Arc<Mutex<VecDeque<InvokeMessage>>>,
    script: Mutex<VecDeque<Outcome>>,
    parked_versions: Mutex<Vec<DeleteVersionCallback>>,
    calls: Mutex<Vec<HostCall>>,
    page_load_time: Timestamp,
    wait_days: i64,
}

impl FakeHost {
    pub fn new(script: Vec<Outcome>) -> Self {
        let outbox: Arc<Mutex<VecDeque<InvokeMessage>>> = Arc::new(Mutex::new(VecDeque::new()));
        let transport_outbox = Arc::clone(&outbox);
        let slot = Arc::new(InvokeSlot::new(Arc::new(move |message: InvokeMessage| {
            transport_outbox.lock().unwrap().push_back(message);
        })));

        Self {
            slot,
            outbox,
            script: Mutex::new(script.into()),
            parked_versions: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            page_load_time: page_load_time(),
            wait_days: 7,
        }
    }

    pub fn with_wait_days(mut self, wait_days: i64) -> Self {
        self.wait_days = wait_days;
        self
    }

    pub fn slot(&self) -> Arc<InvokeSlot> {
        Arc::clone(&self.slot)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, HostCall::DeleteRule { .. } | HostCall::DeleteVersion { .. }))
            .count()
    }

    /// Answer the oldest unanswered rule delete, as a slow server would.
    pub fn answer_parked_rule(&self, message: &str) -> bool {
        let parked = self.outbox.lock().unwrap().pop_front();
        match parked {
            Some(msg) => {
                msg.respond(InvokeResponse::failed(message));
                true
            }
            None => false,
        }
    }

    pub fn parked_rules(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }

    fn next_outcome(&self) -> Outcome {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Respond(String::new()))
    }
}

impl ReleaseApi for FakeHost {
    fn selected_app(&self) -> AppRef {
        AppRef {
            name: "checkout".into(),
            app_type: "web".into(),
        }
    }

    fn rule_deleted_wait_days(&self) -> i64 {
        self.wait_days
    }

    fn page_load_time(&self) -> Timestamp {
        self.page_load_time
    }

    fn invoke_slot(&self) -> Arc<InvokeSlot> {
        self.slot()
    }

    fn delete_rule(&self, rule: &Rule, datacenters: &[String]) {
        self.calls.lock().unwrap().push(HostCall::DeleteRule {
            version: rule.version.clone(),
            uuid: rule.uuid.clone(),
            datacenters: datacenters.to_vec(),
        });

        let data = serde_json::to_value(rule).unwrap();
        self.slot.invoke(
            InvokeMessage::new("DeleteRule", data)
                .with_success(|_| panic!("host callback should have been intercepted")),
        );

        match self.next_outcome() {
            Outcome::Respond(message) => {
                assert!(self.answer_parked_rule(&message), "rule message was not queued");
            }
            Outcome::RespondVersion(_) => panic!("version outcome scripted for a rule delete"),
            Outcome::Silent => {}
        }
    }

    fn delete_or_undelete_version(
        &self,
        method: VersionMethod,
        app_name: &str,
        version: &VersionCoordinates,
        datacenters: &[String],
        callback: DeleteVersionCallback,
    ) {
        self.calls.lock().unwrap().push(HostCall::DeleteVersion {
            method,
            app_name: app_name.to_string(),
            version: version.clone(),
            datacenters: datacenters.to_vec(),
        });

        match self.next_outcome() {
            Outcome::RespondVersion(response) => callback(response),
            Outcome::Respond(message) if message.is_empty() => callback(DeleteVersionResponse {
                success: true,
                message: None,
            }),
            Outcome::Respond(message) => callback(DeleteVersionResponse {
                success: false,
                message: Some(message),
            }),
            Outcome::Silent => self.parked_versions.lock().unwrap().push(callback),
        }
    }

    fn load_all_rules(&self, app_name: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::LoadAllRules(app_name.to_string()));
    }

    fn load_versions(&self, app_name: &str, app_type: &str) {
        self.calls.lock().unwrap().push(HostCall::LoadVersions(
            app_name.to_string(),
            app_type.to_string(),
        ));
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn page_load_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 10, 18, 8, 30, 0).unwrap()
}

pub fn rule(version: &str) -> Rule {
    Rule {
        version: version.into(),
        datacenters: vec!["ams".into(), "sjc".into()],
        ..Default::default()
    }
}

pub fn everyone_rule(version: &str) -> Rule {
    Rule {
        everyone: true,
        ..rule(version)
    }
}

pub fn internal_rule(version: &str) -> Rule {
    Rule {
        internal_only: true,
        ..rule(version)
    }
}

pub fn custom_rule(version: &str, uuid: &str) -> Rule {
    Rule {
        uuid: uuid.into(),
        ..rule(version)
    }
}

pub fn version(v: &str, cleared_days_ago: Option<i64>) -> ReleaseVersion {
    ReleaseVersion {
        version: v.into(),
        rules_cleared_date_time: cleared_days_ago
            .map(|days| (page_load_time() - chrono::Duration::days(days)).to_rfc3339()),
        datacenters: vec!["ams".into()],
        ..Default::default()
    }
}

/// Everything a test needs to drive and observe a pruner.
pub struct Harness {
    pub host: Arc<FakeHost>,
    pub rules: Arc<MemoryGrid<Rule>>,
    pub versions: Arc<MemoryGrid<ReleaseVersion>>,
    pub bus: Arc<NotificationBus>,
    pub notifications: broadcast::Receiver<Notification>,
    pub pruner: ReleasePruner,
}

impl Harness {
    pub fn new(host: FakeHost, rules: Vec<Rule>, versions: Vec<ReleaseVersion>) -> Self {
        let host = Arc::new(host);
        let rules = Arc::new(MemoryGrid::new(rules));
        let versions = Arc::new(MemoryGrid::new(versions));
        let bus = Arc::new(NotificationBus::default());
        let notifications = bus.subscribe();

        let pruner = ReleasePruner::new(
            Arc::clone(&host) as Arc<dyn ReleaseApi>,
            Arc::clone(&rules) as Arc<dyn Grid<Rule>>,
            Arc::clone(&versions) as Arc<dyn Grid<ReleaseVersion>>,
            Arc::clone(&bus) as Arc<dyn NotificationSink>,
        );

        Self {
            host,
            rules,
            versions,
            bus,
            notifications,
            pruner,
        }
    }

    pub fn with_config(mut self, config: PrunerConfig) -> Self {
        self.pruner = self.pruner.with_config(config);
        self
    }

    /// Drain every notification published so far.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            seen.push(n);
        }
        seen
    }
}
