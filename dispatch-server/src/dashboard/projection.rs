//! Dashboard read-side projection.
//!
//! A pure reshaping of one [`OptimizationReport`] into the aggregates
//! the dispatcher dashboard renders. The projection sees only the
//! report and the raw train records that produced it, never engine
//! internals, and holds no engine invariants of its own.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{add_minutes, format_hhmm, parse_timestamp};
use crate::solver::{Action, ConflictReport, OptimizationReport, TimelineSpan, TrainInput};

/// Passenger load assumed for passenger services on the queue view.
const PASSENGER_LOAD: u32 = 850;

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Span from the first platform entry to the last platform exit.
    #[serde(rename = "totalStationOperatingTimeMinutes")]
    pub total_station_operating_time_minutes: f64,
}

/// One delayed train on the delays panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayEntry {
    pub train_id: String,
    pub train_type: String,
    pub delay: f64,
    pub section: String,
    pub eta: String,
}

/// One train on the arrivals queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub train_id: String,
    pub priority: String,
    pub status: String,
    pub platform: String,
    pub eta: String,
    pub passengers: u32,
}

/// Occupancy summary for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntry {
    pub id: String,
    pub status: String,
    pub train: Option<String>,
    pub total_occupancy_minutes: f64,
}

/// Delay statistics for one train type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainTypeStat {
    #[serde(rename = "type")]
    pub train_type: String,
    #[serde(rename = "avgDelay")]
    pub avg_delay: f64,
    /// Trains of this type that were not held.
    pub count: usize,
}

/// One audit-trail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub train_id: String,
    pub section: String,
    pub ai_recommendation: String,
    pub outcome: String,
    pub conflict_type: String,
    pub priority: String,
    pub weather_condition: String,
    pub linked_incident: Option<String>,
}

/// Everything the dashboard reads, in one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub kpis: Kpis,
    pub current_delays: Vec<DelayEntry>,
    pub train_queue: Vec<QueueEntry>,
    pub platform_status: Vec<PlatformEntry>,
    pub predicted_conflicts: Vec<ConflictReport>,
    pub train_type_data: Vec<TrainTypeStat>,
    pub audit_data: Vec<AuditEntry>,
    #[serde(rename = "last_updated")]
    pub last_updated: NaiveDateTime,
}

/// Project one optimization report into the dashboard aggregates.
///
/// `trains` are the raw records the run was built from; `now` decides
/// which platforms count as currently occupied.
pub fn build_snapshot(
    report: &OptimizationReport,
    trains: &BTreeMap<String, TrainInput>,
    now: NaiveDateTime,
) -> DashboardSnapshot {
    let (platform_status, kpis) = project_platforms(report, now);

    let mut current_delays = Vec::new();
    let mut train_queue = Vec::new();
    let mut audit_data = Vec::new();
    let mut type_agg: BTreeMap<String, (Vec<f64>, usize)> = BTreeMap::new();

    for rec in &report.recommendations {
        let input = trains.get(&rec.train_id);
        let train_type = input.map(|i| i.train_type.clone()).unwrap_or_default();
        let eta = input
            .and_then(|i| parse_timestamp(&i.scheduled_entry_time).ok())
            .map(|scheduled| format_hhmm(add_minutes(scheduled, rec.total_delay_minutes)))
            .unwrap_or_else(|| "N/A".to_string());

        if rec.total_delay_minutes > 0.0 {
            current_delays.push(DelayEntry {
                train_id: rec.train_id.clone(),
                train_type: train_type.clone(),
                delay: rec.total_delay_minutes,
                section: format!(
                    "Approach to Junction {}",
                    second_node(&rec.route).unwrap_or("Start")
                ),
                eta: eta.clone(),
            });
        }

        train_queue.push(QueueEntry {
            train_id: rec.train_id.clone(),
            priority: train_type.clone(),
            status: queue_status(rec.action).to_string(),
            // Cosmetic assignment carried over from the original
            // dashboard: the platform is read off the id's last char.
            platform: format!(
                "Platform {}",
                rec.train_id.chars().last().map(String::from).unwrap_or_default()
            ),
            eta,
            passengers: if train_type.contains("Pass") {
                PASSENGER_LOAD
            } else {
                0
            },
        });

        let (delays, passed) = type_agg.entry(train_type.clone()).or_default();
        delays.push(rec.total_delay_minutes);
        if rec.action != Action::Hold {
            *passed += 1;
        }

        audit_data.push(AuditEntry {
            id: audit_id(),
            train_id: rec.train_id.clone(),
            section: match second_node(&rec.route) {
                Some(node) => format!("Junction {node}"),
                None => "Junction N/A".to_string(),
            },
            ai_recommendation: format!(
                "{} via path: {}",
                rec.action.as_str(),
                rec.route.join("->")
            ),
            outcome: format!("Success - Final Delay: {:.2} min", rec.total_delay_minutes),
            conflict_type: if rec.total_delay_minutes > 0.0 {
                "Priority Crossing".to_string()
            } else {
                "Clear Path".to_string()
            },
            priority: train_type,
            weather_condition: "Clear".to_string(),
            linked_incident: None,
        });
    }

    let train_type_data = type_agg
        .into_iter()
        .map(|(train_type, (delays, count))| {
            let avg = if delays.is_empty() {
                0.0
            } else {
                delays.iter().sum::<f64>() / delays.len() as f64
            };
            TrainTypeStat {
                train_type,
                avg_delay: round2(avg),
                count,
            }
        })
        .collect();

    DashboardSnapshot {
        kpis,
        current_delays,
        train_queue,
        platform_status,
        predicted_conflicts: report.conflicts.clone(),
        train_type_data,
        audit_data,
        last_updated: now,
    }
}

/// Platform occupancy summaries plus the operating-time KPI.
fn project_platforms(
    report: &OptimizationReport,
    now: NaiveDateTime,
) -> (Vec<PlatformEntry>, Kpis) {
    let mut entries = Vec::with_capacity(3);
    let mut first_entry: Option<NaiveDateTime> = None;
    let mut last_exit: Option<NaiveDateTime> = None;

    for platform in 1..=3u8 {
        let berth = format!("P{platform}_entry->P{platform}_exit");
        let mut occupations: Vec<(&str, TimelineSpan)> = Vec::new();
        for (train, timeline) in &report.timelines {
            if let Some(span) = timeline.get(&berth) {
                occupations.push((train, *span));
            }
        }

        let total_minutes: f64 = occupations
            .iter()
            .map(|(_, span)| (span.exit - span.entry).num_milliseconds() as f64 / 60_000.0)
            .sum();
        let occupant = occupations
            .iter()
            .find(|(_, span)| span.entry <= now && now < span.exit)
            .map(|(train, _)| train.to_string());

        for (_, span) in &occupations {
            if first_entry.is_none_or(|t| span.entry < t) {
                first_entry = Some(span.entry);
            }
            if last_exit.is_none_or(|t| span.exit > t) {
                last_exit = Some(span.exit);
            }
        }

        entries.push(PlatformEntry {
            id: format!("Platform {platform}"),
            status: if occupant.is_some() {
                "occupied".to_string()
            } else {
                "available".to_string()
            },
            train: occupant,
            total_occupancy_minutes: round2(total_minutes),
        });
    }

    let operating = match (first_entry, last_exit) {
        (Some(first), Some(last)) => {
            round2((last - first).num_milliseconds() as f64 / 60_000.0)
        }
        _ => 0.0,
    };

    (
        entries,
        Kpis {
            total_station_operating_time_minutes: operating,
        },
    )
}

fn queue_status(action: Action) -> &'static str {
    match action {
        Action::Proceed => "Approaching",
        Action::Hold => "Holding",
        Action::Rerouted => "Rerouted",
    }
}

fn second_node(route: &[String]) -> Option<&str> {
    route.get(1).map(String::as_str)
}

/// "AUD_" plus six uppercase hex characters.
fn audit_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("AUD_{}", hex[..6].to_uppercase())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
