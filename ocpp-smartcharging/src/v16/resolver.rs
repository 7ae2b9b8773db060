use alloc::{vec, vec::Vec};
use chrono::{DateTime, TimeDelta, Utc};
use evcp_core::v16::types::{
    ChargingProfile, ChargingProfileKindType, ChargingProfilePurposeType, ChargingRateUnitType,
    RecurrencyKindType,
};

use super::{interface::ConnectorContext, units};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
// Stands in for "no end" without overflowing interval arithmetic.
const FAR_FUTURE: i64 = i64::MAX / 4;

/// One slice of a composite schedule. A resolved sequence is ordered,
/// non-overlapping and covers its query window without gaps.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPeriod {
    pub start: DateTime<Utc>,
    /// Seconds; 0 marks the instantaneous sample of a zero-duration query.
    pub duration: i64,
    pub limit: f32,
    pub unit: ChargingRateUnitType,
    pub number_phases: u32,
    /// Advisory floor from the governing profile, never enforced while
    /// merging.
    pub min_charging_rate: Option<f32>,
}

/// Absolute-time slice of one materialized profile, limit normalized to
/// watts. Half-open interval [start, end).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Span {
    pub(crate) start: i64,
    pub(crate) end: i64,
    pub(crate) watts: f32,
    pub(crate) number_phases: u32,
    pub(crate) min_rate_w: Option<f32>,
}

/// Materializes the candidates of one purpose over the window, highest stack
/// level first. Connector-specific profiles win over connector-0 profiles at
/// equal stack level.
pub(crate) fn materialize_set(
    candidates: &[&ChargingProfile],
    purpose: ChargingProfilePurposeType,
    ctx: &ConnectorContext,
    window: (i64, i64),
    voltage: f32,
) -> Vec<(u32, Vec<Span>)> {
    let mut set: Vec<(u32, Vec<Span>)> = candidates
        .iter()
        .filter(|p| p.charging_profile_purpose == purpose)
        .map(|p| (p.stack_level, materialize(p, ctx, window, voltage)))
        .collect();
    set.sort_by(|a, b| b.0.cmp(&a.0));
    set
}

/// Highest-stack span fully covering [start, end), if any.
pub(crate) fn covering<'a>(set: &'a [(u32, Vec<Span>)], start: i64, end: i64) -> Option<&'a Span> {
    for (_, spans) in set {
        if let Some(span) = spans.iter().find(|s| s.start <= start && s.end >= end) {
            return Some(span);
        }
    }
    None
}

pub(crate) fn instant_limit<'a>(set: &'a [(u32, Vec<Span>)], at: i64) -> Option<&'a Span> {
    covering(set, at, at + 1)
}

pub(crate) fn any_span(sets: &[&[(u32, Vec<Span>)]]) -> bool {
    sets.iter()
        .any(|set| set.iter().any(|(_, spans)| !spans.is_empty()))
}

/// Merges the candidate profiles of all purposes into the composite schedule
/// of one connector over [window_start, window_start + duration). Pure: the
/// clock instant is an input, never read.
///
/// TxProfile coverage alone defines the connector-level limit where present,
/// TxDefaultProfile elsewhere; the result never exceeds the
/// ChargePointMaxProfile level and falls back to the connector's static
/// maximum where no profile applies.
pub fn resolve(
    ctx: &ConnectorContext,
    unit: ChargingRateUnitType,
    window_start: DateTime<Utc>,
    duration: i64,
    candidates: &[&ChargingProfile],
    voltage: f32,
) -> Vec<ResolvedPeriod> {
    resolve_window(ctx, unit, window_start, duration, candidates, voltage).0
}

/// `resolve` plus a flag telling whether any candidate was active anywhere in
/// the window (false means the whole result is static fallback).
pub(crate) fn resolve_window(
    ctx: &ConnectorContext,
    unit: ChargingRateUnitType,
    window_start: DateTime<Utc>,
    duration: i64,
    candidates: &[&ChargingProfile],
    voltage: f32,
) -> (Vec<ResolvedPeriod>, bool) {
    let ws = window_start.timestamp();
    let instantaneous = duration <= 0;
    let we = if instantaneous { ws + 1 } else { ws + duration };
    let window = (ws, we);

    let tx = materialize_set(
        candidates,
        ChargingProfilePurposeType::TxProfile,
        ctx,
        window,
        voltage,
    );
    let tx_default = materialize_set(
        candidates,
        ChargingProfilePurposeType::TxDefaultProfile,
        ctx,
        window,
        voltage,
    );
    let cp_max = materialize_set(
        candidates,
        ChargingProfilePurposeType::ChargePointMaxProfile,
        ctx,
        window,
        voltage,
    );
    let active = any_span(&[&tx, &tx_default, &cp_max]);

    let mut bounds = vec![ws, we];
    for set in [&tx, &tx_default, &cp_max] {
        for (_, spans) in set.iter() {
            for span in spans {
                if span.start > ws && span.start < we {
                    bounds.push(span.start);
                }
                if span.end > ws && span.end < we {
                    bounds.push(span.end);
                }
            }
        }
    }
    bounds.sort_unstable();
    bounds.dedup();

    let fallback_w = units::to_watts(
        ctx.max_current,
        ChargingRateUnitType::A,
        ctx.number_phases,
        voltage,
    );
    let mut slots: Vec<Span> = Vec::new();
    for pair in bounds.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let connector_level = covering(&tx, a, b).or_else(|| covering(&tx_default, a, b));
        let cp_level = covering(&cp_max, a, b);
        let (watts, number_phases, min_rate_w) = match (connector_level, cp_level) {
            (Some(s), Some(c)) => {
                if c.watts < s.watts {
                    (c.watts, c.number_phases, s.min_rate_w)
                } else {
                    (s.watts, s.number_phases, s.min_rate_w)
                }
            }
            (Some(s), None) => (s.watts, s.number_phases, s.min_rate_w),
            (None, Some(c)) => (c.watts, c.number_phases, None),
            (None, None) => (fallback_w, ctx.number_phases, None),
        };
        match slots.last_mut() {
            Some(last)
                if last.end == a
                    && last.watts == watts
                    && last.number_phases == number_phases
                    && last.min_rate_w == min_rate_w =>
            {
                last.end = b
            }
            _ => slots.push(Span {
                start: a,
                end: b,
                watts,
                number_phases,
                min_rate_w,
            }),
        }
    }

    if !contiguous(&slots, ws, we) {
        log::error!(
            "composite schedule for connector {} violates its coverage invariant, failing safe",
            ctx.connector_id
        );
        return (
            vec![ResolvedPeriod {
                start: window_start,
                duration: if instantaneous { 0 } else { duration },
                limit: 0.0,
                unit,
                number_phases: ctx.number_phases,
                min_charging_rate: None,
            }],
            active,
        );
    }

    let emit = |span: &Span, duration: i64| ResolvedPeriod {
        start: window_start + TimeDelta::seconds(span.start - ws),
        duration,
        limit: units::from_watts(span.watts, unit, span.number_phases, voltage),
        unit,
        number_phases: span.number_phases,
        min_charging_rate: span
            .min_rate_w
            .map(|w| units::from_watts(w, unit, span.number_phases, voltage)),
    };

    let periods = if instantaneous {
        // a zero-duration query samples the window start only
        slots.first().map(|s| emit(s, 0)).into_iter().collect()
    } else {
        slots.iter().map(|s| emit(s, s.end - s.start)).collect()
    };
    (periods, active)
}

fn materialize(
    profile: &ChargingProfile,
    ctx: &ConnectorContext,
    window: (i64, i64),
    voltage: f32,
) -> Vec<Span> {
    let schedule = &profile.charging_schedule;
    let periods = &schedule.charging_schedule_period;
    let valid_from = profile.valid_from.map_or(-FAR_FUTURE, |t| t.timestamp());
    let valid_to = profile.valid_to.map_or(FAR_FUTURE, |t| t.timestamp());
    let lo = window.0.max(valid_from);
    let hi = window.1.min(valid_to);
    if lo >= hi {
        return Vec::new();
    }

    let mut spans = Vec::new();
    for (anchor, cap) in occurrence_anchors(profile, ctx, window) {
        let occurrence_len = schedule.duration.map_or(cap, |d| (d as i64).min(cap));
        let schedule_end = anchor.saturating_add(occurrence_len).min(hi);
        for (i, period) in periods.iter().enumerate() {
            let start = anchor + period.start_period as i64;
            let end = match periods.get(i + 1) {
                Some(next) => anchor + next.start_period as i64,
                None => schedule_end,
            };
            let start = start.max(lo);
            let end = end.min(schedule_end);
            if start >= end {
                continue;
            }
            let number_phases = period
                .number_phases
                .filter(|n| *n > 0)
                .map_or(ctx.number_phases, |n| n as u32);
            spans.push(Span {
                start,
                end,
                watts: units::to_watts(
                    period.limit,
                    schedule.charging_rate_unit,
                    number_phases,
                    voltage,
                ),
                number_phases,
                min_rate_w: schedule.min_charging_rate.map(|r| {
                    units::to_watts(r, schedule.charging_rate_unit, number_phases, voltage)
                }),
            });
        }
    }
    spans
}

/// Anchor instants at which the profile's relative period list is replayed,
/// with the maximum length of each occurrence.
fn occurrence_anchors(
    profile: &ChargingProfile,
    ctx: &ConnectorContext,
    window: (i64, i64),
) -> Vec<(i64, i64)> {
    let schedule = &profile.charging_schedule;
    let mut kind = profile.charging_profile_kind;
    // an Absolute schedule without a start behaves as Relative
    if kind == ChargingProfileKindType::Absolute && schedule.start_schedule.is_none() {
        kind = ChargingProfileKindType::Relative;
    }
    match kind {
        ChargingProfileKindType::Absolute => match schedule.start_schedule {
            Some(start) => vec![(start.timestamp(), FAR_FUTURE)],
            None => Vec::new(),
        },
        ChargingProfileKindType::Relative => match &ctx.transaction {
            Some(transaction) => vec![(transaction.started_at.timestamp(), FAR_FUTURE)],
            None => Vec::new(),
        },
        ChargingProfileKindType::Recurring => {
            let Some(start) = schedule.start_schedule else {
                return Vec::new();
            };
            let period = match profile.recurrency_kind {
                Some(RecurrencyKindType::Weekly) => SECONDS_PER_WEEK,
                _ => SECONDS_PER_DAY,
            };
            let origin = start.timestamp();
            let first = origin + div_floor(window.0 - origin, period) * period;
            let mut anchors = Vec::new();
            let mut anchor = first.max(origin);
            while anchor < window.1 {
                anchors.push((anchor, period));
                anchor += period;
            }
            anchors
        }
    }
}

fn contiguous(slots: &[Span], ws: i64, we: i64) -> bool {
    let mut cursor = ws;
    for span in slots {
        if span.start != cursor || span.end <= span.start {
            return false;
        }
        cursor = span.end;
    }
    cursor == we
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}
