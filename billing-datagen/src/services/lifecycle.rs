//! Lifecycle sequencing.
//!
//! Folds a subscription origin and a set of transition requests into an
//! ordered event chain, the billing-period schedule, and the terminal
//! subscription snapshot. Ordering is an explicit contract: events are
//! emitted in increasing `occurred_at`, ties broken by a fixed
//! event-kind precedence.

use crate::models::{
    EventType, Plan, PlanCatalog, Subscription, SubscriptionEvent, SubscriptionStatus,
};
use crate::services::periods::PeriodCalculator;
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use datagen_core::error::AppError;
use datagen_core::ids::IdMinter;

/// Identity and starting conditions of one subscription.
#[derive(Debug, Clone)]
pub struct Origin {
    pub subscription_id: String,
    pub customer_id: String,
    pub start_at: DateTime<Utc>,
    pub plan_id: String,
}

/// A requested lifecycle transition, before validation.
///
/// Upgrades take effect immediately; downgrades are recorded when
/// requested but take effect at the next renewal.
#[derive(Debug, Clone)]
pub enum TransitionRequest {
    Upgrade {
        at: DateTime<Utc>,
        to_plan_id: String,
        reason: String,
    },
    Downgrade {
        at: DateTime<Utc>,
        to_plan_id: String,
        reason: String,
    },
    Pause {
        at: DateTime<Utc>,
        reason: String,
    },
    Resume {
        at: DateTime<Utc>,
        reason: String,
    },
    Cancel {
        at: DateTime<Utc>,
        reason: String,
    },
    Reactivate {
        at: DateTime<Utc>,
        reason: String,
    },
    PaymentFailed {
        at: DateTime<Utc>,
        reason: String,
    },
    PaymentRecovered {
        at: DateTime<Utc>,
        reason: String,
    },
}

impl TransitionRequest {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            TransitionRequest::Upgrade { at, .. }
            | TransitionRequest::Downgrade { at, .. }
            | TransitionRequest::Pause { at, .. }
            | TransitionRequest::Resume { at, .. }
            | TransitionRequest::Cancel { at, .. }
            | TransitionRequest::Reactivate { at, .. }
            | TransitionRequest::PaymentFailed { at, .. }
            | TransitionRequest::PaymentRecovered { at, .. } => *at,
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            TransitionRequest::Upgrade { .. } | TransitionRequest::Downgrade { .. } => {
                EventType::PlanChanged
            }
            TransitionRequest::Pause { .. } => EventType::Paused,
            TransitionRequest::Resume { .. } => EventType::Resumed,
            TransitionRequest::Cancel { .. } => EventType::Canceled,
            TransitionRequest::Reactivate { .. } => EventType::Reactivated,
            TransitionRequest::PaymentFailed { .. } => EventType::PaymentFailed,
            TransitionRequest::PaymentRecovered { .. } => EventType::PaymentRecovered,
        }
    }
}

/// One span of the billing-period chain.
#[derive(Debug, Clone)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Plan in effect when the period began.
    pub plan_id: String,
    /// False when the subscription was paused when the period began.
    pub billable: bool,
}

/// An upgrade that changed the plan mid-period.
#[derive(Debug, Clone)]
pub struct UpgradeRecord {
    pub occurred_at: DateTime<Utc>,
    pub old_plan_id: String,
    pub new_plan_id: String,
    /// Bounds of the period the change landed in.
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Unpaid window between a payment failure and its recovery.
#[derive(Debug, Clone)]
pub struct DelinquencyWindow {
    pub failed_on: NaiveDate,
    pub recovered_on: Option<NaiveDate>,
}

/// Full sequenced lifecycle of one subscription.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    pub events: Vec<SubscriptionEvent>,
    pub periods: Vec<BillingPeriod>,
    pub upgrades: Vec<UpgradeRecord>,
    pub delinquencies: Vec<DelinquencyWindow>,
    pub snapshot: Subscription,
}

/// Sequences lifecycle transitions into consistent events, periods, and
/// a terminal snapshot.
pub struct LifecycleSequencer<'a> {
    periods: &'a PeriodCalculator,
    catalog: &'a PlanCatalog,
}

impl<'a> LifecycleSequencer<'a> {
    pub fn new(periods: &'a PeriodCalculator, catalog: &'a PlanCatalog) -> Self {
        Self { periods, catalog }
    }

    /// Fold `transitions` over the origin state.
    ///
    /// The billing-period chain renews far enough to cover the latest
    /// event's effective date, and further to `renew_until` when given.
    /// An illegal transition for the current state is an error; the bulk
    /// sampler resolves its conflicts before calling this.
    pub fn sequence(
        &self,
        origin: &Origin,
        mut transitions: Vec<TransitionRequest>,
        renew_until: Option<NaiveDate>,
        ids: &mut IdMinter,
    ) -> Result<Lifecycle, AppError> {
        let initial_plan = self.catalog.expect(&origin.plan_id)?.clone();

        // Stable sort: same-instant requests keep creation order within
        // the same precedence rank.
        transitions.sort_by(|a, b| {
            a.at()
                .cmp(&b.at())
                .then(a.event_type().precedence().cmp(&b.event_type().precedence()))
        });

        let mut fold = Fold::new(self, origin, initial_plan);
        fold.record_created(ids);
        for transition in &transitions {
            fold.apply(transition, ids)?;
        }
        if let Some(until) = renew_until {
            fold.advance_to(until);
        }
        Ok(fold.finish())
    }
}

/// Mutable fold state while sequencing one subscription.
struct Fold<'a, 'b> {
    seq: &'b LifecycleSequencer<'a>,
    origin: &'b Origin,

    cur_start: NaiveDate,
    cur_end: NaiveDate,
    cur_plan: Plan,
    /// Plan in effect when the current period opened. An upgrade swaps
    /// `cur_plan` mid-period but the period keeps billing this one.
    period_plan_id: String,
    cur_billable: bool,
    pending_downgrade: Option<(Plan, NaiveDate)>,

    status: SubscriptionStatus,
    paused: bool,
    canceled_at: Option<DateTime<Utc>>,
    pause_start_at: Option<DateTime<Utc>>,
    pause_end_at: Option<DateTime<Utc>>,
    auto_renew: bool,
    open_failure: bool,

    events: Vec<SubscriptionEvent>,
    periods: Vec<BillingPeriod>,
    upgrades: Vec<UpgradeRecord>,
    delinquencies: Vec<DelinquencyWindow>,
}

impl<'a, 'b> Fold<'a, 'b> {
    fn new(seq: &'b LifecycleSequencer<'a>, origin: &'b Origin, initial_plan: Plan) -> Self {
        let cur_start = origin.start_at.date_naive();
        let cur_end = seq
            .periods
            .period_end(cur_start, initial_plan.billing_period_months);
        Self {
            seq,
            origin,
            cur_start,
            cur_end,
            period_plan_id: initial_plan.plan_id.clone(),
            cur_plan: initial_plan,
            cur_billable: true,
            pending_downgrade: None,
            status: SubscriptionStatus::Active,
            paused: false,
            canceled_at: None,
            pause_start_at: None,
            pause_end_at: None,
            auto_renew: true,
            open_failure: false,
            events: Vec::new(),
            periods: Vec::new(),
            upgrades: Vec::new(),
            delinquencies: Vec::new(),
        }
    }

    fn record_created(&mut self, ids: &mut IdMinter) {
        self.push_event(
            ids,
            self.origin.start_at,
            self.origin.start_at.date_naive(),
            EventType::Created,
            None,
            Some(self.cur_plan.plan_id.clone()),
            "Initial subscription",
        );
    }

    /// Renew the current period while its end falls on or before `date`.
    /// A pending downgrade takes effect at the first renewal on or after
    /// its effective date. No-op once canceled.
    fn advance_to(&mut self, date: NaiveDate) {
        if self.status == SubscriptionStatus::Canceled {
            return;
        }
        while self.cur_end <= date {
            self.close_period();
            self.cur_start = self.cur_end;
            if let Some((plan, effective)) = self.pending_downgrade.clone() {
                if effective <= self.cur_start {
                    self.cur_plan = plan;
                    self.pending_downgrade = None;
                }
            }
            self.cur_end = self
                .seq
                .periods
                .period_end(self.cur_start, self.cur_plan.billing_period_months);
            self.period_plan_id = self.cur_plan.plan_id.clone();
            self.cur_billable = !self.paused;
        }
    }

    fn close_period(&mut self) {
        self.periods.push(BillingPeriod {
            start: self.cur_start,
            end: self.cur_end,
            plan_id: self.period_plan_id.clone(),
            billable: self.cur_billable,
        });
    }

    fn apply(&mut self, transition: &TransitionRequest, ids: &mut IdMinter) -> Result<(), AppError> {
        let at = transition.at();
        if at < self.origin.start_at {
            return Err(AppError::InvalidTransition(anyhow!(
                "{} for {} predates the subscription start",
                transition.event_type().as_str(),
                self.origin.subscription_id
            )));
        }
        if self.status == SubscriptionStatus::Canceled
            && !matches!(transition, TransitionRequest::Reactivate { .. })
        {
            return Err(AppError::InvalidTransition(anyhow!(
                "{} for {} after cancellation without reactivation",
                transition.event_type().as_str(),
                self.origin.subscription_id
            )));
        }

        self.advance_to(at.date_naive());

        match transition {
            TransitionRequest::Upgrade {
                at,
                to_plan_id,
                reason,
            } => {
                if self.paused {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "plan change for {} during an open pause",
                        self.origin.subscription_id
                    )));
                }
                let new_plan = self.seq.catalog.expect(to_plan_id)?.clone();
                if new_plan.plan_id == self.cur_plan.plan_id {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "plan change for {} to its current plan {}",
                        self.origin.subscription_id,
                        new_plan.plan_id
                    )));
                }
                self.upgrades.push(UpgradeRecord {
                    occurred_at: *at,
                    old_plan_id: self.cur_plan.plan_id.clone(),
                    new_plan_id: new_plan.plan_id.clone(),
                    period_start: self.cur_start,
                    period_end: self.cur_end,
                });
                let old_plan_id = self.cur_plan.plan_id.clone();
                self.push_event(
                    ids,
                    *at,
                    at.date_naive(),
                    EventType::PlanChanged,
                    Some(old_plan_id),
                    Some(new_plan.plan_id.clone()),
                    reason,
                );
                // The current period keeps its already-computed end; the
                // new cadence applies from the next renewal.
                self.cur_plan = new_plan;
            }
            TransitionRequest::Downgrade {
                at,
                to_plan_id,
                reason,
            } => {
                if self.paused {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "plan change for {} during an open pause",
                        self.origin.subscription_id
                    )));
                }
                if self.pending_downgrade.is_some() {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "downgrade for {} while another is already scheduled",
                        self.origin.subscription_id
                    )));
                }
                let new_plan = self.seq.catalog.expect(to_plan_id)?.clone();
                let old_plan_id = self.cur_plan.plan_id.clone();
                // Effective at the next renewal: end of the period the
                // request landed in.
                self.push_event(
                    ids,
                    *at,
                    self.cur_end,
                    EventType::PlanChanged,
                    Some(old_plan_id),
                    Some(new_plan.plan_id.clone()),
                    reason,
                );
                self.pending_downgrade = Some((new_plan, self.cur_end));
            }
            TransitionRequest::Pause { at, reason } => {
                if self.paused {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "pause for {} while already paused",
                        self.origin.subscription_id
                    )));
                }
                self.paused = true;
                self.pause_start_at = Some(*at);
                self.pause_end_at = None;
                self.push_event(ids, *at, at.date_naive(), EventType::Paused, None, None, reason);
            }
            TransitionRequest::Resume { at, reason } => {
                if !self.paused {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "resume for {} without an open pause",
                        self.origin.subscription_id
                    )));
                }
                self.paused = false;
                self.pause_start_at = None;
                self.pause_end_at = None;
                self.push_event(ids, *at, at.date_naive(), EventType::Resumed, None, None, reason);
            }
            TransitionRequest::Cancel { at, reason } => {
                // Valid from Active or Paused; a pause left open at
                // cancellation stays visible in the snapshot.
                self.status = SubscriptionStatus::Canceled;
                self.canceled_at = Some(*at);
                self.auto_renew = false;
                self.push_event(ids, *at, at.date_naive(), EventType::Canceled, None, None, reason);
            }
            TransitionRequest::Reactivate { at, reason } => {
                if self.status != SubscriptionStatus::Canceled {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "reactivate for {} on a non-canceled subscription",
                        self.origin.subscription_id
                    )));
                }
                // The period that contained the cancellation closes; the
                // chain restarts on a fresh period at the reactivation date.
                self.close_period();
                self.status = SubscriptionStatus::Active;
                self.canceled_at = None;
                self.auto_renew = true;
                self.paused = false;
                self.pause_start_at = None;
                self.pause_end_at = None;
                self.cur_start = at.date_naive();
                self.cur_end = self
                    .seq
                    .periods
                    .period_end(self.cur_start, self.cur_plan.billing_period_months);
                self.period_plan_id = self.cur_plan.plan_id.clone();
                self.cur_billable = true;
                self.push_event(
                    ids,
                    *at,
                    at.date_naive(),
                    EventType::Reactivated,
                    None,
                    Some(self.cur_plan.plan_id.clone()),
                    reason,
                );
            }
            TransitionRequest::PaymentFailed { at, reason } => {
                if self.open_failure {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "payment failure for {} while one is outstanding",
                        self.origin.subscription_id
                    )));
                }
                self.open_failure = true;
                self.delinquencies.push(DelinquencyWindow {
                    failed_on: at.date_naive(),
                    recovered_on: None,
                });
                self.push_event(
                    ids,
                    *at,
                    at.date_naive(),
                    EventType::PaymentFailed,
                    None,
                    None,
                    reason,
                );
            }
            TransitionRequest::PaymentRecovered { at, reason } => {
                if !self.open_failure {
                    return Err(AppError::InvalidTransition(anyhow!(
                        "payment recovery for {} without an outstanding failure",
                        self.origin.subscription_id
                    )));
                }
                self.open_failure = false;
                if let Some(window) = self.delinquencies.last_mut() {
                    window.recovered_on = Some(at.date_naive());
                }
                self.push_event(
                    ids,
                    *at,
                    at.date_naive(),
                    EventType::PaymentRecovered,
                    None,
                    None,
                    reason,
                );
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn push_event(
        &mut self,
        ids: &mut IdMinter,
        occurred_at: DateTime<Utc>,
        effective_date: NaiveDate,
        event_type: EventType,
        old_plan_id: Option<String>,
        new_plan_id: Option<String>,
        reason: &str,
    ) {
        self.events.push(SubscriptionEvent {
            event_id: ids.next_event_id(),
            occurred_at,
            effective_date,
            subscription_id: self.origin.subscription_id.clone(),
            customer_id: self.origin.customer_id.clone(),
            event_type,
            old_plan_id,
            new_plan_id,
            reason: reason.to_string(),
        });
    }

    fn finish(mut self) -> Lifecycle {
        // The still-open period becomes the snapshot's current period.
        self.close_period();
        let snapshot = Subscription {
            subscription_id: self.origin.subscription_id.clone(),
            customer_id: self.origin.customer_id.clone(),
            plan_id: self.cur_plan.plan_id.clone(),
            status: self.status,
            start_at: self.origin.start_at,
            canceled_at: self.canceled_at,
            pause_start_at: self.pause_start_at,
            pause_end_at: self.pause_end_at,
            current_period_start: self.cur_start,
            current_period_end: self.cur_end,
            auto_renew: self.auto_renew,
            created_at: self.origin.start_at,
        };
        Lifecycle {
            events: self.events,
            periods: self.periods,
            upgrades: self.upgrades,
            delinquencies: self.delinquencies,
            snapshot,
        }
    }
}
