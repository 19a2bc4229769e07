//! Bulk sampling tests for billing-datagen.
//!
//! Drives the randomized generator with forced probabilities so the
//! conflict-resolution rules are exercised on every sampled subscription.

mod common;

use billing_datagen::config::GeneratorConfig;
use billing_datagen::models::{EventType, SubscriptionEvent, SubscriptionStatus};
use billing_datagen::services::random::{RandomGenerator, SampledPopulation};
use billing_datagen::services::PeriodCalculator;
use common::test_config;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn sample(config: &GeneratorConfig, seed: u64) -> SampledPopulation {
    let periods = PeriodCalculator::new(config.monthly_term_days, config.annual_term_days);
    let catalog = config.plan_catalog();
    let mut rng = StdRng::seed_from_u64(seed);
    RandomGenerator::new(config, &periods, &catalog)
        .generate(&mut rng)
        .unwrap()
}

fn events_by_subscription(out: &SampledPopulation) -> BTreeMap<&str, Vec<&SubscriptionEvent>> {
    let mut map: BTreeMap<&str, Vec<&SubscriptionEvent>> = BTreeMap::new();
    for event in &out.events {
        map.entry(event.subscription_id.as_str())
            .or_default()
            .push(event);
    }
    map
}

#[test]
fn pauses_survive_conflicting_upgrade_draws() {
    let mut config = test_config();
    config.sizes.random_subscriptions = 50;
    config.randomization.prob_upgrade = 1.0;
    config.randomization.prob_pause = 1.0;
    config.randomization.prob_cancel = 0.0;
    config.randomization.prob_delinquent = 0.0;

    let out = sample(&config, 7);
    assert_eq!(out.subscriptions.len(), 50);

    for (subscription_id, events) in events_by_subscription(&out) {
        let pause = events
            .iter()
            .find(|e| e.event_type == EventType::Paused)
            .unwrap_or_else(|| panic!("{subscription_id} lost its pause"));
        let resume = events
            .iter()
            .find(|e| e.event_type == EventType::Resumed)
            .unwrap_or_else(|| panic!("{subscription_id} lost its resume"));
        assert!(pause.occurred_at < resume.occurred_at);

        // A kept upgrade never lands inside the pause window.
        for change in events
            .iter()
            .filter(|e| e.event_type == EventType::PlanChanged)
        {
            assert!(
                change.occurred_at < pause.occurred_at || change.occurred_at > resume.occurred_at,
                "{subscription_id} changed plan inside its pause window"
            );
        }
    }
}

#[test]
fn nothing_follows_a_sampled_cancellation() {
    let mut config = test_config();
    config.sizes.random_subscriptions = 50;
    config.randomization.prob_upgrade = 1.0;
    config.randomization.prob_pause = 1.0;
    config.randomization.prob_cancel = 1.0;
    config.randomization.prob_delinquent = 1.0;

    let out = sample(&config, 11);
    let events = events_by_subscription(&out);

    for sub in &out.subscriptions {
        assert_eq!(
            sub.status,
            SubscriptionStatus::Canceled,
            "{}",
            sub.subscription_id
        );
        let canceled_at = sub.canceled_at.unwrap();
        for event in &events[sub.subscription_id.as_str()] {
            assert!(
                event.occurred_at <= canceled_at,
                "{} has a {} event after cancellation",
                sub.subscription_id,
                event.event_type.as_str()
            );
        }
    }

    // A drawn cancellation suppresses the delinquency draw entirely.
    assert!(out
        .events
        .iter()
        .all(|e| e.event_type != EventType::PaymentFailed));
}

#[test]
fn sampled_lifecycles_always_sequence_cleanly() {
    // Every probability at full blast across several seeds; any illegal
    // script would surface as a sequencer error inside generate().
    let mut config = test_config();
    config.sizes.random_subscriptions = 30;
    config.randomization.prob_upgrade = 1.0;
    config.randomization.prob_pause = 1.0;
    config.randomization.prob_cancel = 1.0;
    config.randomization.prob_delinquent = 1.0;
    config.randomization.prob_missing_invoice = 1.0;
    config.randomization.prob_adjustment_line = 1.0;

    for seed in 0..8 {
        let out = sample(&config, seed);
        assert_eq!(out.subscriptions.len(), 30, "seed {seed}");
    }
}
