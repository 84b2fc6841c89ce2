//! End-to-end pipeline: parameters → estimator → initialize → query.

use oversub_estimator::{
    EstimatorError, ExecutorUsage, ResourceUsage, StaticLoadSampler, UsageFuture, UsageProvider,
};
use oversub_resources::{Resource, ResourceSet};
use oversub_module::{Parameters, create};

fn params(resources: &str) -> Parameters {
    [("resources", resources)].into_iter().collect()
}

fn canned_provider(usage: ResourceUsage) -> UsageProvider {
    Box::new(move || {
        let usage = usage.clone();
        Box::pin(async move { Ok(usage) }) as UsageFuture
    })
}

fn usage_with_revocable_cpus(cpus: f64) -> ResourceUsage {
    let mut allocated = ResourceSet::new();
    allocated
        .add(
            Resource::scalar("cpus", cpus)
                .as_revocable()
                .allocated_to("executor-1"),
        )
        .unwrap();
    ResourceUsage {
        executors: vec![ExecutorUsage { allocated }],
    }
}

fn revocable_set(spec: &str) -> ResourceSet {
    ResourceSet::parse(spec).unwrap().as_revocable()
}

#[tokio::test]
async fn offers_damped_capacity_at_moderate_load() {
    // cpus:4, limits 10/50, load 30 → factor 0.25 → withhold 1 cpu.
    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(30.0)));
    estimator
        .initialize(canned_provider(ResourceUsage::default()))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert_eq!(offer, revocable_set("cpus:3"));

    estimator.shutdown().await;
}

#[tokio::test]
async fn offers_nothing_beyond_the_upper_threshold() {
    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(60.0)));
    estimator
        .initialize(canned_provider(ResourceUsage::default()))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert!(offer.is_empty());

    estimator.shutdown().await;
}

#[tokio::test]
async fn offers_everything_unallocated_below_the_lower_threshold() {
    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(5.0)));
    estimator
        .initialize(canned_provider(usage_with_revocable_cpus(1.0)))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert_eq!(offer, revocable_set("cpus:3"));

    estimator.shutdown().await;
}

#[tokio::test]
async fn damping_and_allocation_stack() {
    // Withhold 1 cpu for load, 1.5 for allocation: 4 − 1 − 1.5 = 1.5.
    let mut estimator = create(&params("cpus:4;mem:2048"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(30.0)));
    estimator
        .initialize(canned_provider(usage_with_revocable_cpus(1.5)))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert_eq!(offer.cpus(), Some(1.5));
    // Memory is untouched by the cpu ramp.
    assert_eq!(offer.scalar("mem"), Some(2048.0));

    estimator.shutdown().await;
}

#[tokio::test]
async fn unavailable_load_sampler_fails_open() {
    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::unavailable()));
    estimator
        .initialize(canned_provider(ResourceUsage::default()))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert_eq!(offer, revocable_set("cpus:4"));

    estimator.shutdown().await;
}

#[tokio::test]
async fn over_allocation_clamps_to_empty_not_negative() {
    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(30.0)));
    estimator
        .initialize(canned_provider(usage_with_revocable_cpus(16.0)))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert!(offer.is_empty());

    estimator.shutdown().await;
}

#[tokio::test]
async fn repeated_queries_with_fixed_inputs_are_identical() {
    let mut estimator = create(&params("cpus:4;mem:2048"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(37.5)));
    estimator
        .initialize(canned_provider(usage_with_revocable_cpus(0.5)))
        .unwrap();

    let first = estimator.oversubscribable().await.unwrap();
    for _ in 0..10 {
        assert_eq!(estimator.oversubscribable().await.unwrap(), first);
    }

    estimator.shutdown().await;
}

#[tokio::test]
async fn provider_failures_pass_through() {
    let provider: UsageProvider =
        Box::new(|| Box::pin(async { Err(anyhow::anyhow!("cgroup walk failed")) }) as UsageFuture);

    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(5.0)));
    estimator.initialize(provider).unwrap();

    let err = estimator.oversubscribable().await.unwrap_err();
    assert!(matches!(err, EstimatorError::UsageProvider(_)));
    assert!(err.to_string().contains("cgroup walk failed"));

    // A failed query does not wedge the actor.
    let err = estimator.oversubscribable().await.unwrap_err();
    assert!(matches!(err, EstimatorError::UsageProvider(_)));

    estimator.shutdown().await;
}

#[tokio::test]
async fn lifecycle_errors_are_typed() {
    let mut estimator = create(&params("cpus:4"))
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(5.0)));

    let err = estimator.oversubscribable().await.unwrap_err();
    assert!(matches!(err, EstimatorError::NotInitialized));

    estimator
        .initialize(canned_provider(ResourceUsage::default()))
        .unwrap();
    let err = estimator
        .initialize(canned_provider(ResourceUsage::default()))
        .unwrap_err();
    assert!(matches!(err, EstimatorError::AlreadyInitialized));

    estimator.shutdown().await;
    let err = estimator.oversubscribable().await.unwrap_err();
    assert!(matches!(err, EstimatorError::Terminated));
}

#[tokio::test]
async fn custom_thresholds_shift_the_ramp() {
    let params: Parameters = [
        ("resources", "cpus:8"),
        ("load_lower_limit", "2"),
        ("load_upper_limit", "6"),
    ]
    .into_iter()
    .collect();

    // load 4 → factor ((4−2)/(6−2))² = 0.25 → withhold ⌊2⌋ cpus.
    let mut estimator = create(&params)
        .unwrap()
        .with_sampler(Box::new(StaticLoadSampler::new(4.0)));
    estimator
        .initialize(canned_provider(ResourceUsage::default()))
        .unwrap();

    let offer = estimator.oversubscribable().await.unwrap();
    assert_eq!(offer, revocable_set("cpus:6"));

    estimator.shutdown().await;
}
