//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> registry -> 发射 的 e2e 测试
//! - 公开 API 的并发语义

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ConfigVersion, Policy, SlotBehavior};

    #[test]
    fn test_contract_defaults() {
        assert_eq!(ConfigVersion::default(), ConfigVersion::V1);
        assert_eq!(Policy::default(), Policy::Collect);
    }

    #[test]
    fn test_json_and_toml_describe_the_same_blueprint() {
        let toml = r#"
[[signals]]
name = "before_save"
param_count = 2
policy = "veto"

[[signals.slots]]
name = "allow"
delay_ms = 3
behavior = { kind = "constant", value = true }
"#;
        let from_toml = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&from_toml).unwrap();
        let from_json = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();

        assert_eq!(from_json.version, ConfigVersion::V1);
        assert_eq!(from_json.signals[0].param_count, 2);
        assert_eq!(from_json.signals[0].policy, Policy::Veto);
        assert_eq!(from_json.signals[0].slots[0].delay_ms, 3);
        assert_eq!(
            from_json.signals[0].slots[0].behavior,
            SlotBehavior::Constant {
                value: serde_json::Value::Bool(true)
            }
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use serde_json::{json, Value};
    use signal_engine::{BoxError, HookRegistry, Signal, SignalError, Slot};
    use tokio::sync::oneshot;

    const HOOKS: &str = r#"
[[signals]]
name = "before_delete"
param_count = 1
policy = "veto"

[[signals.slots]]
name = "slow_allow"
delay_ms = 20
behavior = { kind = "constant", value = true }

[[signals.slots]]
name = "echo"
behavior = { kind = "echo", index = 0 }

[[signals]]
name = "changed"
param_count = 2

[[signals.slots]]
name = "second"
delay_ms = 15
behavior = { kind = "echo", index = 1 }

[[signals.slots]]
name = "first"
behavior = { kind = "echo", index = 0 }

[[signals]]
name = "closed"
param_count = 0
policy = "discard"

[[signals.slots]]
name = "flaky"
delay_ms = 10
behavior = { kind = "fail", message = "disk offline" }
"#;

    fn registry() -> HookRegistry {
        let blueprint = ConfigLoader::load_from_str(HOOKS, ConfigFormat::Toml).unwrap();
        HookRegistry::from_blueprint(&blueprint).unwrap()
    }

    /// End-to-end test: config -> HookRegistry -> emit
    ///
    /// 验证完整的数据流：
    /// 1. ConfigLoader 解析并校验配置
    /// 2. HookRegistry 按声明顺序注册 scripted slot
    /// 3. emit 按注册顺序汇总结果
    #[tokio::test]
    async fn test_e2e_configured_hooks() {
        let registry = registry();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["before_delete", "changed", "closed"]
        );

        let changed = registry.get("changed").unwrap();
        assert_eq!(changed.count(), 2);
        assert_eq!(
            changed.call(vec![json!("a"), json!("b")]).await.unwrap(),
            json!(["b", "a"])
        );

        let before_delete = registry.get("before_delete").unwrap();
        assert_eq!(before_delete.call(vec![json!(true)]).await.unwrap(), json!(true));
        assert_eq!(before_delete.call(vec![json!(false)]).await.unwrap(), json!(false));

        let closed = registry.get("closed").unwrap();
        let err = closed.call(vec![]).await.unwrap_err();
        assert!(matches!(err, SignalError::Slot { index: 0, .. }));
        assert!(err.to_string().contains("disk offline"), "{err}");
    }

    /// Slots registered at runtime run alongside the configured ones
    #[tokio::test]
    async fn test_runtime_slot_on_configured_signal() {
        let registry = registry();
        let before_delete = registry.get("before_delete").unwrap();

        let deny = Slot::from_fn(|_item: Value| async { Ok::<_, BoxError>(false) });
        before_delete.register(deny.clone()).unwrap();
        assert_eq!(before_delete.call(vec![json!(true)]).await.unwrap(), json!(false));

        assert!(before_delete.remove(&deny));
        assert_eq!(before_delete.call(vec![json!(true)]).await.unwrap(), json!(true));

        let snapshot = before_delete.metrics().snapshot();
        assert_eq!(snapshot.emissions, 2);
        assert_eq!(snapshot.completed, 2);
        assert_eq!(snapshot.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_emit_rejects_wrong_argument_count() {
        let registry = registry();
        let changed = registry.get("changed").unwrap();

        let err = changed.emit(vec![json!(1)], |_| {}).unwrap_err();
        assert!(matches!(
            err,
            SignalError::ArgumentCount {
                supplied: 1,
                expected: 2
            }
        ));
        assert!(err.is_synchronous());
        assert_eq!(changed.metrics().snapshot().emissions, 0);
    }

    /// Every slot is invoked before any of them reports
    #[tokio::test]
    async fn test_fan_out_is_concurrent() {
        let signal = Signal::collect(0).unwrap();
        let started = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let started = Arc::clone(&started);
            signal
                .register(Slot::new(0, move |_args| {
                    started.fetch_add(1, Ordering::SeqCst);
                    let started = Arc::clone(&started);
                    async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, BoxError>(started.load(Ordering::SeqCst))
                    }
                }))
                .unwrap();
        }

        let results = signal.call(vec![]).await.unwrap();
        assert_eq!(results, json!([5, 5, 5, 5, 5]));
    }

    /// The first error is reported while slower slots keep running
    #[tokio::test]
    async fn test_first_error_short_circuits() {
        let signal = Signal::veto(0).unwrap();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let done_tx = std::sync::Mutex::new(Some(done_tx));

        signal
            .register(Slot::from_fn(move || {
                let done_tx = done_tx.lock().unwrap().take();
                async move {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    if let Some(tx) = done_tx {
                        let _ = tx.send(());
                    }
                    Ok::<_, BoxError>(true)
                }
            }))
            .unwrap();
        signal
            .register(Slot::from_fn(|| async {
                Err::<Value, BoxError>("denied by policy".into())
            }))
            .unwrap();

        let err = signal.call(vec![]).await.unwrap_err();
        assert!(matches!(err, SignalError::Slot { index: 1, .. }));

        tokio::time::timeout(Duration::from_secs(1), done_rx)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_veto_with_non_boolean_result() {
        let signal = Signal::veto(1).unwrap();
        signal
            .register(Slot::from_fn(|v: Value| async move { Ok::<_, BoxError>(v) }))
            .unwrap();

        let err = signal.call(vec![json!("maybe")]).await.unwrap_err();
        assert!(matches!(err, SignalError::Processor { .. }));
    }

    #[tokio::test]
    async fn test_discard_and_empty_collect() {
        let discard = Signal::discard(1).unwrap();
        discard
            .register(Slot::from_fn(|v: Value| async move { Ok::<_, BoxError>(v) }))
            .unwrap();
        assert_eq!(discard.call(vec![json!(7)]).await.unwrap(), Value::Null);

        let collect = Signal::collect(0).unwrap();
        assert_eq!(collect.call(vec![]).await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_emission_stats_summary() {
        let registry = registry();
        let changed = registry.get("changed").unwrap();
        let closed = registry.get("closed").unwrap();

        let mut stats = observability::EmissionStats::new();
        for _ in 0..3 {
            let start = std::time::Instant::now();
            let ok = changed.call(vec![json!(1), json!(2)]).await.is_ok();
            stats.update(ok, start.elapsed().as_secs_f64() * 1000.0);
        }
        let ok = closed.call(vec![]).await.is_ok();
        stats.update(ok, 0.5);

        let summary = stats.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert!((summary.failure_rate - 25.0).abs() < 1e-9);
    }
}
