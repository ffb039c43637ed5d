//! Property tests: a slot behaves like one optional value guarded by
//! read-through and write-through rules.

use proptest::prelude::*;
use slot_cache::{persist_fn, retrieve_fn, CacheSlot};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Op {
    Get,
    Store(i64),
    Refresh,
    Sync,
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Get),
        any::<i64>().prop_map(Op::Store),
        Just(Op::Refresh),
        Just(Op::Sync),
        Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn slot_matches_single_value_model(
        seed in proptest::option::of(any::<i64>()),
        source in proptest::option::of(any::<i64>()),
        ops in proptest::collection::vec(op_strategy(), 1..32),
    ) {
        futures::executor::block_on(async move {
            let persisted = Arc::new(Mutex::new(Vec::new()));
            let log = persisted.clone();

            let mut builder = CacheSlot::builder()
                .retriever(retrieve_fn(move || async move { Ok(source) }))
                .persister(persist_fn(move |value: i64| {
                    let log = log.clone();
                    async move {
                        log.lock().unwrap().push(value);
                        Ok(())
                    }
                }));
            if let Some(value) = seed {
                builder = builder.seed(value);
            }
            let slot = builder.build();

            // Naive model: one optional value plus the persistence log.
            let mut memory = seed;
            let mut expected_log = Vec::new();

            for op in ops {
                match op {
                    Op::Get => {
                        if memory.is_none() {
                            memory = source;
                        }
                        assert_eq!(slot.get().await.unwrap(), memory);
                    }
                    Op::Store(value) => {
                        slot.store(value).await.unwrap();
                        expected_log.push(value);
                        memory = Some(value);
                    }
                    Op::Refresh => {
                        if source.is_some() {
                            memory = source;
                        }
                        assert_eq!(slot.refresh().await.unwrap(), source);
                    }
                    Op::Sync => {
                        if memory.is_none() {
                            memory = source;
                        }
                        if let Some(value) = memory {
                            expected_log.push(value);
                        }
                        assert_eq!(slot.sync().await.unwrap(), memory);
                    }
                    Op::Clear => {
                        slot.clear().await;
                        memory = None;
                    }
                }
            }

            assert_eq!(*persisted.lock().unwrap(), expected_log);
        });
    }
}
