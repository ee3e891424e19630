#![no_main]
use libfuzzer_sys::fuzz_target;

use coffeecan_ir::game::{simulate, Configuration, Kind};
use coffeecan_smt::encoder::{encode, Instance, SweepStrategy};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Keep instances small: the domain grows quadratically in x + y.
    let x = i64::from(data[0] % 24) - 2;
    let y = i64::from(data[1] % 24) - 2;
    let n = i64::from(data[2] % 32) - 2;
    let strategy = if data[3] & 1 == 0 {
        SweepStrategy::Reachable
    } else {
        SweepStrategy::Exhaustive
    };
    let Ok(instance) = Instance::new(x, y, n) else {
        return;
    };
    let Ok(encoding) = encode(instance, "cc", strategy) else {
        return;
    };
    assert_eq!(encoding.stats.propositions, encoding.registry.len());

    // The game's own run must satisfy the formula whenever it ends white-last.
    let run = simulate(instance.initial, instance.bound);
    if run.get(instance.bound) == Some(&Configuration::WHITE_LAST) {
        let registry = &encoding.registry;
        let truths: Vec<&str> = run
            .iter()
            .enumerate()
            .flat_map(|(step, c)| {
                [(Kind::Black, c.black), (Kind::White, c.white)]
                    .into_iter()
                    .filter_map(move |(kind, value)| registry.lookup(kind, value, step))
            })
            .map(|bean| registry.name(bean))
            .collect();
        assert!(encoding.formula.eval(&|name: &str| truths.contains(&name)));
    }
});
