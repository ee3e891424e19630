use coffeecan_ir::game::{Configuration, Kind};
use coffeecan_ir::trace::Trace;
use coffeecan_smt::encoder::CoffeeEncoding;
use coffeecan_smt::solver::Model;
use thiserror::Error;

/// A model that does not describe a run of the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    #[error("model assigns no {kind} count at step {step}")]
    MissingValue { kind: Kind, step: usize },
    #[error("model assigns several {kind} counts at step {step}: {values:?}")]
    AmbiguousValue {
        kind: Kind,
        step: usize,
        values: Vec<u32>,
    },
    #[error("witness starts at {found}, expected {expected}")]
    WrongStart {
        expected: Configuration,
        found: Configuration,
    },
    #[error("witness ends at {found}, expected {expected}")]
    WrongEnd {
        expected: Configuration,
        found: Configuration,
    },
    #[error("witness breaks the move rules between steps {step} and {}", .step + 1)]
    IllegalMove { step: usize },
}

/// Read the configuration at every step `0..=bound` out of `model`.
pub fn extract_trace(encoding: &CoffeeEncoding, model: &Model) -> Result<Trace, WitnessError> {
    let bound = encoding.instance.bound;
    let configurations = (0..=bound)
        .map(|step| {
            Ok(Configuration::new(
                extract_count(encoding, model, Kind::Black, step)?,
                extract_count(encoding, model, Kind::White, step)?,
            ))
        })
        .collect::<Result<Vec<_>, WitnessError>>()?;
    Ok(Trace::new(configurations))
}

fn extract_count(
    encoding: &CoffeeEncoding,
    model: &Model,
    kind: Kind,
    step: usize,
) -> Result<u32, WitnessError> {
    let registry = &encoding.registry;
    let values: Vec<u32> = (0..=encoding.instance.domain())
        .filter(|&value| {
            registry
                .lookup(kind, value, step)
                .is_some_and(|bean| model.is_true(registry.name(bean)))
        })
        .collect();
    match values.as_slice() {
        [value] => Ok(*value),
        [] => Err(WitnessError::MissingValue { kind, step }),
        _ => Err(WitnessError::AmbiguousValue { kind, step, values }),
    }
}

/// Check that `trace` runs from the instance's start to `(0, 1)` by legal moves.
pub fn validate_trace(encoding: &CoffeeEncoding, trace: &Trace) -> Result<(), WitnessError> {
    let expected = encoding.instance.initial;
    let found = trace.first().ok_or(WitnessError::MissingValue {
        kind: Kind::Black,
        step: 0,
    })?;
    if found != expected {
        return Err(WitnessError::WrongStart { expected, found });
    }
    if let Some(step) = trace.moves().iter().position(Option::is_none) {
        return Err(WitnessError::IllegalMove { step });
    }
    let expected = Configuration::WHITE_LAST;
    match trace.last() {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(WitnessError::WrongEnd { expected, found }),
        None => Err(WitnessError::MissingValue {
            kind: Kind::Black,
            step: encoding.instance.bound,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeecan_ir::game::simulate;
    use coffeecan_smt::encoder::{encode, Instance, SweepStrategy};
    use std::collections::HashMap;

    fn encoding(x: i64, y: i64, n: i64) -> CoffeeEncoding {
        encode(Instance::new(x, y, n).unwrap(), "cc", SweepStrategy::Reachable).unwrap()
    }

    /// Model that makes exactly the propositions of `run` true.
    fn model_for(encoding: &CoffeeEncoding, run: &[Configuration]) -> Model {
        let registry = &encoding.registry;
        let mut values: HashMap<String, bool> =
            registry.names().map(|n| (n.to_string(), false)).collect();
        for (step, c) in run.iter().enumerate() {
            for (kind, value) in [(Kind::Black, c.black), (Kind::White, c.white)] {
                if let Some(bean) = registry.lookup(kind, value, step) {
                    values.insert(registry.name(bean).to_string(), true);
                }
            }
        }
        Model { values }
    }

    #[test]
    fn extracts_the_run_the_model_describes() {
        let enc = encoding(2, 1, 2);
        let run = simulate(enc.instance.initial, 2);
        let trace = extract_trace(&enc, &model_for(&enc, &run)).unwrap();
        assert_eq!(trace.configurations, run);
        assert_eq!(validate_trace(&enc, &trace), Ok(()));
    }

    #[test]
    fn missing_value_is_reported() {
        let enc = encoding(2, 1, 2);
        let model = model_for(&enc, &[]);
        assert_eq!(
            extract_trace(&enc, &model),
            Err(WitnessError::MissingValue {
                kind: Kind::Black,
                step: 0
            })
        );
    }

    #[test]
    fn ambiguous_value_is_reported() {
        let enc = encoding(2, 1, 2);
        let run = simulate(enc.instance.initial, 2);
        let mut model = model_for(&enc, &run);
        model.values.insert("cc_white_3_1".to_string(), true);
        assert_eq!(
            extract_trace(&enc, &model),
            Err(WitnessError::AmbiguousValue {
                kind: Kind::White,
                step: 1,
                values: vec![1, 3],
            })
        );
    }

    #[test]
    fn validation_rejects_jumps_and_wrong_endpoints() {
        let enc = encoding(2, 1, 2);
        let jump = Trace::new(vec![
            Configuration::new(2, 1),
            Configuration::new(0, 1),
            Configuration::new(0, 1),
        ]);
        assert_eq!(
            validate_trace(&enc, &jump),
            Err(WitnessError::IllegalMove { step: 0 })
        );

        let wrong_start = Trace::new(vec![Configuration::new(1, 1), Configuration::new(0, 1)]);
        assert!(matches!(
            validate_trace(&enc, &wrong_start),
            Err(WitnessError::WrongStart { .. })
        ));

        let short_run = Trace::new(simulate(Configuration::new(2, 1), 1));
        assert!(matches!(
            validate_trace(&enc, &short_run),
            Err(WitnessError::WrongEnd { .. })
        ));
    }
}
